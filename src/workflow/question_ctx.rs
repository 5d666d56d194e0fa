//! 题目处理上下文
//!
//! 封装"我正在问第几题、是什么类型"这一信息

use std::fmt::Display;

use crate::models::{QuestionKind, QuestionMeta};

/// 题目处理上下文
#[derive(Debug, Clone, Copy)]
pub struct QuestionCtx {
    /// 题目序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 题目总数
    pub total: usize,

    pub kind: QuestionKind,

    pub weight: f64,
}

impl QuestionCtx {
    /// 创建新的题目上下文
    pub fn new(index: usize, total: usize, meta: &QuestionMeta) -> Self {
        Self {
            index,
            total,
            kind: meta.kind,
            weight: meta.weight,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind.is_scored() {
            write!(
                f,
                "[题目 {}/{} 类型#{} 权重#{}]",
                self.index, self.total, self.kind, self.weight
            )
        } else {
            write!(f, "[题目 {}/{} 类型#{}]", self.index, self.total, self.kind)
        }
    }
}
