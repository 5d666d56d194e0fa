//! 报告写入服务 - 业务能力层
//!
//! 只负责"写面试报告"能力，不关心流程

use serde::Serialize;
use tracing::debug;

use crate::config::EvaluationPolicy;
use crate::error::AppResult;
use crate::models::InterviewState;
use crate::services::feedback_composer::FeedbackReport;

/// 写入磁盘的会话报告
#[derive(Debug, Serialize)]
pub struct SessionReport<'a> {
    pub finished_at: String,
    pub policy: EvaluationPolicy,
    pub state: &'a InterviewState,
    pub feedback: &'a FeedbackReport,
}

/// 报告写入服务
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.report_file_path
    }

    /// 写入会话报告（覆盖已有文件）
    pub async fn write(
        &self,
        state: &InterviewState,
        feedback: &FeedbackReport,
        policy: EvaluationPolicy,
    ) -> AppResult<()> {
        let report = SessionReport {
            finished_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            policy,
            state,
            feedback,
        };
        let json = serde_json::to_string_pretty(&report)?;

        debug!(
            "写入面试报告: {} | 题目数: {} | 大小: {} 字节",
            self.report_file_path,
            state.questions.len(),
            json.len()
        );

        tokio::fs::write(&self.report_file_path, json).await?;
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::with_path("interview_report.json")
    }
}
