//! 基础设施层：外部 LLM 服务
//!
//! 核心只依赖 `Collaborator` 这一个能力接口，出题、判分、学习建议都通过它完成。
//! 真实实现是 `LlmClient`，测试中可以替换为脚本化的假实现。

pub mod llm_client;

pub use llm_client::LlmClient;

use async_trait::async_trait;

use crate::error::LlmError;

/// 文本生成协作者：输入提示词，返回自由文本
#[async_trait]
pub trait Collaborator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// 用于日志显示的名称
    fn name(&self) -> &str {
        "collaborator"
    }
}
