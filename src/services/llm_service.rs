//! LLM 服务 - 业务能力层
//!
//! 只负责"带重试地调用 LLM"这一能力，不关心调用结果用来做什么。
//!
//! ## 重试策略
//! - 只有限流类错误会重试，最多尝试 `max_attempts` 次
//! - 第 n 次失败后等待 `2^n` 个退避单位（默认 1 秒）
//! - 重试耗尽或回复为空时返回 `Ok(None)`，由调用方降级处理
//! - 其他错误立即返回 `Err`，中止当前阶段

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::clients::Collaborator;
use crate::config::Config;
use crate::error::LlmError;
use crate::utils::logging::truncate_text;

/// LLM 服务
#[derive(Clone)]
pub struct LlmService {
    collaborator: Arc<dyn Collaborator>,
    max_attempts: u32,
    backoff_unit: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(collaborator: Arc<dyn Collaborator>, config: &Config) -> Self {
        Self {
            collaborator,
            max_attempts: config.llm_max_attempts.max(1),
            backoff_unit: config.llm_backoff_unit,
        }
    }

    /// 自定义重试参数
    pub fn with_retry(collaborator: Arc<dyn Collaborator>, max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            collaborator,
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// 发送提示词
    ///
    /// # 返回
    /// - `Ok(Some(text))`: 成功拿到非空回复
    /// - `Ok(None)`: 限流重试耗尽，或回复为空
    /// - `Err(e)`: 非限流错误，调用方应中止
    pub async fn invoke(&self, prompt: &str) -> Result<Option<String>, LlmError> {
        debug!(
            "调用 {}，提示词: {}",
            self.collaborator.name(),
            truncate_text(prompt, 80)
        );

        for attempt in 0..self.max_attempts {
            match self.collaborator.complete(prompt).await {
                Ok(text) if text.trim().is_empty() => {
                    warn!("{} 返回内容为空", self.collaborator.name());
                    return Ok(None);
                }
                Ok(text) => {
                    debug!("{} 回复: {}", self.collaborator.name(), truncate_text(&text, 120));
                    return Ok(Some(text));
                }
                Err(LlmError::EmptyContent { model }) => {
                    warn!("{} 没有返回内容", model);
                    return Ok(None);
                }
                Err(e) if e.is_rate_limited() => {
                    if attempt + 1 >= self.max_attempts {
                        warn!(
                            "{} 请求频率限制，已尝试 {} 次，放弃: {}",
                            self.collaborator.name(),
                            self.max_attempts,
                            e
                        );
                        break;
                    }
                    let wait = self.backoff_for(attempt);
                    warn!(
                        "{} 请求频率限制 (尝试 {}/{})，等待 {:?} 后重试...",
                        self.collaborator.name(),
                        attempt + 1,
                        self.max_attempts,
                        wait
                    );
                    sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    /// 第 `attempt` 次（从 0 开始）失败后的等待时间
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(2u32.saturating_pow(attempt))
    }
}
