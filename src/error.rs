use thiserror::Error;

/// 应用程序错误类型
///
/// 只有"致命"错误会以 `AppError` 的形式向上传播并中止面试；
/// 可降级的情况（重试耗尽、回复为空、格式错误）在各自的服务里就地处理。
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 与界面之间的问答通道错误
    #[error("界面通道错误: {0}")]
    Host(#[from] HostError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件读写错误
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),
    /// 报告序列化失败
    #[error("报告序列化失败: {0}")]
    Report(#[from] serde_json::Error),
}

/// LLM 服务错误
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// 请求频率限制（唯一会触发退避重试的错误）
    #[error("LLM请求频率限制 (模型: {model}): {message}")]
    RateLimited { model: String, message: String },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 请求构建失败
    #[error("LLM请求构建失败: {0}")]
    RequestBuild(String),
}

impl LlmError {
    /// 根据错误信息归类：限流类错误可以重试，其余错误直接上抛
    pub fn from_api_message(model: impl Into<String>, message: impl Into<String>) -> Self {
        let model = model.into();
        let message = message.into();
        if is_rate_limit_message(&message) {
            LlmError::RateLimited { model, message }
        } else {
            LlmError::ApiCallFailed { model, message }
        }
    }

    /// 是否为限流类错误
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }
}

fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["rate_limit", "rate limit", "too many requests", "429", "resource_exhausted"]
        .iter()
        .any(|marker| lower.contains(marker))
}

/// 问答通道错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// 界面一侧已关闭（用户退出或输入结束）
    #[error("界面已断开，面试被放弃")]
    Disconnected,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 开场题数量必须为 3（姓名、岗位、岗位要求）
    #[error("题库文件 {path} 中的 intake 题目数量为 {found}，必须为 3")]
    InvalidIntakeCount { path: String, found: usize },
    /// 题库中出现空题目
    #[error("题库文件 {path} 中存在空题目")]
    EmptyQuestion { path: String },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
