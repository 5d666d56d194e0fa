/// LLM API 客户端
///
/// 封装所有与 OpenAI 兼容接口（OpenAI、Gemini、Groq、通义等）的调用逻辑
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::Collaborator;
use crate::config::Config;
use crate::error::LlmError;

/// LLM 客户端
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    system_message: Option<String>,
    temperature: f32,
}

impl LlmClient {
    /// 创建出题用的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        Self::with_model(config, config.llm_model_name.clone())
    }

    /// 创建判分用的 LLM 客户端
    ///
    /// 判分要求稳定输出，温度设为 0
    pub fn judge(config: &Config) -> Self {
        Self::with_model(config, config.judge_model_name.clone())
            .with_system_message("You are a very strict technical interviewer. Reply with only CORRECT or INCORRECT.")
            .with_temperature(0.0)
    }

    /// 创建自定义模型的 LLM 客户端
    pub fn with_model(config: &Config, model_name: impl Into<String>) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: model_name.into(),
            system_message: None,
            temperature: 0.7,
        }
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(system_message.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 发送聊天请求
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    pub async fn chat(&self, user_message: &str) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let build_err = |e: async_openai::error::OpenAIError| LlmError::RequestBuild(e.to_string());

        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = &self.system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg.as_str())
                .build()
                .map_err(build_err)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(build_err)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(2048u32)
            .build()
            .map_err(build_err)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::from_api_message(&self.model_name, e.to_string())
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl Collaborator for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.chat(prompt).await
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_client_uses_judge_model() {
        let config = Config {
            llm_model_name: "gen-model".to_string(),
            judge_model_name: "judge-model".to_string(),
            ..Config::default()
        };

        assert_eq!(LlmClient::new(&config).model_name(), "gen-model");
        assert_eq!(LlmClient::judge(&config).model_name(), "judge-model");
        assert_eq!(LlmClient::judge(&config).temperature, 0.0);
    }

    /// 测试 LLM API 连通性
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_chat_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_chat_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let client = LlmClient::new(&config);

        let result = client.chat("Reply with the single word: pong").await;

        match result {
            Ok(response) => {
                println!("LLM 响应: {}", response);
                assert!(!response.is_empty());
            }
            Err(e) => panic!("LLM 调用失败: {}", e),
        }
    }
}
