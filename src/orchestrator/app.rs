//! 控制台应用 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源准备和界面交互。
//!
//! 1. **应用初始化**：题库、LLM 客户端
//! 2. **后台运行**：面试流程在 tokio 任务中运行，只通过通道与界面交互
//! 3. **界面循环**：打印问题和提示，把 stdin 的每一行作为回答送回
//! 4. **收尾**：写面试报告并输出统计

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::clients::LlmClient;
use crate::config::Config;
use crate::models::{load_question_bank, QuestionBank};
use crate::orchestrator::interview_session::{InterviewSession, SessionOutcome};
use crate::services::ReportWriter;
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::{channel_pair, HostEvent};

/// 应用主结构
pub struct App {
    config: Config,
    bank: QuestionBank,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未设置 LLM_API_KEY，LLM 调用可能失败");
        }

        let bank = match config.question_bank_file.as_deref() {
            Some(path) => load_question_bank(Path::new(path)).await?,
            None => {
                info!("📁 未指定题库文件，使用内置题目");
                QuestionBank::default()
            }
        };

        Ok(Self { config, bank })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<SessionOutcome> {
        let (host, mut handle) = channel_pair(self.config.channel_capacity);

        let session = InterviewSession::from_config(
            host,
            &self.config,
            self.bank.clone(),
            Arc::new(LlmClient::new(&self.config)),
            Arc::new(LlmClient::judge(&self.config)),
        );
        let task = tokio::spawn(session.run());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(event) = handle.next_event().await {
            match event {
                HostEvent::Notice(message) => println!("{}", message),
                HostEvent::Prompt(question) => {
                    println!("\n{}", question);
                    print!("> ");
                    std::io::stdout().flush()?;

                    match lines.next_line().await? {
                        Some(line) => handle.answer(line).await?,
                        None => {
                            warn!("⚠️ 输入已结束，面试中止");
                            break;
                        }
                    }
                }
            }
        }
        drop(handle);

        let outcome = task.await.context("面试任务异常退出")??;

        let writer = ReportWriter::with_path(&self.config.output_report_file);
        writer
            .write(&outcome.state, &outcome.feedback, self.config.policy)
            .await
            .with_context(|| format!("无法写入面试报告: {}", writer.path()))?;

        print_final_stats(&outcome, &self.config.output_log_file, writer.path());
        println!("\n🏁 Interview process completed!");

        Ok(outcome)
    }
}
