//! # Mock Interview
//!
//! 一个由 LLM 驱动的模拟面试程序：生成带权重的题目、逐题收集回答、
//! 自动判分（含一次重答机会与部分得分），最后给出汇总反馈。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有外部资源（LLM API 连接），只暴露能力
//! - `LlmClient` - OpenAI 兼容接口的唯一调用入口，实现 `Collaborator`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `ResponseParser` - 把 LLM 生成的自由文本解析成题目记录
//! - `QuestionSetBuilder` - 组装完整题目列表与元数据
//! - `LlmService` - 带限流退避重试的 LLM 调用能力
//! - `AnswerJudge` - 识别"不知道"并请求 LLM 判分
//! - `FeedbackComposer` - 计算得分率并生成学习建议
//! - `ReportWriter` - 写面试报告能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整判分流程
//! - `QuestionCtx` - 上下文封装（题号 + 类型 + 权重）
//! - `QuestionFlow` - 单题状态机（提问 → 判分 → 重答 → 结算）
//! - `Host` - ask / tell 边界以及基于有界通道的实现
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/interview_session` - 生成 → 判分 → 反馈 三阶段流水线
//! - `orchestrator/app` - 控制台界面，后台运行面试流程并通过通道转发问答
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{Collaborator, LlmClient};
pub use config::{Config, EvaluationPolicy, WeightSource};
pub use error::{AppError, AppResult, HostError, LlmError};
pub use models::{InterviewState, QuestionBank, QuestionKind, QuestionMeta, QuestionOutcome};
pub use orchestrator::{App, InterviewSession, SessionOutcome};
pub use services::{FeedbackComposer, FeedbackReport, LlmService, QuestionSetBuilder};
pub use workflow::{ChannelHost, Host, HostEvent, HostHandle, QuestionCtx, QuestionFlow};
