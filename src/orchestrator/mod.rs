//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责面试的阶段调度和界面交互，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 控制台应用
//! - 管理应用生命周期（初始化、运行、收尾）
//! - 加载题库、创建 LLM 客户端
//! - 在后台任务中运行面试，通过有界通道与界面交互
//! - 写面试报告，输出统计信息
//!
//! ### `interview_session` - 单场面试
//! - 生成 → 判分 → 反馈 三阶段流水线（类型状态保证顺序）
//! - 独占一份 `InterviewState`
//!
//! ## 层次关系
//!
//! ```text
//! app (界面 + 资源)
//!     ↓
//! interview_session (三阶段)
//!     ↓
//! workflow::QuestionFlow (处理单个题目)
//!     ↓
//! services (能力层：parse / build / judge / feedback / report)
//!     ↓
//! clients (基础设施：LlmClient)
//! ```

pub mod app;
pub mod interview_session;

// 重新导出主要类型
pub use app::App;
pub use interview_session::{Evaluated, Generated, InterviewSession, SessionOutcome, SessionServices, Start};
