use anyhow::{Context, Result};
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::{self, File, OpenOptions};
use std::sync::Mutex;
use tracing::{info, Subscriber};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::Config;
use crate::orchestrator::SessionOutcome;

/// 初始化 tracing 日志
///
/// 日志同时写到 stderr 和日志文件，stdout 只留给面试界面。
/// `RUST_LOG` 优先；否则按 `verbose` 选择 debug 或 info。
pub fn init(verbose: bool, log_file_path: &str) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = init_log_file(log_file_path)?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer(file))
        .try_init();

    Ok(())
}

/// 日志文件输出层（不带颜色转义）
fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
}

/// 初始化日志文件
///
/// 写入文件头后以追加模式重新打开，返回的句柄供日志层写入。
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<File> {
    let log_header = format!(
        "{}\n模拟面试日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).with_context(|| format!("无法写入日志文件: {}", log_file_path))?;

    OpenOptions::new()
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 模拟面试模式");
    info!("🤖 出题模型: {} | 判分模型: {}", config.llm_model_name, config.judge_model_name);
    info!(
        "📋 目标题数: {} | 及格线: {}% | 允许重答: {} | 记录错题: {}",
        config.target_question_count,
        config.pass_threshold,
        config.policy.allow_retry,
        config.policy.track_wrong_questions
    );
    info!("{}", "=".repeat(60));
}

/// 记录阶段开始信息
///
/// # 参数
/// - `stage`: 阶段编号（1-3）
/// - `name`: 阶段名称
pub fn log_stage_start(stage: usize, name: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📦 阶段 {}/3: {}", stage, name);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(outcome: &SessionOutcome, log_file_path: &str, report_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 面试完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 得分: {}/{}", outcome.state.user_score, outcome.state.total_possible_score);
    if let Some(percentage) = outcome.feedback.percentage {
        info!("📈 百分比: {:.1}%", percentage);
    }
    info!("❌ 错题: {}", outcome.state.wrong_questions.len());
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
    info!("报告已保存至: {}", report_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
