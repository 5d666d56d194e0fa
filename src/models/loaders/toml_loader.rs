use crate::error::ConfigError;
use crate::models::question_bank::QuestionBank;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载固定题库
///
/// 文件中缺少的部分使用内置题目；开场题必须正好 3 道。
pub async fn load_question_bank(toml_file_path: &Path) -> Result<QuestionBank> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取题库文件: {}", toml_file_path.display()))?;

    let bank = parse_question_bank(&content, &toml_file_path.display().to_string())?;

    tracing::info!(
        "成功加载题库: 开场 {} 道, 基础 {} 道, 个人 {} 道",
        bank.intake.len(),
        bank.basic.len(),
        bank.personal.len()
    );

    Ok(bank)
}

/// 解析并校验题库内容
pub fn parse_question_bank(content: &str, path: &str) -> Result<QuestionBank> {
    let bank: QuestionBank =
        toml::from_str(content).with_context(|| format!("无法解析题库文件: {}", path))?;

    if bank.intake.len() != 3 {
        return Err(ConfigError::InvalidIntakeCount {
            path: path.to_string(),
            found: bank.intake.len(),
        }
        .into());
    }

    let has_empty = bank
        .intake
        .iter()
        .chain(&bank.basic)
        .chain(&bank.personal)
        .any(|q| q.trim().is_empty());
    if has_empty {
        return Err(ConfigError::EmptyQuestion {
            path: path.to_string(),
        }
        .into());
    }

    Ok(bank)
}
