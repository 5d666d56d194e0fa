//! 题目组装服务 - 业务能力层
//!
//! 按固定顺序组装整场面试的题目：开场题 → 基础题 → 生成的岗位相关题 → 个人题，
//! 并为每道题写入元数据。

use tracing::{info, warn};

use crate::config::{Config, WeightSource};
use crate::error::LlmError;
use crate::models::{InterviewState, QuestionBank, QuestionKind, QuestionMeta};
use crate::services::llm_service::LlmService;
use crate::services::response_parser::parse_response;

/// 题目组装结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestionSetReport {
    pub basic: usize,
    /// 实际得到的计分题数量
    pub generated: usize,
    pub personal: usize,
    /// 出题服务不可用（重试耗尽或回复为空）
    pub generation_failed: bool,
    /// 计分题少于下限，面试仍继续
    pub insufficient: bool,
}

/// 题目组装服务
pub struct QuestionSetBuilder {
    llm: LlmService,
    bank: QuestionBank,
    target_count: usize,
    min_generated: usize,
    weight_source: WeightSource,
}

impl QuestionSetBuilder {
    pub fn new(llm: LlmService, bank: QuestionBank, config: &Config) -> Self {
        Self {
            llm,
            bank,
            target_count: config.target_question_count,
            min_generated: config.min_generated_questions,
            weight_source: config.policy.weight_source,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// 写入 3 道开场题（不计分）
    pub fn seed_intake(&self, state: &mut InterviewState) {
        for question in &self.bank.intake {
            state.insert_question(question.as_str(), QuestionMeta::unscored(QuestionKind::Intake));
        }
    }

    /// 生成剩余题目
    ///
    /// 出题服务不可用时只保留固定题目；非限流错误直接返回。
    pub async fn build(&self, state: &mut InterviewState) -> Result<QuestionSetReport, LlmError> {
        let prompt = self.build_prompt(&state.requirements, &state.role);
        info!("📝 正在为 \"{}\" 生成题目...", state.requirements);

        let response = self.llm.invoke(&prompt).await?;
        if response.is_none() {
            warn!("⚠️ 出题失败，仅使用固定题目继续");
        }

        Ok(self.assemble(state, response.as_deref()))
    }

    /// 用已经拿到的 LLM 回复组装题目列表
    pub fn assemble(&self, state: &mut InterviewState, generated_text: Option<&str>) -> QuestionSetReport {
        if state.questions.is_empty() {
            self.seed_intake(state);
        }

        for question in &self.bank.basic {
            state.insert_question(question.as_str(), QuestionMeta::unscored(QuestionKind::Basic));
        }

        let mut accepted = 0;
        for record in parse_response(generated_text.unwrap_or_default()) {
            if accepted >= self.target_count {
                break;
            }
            if self.is_fixed_question(state, &record.text) {
                warn!("⚠️ 生成的题目与固定题目重复，已跳过: {}", record.text);
                continue;
            }
            accepted += 1;

            let weight = match self.weight_source {
                WeightSource::Generated => record.weight,
                WeightSource::FixedZero => 0.0,
            };
            if !state.insert_question(
                record.text.as_str(),
                QuestionMeta::scored(record.kind, weight, record.expected_answer),
            ) {
                warn!("⚠️ 生成了重复题目，覆盖之前的记录: {}", record.text);
            }
        }

        for question in &self.bank.personal {
            state.insert_question(question.as_str(), QuestionMeta::unscored(QuestionKind::Personal));
        }

        state.recompute_total_possible_score();

        let generated = state.scored_questions().count();
        let report = QuestionSetReport {
            basic: state.count_kind(QuestionKind::Basic),
            generated,
            personal: state.count_kind(QuestionKind::Personal),
            generation_failed: generated_text.is_none(),
            insufficient: generated < self.min_generated,
        };

        if report.insufficient {
            warn!(
                "⚠️ 只生成了 {} 道计分题（期望 {} 道），继续面试",
                report.generated, self.target_count
            );
        }
        info!(
            "✓ 基础题: {}, 岗位相关题: {}, 个人题: {}, 满分: {}",
            report.basic, report.generated, report.personal, state.total_possible_score
        );

        report
    }

    /// 开场题、基础题、个人题都不计分，生成题不能占用它们的文本
    fn is_fixed_question(&self, state: &InterviewState, text: &str) -> bool {
        state.meta(text).is_some_and(|meta| !meta.kind.is_scored())
            || self.bank.personal.iter().any(|question| question == text)
    }

    /// 构建出题提示词
    fn build_prompt(&self, requirements: &str, role: &str) -> String {
        let role_line = if role.trim().is_empty() {
            String::new()
        } else {
            format!("The candidate applied for the position: {}.\n", role.trim())
        };

        let skills: Vec<&str> = requirements
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let skills_line = if skills.len() > 1 {
            format!("Spread the questions across these skills: {}.\n", skills.join(", "))
        } else {
            String::new()
        };

        format!(
            r#"You are generating interview questions. Follow this EXACT format:

QUESTION: What is {req} used for?
ANSWER: A short reference answer
WEIGHT: 7

SCENARIO: A production issue related to {req} occurs. How do you handle it?
ANSWER: A short reference answer
WEIGHT: 8

FOLLOWUP: What are best practices in {req}?
ANSWER: A short reference answer
WEIGHT: 6

{role_line}{skills_line}Generate exactly {count} questions following this format. Use the tags QUESTION, SCENARIO, FOLLOWUP or INDEPENDENT.
Each question should test {req} knowledge. Use weights 1-10 based on difficulty."#,
            req = requirements,
            role_line = role_line,
            skills_line = skills_line,
            count = self.target_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Collaborator;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct NoopCollaborator;

    #[async_trait]
    impl Collaborator for NoopCollaborator {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(String::new())
        }
    }

    fn builder(config: &Config) -> QuestionSetBuilder {
        let llm = LlmService::with_retry(Arc::new(NoopCollaborator), 1, Duration::ZERO);
        QuestionSetBuilder::new(llm, QuestionBank::default(), config)
    }

    fn generated_text(count: usize) -> String {
        (0..count)
            .map(|i| format!("QUESTION: Generated question {}?\nWEIGHT: {}\n", i, i % 10 + 1))
            .collect()
    }

    #[test]
    fn test_fixed_order_of_question_groups() {
        let config = Config::default();
        let mut state = InterviewState::new();
        state.requirements = "Python".to_string();

        let report = builder(&config).assemble(&mut state, Some(generated_text(6).as_str()));

        let bank = QuestionBank::default();
        assert_eq!(&state.questions[..3], &bank.intake[..]);
        assert_eq!(&state.questions[3..8], &bank.basic[..]);
        assert_eq!(state.questions[8], "Generated question 0?");
        assert_eq!(&state.questions[state.questions.len() - 2..], &bank.personal[..]);
        assert_eq!(report.generated, 6);
        assert!(!report.insufficient);
    }

    #[test]
    fn test_generated_questions_capped_at_target() {
        let config = Config::default();
        let mut state = InterviewState::new();

        let report = builder(&config).assemble(&mut state, Some(generated_text(40).as_str()));

        assert_eq!(report.generated, 23);
        assert_eq!(state.questions.len(), 3 + 5 + 23 + 2);
    }

    #[test]
    fn test_python_scenario_with_noise() {
        let config = Config::default();
        let mut state = InterviewState::new();
        state.requirements = "Python".to_string();
        let mut text = String::from(
            "QUESTION: What is Python used for?\nWEIGHT: 7\n\
             QUESTION: How do you implement features in Python?\nWEIGHT: 8\n\
             QUESTION: What are best practices in Python?\nWEIGHT: 6\n",
        );
        for i in 0..20 {
            text.push_str(&format!("malformed line {} without any tag\n", i));
        }

        let report = builder(&config).assemble(&mut state, Some(text.as_str()));

        assert_eq!(report.generated, 3);
        assert!(report.insufficient);
        assert_eq!(state.total_possible_score, 21.0);
        // 重复计算结果不变
        assert_eq!(state.recompute_total_possible_score(), 21.0);
    }

    #[test]
    fn test_generated_question_matching_fixed_one_is_skipped() {
        let config = Config::default();
        let bank = QuestionBank::default();
        let mut state = InterviewState::new();
        let text = format!(
            "QUESTION: {}\nWEIGHT: 9\nQUESTION: {}\nWEIGHT: 4\nQUESTION: What is a lifetime?\nWEIGHT: 5\n",
            bank.intake[0], bank.personal[0]
        );

        let report = builder(&config).assemble(&mut state, Some(text.as_str()));

        assert_eq!(report.generated, 1);
        assert_eq!(state.total_possible_score, 5.0);
        assert_eq!(state.meta(&bank.intake[0]).map(|m| m.kind), Some(QuestionKind::Intake));
        assert_eq!(state.meta(&bank.personal[0]).map(|m| m.kind), Some(QuestionKind::Personal));
        assert_eq!(state.questions.len(), 3 + 5 + 1 + 2);
    }

    #[test]
    fn test_skipped_duplicates_do_not_count_toward_target() {
        let mut config = Config::default();
        config.target_question_count = 2;
        let bank = QuestionBank::default();
        let mut state = InterviewState::new();
        let text = format!(
            "QUESTION: {}\nQUESTION: First?\nQUESTION: Second?\nQUESTION: Third?\n",
            bank.basic[0]
        );

        let report = builder(&config).assemble(&mut state, Some(text.as_str()));

        assert_eq!(report.generated, 2);
        assert!(state.meta("Second?").is_some());
        assert!(state.meta("Third?").is_none());
    }

    #[test]
    fn test_generation_failure_keeps_fixed_questions() {
        let config = Config::default();
        let mut state = InterviewState::new();

        let report = builder(&config).assemble(&mut state, None);

        assert!(report.generation_failed);
        assert!(report.insufficient);
        assert_eq!(report.generated, 0);
        assert_eq!(state.total_possible_score, 0.0);
        assert_eq!(state.questions.len(), 3 + 5 + 2);
    }

    #[test]
    fn test_fixed_zero_weight_source() {
        let mut config = Config::default();
        config.policy.weight_source = WeightSource::FixedZero;
        let mut state = InterviewState::new();

        builder(&config).assemble(&mut state, Some(generated_text(5).as_str()));

        assert_eq!(state.total_possible_score, 0.0);
        assert!(state.question_meta.values().all(|m| m.weight == 0.0));
    }

    #[test]
    fn test_prompt_mentions_every_skill() {
        let config = Config::default();
        let prompt = builder(&config).build_prompt("Rust, SQL", "Backend Engineer");

        assert!(prompt.contains("Rust, SQL"));
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("exactly 23 questions"));
    }

    #[tokio::test]
    async fn test_build_degrades_on_empty_reply() {
        let config = Config::default();
        let mut state = InterviewState::new();
        state.requirements = "Go".to_string();

        let report = builder(&config).build(&mut state).await.unwrap();

        assert!(report.generation_failed);
        assert_eq!(state.questions.len(), 10);
    }
}
