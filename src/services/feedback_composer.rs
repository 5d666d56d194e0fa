//! 反馈服务 - 业务能力层
//!
//! 根据最终得分给出结论，并针对错题生成学习建议。

use std::fmt::Write as _;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::LlmError;
use crate::models::InterviewState;
use crate::services::llm_service::LlmService;

pub const NO_SCORED_QUESTIONS: &str = "No scored questions available for evaluation.";

/// 面试结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackVerdict {
    Pass,
    NeedsImprovement,
    /// 没有计分题，不计算百分比
    NoScoredQuestions,
}

/// 错题学习建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "text", rename_all = "kebab-case")]
pub enum StudyGuidance {
    /// LLM 生成的建议
    Generated(String),
    /// LLM 不可用时的错题编号列表
    Fallback(String),
}

impl StudyGuidance {
    pub fn text(&self) -> &str {
        match self {
            StudyGuidance::Generated(text) | StudyGuidance::Fallback(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackReport {
    pub score: f64,
    pub total: f64,
    pub percentage: Option<f64>,
    pub verdict: FeedbackVerdict,
    pub wrong_questions: Vec<String>,
    pub guidance: Option<StudyGuidance>,
}

impl FeedbackReport {
    /// 只根据分数给出结论，不包含学习建议
    pub fn summarize(state: &InterviewState, pass_threshold: f64) -> Self {
        let (percentage, verdict) = if state.total_possible_score > 0.0 {
            let percentage = state.user_score / state.total_possible_score * 100.0;
            let verdict = if percentage >= pass_threshold {
                FeedbackVerdict::Pass
            } else {
                FeedbackVerdict::NeedsImprovement
            };
            (Some(percentage), verdict)
        } else {
            (None, FeedbackVerdict::NoScoredQuestions)
        };

        Self {
            score: state.user_score,
            total: state.total_possible_score,
            percentage,
            verdict,
            wrong_questions: state.wrong_questions.clone(),
            guidance: None,
        }
    }

    /// 渲染成展示给候选人的文本
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(50);

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "           INTERVIEW FEEDBACK");
        let _ = writeln!(out, "{}", rule);

        match (self.verdict, self.percentage) {
            (FeedbackVerdict::NoScoredQuestions, _) | (_, None) => {
                let _ = writeln!(out, "{}", NO_SCORED_QUESTIONS);
            }
            (verdict, Some(percentage)) => {
                let _ = writeln!(
                    out,
                    "Your Score: {:.1}/{} ({:.1}%)",
                    self.score, self.total, percentage
                );
                if verdict == FeedbackVerdict::Pass {
                    let _ = writeln!(out, "\n🎉 CONGRATULATIONS! 🎉");
                    let _ = writeln!(out, "We look forward to working with you!");
                } else {
                    let _ = writeln!(out, "\n📚 You need some improvement");
                }
            }
        }

        if !self.wrong_questions.is_empty() {
            let _ = writeln!(
                out,
                "\nAreas for Improvement ({} questions):",
                self.wrong_questions.len()
            );
            let _ = writeln!(out, "{}", "-".repeat(40));
            if let Some(guidance) = &self.guidance {
                if matches!(guidance, StudyGuidance::Fallback(_)) {
                    let _ = writeln!(out, "Review these topics:");
                }
                let _ = writeln!(out, "{}", guidance.text().trim_end());
            }
        }

        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(out, "Thank you for taking the interview!");
        let _ = write!(out, "{}", rule);
        out
    }
}

/// 反馈服务
pub struct FeedbackComposer {
    llm: LlmService,
    pass_threshold: f64,
}

impl FeedbackComposer {
    pub fn new(llm: LlmService, pass_threshold: f64) -> Self {
        Self { llm, pass_threshold }
    }

    /// 生成完整反馈
    ///
    /// 有错题时请求学习建议；LLM 不可用则退回错题列表。
    pub async fn compose(&self, state: &InterviewState) -> Result<FeedbackReport, LlmError> {
        let mut report = FeedbackReport::summarize(state, self.pass_threshold);

        match report.percentage {
            Some(p) => info!("📊 得分 {:.1}/{} ({:.1}%)", report.score, report.total, p),
            None => info!("📊 没有计分题"),
        }

        if report.wrong_questions.is_empty() {
            return Ok(report);
        }

        info!("📚 正在为 {} 道错题生成学习建议...", report.wrong_questions.len());
        let prompt = build_guidance_prompt(&state.requirements, &report.wrong_questions);
        let guidance = match self.llm.invoke(&prompt).await? {
            Some(text) => StudyGuidance::Generated(text.trim().to_string()),
            None => {
                warn!("⚠️ 学习建议生成失败，改为列出错题");
                StudyGuidance::Fallback(numbered_list(&report.wrong_questions))
            }
        };
        report.guidance = Some(guidance);

        Ok(report)
    }
}

fn build_guidance_prompt(requirements: &str, wrong_questions: &[String]) -> String {
    let listing = wrong_questions
        .iter()
        .map(|q| format!("- {}", q))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Generate study feedback for someone who couldn't answer these {} questions:\n\n{}\n\nProvide study tips.",
        requirements, listing
    )
}

fn numbered_list(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Collaborator;
    use crate::models::{QuestionKind, QuestionMeta, QuestionOutcome};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedCollaborator(Result<String, LlmError>);

    #[async_trait]
    impl Collaborator for FixedCollaborator {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.0.clone()
        }
    }

    fn composer(reply: Result<String, LlmError>) -> FeedbackComposer {
        let llm = LlmService::with_retry(Arc::new(FixedCollaborator(reply)), 1, Duration::ZERO);
        FeedbackComposer::new(llm, 80.0)
    }

    fn finished_state(outcomes: &[(&str, f64, QuestionOutcome)]) -> InterviewState {
        let mut state = InterviewState::new();
        state.requirements = "Rust".to_string();
        for (question, weight, _) in outcomes {
            state.insert_question(*question, QuestionMeta::scored(QuestionKind::Scenario, *weight, None));
        }
        state.recompute_total_possible_score();
        for (question, _, outcome) in outcomes {
            state.apply_outcome(question, *outcome, true);
        }
        state
    }

    #[test]
    fn test_no_scored_questions() {
        let report = FeedbackReport::summarize(&InterviewState::new(), 80.0);

        assert_eq!(report.verdict, FeedbackVerdict::NoScoredQuestions);
        assert_eq!(report.percentage, None);
        assert!(report.render().contains(NO_SCORED_QUESTIONS));
    }

    #[test]
    fn test_pass_threshold_is_inclusive() {
        let state = finished_state(&[
            ("Q1", 8.0, QuestionOutcome::Correct),
            ("Q2", 2.0, QuestionOutcome::Skipped),
        ]);

        let report = FeedbackReport::summarize(&state, 80.0);

        assert_eq!(report.percentage, Some(80.0));
        assert_eq!(report.verdict, FeedbackVerdict::Pass);
        assert!(report.render().contains("CONGRATULATIONS"));
    }

    #[test]
    fn test_negative_score_needs_improvement() {
        let state = finished_state(&[("Q1", 5.0, QuestionOutcome::RetryPassed)]);

        let report = FeedbackReport::summarize(&state, 80.0);

        assert_eq!(report.verdict, FeedbackVerdict::NeedsImprovement);
        assert_eq!(report.percentage, Some(-60.0));
    }

    #[tokio::test]
    async fn test_generated_guidance() {
        let state = finished_state(&[("What is a lifetime?", 6.0, QuestionOutcome::Passed)]);

        let report = composer(Ok("Read the book chapter on lifetimes.".to_string()))
            .compose(&state)
            .await
            .unwrap();

        assert_eq!(
            report.guidance,
            Some(StudyGuidance::Generated("Read the book chapter on lifetimes.".to_string()))
        );
    }

    #[tokio::test]
    async fn test_fallback_lists_wrong_questions() {
        let state = finished_state(&[
            ("Q1", 6.0, QuestionOutcome::Passed),
            ("Q2", 4.0, QuestionOutcome::RetryIncorrect),
        ]);

        let report = composer(Ok(String::new())).compose(&state).await.unwrap();

        assert_eq!(report.guidance, Some(StudyGuidance::Fallback("1. Q1\n2. Q2".to_string())));
        let rendered = report.render();
        assert!(rendered.contains("Review these topics:"));
        assert!(rendered.contains("Areas for Improvement (2 questions)"));
    }

    #[tokio::test]
    async fn test_no_wrong_questions_skips_guidance_call() {
        let state = finished_state(&[("Q1", 6.0, QuestionOutcome::Correct)]);

        // 若调用了 LLM 会返回致命错误
        let report = composer(Err(LlmError::from_api_message("test", "invalid api key")))
            .compose(&state)
            .await
            .unwrap();

        assert!(report.guidance.is_none());
    }

    #[test]
    fn test_guidance_prompt_lists_questions() {
        let prompt = build_guidance_prompt("Go", &["A?".to_string(), "B?".to_string()]);
        assert!(prompt.contains("these Go questions"));
        assert!(prompt.contains("- A?\n- B?"));
    }
}
