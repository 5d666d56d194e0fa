//! 面试状态
//!
//! 一场面试只有一份 `InterviewState`，由流程独占并原地修改，面试结束即丢弃。

use std::collections::HashMap;

use serde::Serialize;

use crate::models::question::{QuestionKind, QuestionMeta, QuestionOutcome};

#[derive(Debug, Clone, Default, Serialize)]
pub struct InterviewState {
    pub candidate_name: String,
    pub role: String,
    /// 岗位要求（可能包含逗号分隔的多项技能）
    pub requirements: String,
    /// 有序题目列表，前 3 题固定为开场题
    pub questions: Vec<String>,
    /// 与 `questions` 按下标对齐的回答
    pub answers: Vec<String>,
    pub question_meta: HashMap<String, QuestionMeta>,
    /// 所有题目最终得分之和
    pub user_score: f64,
    /// 错题（保持首次出现顺序，不重复）
    pub wrong_questions: Vec<String>,
    pub total_possible_score: f64,
    pub greeting_shown: bool,
}

impl InterviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一道题
    ///
    /// 题目文本相同时覆盖之前的元数据，题目只在列表中保留第一次出现的位置。
    /// 返回是否为新题。
    pub fn insert_question(&mut self, text: impl Into<String>, meta: QuestionMeta) -> bool {
        let text = text.into();
        let is_new = self.question_meta.insert(text.clone(), meta).is_none();
        if is_new {
            self.questions.push(text);
        }
        is_new
    }

    pub fn meta(&self, question: &str) -> Option<&QuestionMeta> {
        self.question_meta.get(question)
    }

    /// 记录一条回答，回答数量不会超过题目数量
    pub fn record_answer(&mut self, answer: impl Into<String>) -> bool {
        if self.answers.len() >= self.questions.len() {
            return false;
        }
        self.answers.push(answer.into());
        true
    }

    /// 结算一道题
    ///
    /// 写入最终得分并累加到 `user_score`；错题集合按结果增删。
    /// 每道题只应结算一次，返回本题最终得分。
    pub fn apply_outcome(
        &mut self,
        question: &str,
        outcome: QuestionOutcome,
        track_wrong_questions: bool,
    ) -> f64 {
        let Some(meta) = self.question_meta.get_mut(question) else {
            return 0.0;
        };

        let score = if meta.kind.is_scored() {
            outcome.score(meta.weight)
        } else {
            0.0
        };
        meta.score = score;
        meta.outcome = Some(outcome);
        self.user_score += score;

        let wrong = meta.kind.is_scored() && outcome.is_wrong();
        if wrong && track_wrong_questions {
            if !self.wrong_questions.iter().any(|q| q == question) {
                self.wrong_questions.push(question.to_string());
            }
        } else {
            self.wrong_questions.retain(|q| q != question);
        }

        score
    }

    /// 重新计算满分：列表中所有计分题的权重之和
    pub fn recompute_total_possible_score(&mut self) -> f64 {
        let total: f64 = self
            .scored_questions()
            .filter_map(|q| self.question_meta.get(q))
            .map(|meta| meta.weight)
            .sum();
        self.total_possible_score = total;
        total
    }

    /// 按最终得分重新求和，用于核对 `user_score`
    pub fn sum_final_scores(&self) -> f64 {
        self.questions
            .iter()
            .filter_map(|q| self.question_meta.get(q))
            .map(|meta| meta.score)
            .sum()
    }

    /// 列表中的计分题
    pub fn scored_questions(&self) -> impl Iterator<Item = &String> + '_ {
        self.questions.iter().filter(|q| {
            self.question_meta
                .get(q.as_str())
                .map(|meta| meta.kind.is_scored())
                .unwrap_or(false)
        })
    }

    /// 某一类型的题目数量
    pub fn count_kind(&self, kind: QuestionKind) -> usize {
        self.questions
            .iter()
            .filter(|q| self.question_meta.get(q.as_str()).map(|m| m.kind) == Some(kind))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_scored(question: &str, weight: f64) -> InterviewState {
        let mut state = InterviewState::new();
        state.insert_question(question, QuestionMeta::scored(QuestionKind::PositionRelated, weight, None));
        state
    }

    #[test]
    fn test_duplicate_question_overwrites_meta() {
        let mut state = InterviewState::new();
        assert!(state.insert_question("Q", QuestionMeta::scored(QuestionKind::Scenario, 7.0, None)));
        assert!(!state.insert_question("Q", QuestionMeta::scored(QuestionKind::Independent, 3.0, None)));

        assert_eq!(state.questions.len(), 1);
        assert_eq!(state.meta("Q").map(|m| m.kind), Some(QuestionKind::Independent));
        assert_eq!(state.recompute_total_possible_score(), 3.0);
    }

    #[test]
    fn test_retry_correct_removes_from_wrong_questions() {
        let mut state = state_with_scored("Q", 6.0);
        state.wrong_questions.push("Q".to_string());

        let score = state.apply_outcome("Q", QuestionOutcome::RetryCorrect, true);

        assert_eq!(score, 3.0);
        assert!(state.wrong_questions.is_empty());
        assert_eq!(state.user_score, 3.0);
    }

    #[test]
    fn test_wrong_question_recorded_once() {
        let mut state = state_with_scored("Q", 6.0);
        state.wrong_questions.push("Q".to_string());

        state.apply_outcome("Q", QuestionOutcome::RetryIncorrect, true);

        assert_eq!(state.wrong_questions, vec!["Q".to_string()]);
        assert_eq!(state.user_score, -2.0);
        assert_eq!(state.sum_final_scores(), state.user_score);
    }

    #[test]
    fn test_unscored_question_never_wrong() {
        let mut state = InterviewState::new();
        state.insert_question("Where do you live?", QuestionMeta::unscored(QuestionKind::Basic));

        let score = state.apply_outcome("Where do you live?", QuestionOutcome::Passed, true);

        assert_eq!(score, 0.0);
        assert!(state.wrong_questions.is_empty());
    }

    #[test]
    fn test_answers_never_exceed_questions() {
        let mut state = state_with_scored("Q", 5.0);
        assert!(state.record_answer("a"));
        assert!(!state.record_answer("b"));
        assert_eq!(state.answers.len(), 1);
    }

    #[test]
    fn test_untracked_wrong_questions_stay_empty() {
        let mut state = state_with_scored("Q", 5.0);
        state.apply_outcome("Q", QuestionOutcome::Passed, false);
        assert!(state.wrong_questions.is_empty());
        assert_eq!(state.user_score, -2.0);
    }
}
