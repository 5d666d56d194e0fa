//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整判分流程
//!
//! 流程顺序：
//! 1. 提问并记录回答（不计分题到此结束）
//! 2. "不知道" → 直接结算，不调用判分
//! 3. LLM 判分 → 正确则结算
//! 4. 错误且允许重答 → 再问一次 → 再判分 → 结算

use tracing::{info, warn};

use crate::config::EvaluationPolicy;
use crate::error::AppResult;
use crate::models::{InterviewState, QuestionOutcome};
use crate::services::answer_judge::{is_dont_know, AnswerJudge, JudgeRequest, Verdict};
use crate::workflow::host::Host;
use crate::workflow::question_ctx::QuestionCtx;

pub const RETRY_PROMPT: &str = "Please try again:";

/// 题目处理流程
///
/// - 决定何时判分、何时重答、如何结算
/// - 每道题只结算一次，错题集合由结算结果决定
/// - 只依赖业务能力（services）和问答边界（Host）
pub struct QuestionFlow {
    judge: AnswerJudge,
    policy: EvaluationPolicy,
}

impl QuestionFlow {
    /// 创建新的题目处理流程
    pub fn new(judge: AnswerJudge, policy: EvaluationPolicy) -> Self {
        Self { judge, policy }
    }

    pub fn policy(&self) -> EvaluationPolicy {
        self.policy
    }

    /// 处理一道题并写入结算结果
    ///
    /// 判分服务的致命错误和界面断开会直接返回 `Err`。
    pub async fn run<H: Host + ?Sized>(
        &self,
        host: &mut H,
        state: &mut InterviewState,
        question: &str,
        ctx: &QuestionCtx,
    ) -> AppResult<QuestionOutcome> {
        let answer = host.ask(question).await?;
        let answer = answer.trim().to_string();
        state.record_answer(answer.as_str());

        let outcome = if ctx.kind.is_scored() {
            self.evaluate(host, state, question, &answer, ctx).await?
        } else {
            QuestionOutcome::Noted
        };

        let score = state.apply_outcome(question, outcome, self.policy.track_wrong_questions);
        host.tell(outcome.notice()).await?;

        info!("{} {:?} 得分: {}", ctx, outcome, score);
        Ok(outcome)
    }

    /// 计分题的判分状态机
    async fn evaluate<H: Host + ?Sized>(
        &self,
        host: &mut H,
        state: &InterviewState,
        question: &str,
        answer: &str,
        ctx: &QuestionCtx,
    ) -> AppResult<QuestionOutcome> {
        if is_dont_know(answer) {
            return Ok(QuestionOutcome::Passed);
        }

        let expected_answer = state.meta(question).and_then(|m| m.expected_answer.as_deref());
        let mut request = JudgeRequest {
            requirements: &state.requirements,
            question,
            answer,
            expected_answer,
            is_retry: false,
        };

        match self.judge.judge(request).await? {
            None => {
                warn!("{} ⚠️ 判分失败，本题跳过", ctx);
                return Ok(QuestionOutcome::Skipped);
            }
            Some(Verdict::Correct) => return Ok(QuestionOutcome::Correct),
            Some(Verdict::Incorrect) if !self.policy.allow_retry => {
                return Ok(QuestionOutcome::Incorrect)
            }
            Some(Verdict::Incorrect) => {}
        }

        host.tell(QuestionOutcome::Incorrect.notice()).await?;
        let retry_answer = host.ask(RETRY_PROMPT).await?;
        let retry_answer = retry_answer.trim();

        if is_dont_know(retry_answer) {
            return Ok(QuestionOutcome::RetryPassed);
        }

        request.answer = retry_answer;
        request.is_retry = true;

        let outcome = match self.judge.judge(request).await? {
            None => {
                warn!("{} ⚠️ 重答判分失败，保留首次结果", ctx);
                QuestionOutcome::RetrySkipped
            }
            Some(Verdict::Correct) => QuestionOutcome::RetryCorrect,
            Some(Verdict::Incorrect) => QuestionOutcome::RetryIncorrect,
        };
        Ok(outcome)
    }
}
