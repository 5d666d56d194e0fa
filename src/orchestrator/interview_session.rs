//! 面试流水线 - 编排层
//!
//! ## 职责
//!
//! 把一场面试拆成严格的三个阶段：
//!
//! ```text
//! InterviewSession<H, Start>
//!     ↓ generate()   开场白 → 3 道开场题 → 组装题目
//! InterviewSession<H, Generated>
//!     ↓ evaluate()   逐题提问、判分、结算
//! InterviewSession<H, Evaluated>
//!     ↓ feedback()   得分率 + 学习建议
//! SessionOutcome
//! ```
//!
//! 每个阶段消耗上一阶段的值，阶段不能乱序执行，也不能跳过。
//! 整场面试共用一份 `InterviewState`，由会话独占。

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::Collaborator;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{InterviewState, QuestionBank, QuestionOutcome};
use crate::services::{AnswerJudge, FeedbackComposer, FeedbackReport, LlmService, QuestionSetBuilder, QuestionSetReport};
use crate::utils::logging::log_stage_start;
use crate::workflow::{Host, QuestionCtx, QuestionFlow};

pub const GREETING: &str = "Hello, I will be taking your interview today.";

/// 岗位要求为空时使用的默认方向
const FALLBACK_REQUIREMENTS: &str = "general software engineering";

/// 阶段标记：尚未开始
pub struct Start;

/// 阶段标记：题目已生成
pub struct Generated {
    question_set: QuestionSetReport,
}

/// 阶段标记：全部题目已判分
pub struct Evaluated {
    question_set: QuestionSetReport,
}

/// 一场面试需要的业务能力
pub struct SessionServices {
    pub builder: QuestionSetBuilder,
    pub flow: QuestionFlow,
    pub composer: FeedbackComposer,
}

impl SessionServices {
    /// 出题与学习建议共用 `generator`，判分使用 `judge`
    pub fn from_config(
        config: &Config,
        bank: QuestionBank,
        generator: Arc<dyn Collaborator>,
        judge: Arc<dyn Collaborator>,
    ) -> Self {
        let generation = LlmService::new(generator, config);
        Self {
            builder: QuestionSetBuilder::new(generation.clone(), bank, config),
            flow: QuestionFlow::new(AnswerJudge::new(LlmService::new(judge, config)), config.policy),
            composer: FeedbackComposer::new(generation, config.pass_threshold),
        }
    }
}

/// 面试结果
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub state: InterviewState,
    pub question_set: QuestionSetReport,
    pub feedback: FeedbackReport,
}

/// 面试会话
pub struct InterviewSession<H, S = Start> {
    host: H,
    services: SessionServices,
    state: InterviewState,
    stage: S,
}

impl<H, S> InterviewSession<H, S> {
    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    fn advance<T>(self, stage: T) -> InterviewSession<H, T> {
        InterviewSession {
            host: self.host,
            services: self.services,
            state: self.state,
            stage,
        }
    }
}

impl<H: Host> InterviewSession<H, Start> {
    pub fn new(host: H, services: SessionServices) -> Self {
        Self {
            host,
            services,
            state: InterviewState::new(),
            stage: Start,
        }
    }

    pub fn from_config(
        host: H,
        config: &Config,
        bank: QuestionBank,
        generator: Arc<dyn Collaborator>,
        judge: Arc<dyn Collaborator>,
    ) -> Self {
        Self::new(host, SessionServices::from_config(config, bank, generator, judge))
    }

    /// 依次执行三个阶段
    pub async fn run(self) -> AppResult<SessionOutcome> {
        self.generate().await?.evaluate().await?.feedback().await
    }

    /// 阶段 1：开场并生成题目
    pub async fn generate(mut self) -> AppResult<InterviewSession<H, Generated>> {
        log_stage_start(1, "生成题目");

        if !self.state.greeting_shown {
            self.host.tell(GREETING).await?;
            self.state.greeting_shown = true;
        }

        self.services.builder.seed_intake(&mut self.state);
        let intake: Vec<String> = self.state.questions.clone();
        for question in &intake {
            let answer = self.host.ask(question).await?;
            self.state.record_answer(answer.trim());
            self.state.apply_outcome(question, QuestionOutcome::Noted, false);
        }

        let answer_at = |index: usize| self.state.answers.get(index).cloned().unwrap_or_default();
        let candidate_name = answer_at(0);
        let role = answer_at(QuestionBank::ROLE_INDEX);
        let mut requirements = answer_at(QuestionBank::REQUIREMENTS_INDEX);
        if requirements.is_empty() {
            requirements = if role.is_empty() {
                FALLBACK_REQUIREMENTS.to_string()
            } else {
                role.clone()
            };
            warn!("⚠️ 岗位要求为空，改用: {}", requirements);
        }
        self.state.candidate_name = candidate_name;
        self.state.role = role;
        self.state.requirements = requirements;

        self.host.tell("Generating questions...").await?;
        let question_set = self.services.builder.build(&mut self.state).await?;

        self.host
            .tell(&format!(
                "✓ Basic: {}, Position-related: {}, Personal: {}",
                question_set.basic, question_set.generated, question_set.personal
            ))
            .await?;
        if question_set.insufficient {
            self.host
                .tell(&format!(
                    "Only {} position-related questions are available. Continuing with a shorter interview.",
                    question_set.generated
                ))
                .await?;
        }

        Ok(self.advance(Generated { question_set }))
    }
}

impl<H: Host> InterviewSession<H, Generated> {
    pub fn question_set(&self) -> QuestionSetReport {
        self.stage.question_set
    }

    /// 阶段 2：按顺序逐题判分
    pub async fn evaluate(mut self) -> AppResult<InterviewSession<H, Evaluated>> {
        log_stage_start(2, "逐题判分");
        self.host.tell("Starting interview evaluation...").await?;

        let total = self.state.questions.len();
        let mut index = self.state.answers.len();
        while index < total {
            let question = self.state.questions[index].clone();
            let Some(meta) = self.state.meta(&question) else {
                index += 1;
                continue;
            };
            let ctx = QuestionCtx::new(index + 1, total, meta);

            self.services
                .flow
                .run(&mut self.host, &mut self.state, &question, &ctx)
                .await?;
            index += 1;
        }

        info!(
            "✓ 判分完成: 得分 {}，错题 {} 道",
            self.state.user_score,
            self.state.wrong_questions.len()
        );
        self.host
            .tell(&format!(
                "Evaluation complete. Total score: {}\nQuestions couldn't answer: {}",
                self.state.user_score,
                self.state.wrong_questions.len()
            ))
            .await?;

        let question_set = self.stage.question_set;
        Ok(self.advance(Evaluated { question_set }))
    }
}

impl<H: Host> InterviewSession<H, Evaluated> {
    /// 阶段 3：汇总反馈
    pub async fn feedback(mut self) -> AppResult<SessionOutcome> {
        log_stage_start(3, "汇总反馈");

        if !self.state.wrong_questions.is_empty() {
            self.host.tell("Generating feedback...").await?;
        }
        let feedback = self.services.composer.compose(&self.state).await?;
        self.host.tell(&feedback.render()).await?;

        Ok(SessionOutcome {
            state: self.state,
            question_set: self.stage.question_set,
            feedback,
        })
    }
}
