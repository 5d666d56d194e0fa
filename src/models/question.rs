use serde::Serialize;

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// 开场题（姓名、岗位、岗位要求）
    Intake,
    /// 基础背景题
    Basic,
    /// 场景题
    Scenario,
    /// 追问题
    Followup,
    /// 独立题
    Independent,
    /// 未细分的岗位相关题
    PositionRelated,
    /// 个人题
    Personal,
}

impl QuestionKind {
    /// 是否计分（需要 LLM 判分）
    pub fn is_scored(self) -> bool {
        matches!(
            self,
            QuestionKind::Scenario
                | QuestionKind::Followup
                | QuestionKind::Independent
                | QuestionKind::PositionRelated
        )
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionKind::Intake => "intake",
            QuestionKind::Basic => "basic",
            QuestionKind::Scenario => "scenario",
            QuestionKind::Followup => "followup",
            QuestionKind::Independent => "independent",
            QuestionKind::PositionRelated => "position-related",
            QuestionKind::Personal => "personal",
        }
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 单题的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionOutcome {
    /// 不计分题，仅记录
    Noted,
    /// 首次回答"不知道"
    Passed,
    /// 首次回答正确
    Correct,
    /// 首次回答错误且策略不允许重答
    Incorrect,
    /// 重答时"不知道"
    RetryPassed,
    /// 重答正确
    RetryCorrect,
    /// 重答仍然错误
    RetryIncorrect,
    /// 首次判分时 LLM 不可用，本题不计分
    Skipped,
    /// 重答判分时 LLM 不可用，保留首次错误的结果
    RetrySkipped,
}

impl QuestionOutcome {
    /// 该结果对应的最终得分
    pub fn score(self, weight: f64) -> f64 {
        match self {
            QuestionOutcome::Noted | QuestionOutcome::Skipped => 0.0,
            QuestionOutcome::Correct => weight,
            QuestionOutcome::RetryCorrect => weight / 2.0,
            QuestionOutcome::Incorrect | QuestionOutcome::RetrySkipped => -1.0,
            QuestionOutcome::Passed | QuestionOutcome::RetryIncorrect => -2.0,
            QuestionOutcome::RetryPassed => -3.0,
        }
    }

    /// 是否计入错题
    pub fn is_wrong(self) -> bool {
        matches!(
            self,
            QuestionOutcome::Passed
                | QuestionOutcome::Incorrect
                | QuestionOutcome::RetryPassed
                | QuestionOutcome::RetryIncorrect
                | QuestionOutcome::RetrySkipped
        )
    }

    /// 给候选人看的简短提示
    pub fn notice(self) -> &'static str {
        match self {
            QuestionOutcome::Noted => "✓ Noted.",
            QuestionOutcome::Passed => "✗ Moving to next question.",
            QuestionOutcome::Correct => "✓ Correct! Well done.",
            QuestionOutcome::Incorrect => "✗ Incorrect.",
            QuestionOutcome::RetryPassed => "✗ Passed on second chance.",
            QuestionOutcome::RetryCorrect => "✓ Correct! Good effort.",
            QuestionOutcome::RetryIncorrect => "✗ Incorrect again.",
            QuestionOutcome::Skipped => "✗ Evaluation failed. Skipping.",
            QuestionOutcome::RetrySkipped => "✗ Evaluation failed.",
        }
    }
}

/// 每道题的元数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionMeta {
    pub kind: QuestionKind,
    pub weight: f64,
    /// 最终得分（不是累计值）
    pub score: f64,
    /// 参考答案，只有计分题可能携带
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<QuestionOutcome>,
}

impl QuestionMeta {
    /// 不计分题（开场、基础、个人）
    pub fn unscored(kind: QuestionKind) -> Self {
        Self {
            kind,
            weight: 0.0,
            score: 0.0,
            expected_answer: None,
            outcome: None,
        }
    }

    /// 计分题
    pub fn scored(kind: QuestionKind, weight: f64, expected_answer: Option<String>) -> Self {
        Self {
            kind,
            weight,
            score: 0.0,
            expected_answer: if kind.is_scored() { expected_answer } else { None },
            outcome: None,
        }
    }
}
