//! 判分服务 - 业务能力层
//!
//! 只负责"这个回答对不对"的判断，不关心得分规则和流程顺序。

use std::sync::LazyLock;

use phf::phf_set;
use regex::Regex;
use tracing::debug;

use crate::error::LlmError;
use crate::services::llm_service::LlmService;

/// 表示"不知道"的整句回答（去掉标点、小写后比较）
static DONT_KNOW_PHRASES: phf::Set<&'static str> = phf_set! {
    "no idea",
    "not sure",
    "no clue",
    "pass",
    "skip",
    "i pass",
    "i have no idea",
    "i am not sure",
    "i'm not sure",
    "next",
};

/// 回答中任意位置出现即视为"不知道"
static DONT_KNOW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:don['’]?t\s?know|dont\s?know|dontknow|do\s+not\s+know|idk)\b")
        .expect("valid dont-know regex")
});

static CORRECT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcorrect\b").expect("valid verdict regex"));

/// 判分结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// 回答是否表示"不知道"
pub fn is_dont_know(answer: &str) -> bool {
    if DONT_KNOW_PATTERN.is_match(answer) {
        return true;
    }
    let normalized = answer
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase();
    DONT_KNOW_PHRASES.contains(normalized.as_str())
}

/// 解析判分回复
///
/// 回复中出现完整单词 CORRECT（大小写不敏感）即判为正确，
/// 允许前后带有其他文字；INCORRECT 不算。
pub fn classify_verdict(reply: &str) -> Verdict {
    if CORRECT_TOKEN.is_match(reply) {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

/// 一次判分请求
#[derive(Debug, Clone, Copy)]
pub struct JudgeRequest<'a> {
    pub requirements: &'a str,
    pub question: &'a str,
    pub answer: &'a str,
    pub expected_answer: Option<&'a str>,
    pub is_retry: bool,
}

/// 判分服务
pub struct AnswerJudge {
    llm: LlmService,
}

impl AnswerJudge {
    pub fn new(llm: LlmService) -> Self {
        Self { llm }
    }

    /// 请求判分
    ///
    /// # 返回
    /// - `Ok(Some(verdict))`: 判分完成
    /// - `Ok(None)`: 判分服务不可用（重试耗尽或回复为空）
    /// - `Err(e)`: 致命错误
    pub async fn judge(&self, request: JudgeRequest<'_>) -> Result<Option<Verdict>, LlmError> {
        let prompt = build_judge_prompt(&request);
        let reply = self.llm.invoke(&prompt).await?;

        Ok(reply.map(|text| {
            let verdict = classify_verdict(&text);
            debug!("判分结果: {:?} (原始回复: {})", verdict, text);
            verdict
        }))
    }
}

/// 构建判分提示词
fn build_judge_prompt(request: &JudgeRequest<'_>) -> String {
    let attempt = if request.is_retry { "retry answer" } else { "interview answer" };
    let reference = request
        .expected_answer
        .map(|a| format!("\nReference Answer: {}\n", a))
        .unwrap_or_default();

    format!(
        r#"You are a VERY STRICT evaluator. Evaluate this {requirements} {attempt}:

Question: {question}
User Answer: {answer}
{reference}
Is this answer technically correct for {requirements}?
Reply with only "CORRECT" or "INCORRECT"."#,
        requirements = request.requirements,
        attempt = attempt,
        question = request.question,
        answer = request.answer,
        reference = reference,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dont_know_variants() {
        for answer in [
            "I don't know",
            "i dont know",
            "DONT KNOW",
            "dontknow",
            "idk",
            "Honestly, IDK.",
            "I do not know this one",
            "I don’t know",
            "No idea.",
            "pass",
            "Skip!",
        ] {
            assert!(is_dont_know(answer), "应识别为不知道: {}", answer);
        }
    }

    #[test]
    fn test_real_answers_are_not_dont_know() {
        for answer in [
            "A list is mutable, a tuple is not",
            "I know it uses reference counting",
            "kidkit is a library",
            "bypass the cache",
            "",
        ] {
            assert!(!is_dont_know(answer), "不应识别为不知道: {}", answer);
        }
    }

    #[test]
    fn test_verdict_token_match() {
        assert_eq!(classify_verdict("CORRECT"), Verdict::Correct);
        assert_eq!(classify_verdict("correct."), Verdict::Correct);
        assert_eq!(classify_verdict("The answer is Correct!"), Verdict::Correct);
        assert_eq!(classify_verdict("INCORRECT"), Verdict::Incorrect);
        assert_eq!(classify_verdict("incorrect, the answer misses X"), Verdict::Incorrect);
        assert_eq!(classify_verdict("I cannot tell"), Verdict::Incorrect);
    }

    #[test]
    fn test_prompt_includes_reference_answer() {
        let prompt = build_judge_prompt(&JudgeRequest {
            requirements: "Rust",
            question: "What is a borrow?",
            answer: "A reference",
            expected_answer: Some("A temporary reference"),
            is_retry: true,
        });

        assert!(prompt.contains("Reference Answer: A temporary reference"));
        assert!(prompt.contains("retry answer"));
        assert!(prompt.contains("User Answer: A reference"));
    }
}
