//! LLM 回复解析 - 业务能力层
//!
//! 只负责把一段自由文本解析成题目记录，不关心题目从哪里来、怎么用。
//!
//! 识别的格式（大小写不敏感，前面可以有编号或列表符号）：
//!
//! ```text
//! 1. QUESTION: What is Python used for?
//! ANSWER: General purpose programming, scripting, data analysis
//! WEIGHT: 7
//!
//! SCENARIO: Your service leaks memory in production. What do you do?
//! WEIGHT: 9
//! ```
//!
//! 解析器永远不会失败：无法识别的行直接跳过，输入为空或被截断时只会得到更少的记录。

use std::sync::LazyLock;

use regex::Regex;

use crate::models::QuestionKind;

/// 缺省权重（缺失或无法解析时使用）
pub const DEFAULT_WEIGHT: f64 = 5.0;
pub const MIN_WEIGHT: f64 = 1.0;
pub const MAX_WEIGHT: f64 = 10.0;

/// 行首的类别标签，前面只允许编号、列表符号或 markdown 强调
static CATEGORY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:\d+[.)]|[-*•#]+)\s*)?[*_`]*\s*(FOLLOW-UP|FOLLOWUP|SCENARIO|INDEPENDENT|QUESTION)\s*[*_`]*\s*:[*_`]*",
    )
    .expect("valid category regex")
});

const WEIGHT_TAG: &str = "WEIGHT:";
const ANSWER_TAG: &str = "ANSWER:";

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s*_`]*([+-]?\d+(?:\.\d+)?)").expect("valid weight regex"));

/// 解析出的一条题目记录
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuestion {
    pub kind: QuestionKind,
    pub text: String,
    pub weight: f64,
    pub expected_answer: Option<String>,
}

/// 解析一段 LLM 回复
///
/// 返回一个一次性的迭代器；相同输入总是得到相同的结果。
pub fn parse_response(text: &str) -> ParsedRecords<'_> {
    ParsedRecords {
        lines: text.lines().collect(),
        pos: 0,
    }
}

/// 题目记录迭代器
pub struct ParsedRecords<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl Iterator for ParsedRecords<'_> {
    type Item = ParsedQuestion;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            let Some((kind, rest)) = find_category(line) else {
                self.pos += 1;
                continue;
            };

            let inline = split_inline(rest);
            let mut weight_text = inline.weight;
            let mut answer_text = inline.answer;
            let mut consumed = 1;

            // 紧跟的 ANSWER: / WEIGHT: 行各自最多消费一行
            while let Some(&next_line) = self.lines.get(self.pos + consumed) {
                match attribute_tag(next_line) {
                    Some((Attribute::Weight, value)) if weight_text.is_none() => {
                        weight_text = Some(value);
                    }
                    Some((Attribute::Answer, value)) if answer_text.is_none() => {
                        answer_text = Some(value);
                    }
                    _ => break,
                }
                consumed += 1;
            }

            self.pos += consumed;

            if inline.question.is_empty() {
                continue;
            }

            return Some(ParsedQuestion {
                kind,
                text: inline.question.to_string(),
                weight: parse_weight(weight_text),
                expected_answer: answer_text
                    .map(clean_fragment)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string),
            });
        }
        None
    }
}

/// 从 `WEIGHT:` 后的文本中提取权重
///
/// 缺失、无法解析或非有限值返回缺省值 5，其余结果钳制到 [1, 10]。
pub fn parse_weight(text: Option<&str>) -> f64 {
    text.and_then(|t| LEADING_NUMBER.captures(t))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|w| w.is_finite())
        .map(|w| w.clamp(MIN_WEIGHT, MAX_WEIGHT))
        .unwrap_or(DEFAULT_WEIGHT)
}

// ========== 辅助函数 ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Weight,
    Answer,
}

/// 同一行中题干之后可能跟着的内容
struct InlineParts<'a> {
    question: &'a str,
    weight: Option<&'a str>,
    answer: Option<&'a str>,
}

/// 查找类别标签，返回类别和标签之后的文本
///
/// 标签必须出现在行首；以 ANSWER: / WEIGHT: 开头的行不会被当作题目。
fn find_category(line: &str) -> Option<(QuestionKind, &str)> {
    if attribute_tag(line).is_some() {
        return None;
    }

    let caps = CATEGORY_TAG.captures(line)?;
    let kind = match caps.get(1)?.as_str().to_ascii_uppercase().as_str() {
        "FOLLOW-UP" | "FOLLOWUP" => QuestionKind::Followup,
        "SCENARIO" => QuestionKind::Scenario,
        "INDEPENDENT" => QuestionKind::Independent,
        _ => QuestionKind::PositionRelated,
    };
    Some((kind, &line[caps.get(0)?.end()..]))
}

/// 识别以 ANSWER: / WEIGHT: 开头的属性行
fn attribute_tag(line: &str) -> Option<(Attribute, &str)> {
    let trimmed = line.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '•' | '_'));
    let upper = trimmed.to_ascii_uppercase();

    for (tag, attribute) in [(WEIGHT_TAG, Attribute::Weight), (ANSWER_TAG, Attribute::Answer)] {
        if upper.starts_with(tag) {
            return Some((attribute, &trimmed[tag.len()..]));
        }
        let expected = format!("EXPECTED {}", tag);
        if attribute == Attribute::Answer && upper.starts_with(&expected) {
            return Some((attribute, &trimmed[expected.len()..]));
        }
    }
    None
}

/// 拆分同一行中的题干、WEIGHT: 与 ANSWER:
fn split_inline(rest: &str) -> InlineParts<'_> {
    let upper = rest.to_ascii_uppercase();
    let weight_at = upper.find(WEIGHT_TAG);
    let answer_at = upper.find(ANSWER_TAG);

    let question_end = [weight_at, answer_at]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());

    // 某个标签的值截止到另一个标签出现的位置
    let value_after = |start: Option<usize>, tag: &str, other: Option<usize>| {
        start.map(|s| {
            let from = s + tag.len();
            let to = other.filter(|o| *o > s).unwrap_or(rest.len());
            &rest[from..to]
        })
    };

    InlineParts {
        question: clean_fragment(&rest[..question_end]),
        weight: value_after(weight_at, WEIGHT_TAG, answer_at),
        answer: value_after(answer_at, ANSWER_TAG, weight_at),
    }
}

/// 去掉首尾空白和 markdown 强调符号
fn clean_fragment(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '_' | '`' | '|'))
}
