use serde::Deserialize;

/// 固定题库：开场题、基础背景题、个人题
///
/// 可以通过 TOML 文件覆盖，缺省的部分使用内置题目。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuestionBank {
    /// 开场题，固定 3 道：姓名、应聘岗位、岗位要求
    pub intake: Vec<String>,
    pub basic: Vec<String>,
    pub personal: Vec<String>,
}

impl QuestionBank {
    /// 岗位要求所在的开场题下标
    pub const REQUIREMENTS_INDEX: usize = 2;
    /// 应聘岗位所在的开场题下标
    pub const ROLE_INDEX: usize = 1;
}

impl Default for QuestionBank {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            intake: owned(&[
                "What is your name?",
                "What position have you applied for?",
                "What were the requirements for that?",
            ]),
            basic: owned(&[
                "Where are you currently living?",
                "Tell us about your previous work experience.",
                "Which university did you graduate from?",
                "What was your major?",
                "What are your future career plans?",
            ]),
            personal: owned(&[
                "What activities do you pursue outside of work?",
                "Why do you think you are a good candidate for this position?",
            ]),
        }
    }
}
