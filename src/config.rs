use std::time::Duration;

/// 生成题目的权重来源
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightSource {
    /// 使用 LLM 给出的权重（1-10）
    Generated,
    /// 所有生成题目权重固定为 0
    FixedZero,
}

impl WeightSource {
    /// 从环境变量取值解析，无法识别时返回 None
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "generated" | "llm" => Some(WeightSource::Generated),
            "fixed-zero" | "fixed_zero" | "zero" => Some(WeightSource::FixedZero),
            _ => None,
        }
    }
}

/// 判分策略
///
/// 不同的面试变体（是否记录错题、是否允许重答、权重来源）都由这一组开关描述，
/// 共用同一个状态机。
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct EvaluationPolicy {
    pub track_wrong_questions: bool,
    pub allow_retry: bool,
    pub weight_source: WeightSource,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            track_wrong_questions: true,
            allow_retry: true,
            weight_source: WeightSource::Generated,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 出题与学习建议使用的模型
    pub llm_model_name: String,
    /// 判分使用的模型
    pub judge_model_name: String,
    /// LLM 调用最多尝试次数（仅限流错误会重试）
    pub llm_max_attempts: u32,
    /// 退避时间单位，第 n 次重试等待 2^n 个单位
    pub llm_backoff_unit: Duration,
    // --- 面试配置 ---
    /// 期望生成的岗位相关题目数量
    pub target_question_count: usize,
    /// 少于该数量时提示题目不足
    pub min_generated_questions: usize,
    /// 及格线（百分比）
    pub pass_threshold: f64,
    pub policy: EvaluationPolicy,
    /// 固定题库 TOML 文件（可选）
    pub question_bank_file: Option<String>,
    // --- 输出配置 ---
    pub output_log_file: String,
    pub output_report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 界面与面试流程之间的通道容量
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            judge_model_name: "gpt-4o-mini".to_string(),
            llm_max_attempts: 3,
            llm_backoff_unit: Duration::from_secs(1),
            target_question_count: 23,
            min_generated_questions: 5,
            pass_threshold: 80.0,
            policy: EvaluationPolicy::default(),
            question_bank_file: None,
            output_log_file: "interview.log".to_string(),
            output_report_file: "interview_report.json".to_string(),
            verbose_logging: false,
            channel_capacity: 8,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置，无法解析的值回退到默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let llm_model_name = lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name);
        let policy = EvaluationPolicy {
            track_wrong_questions: parse_var(lookup("TRACK_WRONG_QUESTIONS")).unwrap_or(default.policy.track_wrong_questions),
            allow_retry: parse_var(lookup("ALLOW_RETRY")).unwrap_or(default.policy.allow_retry),
            weight_source: lookup("WEIGHT_SOURCE").and_then(|v| WeightSource::parse(&v)).unwrap_or(default.policy.weight_source),
        };

        Self {
            llm_api_key: lookup("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            judge_model_name: lookup("JUDGE_MODEL_NAME").unwrap_or_else(|| llm_model_name.clone()),
            llm_model_name,
            llm_max_attempts: parse_var(lookup("LLM_MAX_ATTEMPTS")).filter(|n: &u32| *n > 0).unwrap_or(default.llm_max_attempts),
            llm_backoff_unit: parse_var(lookup("LLM_BACKOFF_MS")).map(Duration::from_millis).unwrap_or(default.llm_backoff_unit),
            target_question_count: parse_var(lookup("TARGET_QUESTION_COUNT")).unwrap_or(default.target_question_count),
            min_generated_questions: parse_var(lookup("MIN_GENERATED_QUESTIONS")).unwrap_or(default.min_generated_questions),
            pass_threshold: parse_var(lookup("PASS_THRESHOLD")).filter(|p: &f64| p.is_finite()).unwrap_or(default.pass_threshold),
            policy,
            question_bank_file: lookup("QUESTION_BANK_FILE").filter(|v| !v.trim().is_empty()),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            output_report_file: lookup("OUTPUT_REPORT_FILE").unwrap_or(default.output_report_file),
            verbose_logging: parse_var(lookup("VERBOSE_LOGGING")).unwrap_or(default.verbose_logging),
            channel_capacity: parse_var(lookup("CHANNEL_CAPACITY")).filter(|n: &usize| *n > 0).unwrap_or(default.channel_capacity),
        }
    }
}

/// 按调用处需要的类型解析环境变量
fn parse_var<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.target_question_count, 23);
        assert_eq!(config.min_generated_questions, 5);
        assert_eq!(config.llm_max_attempts, 3);
        assert_eq!(config.policy, EvaluationPolicy::default());
        assert!(config.question_bank_file.is_none());
    }

    #[test]
    fn test_judge_model_follows_generation_model() {
        let config = Config::from_lookup(lookup_from(&[("LLM_MODEL_NAME", "qwen-plus")]));
        assert_eq!(config.llm_model_name, "qwen-plus");
        assert_eq!(config.judge_model_name, "qwen-plus");
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("TARGET_QUESTION_COUNT", "many"),
            ("LLM_MAX_ATTEMPTS", "0"),
            ("ALLOW_RETRY", "maybe"),
            ("WEIGHT_SOURCE", "random"),
        ]));
        assert_eq!(config.target_question_count, 23);
        assert_eq!(config.llm_max_attempts, 3);
        assert!(config.policy.allow_retry);
        assert_eq!(config.policy.weight_source, WeightSource::Generated);
    }

    #[test]
    fn test_policy_flags_from_env() {
        let config = Config::from_lookup(lookup_from(&[
            ("ALLOW_RETRY", "false"),
            ("TRACK_WRONG_QUESTIONS", "false"),
            ("WEIGHT_SOURCE", "fixed-zero"),
            ("LLM_BACKOFF_MS", "0"),
        ]));
        assert!(!config.policy.allow_retry);
        assert!(!config.policy.track_wrong_questions);
        assert_eq!(config.policy.weight_source, WeightSource::FixedZero);
        assert_eq!(config.llm_backoff_unit, Duration::ZERO);
    }
}
