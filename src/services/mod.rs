pub mod answer_judge;
pub mod feedback_composer;
pub mod llm_service;
pub mod question_set_builder;
pub mod report_writer;
pub mod response_parser;

pub use answer_judge::{AnswerJudge, JudgeRequest, Verdict};
pub use feedback_composer::{FeedbackComposer, FeedbackReport, FeedbackVerdict, StudyGuidance};
pub use llm_service::LlmService;
pub use question_set_builder::{QuestionSetBuilder, QuestionSetReport};
pub use report_writer::ReportWriter;
pub use response_parser::{parse_response, ParsedQuestion};
