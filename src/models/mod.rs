pub mod interview_state;
pub mod loaders;
pub mod question;
pub mod question_bank;

pub use interview_state::InterviewState;
pub use loaders::load_question_bank;
pub use question::{QuestionKind, QuestionMeta, QuestionOutcome};
pub use question_bank::QuestionBank;
