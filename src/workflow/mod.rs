pub mod host;
pub mod question_ctx;
pub mod question_flow;

pub use host::{channel_pair, ChannelHost, Host, HostEvent, HostHandle};
pub use question_ctx::QuestionCtx;
pub use question_flow::QuestionFlow;
