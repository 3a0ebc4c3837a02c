mod message;
mod problem;
mod request;

pub use message::{Author, Message, MessageId};
pub use problem::ProblemContext;
pub use request::{ChatRequest, ChatResponse};
