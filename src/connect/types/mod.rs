mod chat_message;
mod user_info;

pub use chat_message::{ChatMessage, Privilege};
pub(crate) use user_info::{parse_tags, privilege_from_tags};
