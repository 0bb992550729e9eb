pub mod conversation;
pub mod message;
mod timestamp;

pub use conversation::{Conversation, ConversationDetail, ConversationId, SendMessageReply};
pub use message::{Message, Role};
