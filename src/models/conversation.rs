use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::message::Message;
use super::timestamp;

pub type ConversationId = i64;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub message_count: u32,
}

/// Payload of `GET /api/conversations/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Payload of `POST /api/conversations/{id}/messages`.
///
/// The server also echoes the stored `user_message`; the client already
/// rendered it, so it is not kept.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageReply {
    pub conversation: Conversation,
    pub ai_message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_conversation_from_server_json() {
        let json = r#"{
            "id": 7,
            "title": "Rust lifetimes",
            "created_at": "2024-01-05T12:00:00.000001",
            "updated_at": "2024-01-06T09:15:00",
            "message_count": 4
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.id, 7);
        assert_eq!(conv.title, "Rust lifetimes");
        assert_eq!(conv.message_count, 4);
        assert!(conv.updated_at > conv.created_at);
    }

    #[test]
    fn test_send_reply_ignores_user_message() {
        let json = r#"{
            "user_message": {"id": 1, "conversation_id": 3, "role": "user", "content": "hi", "created_at": "2024-01-05T12:00:00"},
            "ai_message": {"id": 2, "conversation_id": 3, "role": "assistant", "content": "hello", "created_at": "2024-01-05T12:00:01"},
            "conversation": {"id": 3, "title": "hi", "created_at": "2024-01-05T12:00:00", "updated_at": "2024-01-05T12:00:01", "message_count": 2}
        }"#;
        let reply: SendMessageReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.ai_message.role, Role::Assistant);
        assert_eq!(reply.ai_message.content, "hello");
        assert_eq!(reply.conversation.title, "hi");
    }
}
