use async_trait::async_trait;

use super::types::{ApiError, HealthStatus};
use crate::models::{Conversation, ConversationDetail, ConversationId, SendMessageReply};

/// The server's conversation API as the client consumes it.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError>;

    async fn create_conversation(&self) -> Result<Conversation, ApiError>;

    async fn get_conversation(&self, id: ConversationId) -> Result<ConversationDetail, ApiError>;

    async fn delete_conversation(&self, id: ConversationId) -> Result<(), ApiError>;

    async fn send_message(
        &self,
        id: ConversationId,
        message: &str,
    ) -> Result<SendMessageReply, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
