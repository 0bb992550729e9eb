use super::traits::ChatApi;
use super::types::{ApiError, HealthStatus};
use crate::models::{Conversation, ConversationDetail, ConversationId, SendMessageReply};

/// A network call a controller wants performed. Controllers never do I/O
/// themselves; the shell executes these and hands back an [`ApiOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    Health,
    ListConversations,
    CreateConversation,
    GetConversation(ConversationId),
    DeleteConversation(ConversationId),
    SendMessage {
        conversation_id: ConversationId,
        message: String,
    },
}

#[derive(Debug)]
pub enum ApiOutcome {
    Health(Result<HealthStatus, ApiError>),
    Conversations(Result<Vec<Conversation>, ApiError>),
    Created(Result<Conversation, ApiError>),
    Loaded(ConversationId, Result<ConversationDetail, ApiError>),
    Deleted(ConversationId, Result<(), ApiError>),
    MessageSent(ConversationId, Result<SendMessageReply, ApiError>),
}

impl ApiRequest {
    pub async fn execute(self, api: &dyn ChatApi) -> ApiOutcome {
        match self {
            ApiRequest::Health => ApiOutcome::Health(api.health().await),
            ApiRequest::ListConversations => {
                ApiOutcome::Conversations(api.list_conversations().await)
            }
            ApiRequest::CreateConversation => {
                ApiOutcome::Created(api.create_conversation().await)
            }
            ApiRequest::GetConversation(id) => {
                ApiOutcome::Loaded(id, api.get_conversation(id).await)
            }
            ApiRequest::DeleteConversation(id) => {
                ApiOutcome::Deleted(id, api.delete_conversation(id).await)
            }
            ApiRequest::SendMessage {
                conversation_id,
                message,
            } => {
                tracing::debug!("Sending message to conversation {}", conversation_id);
                ApiOutcome::MessageSent(
                    conversation_id,
                    api.send_message(conversation_id, &message).await,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Records calls and answers from canned data.
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
    }

    fn conversation(id: ConversationId, title: &str) -> Conversation {
        Conversation {
            id,
            title: title.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            message_count: 0,
        }
    }

    #[async_trait]
    impl ChatApi for FakeApi {
        async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
            self.calls.lock().unwrap().push("list".into());
            Ok(vec![conversation(1, "one")])
        }

        async fn create_conversation(&self) -> Result<Conversation, ApiError> {
            self.calls.lock().unwrap().push("create".into());
            Err(ApiError::Rejected("database is down".into()))
        }

        async fn get_conversation(&self, id: ConversationId) -> Result<ConversationDetail, ApiError> {
            self.calls.lock().unwrap().push(format!("get {}", id));
            Ok(ConversationDetail {
                conversation: conversation(id, "loaded"),
                messages: vec![Message::user("hi")],
            })
        }

        async fn delete_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(format!("delete {}", id));
            Ok(())
        }

        async fn send_message(
            &self,
            id: ConversationId,
            message: &str,
        ) -> Result<SendMessageReply, ApiError> {
            self.calls.lock().unwrap().push(format!("send {} {}", id, message));
            Ok(SendMessageReply {
                conversation: conversation(id, message),
                ai_message: Message::assistant("ok"),
            })
        }

        async fn health(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus {
                status: "healthy".into(),
                message: None,
            })
        }
    }

    #[tokio::test]
    async fn test_outcome_carries_request_id() {
        let api = FakeApi::default();
        match ApiRequest::DeleteConversation(5).execute(&api).await {
            ApiOutcome::Deleted(id, Ok(())) => assert_eq!(id, 5),
            other => panic!("unexpected outcome: {:?}", other),
        }
        match ApiRequest::GetConversation(8).execute(&api).await {
            ApiOutcome::Loaded(id, Ok(detail)) => {
                assert_eq!(id, 8);
                assert_eq!(detail.conversation.id, 8);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(*api.calls.lock().unwrap(), vec!["delete 5", "get 8"]);
    }

    #[tokio::test]
    async fn test_send_passes_message_through() {
        let api = FakeApi::default();
        let request = ApiRequest::SendMessage {
            conversation_id: 2,
            message: "hello".into(),
        };
        match request.execute(&api).await {
            ApiOutcome::MessageSent(2, Ok(reply)) => assert_eq!(reply.conversation.title, "hello"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(*api.calls.lock().unwrap(), vec!["send 2 hello"]);
    }

    #[tokio::test]
    async fn test_failures_are_returned_not_raised() {
        let api = FakeApi::default();
        match ApiRequest::CreateConversation.execute(&api).await {
            ApiOutcome::Created(Err(e)) => assert_eq!(e.to_string(), "database is down"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(
            ApiRequest::ListConversations.execute(&api).await,
            ApiOutcome::Conversations(Ok(list)) if list.len() == 1
        ));
    }
}
