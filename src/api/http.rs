use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;

use super::traits::ChatApi;
use super::types::{ApiError, Envelope, HealthStatus};
use crate::models::{Conversation, ConversationDetail, ConversationId, SendMessageReply};

#[derive(Serialize)]
struct SendMessageBody<'a> {
    message: &'a str,
}

/// `ChatApi` over HTTP against the chat server.
#[derive(Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
}

impl HttpChatApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decodes the envelope whatever the HTTP status; error statuses carry
    /// `success: false` and a message.
    async fn envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!("Undecodable response (HTTP {}): {}", status.as_u16(), e);
            ApiError::Decode(e)
        })
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let response = self.client.get(self.url("/api/conversations")).send().await?;
        Self::envelope(response).await?.into_data()
    }

    async fn create_conversation(&self) -> Result<Conversation, ApiError> {
        let response = self.client.post(self.url("/api/conversations")).send().await?;
        Self::envelope(response).await?.into_data()
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<ConversationDetail, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/conversations/{}", id)))
            .send()
            .await?;
        Self::envelope(response).await?.into_data()
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/conversations/{}", id)))
            .send()
            .await?;
        Self::envelope::<IgnoredAny>(response).await?.into_ack()
    }

    async fn send_message(
        &self,
        id: ConversationId,
        message: &str,
    ) -> Result<SendMessageReply, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/api/conversations/{}/messages", id)))
            .json(&SendMessageBody { message })
            .send()
            .await?;
        Self::envelope(response).await?.into_data()
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn conversation_json(id: i64, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "created_at": "2024-01-05T12:00:00.000001",
            "updated_at": "2024-01-05T12:30:00",
            "message_count": 2
        })
    }

    /// Spawn a stand-in chat server. Returns its base URL and a shutdown handle.
    async fn spawn_server() -> (String, tokio::sync::oneshot::Sender<()>) {
        let app = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "healthy", "message": "ok"})) }))
            .route(
                "/api/conversations",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "data": [conversation_json(2, "Second"), conversation_json(1, "First")]
                    }))
                })
                .post(|| async {
                    Json(json!({"success": true, "data": conversation_json(3, "New chat")}))
                }),
            )
            .route(
                "/api/conversations/{id}",
                get(|Path(id): Path<i64>| async move {
                    if id == 404 {
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({"success": false, "message": "conversation not found"})),
                        );
                    }
                    (
                        StatusCode::OK,
                        Json(json!({
                            "success": true,
                            "data": {
                                "conversation": conversation_json(id, "Loaded"),
                                "messages": [
                                    {"id": 1, "conversation_id": id, "role": "user", "content": "hi", "created_at": "2024-01-05T12:00:00"},
                                    {"id": 2, "conversation_id": id, "role": "assistant", "content": "hello\nthere", "created_at": "2024-01-05T12:00:02"}
                                ]
                            }
                        })),
                    )
                })
                .delete(|Path(_id): Path<i64>| async {
                    Json(json!({"success": true, "message": "deleted"}))
                }),
            )
            .route(
                "/api/conversations/{id}/messages",
                post(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    let text = body["message"].as_str().unwrap_or_default().to_string();
                    Json(json!({
                        "success": true,
                        "data": {
                            "user_message": {"id": 5, "conversation_id": id, "role": "user", "content": text, "created_at": "2024-01-05T12:00:00"},
                            "ai_message": {"id": 6, "conversation_id": id, "role": "assistant", "content": format!("echo: {}", text), "created_at": "2024-01-05T12:00:01"},
                            "conversation": conversation_json(id, &text)
                        }
                    }))
                }),
            )
            .route("/broken", get(|| async { "<html>oops</html>" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });
        (format!("http://127.0.0.1:{}/", port), tx)
    }

    #[tokio::test]
    async fn test_list_and_create() {
        let (base, _shutdown) = spawn_server().await;
        let api = HttpChatApi::new(&base).unwrap();

        let list = api.list_conversations().await.unwrap();
        assert_eq!(list.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 1]);

        let created = api.create_conversation().await.unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(created.title, "New chat");
    }

    #[tokio::test]
    async fn test_get_conversation_detail() {
        let (base, _shutdown) = spawn_server().await;
        let api = HttpChatApi::new(&base).unwrap();

        let detail = api.get_conversation(9).await.unwrap();
        assert_eq!(detail.conversation.id, 9);
        assert_eq!(detail.messages.len(), 2);
        assert_eq!(detail.messages[1].role, Role::Assistant);
        assert!(detail.messages[1].created_at.is_some());
    }

    #[tokio::test]
    async fn test_error_status_still_reads_envelope() {
        let (base, _shutdown) = spawn_server().await;
        let api = HttpChatApi::new(&base).unwrap();

        let err = api.get_conversation(404).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
        assert_eq!(err.to_string(), "conversation not found");
    }

    #[tokio::test]
    async fn test_send_message_and_delete() {
        let (base, _shutdown) = spawn_server().await;
        let api = HttpChatApi::new(&base).unwrap();

        let reply = api.send_message(4, "ping").await.unwrap();
        assert_eq!(reply.ai_message.content, "echo: ping");
        assert_eq!(reply.conversation.title, "ping");

        api.delete_conversation(4).await.unwrap();
    }

    #[tokio::test]
    async fn test_health() {
        let (base, _shutdown) = spawn_server().await;
        let api = HttpChatApi::new(&base).unwrap();
        assert!(api.health().await.unwrap().is_healthy());
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let (base, _shutdown) = spawn_server().await;
        let api = HttpChatApi::new(&base).unwrap();
        let response = api.client.get(api.url("/broken")).send().await.unwrap();
        let err = HttpChatApi::envelope::<IgnoredAny>(response).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Nothing listens on port 1.
        let api = HttpChatApi::new("http://127.0.0.1:1").unwrap();
        let err = api.list_conversations().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
