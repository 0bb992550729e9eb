use chrono::Utc;

use super::{ChatSurface, Clock, MessageView, SidebarEntry};
use crate::api::{ApiOutcome, ApiRequest};
use crate::config::MAX_MESSAGE_LENGTH;
use crate::models::{Conversation, ConversationDetail, ConversationId, Message, SendMessageReply};
use crate::services::format::{format_chat_time, format_message_content};

pub const DEFAULT_TITLE: &str = "Start a new conversation";
pub const CLEAR_PROMPT: &str = "Clear the current conversation?";

/// State of the chat page: the active conversation and its thread.
pub struct ChatController {
    current_conversation_id: Option<ConversationId>,
    is_loading: bool,
    creating: bool,
    // Text waiting for a conversation to be created before it is sent.
    pending_send: Option<String>,
    thread: Vec<Message>,
    clock: Clock,
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatController {
    pub fn new() -> Self {
        Self {
            current_conversation_id: None,
            is_loading: false,
            creating: false,
            pending_send: None,
            thread: Vec::new(),
            clock: Utc::now,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[cfg(test)]
    pub fn current_conversation_id(&self) -> Option<ConversationId> {
        self.current_conversation_id
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[cfg(test)]
    pub fn thread(&self) -> &[Message] {
        &self.thread
    }

    pub fn initialize(&mut self, surface: &mut dyn ChatSurface) -> Vec<ApiRequest> {
        surface.set_title(DEFAULT_TITLE);
        surface.show_welcome();
        surface.set_char_count(0, MAX_MESSAGE_LENGTH);
        surface.set_send_enabled(false);
        self.refresh_conversations()
    }

    pub fn refresh_conversations(&self) -> Vec<ApiRequest> {
        vec![ApiRequest::ListConversations]
    }

    /// Input text changed; `len` is its length in characters.
    pub fn input_changed(&self, len: usize, surface: &mut dyn ChatSurface) {
        surface.set_char_count(len, MAX_MESSAGE_LENGTH);
        surface.set_send_enabled(len > 0 && !self.is_loading);
    }

    pub fn create_new_conversation(&mut self, surface: &mut dyn ChatSurface) -> Vec<ApiRequest> {
        if self.creating {
            tracing::debug!("Conversation creation already in flight");
            return Vec::new();
        }
        self.creating = true;
        surface.set_loading(true);
        vec![ApiRequest::CreateConversation]
    }

    pub fn load_conversation(
        &mut self,
        id: ConversationId,
        surface: &mut dyn ChatSurface,
    ) -> Vec<ApiRequest> {
        surface.set_loading(true);
        vec![ApiRequest::GetConversation(id)]
    }

    /// Send `text` to the active conversation, creating one first if needed.
    /// Blank text or a send already in flight is ignored without side effects.
    pub fn send_message(&mut self, text: &str, surface: &mut dyn ChatSurface) -> Vec<ApiRequest> {
        let message = text.trim();
        if message.is_empty() || self.is_loading {
            return Vec::new();
        }

        match self.current_conversation_id {
            Some(id) => self.begin_send(id, message.to_string(), surface),
            None => {
                self.pending_send = Some(message.to_string());
                self.create_new_conversation(surface)
            }
        }
    }

    pub fn request_clear(&self, surface: &mut dyn ChatSurface) {
        if self.current_conversation_id.is_some() {
            surface.confirm_clear(CLEAR_PROMPT);
        }
    }

    pub fn confirm_clear(&self) -> Vec<ApiRequest> {
        match self.current_conversation_id {
            Some(id) => vec![ApiRequest::DeleteConversation(id)],
            None => Vec::new(),
        }
    }

    /// A conversation was deleted from another page. Drops it if it is the
    /// active one and refreshes the sidebar.
    pub fn conversation_removed(
        &mut self,
        id: ConversationId,
        surface: &mut dyn ChatSurface,
    ) -> Vec<ApiRequest> {
        if self.current_conversation_id == Some(id) {
            tracing::info!("Active conversation {} was deleted", id);
            self.reset_to_welcome(surface);
        }
        self.refresh_conversations()
    }

    pub fn complete(&mut self, outcome: ApiOutcome, surface: &mut dyn ChatSurface) -> Vec<ApiRequest> {
        match outcome {
            ApiOutcome::Conversations(Ok(conversations)) => {
                self.render_sidebar(&conversations, surface);
                Vec::new()
            }
            ApiOutcome::Conversations(Err(e)) => {
                tracing::error!("Failed to load conversation list: {}", e);
                Vec::new()
            }
            ApiOutcome::Created(result) => {
                self.creating = false;
                surface.set_loading(false);
                match result {
                    Ok(conversation) => self.conversation_created(conversation, surface),
                    Err(e) => {
                        tracing::error!("Failed to create conversation: {}", e);
                        surface.alert(&format!("Failed to create conversation: {}", e));
                        self.pending_send = None;
                        Vec::new()
                    }
                }
            }
            ApiOutcome::Loaded(id, result) => {
                surface.set_loading(false);
                match result {
                    Ok(detail) => self.conversation_loaded(id, detail, surface),
                    Err(e) => {
                        tracing::error!("Failed to load conversation {}: {}", id, e);
                        surface.alert(&format!("Failed to load conversation: {}", e));
                    }
                }
                Vec::new()
            }
            ApiOutcome::Deleted(id, Ok(())) => {
                tracing::info!("Cleared conversation {}", id);
                self.reset_to_welcome(surface);
                self.refresh_conversations()
            }
            ApiOutcome::Deleted(id, Err(e)) => {
                tracing::error!("Failed to clear conversation {}: {}", id, e);
                surface.alert(&format!("Failed to clear conversation: {}", e));
                Vec::new()
            }
            ApiOutcome::MessageSent(_, result) => {
                let follow_up = match result {
                    Ok(reply) => self.reply_received(reply, surface),
                    Err(e) => {
                        tracing::error!("Failed to send message: {}", e);
                        self.push_message(
                            Message::assistant(format!("Sorry, failed to send message: {}", e)),
                            surface,
                        );
                        Vec::new()
                    }
                };
                self.is_loading = false;
                surface.set_loading(false);
                surface.set_send_enabled(true);
                follow_up
            }
            ApiOutcome::Health(_) => Vec::new(),
        }
    }

    fn conversation_created(
        &mut self,
        conversation: Conversation,
        surface: &mut dyn ChatSurface,
    ) -> Vec<ApiRequest> {
        tracing::info!("Created conversation {}", conversation.id);
        self.current_conversation_id = Some(conversation.id);
        self.thread.clear();
        surface.show_welcome();
        surface.set_title(&conversation.title);

        let mut requests = self.refresh_conversations();
        if let Some(message) = self.pending_send.take() {
            requests.extend(self.begin_send(conversation.id, message, surface));
        }
        requests
    }

    fn conversation_loaded(
        &mut self,
        id: ConversationId,
        detail: ConversationDetail,
        surface: &mut dyn ChatSurface,
    ) {
        self.current_conversation_id = Some(id);
        surface.set_title(&detail.conversation.title);

        self.thread.clear();
        surface.show_welcome();
        for message in detail.messages {
            self.push_message(message, surface);
        }
        surface.mark_active(id);
    }

    fn reset_to_welcome(&mut self, surface: &mut dyn ChatSurface) {
        self.current_conversation_id = None;
        self.thread.clear();
        surface.show_welcome();
        surface.set_title(DEFAULT_TITLE);
    }

    fn reply_received(&mut self, reply: SendMessageReply, surface: &mut dyn ChatSurface) -> Vec<ApiRequest> {
        // The server names a conversation after its first message.
        surface.set_title(&reply.conversation.title);
        self.push_message(reply.ai_message, surface);
        self.refresh_conversations()
    }

    fn begin_send(
        &mut self,
        id: ConversationId,
        message: String,
        surface: &mut dyn ChatSurface,
    ) -> Vec<ApiRequest> {
        self.is_loading = true;
        surface.set_loading(true);

        self.push_message(Message::user(message.clone()), surface);
        surface.reset_input();
        surface.set_char_count(0, MAX_MESSAGE_LENGTH);
        surface.set_send_enabled(false);

        tracing::info!("Sending message to conversation {}", id);
        vec![ApiRequest::SendMessage {
            conversation_id: id,
            message,
        }]
    }

    fn push_message(&mut self, message: Message, surface: &mut dyn ChatSurface) {
        let now = (self.clock)();
        let view = MessageView {
            role: message.role,
            markup: format_message_content(&message.content),
            time_label: format_chat_time(message.created_at.unwrap_or(now), now),
        };
        surface.append_message(&view);
        self.thread.push(message);
    }

    fn render_sidebar(&self, conversations: &[Conversation], surface: &mut dyn ChatSurface) {
        let now = (self.clock)();
        let entries: Vec<SidebarEntry> = conversations
            .iter()
            .map(|c| SidebarEntry {
                id: c.id,
                title: c.title.clone(),
                time_label: format_chat_time(c.updated_at, now),
                active: Some(c.id) == self.current_conversation_id,
            })
            .collect();
        surface.render_conversations(&entries);
    }
}
