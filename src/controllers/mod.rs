//! Page controllers.
//!
//! A controller owns one page's state. Each user action is one method; the
//! method updates state, renders through the page's surface trait, and
//! returns the [`ApiRequest`](crate::api::ApiRequest)s to run. Results come
//! back through `complete`.

pub mod chat;
pub mod conversation_list;

pub use chat::ChatController;
pub use conversation_list::{ConversationListController, SortKey};

use chrono::{DateTime, Utc};

use crate::models::{ConversationId, Role};

/// Source of "now" for relative timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// One row in the chat sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub id: ConversationId,
    pub title: String,
    pub time_label: String,
    pub active: bool,
}

/// One rendered message in the chat thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub markup: String,
    pub time_label: String,
}

/// One card on the history page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationCard {
    pub id: ConversationId,
    pub title_markup: String,
    pub updated_label: String,
    pub message_count_label: String,
    pub created_label: String,
}

/// Everything the chat controller can do to its page.
pub trait ChatSurface {
    fn render_conversations(&mut self, entries: &[SidebarEntry]);
    fn mark_active(&mut self, id: ConversationId);
    /// Replace the thread with the welcome placeholder.
    fn show_welcome(&mut self);
    /// Append to the thread, dropping the welcome placeholder if shown.
    fn append_message(&mut self, message: &MessageView);
    fn set_title(&mut self, title: &str);
    fn set_loading(&mut self, loading: bool);
    fn set_send_enabled(&mut self, enabled: bool);
    fn set_char_count(&mut self, count: usize, max: usize);
    /// Clear the input text and shrink it back to one line.
    fn reset_input(&mut self);
    fn alert(&mut self, message: &str);
    /// Ask the user to confirm clearing; a yes answers with
    /// [`ChatController::confirm_clear`].
    fn confirm_clear(&mut self, prompt: &str);
}

/// Everything the history controller can do to its page.
pub trait ConversationListSurface {
    fn render_cards(&mut self, cards: &[ConversationCard]);
    fn show_empty_state(&mut self);
    fn set_loading(&mut self, loading: bool);
    fn set_delete_modal_visible(&mut self, visible: bool);
    fn alert(&mut self, message: &str);
    /// Switch to the chat page with this conversation selected.
    fn open_in_chat(&mut self, id: ConversationId);
}
