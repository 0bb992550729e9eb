use std::str::FromStr;

use chrono::Utc;

use super::{Clock, ConversationCard, ConversationListSurface};
use crate::api::{ApiOutcome, ApiRequest};
use crate::models::{Conversation, ConversationId};
use crate::services::collation::TitleCollator;
use crate::services::format::{escape_markup, format_date, format_list_time, format_message_count};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    UpdatedDesc,
    CreatedDesc,
    TitleAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::UpdatedDesc, SortKey::CreatedDesc, SortKey::TitleAsc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::UpdatedDesc => "updated_desc",
            SortKey::CreatedDesc => "created_desc",
            SortKey::TitleAsc => "title_asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::UpdatedDesc => "Recently updated",
            SortKey::CreatedDesc => "Recently created",
            SortKey::TitleAsc => "Title",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {}", s))
    }
}

/// Conversations whose title contains `search_term` (ignoring case), in
/// `sort_by` order. Titles sort by `collator`.
pub fn filter_and_sort(
    conversations: &[Conversation],
    search_term: &str,
    sort_by: SortKey,
    collator: &TitleCollator,
) -> Vec<Conversation> {
    let term = search_term.to_lowercase();
    let mut filtered: Vec<Conversation> = conversations
        .iter()
        .filter(|c| c.title.to_lowercase().contains(&term))
        .cloned()
        .collect();

    match sort_by {
        SortKey::UpdatedDesc => filtered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::CreatedDesc => filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::TitleAsc => filtered.sort_by(|a, b| collator.compare(&a.title, &b.title)),
    }
    filtered
}

/// State of the history page: every conversation, the visible subset, and
/// the pending delete target.
pub struct ConversationListController {
    conversations: Vec<Conversation>,
    filtered_conversations: Vec<Conversation>,
    search_term: String,
    sort_by: SortKey,
    delete_conversation_id: Option<ConversationId>,
    collator: TitleCollator,
    clock: Clock,
}

impl Default for ConversationListController {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationListController {
    pub fn new() -> Self {
        Self {
            conversations: Vec::new(),
            filtered_conversations: Vec::new(),
            search_term: String::new(),
            sort_by: SortKey::default(),
            delete_conversation_id: None,
            collator: TitleCollator::default(),
            clock: Utc::now,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_collator(mut self, collator: TitleCollator) -> Self {
        self.collator = collator;
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    #[cfg(test)]
    pub fn filtered_conversations(&self) -> &[Conversation] {
        &self.filtered_conversations
    }

    #[cfg(test)]
    pub fn delete_conversation_id(&self) -> Option<ConversationId> {
        self.delete_conversation_id
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    pub fn load_conversations(&mut self, surface: &mut dyn ConversationListSurface) -> Vec<ApiRequest> {
        surface.set_loading(true);
        vec![ApiRequest::ListConversations]
    }

    pub fn set_search_term(&mut self, term: &str, surface: &mut dyn ConversationListSurface) {
        self.search_term = term.to_lowercase();
        self.filter_and_render(surface);
    }

    pub fn set_sort(&mut self, sort_by: SortKey, surface: &mut dyn ConversationListSurface) {
        self.sort_by = sort_by;
        self.filter_and_render(surface);
    }

    pub fn view_conversation(&self, id: ConversationId, surface: &mut dyn ConversationListSurface) {
        surface.open_in_chat(id);
    }

    pub fn show_delete_modal(&mut self, id: ConversationId, surface: &mut dyn ConversationListSurface) {
        self.delete_conversation_id = Some(id);
        surface.set_delete_modal_visible(true);
    }

    pub fn hide_delete_modal(&mut self, surface: &mut dyn ConversationListSurface) {
        self.delete_conversation_id = None;
        surface.set_delete_modal_visible(false);
    }

    pub fn confirm_delete(&self) -> Vec<ApiRequest> {
        match self.delete_conversation_id {
            Some(id) => vec![ApiRequest::DeleteConversation(id)],
            None => Vec::new(),
        }
    }

    pub fn complete(
        &mut self,
        outcome: ApiOutcome,
        surface: &mut dyn ConversationListSurface,
    ) -> Vec<ApiRequest> {
        match outcome {
            ApiOutcome::Conversations(result) => {
                surface.set_loading(false);
                match result {
                    Ok(conversations) => {
                        self.conversations = conversations;
                        self.filter_and_render(surface);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load conversations: {}", e);
                        surface.alert(&format!("Failed to load conversations: {}", e));
                    }
                }
            }
            ApiOutcome::Deleted(id, Ok(())) => {
                tracing::info!("Deleted conversation {}", id);
                self.conversations.retain(|c| c.id != id);
                self.filter_and_render(surface);
                self.hide_delete_modal(surface);
            }
            ApiOutcome::Deleted(id, Err(e)) => {
                // The modal stays open with its target so the user can retry.
                tracing::error!("Failed to delete conversation {}: {}", id, e);
                surface.alert(&format!("Failed to delete conversation: {}", e));
            }
            ApiOutcome::Health(_)
            | ApiOutcome::Created(_)
            | ApiOutcome::Loaded(..)
            | ApiOutcome::MessageSent(..) => {}
        }
        Vec::new()
    }

    fn filter_and_render(&mut self, surface: &mut dyn ConversationListSurface) {
        self.filtered_conversations =
            filter_and_sort(&self.conversations, &self.search_term, self.sort_by, &self.collator);

        if self.filtered_conversations.is_empty() {
            surface.show_empty_state();
            return;
        }

        let now = (self.clock)();
        let cards: Vec<ConversationCard> = self
            .filtered_conversations
            .iter()
            .map(|c| ConversationCard {
                id: c.id,
                title_markup: escape_markup(&c.title),
                updated_label: format_list_time(c.updated_at, now),
                message_count_label: format_message_count(c.message_count),
                created_label: format_date(c.created_at),
            })
            .collect();
        surface.render_cards(&cards);
    }
}
