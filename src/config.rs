use clap::Parser;

use crate::controllers::SortKey;
use crate::models::ConversationId;

pub const APP_ID: &str = "com.parley.Parley";
pub const APP_NAME: &str = "Parley";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Longest message the input counter allows for.
pub const MAX_MESSAGE_LENGTH: usize = 2000;
/// The message input grows with its content up to this height in pixels.
pub const INPUT_MAX_HEIGHT: i32 = 120;

#[derive(Debug, Clone, Parser)]
#[command(name = "parley", version, about = "Desktop client for a REST chat server")]
pub struct ClientConfig {
    /// Base URL of the chat server.
    #[arg(long = "server", env = "PARLEY_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: url::Url,

    /// Open this conversation on startup.
    #[arg(long = "conversation")]
    pub initial_conversation: Option<ConversationId>,

    /// Initial history order: updated_desc, created_desc or title_asc.
    #[arg(long = "sort", default_value = "updated_desc")]
    pub initial_sort: SortKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::try_parse_from(["parley"]).unwrap();
        assert_eq!(config.server_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.initial_conversation, None);
        assert_eq!(config.initial_sort, SortKey::UpdatedDesc);
    }

    #[test]
    fn test_sort_flag() {
        let config = ClientConfig::try_parse_from(["parley", "--sort", "title_asc"]).unwrap();
        assert_eq!(config.initial_sort, SortKey::TitleAsc);
        assert!(ClientConfig::try_parse_from(["parley", "--sort", "newest"]).is_err());
    }

    #[test]
    fn test_preselected_conversation() {
        let config = ClientConfig::try_parse_from([
            "parley",
            "--server",
            "http://chat.internal:8080",
            "--conversation",
            "42",
        ])
        .unwrap();
        assert_eq!(config.server_url.host_str(), Some("chat.internal"));
        assert_eq!(config.initial_conversation, Some(42));
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(ClientConfig::try_parse_from(["parley", "--server", "not a url"]).is_err());
    }
}
