use super::role::Role;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A web search citation surfaced alongside an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A conversation turn.
///
/// During streaming, `content` is only ever replaced wholesale with the
/// latest accumulated text; there is no partial patching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub created: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<SearchResult>>,
}

impl ChatMessage {
    fn new<S: Into<String>>(role: Role, content: S) -> Self {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            role,
            created: Utc::now().timestamp(),
            content: content.into(),
            reasoning: None,
            search_results: None,
        }
    }

    /// Create a new user message with the current timestamp
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new, empty assistant message ready to receive streamed text
    pub fn assistant() -> Self {
        Self::new(Role::Assistant, "")
    }

    /// Attach reasoning text to the message
    pub fn with_reasoning<S: Into<String>>(mut self, reasoning: S) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Attach search results to the message
    pub fn with_search_results(mut self, results: Vec<SearchResult>) -> Self {
        self.search_results = Some(results);
        self
    }

    /// Replace the content wholesale with the latest accumulated text
    pub fn replace_content<S: Into<String>>(&mut self, content: S) {
        self.content = content.into();
    }
}
