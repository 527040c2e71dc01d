//! Chat transcript rows from the `memories` table.

use serde::{Deserialize, Serialize};

use super::posting::null_as_empty;

/// Author of a transcript turn.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Assistant,
}

impl Role {
    /// Short label shown above the bubble.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Bot",
        }
    }
}

/// A single chat turn.
///
/// Source: `SELECT * FROM memories`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Message {
    /// Row identifier.
    /// Source: `memories.id`
    pub id: i64,

    /// Numeric reference of the chat user the turn belongs to.
    /// Source: `memories.user_id`
    #[serde(default)]
    pub user_id: i64,

    /// Who wrote the turn.
    /// Source: `memories.role`
    pub role: Role,

    /// Turn text.
    /// Source: `memories.content`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,

    /// Creation timestamp (RFC 3339).
    /// Source: `memories.created_at`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,

    /// Author handle, when the table carries one.
    /// Source: `memories.username`
    #[serde(default)]
    pub username: Option<String>,
}
