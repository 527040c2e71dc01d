//! Records read from the external store.
//!
//! Both tables are owned by the store; the dashboard only deserializes rows
//! and never writes them back.

mod message;
mod posting;

pub use message::{Message, Role};
pub use posting::{Posting, PostingKind};

/// Table holding offer/request postings.
pub const POSTINGS_TABLE: &str = "fluxos";

/// Table holding the chat transcript.
pub const MESSAGES_TABLE: &str = "memories";
