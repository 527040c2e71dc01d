//! UI-agnostic view models.
//!
//! Each sub-module builds a view model from [`DashboardState`] and the
//! current list filter. The TUI maps view models to ratatui widgets; the
//! `--once` mode prints them as plain text. Building a view model never
//! fails: missing data becomes an empty-state message.
//!
//! [`DashboardState`]: crate::dashboard::DashboardState

pub mod common;
pub mod messages;
pub mod plain;
pub mod postings;
pub mod stats;

pub use common::{Align, Card, ListFilter, ListView, Tone};

use crate::dashboard::DashboardState;

/// Text shown while the first fetch is in flight.
pub const LOADING_MESSAGE: &str = "Loading...";

/// Static messaging-bot link used in calls to action.
pub const DEFAULT_BOT_URL: &str = "https://t.me/CodexSupremBot";

/// Banner text, if the state carries an error.
pub fn banner(state: &DashboardState) -> Option<&str> {
    if state.error.is_empty() {
        None
    } else {
        Some(state.error.as_str())
    }
}

/// One-line call to action pointing at the bot.
pub fn call_to_action(bot_url: &str) -> String {
    format!(
        "Publish an offer or request by talking to the bot: {}",
        bot_url
    )
}
