//! Chat transcript views.

use crate::dashboard::DashboardState;
use crate::model::{Message, Role};
use crate::util::{format_date, matches_filter, parse_timestamp};
use crate::view::common::{Align, Card, ListFilter, ListView, Tone};

pub const EMPTY_MESSAGE: &str = "No messages";
pub const TITLE: &str = "Living Memory";

/// Display order of the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOrder {
    /// Most recent first, as fetched. Used by the overview column.
    NewestFirst,
    /// Oldest first, like a chat window. Used by the messages view.
    OldestFirst,
}

pub fn bubble(message: &Message) -> Card {
    let (tone, align) = match message.role {
        Role::User => (Tone::User, Align::Right),
        Role::Assistant => (Tone::Assistant, Align::Left),
    };
    Card {
        id: message.id,
        label: Some(message.role.label().to_string()),
        date: format_date(&message.created_at),
        body: message.content.trim().to_string(),
        footer: message
            .username
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(|u| format!("@{}", u.trim())),
        tone,
        align,
    }
}

/// Sorts messages oldest first by timestamp, then id. Rows with an
/// unparsable timestamp sort before everything else.
pub fn sort_oldest_first(messages: &mut [&Message]) {
    messages.sort_by(|a, b| {
        parse_timestamp(&a.created_at)
            .cmp(&parse_timestamp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}

/// Builds the transcript list.
///
/// The store returns the newest turns first. [`ChatOrder::OldestFirst`]
/// re-sorts explicitly instead of trusting the fetch order.
pub fn message_list(state: &DashboardState, order: ChatOrder, filter: &ListFilter) -> ListView {
    let mut rows: Vec<&Message> = state
        .messages
        .iter()
        .filter(|m| match filter.text.as_deref() {
            Some(needle) => matches_filter(
                needle,
                [m.content.as_str(), m.username.as_deref().unwrap_or("")],
            ),
            None => true,
        })
        .collect();

    match order {
        ChatOrder::NewestFirst => {
            sort_oldest_first(&mut rows);
            rows.reverse();
        }
        ChatOrder::OldestFirst => sort_oldest_first(&mut rows),
    }

    let empty_message = if state.messages.is_empty() || !filter.is_active() {
        EMPTY_MESSAGE.to_string()
    } else {
        format!("{} match the filter", EMPTY_MESSAGE)
    };

    ListView {
        title: TITLE.to_string(),
        tone: Tone::Assistant,
        total: state.messages.len(),
        cards: rows.into_iter().map(bubble).collect(),
        empty_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::FetchOutcome;

    fn message(id: i64, role: Role, created_at: &str) -> Message {
        Message {
            id,
            user_id: 7,
            role,
            content: format!("turn {}", id),
            created_at: created_at.to_string(),
            username: None,
        }
    }

    fn state_with(messages: Vec<Message>) -> DashboardState {
        let mut state = DashboardState::default();
        state.apply(FetchOutcome {
            postings: Some(Vec::new()),
            messages: Some(messages),
            error: None,
        });
        state
    }

    #[test]
    fn chat_view_is_oldest_first() {
        let state = state_with(vec![
            message(3, Role::Assistant, "2026-01-12T10:02:00Z"),
            message(2, Role::User, "2026-01-12T10:01:00Z"),
            message(1, Role::User, "2026-01-12T10:00:00Z"),
        ]);
        let chat = message_list(&state, ChatOrder::OldestFirst, &ListFilter::default());
        let ids: Vec<i64> = chat.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let column = message_list(&state, ChatOrder::NewestFirst, &ListFilter::default());
        let ids: Vec<i64> = column.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn role_sets_alignment_and_tone() {
        let user = bubble(&message(1, Role::User, ""));
        let bot = bubble(&message(2, Role::Assistant, ""));
        assert_eq!(user.align, Align::Right);
        assert_eq!(user.tone, Tone::User);
        assert_eq!(user.label.as_deref(), Some("User"));
        assert_eq!(bot.align, Align::Left);
        assert_eq!(bot.tone, Tone::Assistant);
        assert_eq!(bot.label.as_deref(), Some("Bot"));
    }

    #[test]
    fn empty_transcript_has_empty_state() {
        let state = state_with(Vec::new());
        let list = message_list(&state, ChatOrder::OldestFirst, &ListFilter::default());
        assert!(list.is_empty());
        assert_eq!(list.empty_message, EMPTY_MESSAGE);
    }

    #[test]
    fn text_filter_applies_to_content() {
        let state = state_with(vec![
            message(2, Role::Assistant, "2026-01-12T10:01:00Z"),
            message(1, Role::User, "2026-01-12T10:00:00Z"),
        ]);
        let list = message_list(
            &state,
            ChatOrder::OldestFirst,
            &ListFilter {
                text: Some("turn 2".into()),
                category: None,
            },
        );
        assert_eq!(list.cards.len(), 1);
        assert_eq!(list.counter(), "1/2");
    }
}
