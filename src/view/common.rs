//! UI-agnostic view model types.
//!
//! These types carry presentation data without depending on a rendering
//! framework. The TUI maps [`Tone`] to ratatui styles.

/// Colour family of a card or list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Normal,
    /// Offers (TUI: gold).
    Offer,
    /// Requests (TUI: silver).
    Request,
    /// User turns (TUI: green).
    User,
    /// Assistant turns (TUI: indigo).
    Assistant,
    /// Secondary text (TUI: dark gray).
    Dimmed,
}

/// Horizontal placement of a card inside its list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// A single card (posting) or bubble (message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: i64,
    /// Short label on the first line (category, role).
    pub label: Option<String>,
    /// Formatted date; empty if unknown.
    pub date: String,
    /// Main text.
    pub body: String,
    /// Author line, e.g. `@anna`.
    pub footer: Option<String>,
    pub tone: Tone,
    pub align: Align,
}

/// Filter applied to a list before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring over body, label and author.
    pub text: Option<String>,
    /// Exact (case-insensitive) category label. Postings only.
    pub category: Option<String>,
}

impl ListFilter {
    pub fn is_active(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty()) || self.category.is_some()
    }
}

/// A titled list ready to be rendered by any frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub title: String,
    pub tone: Tone,
    /// Rows before filtering.
    pub total: usize,
    pub cards: Vec<Card>,
    /// Shown instead of cards when the list is empty.
    pub empty_message: String,
}

impl ListView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Header counter: `3` or `2/3` when a filter hides rows.
    pub fn counter(&self) -> String {
        if self.cards.len() == self.total {
            self.total.to_string()
        } else {
            format!("{}/{}", self.cards.len(), self.total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_activity() {
        assert!(!ListFilter::default().is_active());
        assert!(
            !ListFilter {
                text: Some("  ".into()),
                category: None
            }
            .is_active()
        );
        assert!(
            ListFilter {
                text: None,
                category: Some("reiki".into())
            }
            .is_active()
        );
    }

    #[test]
    fn counter_shows_filtered_ratio() {
        let mut list = ListView {
            title: "Offers".into(),
            tone: Tone::Offer,
            total: 3,
            cards: Vec::new(),
            empty_message: "No offers".into(),
        };
        assert_eq!(list.counter(), "0/3");
        list.total = 0;
        assert_eq!(list.counter(), "0");
    }
}
