//! Offer/request card lists.

use crate::dashboard::DashboardState;
use crate::dashboard::derive::distinct_categories;
use crate::model::{Posting, PostingKind};
use crate::util::{format_date, matches_filter, same_folded};
use crate::view::common::{Align, Card, ListFilter, ListView, Tone};

/// Literal shown when a kind has no postings at all.
pub fn empty_message(kind: PostingKind) -> &'static str {
    match kind {
        PostingKind::Offer => "No offers",
        PostingKind::Request => "No requests",
    }
}

pub fn title(kind: PostingKind) -> &'static str {
    match kind {
        PostingKind::Offer => "Offers",
        PostingKind::Request => "Requests",
    }
}

pub fn tone(kind: PostingKind) -> Tone {
    match kind {
        PostingKind::Offer => Tone::Offer,
        PostingKind::Request => Tone::Request,
    }
}

/// Builds the card for one posting.
pub fn posting_card(posting: &Posting, kind: PostingKind) -> Card {
    Card {
        id: posting.id,
        label: posting.category_label().map(str::to_string),
        date: format_date(&posting.created_at),
        body: posting.description.trim().to_string(),
        footer: posting
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| format!("@{}", u.trim_start_matches('@'))),
        tone: tone(kind),
        align: Align::Left,
    }
}

fn keep(posting: &Posting, filter: &ListFilter) -> bool {
    if let Some(category) = &filter.category {
        let matches = posting
            .category_label()
            .is_some_and(|c| same_folded(c, category));
        if !matches {
            return false;
        }
    }
    match filter.text.as_deref() {
        Some(needle) => matches_filter(
            needle,
            [
                posting.description.as_str(),
                posting.category.as_deref().unwrap_or(""),
                posting.username.as_deref().unwrap_or(""),
            ],
        ),
        None => true,
    }
}

/// Builds the card list for one kind, in fetch order.
pub fn posting_list(state: &DashboardState, kind: PostingKind, filter: &ListFilter) -> ListView {
    let parts = state.partition();
    let subset = parts.of(kind);
    let cards: Vec<Card> = subset
        .iter()
        .filter(|p| keep(p, filter))
        .map(|p| posting_card(p, kind))
        .collect();

    let empty_message = if subset.is_empty() || !filter.is_active() {
        empty_message(kind).to_string()
    } else {
        format!("{} match the filter", empty_message(kind))
    };

    ListView {
        title: title(kind).to_string(),
        tone: tone(kind),
        total: subset.len(),
        cards,
        empty_message,
    }
}

/// Distinct category labels of one kind, for the category selector.
pub fn category_choices(state: &DashboardState, kind: PostingKind) -> Vec<String> {
    let parts = state.partition();
    distinct_categories(parts.of(kind))
}
