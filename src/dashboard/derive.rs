//! Pure reductions over fetched postings and messages.

use std::collections::HashMap;

use crate::model::{Message, Posting, PostingKind, Role};
use crate::util::same_folded;

/// Number of recent category labels kept per kind.
pub const DEFAULT_RECENT_CATEGORIES: usize = 5;

/// Postings split by normalized kind.
///
/// `offers` and `requests` are disjoint and keep fetch order. Rows whose kind
/// is unrecognized appear in neither and are only counted.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub offers: Vec<&'a Posting>,
    pub requests: Vec<&'a Posting>,
    pub unclassified: usize,
}

impl<'a> Partition<'a> {
    /// Subset for one kind.
    pub fn of(&self, kind: PostingKind) -> &[&'a Posting] {
        match kind {
            PostingKind::Offer => &self.offers,
            PostingKind::Request => &self.requests,
        }
    }
}

/// Partitions postings into offers and requests.
pub fn partition(postings: &[Posting]) -> Partition<'_> {
    let mut out = Partition::default();
    for posting in postings {
        match posting.classify() {
            Some(PostingKind::Offer) => out.offers.push(posting),
            Some(PostingKind::Request) => out.requests.push(posting),
            None => out.unclassified += 1,
        }
    }
    out
}

/// Aggregated counters shown on the stats view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub offers: usize,
    pub requests: usize,
    pub unclassified: usize,
    pub messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    /// Distinct chat users referenced by the transcript.
    pub chat_users: usize,
    /// Most recent distinct category labels among offers, newest first.
    pub recent_offer_categories: Vec<String>,
    /// Most recent distinct category labels among requests, newest first.
    pub recent_request_categories: Vec<String>,
    /// Postings per category label across both kinds, busiest first.
    pub by_category: Vec<(String, usize)>,
}

impl Stats {
    /// Computes statistics from freshly fetched rows.
    ///
    /// Postings are expected newest first (the fetch order), so the first
    /// labels encountered are the most recent ones.
    pub fn compute(postings: &[Posting], messages: &[Message], recent: usize) -> Self {
        let parts = partition(postings);

        let mut by_category: HashMap<String, usize> = HashMap::new();
        for posting in parts.offers.iter().chain(parts.requests.iter()) {
            if let Some(label) = posting.category_label() {
                *by_category.entry(label.to_lowercase()).or_default() += 1;
            }
        }
        let mut by_category: Vec<(String, usize)> = by_category.into_iter().collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let user_messages = messages.iter().filter(|m| m.role == Role::User).count();
        let mut users: Vec<i64> = messages.iter().map(|m| m.user_id).collect();
        users.sort_unstable();
        users.dedup();

        Self {
            offers: parts.offers.len(),
            requests: parts.requests.len(),
            unclassified: parts.unclassified,
            messages: messages.len(),
            user_messages,
            assistant_messages: messages.len() - user_messages,
            chat_users: users.len(),
            recent_offer_categories: recent_categories(&parts.offers, recent),
            recent_request_categories: recent_categories(&parts.requests, recent),
            by_category,
        }
    }
}

fn recent_categories(postings: &[&Posting], limit: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for posting in postings {
        if out.len() >= limit {
            break;
        }
        if let Some(label) = posting.category_label()
            && !out.iter().any(|seen| same_folded(seen, label))
        {
            out.push(label.to_string());
        }
    }
    out
}

/// Distinct category labels of the given postings, in first-seen order.
pub fn distinct_categories(postings: &[&Posting]) -> Vec<String> {
    recent_categories(postings, usize::MAX)
}
