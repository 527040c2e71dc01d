//! Local view state owned by the controller.

use chrono::{DateTime, Local};

use super::derive::{DEFAULT_RECENT_CATEGORIES, Partition, Stats, partition};
use super::fetch::FetchOutcome;
use crate::model::{Message, Posting};

/// Everything the views render from.
///
/// Created empty with `loading = true`, then replaced piecewise by every
/// applied [`FetchOutcome`]. There is no write path back to the store.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// `true` until the first fetch attempt has finished.
    pub loading: bool,
    /// Banner text; empty means no error.
    pub error: String,
    /// Postings in fetch order (newest first).
    pub postings: Vec<Posting>,
    /// Transcript in fetch order (newest first).
    pub messages: Vec<Message>,
    /// Recomputed on every applied fetch.
    pub stats: Stats,
    /// When the last fetch attempt was applied.
    pub last_refresh: Option<DateTime<Local>>,
    /// Number of fetch attempts applied so far.
    pub refresh_count: u64,
    recent_categories: usize,
    applied_seq: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CATEGORIES)
    }
}

impl DashboardState {
    pub fn new(recent_categories: usize) -> Self {
        Self {
            loading: true,
            error: String::new(),
            postings: Vec::new(),
            messages: Vec::new(),
            stats: Stats::default(),
            last_refresh: None,
            refresh_count: 0,
            recent_categories,
            applied_seq: 0,
        }
    }

    /// Applies a fetch result.
    ///
    /// Lists present in the outcome replace the current ones; absent lists
    /// (failed queries) are kept. The error banner is replaced by the
    /// outcome's, so a successful refetch clears a previous error. The load
    /// flag is cleared whatever happened.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        if let Some(postings) = outcome.postings {
            self.postings = postings;
        }
        if let Some(messages) = outcome.messages {
            self.messages = messages;
        }
        self.error = outcome.error.unwrap_or_default();
        self.stats = Stats::compute(&self.postings, &self.messages, self.recent_categories);
        self.loading = false;
        self.last_refresh = Some(Local::now());
        self.refresh_count += 1;
    }

    /// Applies an outcome tagged with the sequence number of the request
    /// that produced it. Outcomes older than the last applied one are
    /// dropped. Returns `true` if the outcome was applied.
    pub fn apply_sequenced(&mut self, seq: u64, outcome: FetchOutcome) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        self.apply(outcome);
        true
    }

    /// Postings split into offers and requests.
    pub fn partition(&self) -> Partition<'_> {
        partition(&self.postings)
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostingKind;

    fn outcome_with(postings: Vec<Posting>) -> FetchOutcome {
        FetchOutcome {
            postings: Some(postings),
            messages: Some(Vec::new()),
            error: None,
        }
    }

    #[test]
    fn starts_loading_and_empty() {
        let state = DashboardState::default();
        assert!(state.loading);
        assert!(!state.has_error());
        assert!(state.postings.is_empty());
    }

    #[test]
    fn failed_fetch_still_clears_loading() {
        let mut state = DashboardState::default();
        state.apply(FetchOutcome {
            error: Some("boom".to_string()),
            ..FetchOutcome::default()
        });
        assert!(!state.loading);
        assert_eq!(state.error, "boom");
    }

    #[test]
    fn failed_list_keeps_previous_rows() {
        let mut state = DashboardState::default();
        state.apply(outcome_with(vec![Posting {
            id: 1,
            kind: "OFERTA".into(),
            ..Posting::default()
        }]));
        state.apply(FetchOutcome {
            postings: None,
            messages: Some(Vec::new()),
            error: Some("Postings query failed: timeout".into()),
        });
        assert_eq!(state.postings.len(), 1);
        assert!(state.has_error());

        state.apply(outcome_with(Vec::new()));
        assert!(state.postings.is_empty());
        assert!(!state.has_error());
    }

    #[test]
    fn stale_outcomes_are_dropped() {
        let mut state = DashboardState::default();
        let newer = outcome_with(vec![Posting {
            id: 2,
            kind: "DEMANDA".into(),
            ..Posting::default()
        }]);
        let older = outcome_with(vec![Posting {
            id: 1,
            kind: "OFERTA".into(),
            ..Posting::default()
        }]);
        assert!(state.apply_sequenced(2, newer));
        assert!(!state.apply_sequenced(1, older));
        assert_eq!(state.partition().of(PostingKind::Request).len(), 1);
        assert_eq!(state.refresh_count, 1);
    }

    #[test]
    fn stats_follow_applied_rows() {
        let mut state = DashboardState::default();
        state.apply(outcome_with(vec![
            Posting {
                id: 1,
                kind: "OFERTA".into(),
                ..Posting::default()
            },
            Posting {
                id: 2,
                kind: "DEMANDA".into(),
                ..Posting::default()
            },
        ]));
        assert_eq!(state.stats.offers, 1);
        assert_eq!(state.stats.requests, 1);
    }
}
