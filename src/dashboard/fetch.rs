//! One fetch attempt against the record store.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ConfigError;
use crate::model::{MESSAGES_TABLE, Message, POSTINGS_TABLE, Posting};
use crate::store::{Query, RecordStore, StoreError, select_as};

/// Default number of transcript rows fetched.
pub const DEFAULT_MESSAGE_LIMIT: usize = 100;

/// Column postings are sorted by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostingOrder {
    #[default]
    CreatedAt,
    Id,
}

impl PostingOrder {
    pub fn column(&self) -> &'static str {
        match self {
            PostingOrder::CreatedAt => "created_at",
            PostingOrder::Id => "id",
        }
    }
}

/// Which queries a fetch issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub posting_order: PostingOrder,
    /// `None` fetches the whole transcript.
    pub message_limit: Option<usize>,
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self {
            posting_order: PostingOrder::default(),
            message_limit: Some(DEFAULT_MESSAGE_LIMIT),
        }
    }
}

impl FetchPlan {
    pub fn postings_query(&self) -> Query {
        Query::table(POSTINGS_TABLE).order_desc(self.posting_order.column())
    }

    pub fn messages_query(&self) -> Query {
        let q = Query::table(MESSAGES_TABLE).order_desc("created_at");
        match self.message_limit {
            Some(limit) => q.limit(limit),
            None => q,
        }
    }
}

/// Result of one fetch attempt.
///
/// A `None` list means that query failed and the list it would have replaced
/// should be left as it was.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchOutcome {
    pub postings: Option<Vec<Posting>>,
    pub messages: Option<Vec<Message>>,
    /// Banner text, if this attempt produced one.
    pub error: Option<String>,
}

impl FetchOutcome {
    /// Outcome of an attempt that never reached the store.
    pub fn config_failure(err: &ConfigError) -> Self {
        Self {
            postings: None,
            messages: None,
            error: Some(format!("Configuration error: {}", err)),
        }
    }
}

/// Formats a postings-path failure for the banner.
pub fn postings_error_text(err: &StoreError) -> String {
    match err {
        StoreError::Transport(detail) => {
            format!("Connection error: could not reach the record store ({})", detail)
        }
        other => format!("Postings query failed: {}", other),
    }
}

/// Everything a fetch needs: either a store or the reason there is none.
///
/// Cheap to clone and `Send`, so the refresh worker can own a copy.
#[derive(Clone)]
pub struct Loader {
    source: Result<Arc<dyn RecordStore>, ConfigError>,
    plan: FetchPlan,
}

impl Loader {
    pub fn new(source: Result<Arc<dyn RecordStore>, ConfigError>, plan: FetchPlan) -> Self {
        Self { source, plan }
    }

    pub fn plan(&self) -> &FetchPlan {
        &self.plan
    }

    /// Returns the configuration problem, if the loader has no store.
    pub fn config_error(&self) -> Option<&ConfigError> {
        self.source.as_ref().err()
    }

    /// Runs one full fetch.
    ///
    /// Never fails: every error is turned into banner text. Postings are the
    /// primary content, so only their failure produces a banner. A failing
    /// transcript query is logged and empties the transcript.
    pub fn load(&self) -> FetchOutcome {
        let store = match &self.source {
            Ok(store) => store.as_ref(),
            Err(e) => {
                warn!(error = %e, "store not configured, skipping fetch");
                return FetchOutcome::config_failure(e);
            }
        };

        let mut outcome = FetchOutcome::default();

        match select_as::<Posting>(store, &self.plan.postings_query()) {
            Ok(rows) => {
                debug!(rows = rows.len(), "postings loaded");
                outcome.postings = Some(rows);
            }
            Err(e) => {
                warn!(error = %e, "postings query failed");
                let unreachable = e.is_transport();
                outcome.error = Some(postings_error_text(&e));
                if unreachable {
                    // Same endpoint; the transcript query would fail the same way.
                    return outcome;
                }
            }
        }

        match select_as::<Message>(store, &self.plan.messages_query()) {
            Ok(rows) => {
                debug!(rows = rows.len(), "messages loaded");
                outcome.messages = Some(rows);
            }
            Err(e) => {
                warn!(error = %e, "messages query failed, showing none");
                outcome.messages = Some(Vec::new());
            }
        }

        outcome
    }
}
