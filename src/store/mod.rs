//! Access to the external record store.
//!
//! This module defines the two seams the dashboard talks through:
//! - [`RecordStore`]: table-scoped read queries with order/limit/filter modifiers
//! - [`ChangeFeed`]: change notifications keyed by table name
//!
//! Implementations:
//! - [`RestStore`]: PostgREST-style HTTP endpoint (Supabase `/rest/v1`)
//! - [`RealtimeFeed`]: Supabase Realtime websocket channel
//! - [`mock::MockStore`] / [`mock::MockFeed`]: in-memory doubles for tests and demo mode

pub mod mock;
mod query;
mod realtime;
mod rest;

pub use query::Query;
pub use realtime::{RealtimeFeed, realtime_url};
pub use rest::{DEFAULT_TIMEOUT, RestStore};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store was reached but rejected the query.
    #[error("{message}")]
    Query {
        message: String,
        code: Option<String>,
        details: Option<String>,
        hint: Option<String>,
    },
    /// The store could not be reached at all.
    #[error("connection failed: {0}")]
    Transport(String),
    /// The response could not be decoded.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Shorthand for a query rejection carrying only a message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    /// Returns `true` if the store could not be reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Read access to store tables.
///
/// The trait is object-safe and used as `Arc<dyn RecordStore>` so the refresh
/// worker can share it with the UI thread.
pub trait RecordStore: Send + Sync {
    /// Runs a read query and returns the raw rows.
    fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError>;
}

/// Runs `query` and decodes every row into `T`.
///
/// Rows that fail to decode are skipped with a warning instead of failing the
/// whole query; a malformed record is a data bug, not a reason to blank the view.
pub fn select_as<T: DeserializeOwned>(
    store: &dyn RecordStore,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    let rows = store.select(query)?;
    let total = rows.len();
    let mut out = Vec::with_capacity(total);
    for row in rows {
        match serde_json::from_value::<T>(row) {
            Ok(item) => out.push(item),
            Err(e) => warn!(table = query.table_name(), error = %e, "skipping malformed row"),
        }
    }
    if out.len() < total {
        warn!(
            table = query.table_name(),
            skipped = total - out.len(),
            total,
            "some rows could not be decoded"
        );
    }
    Ok(out)
}

/// Callback fired on every change notification. Carries no payload: the
/// receiver is expected to refetch.
pub type ChangeCallback = Box<dyn Fn() + Send + 'static>;

/// Change-notification primitive keyed by table name.
pub trait ChangeFeed {
    /// Subscribes to inserts, updates and deletes on `table`.
    ///
    /// The returned handle tears the subscription down when dropped.
    fn subscribe(&self, table: &str, on_change: ChangeCallback)
    -> Result<Subscription, StoreError>;
}

/// Handle for an open change subscription.
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) stops the
/// background reader and waits for it to exit.
pub struct Subscription {
    table: String,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wraps a background worker that polls `stop` to know when to exit.
    pub fn new(table: &str, stop: Arc<AtomicBool>, worker: Option<JoinHandle<()>>) -> Self {
        Self {
            table: table.to_string(),
            stop,
            worker,
        }
    }

    /// Table this subscription watches.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns `true` until the subscription has been torn down.
    pub fn is_active(&self) -> bool {
        !self.stop.load(Ordering::Relaxed)
    }

    /// Tears the subscription down explicitly.
    pub fn unsubscribe(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!(table = %self.table, "change feed worker panicked");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockStore;
    use super::*;
    use crate::model::{Message, Role};
    use serde_json::json;

    #[test]
    fn select_as_skips_malformed_rows() {
        let store = MockStore::new().with_rows(
            "memories",
            vec![
                json!({"id": 1, "user_id": 1, "role": "user", "content": "a"}),
                json!({"id": 2, "user_id": 1, "role": "narrator", "content": "b"}),
                json!({"id": 3, "user_id": 1, "role": "assistant", "content": "c"}),
            ],
        );
        let messages: Vec<Message> = select_as(&store, &Query::table("memories")).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::Assistant);
    }

    #[test]
    fn query_error_displays_store_message() {
        let err = StoreError::query("relation does not exist");
        assert_eq!(err.to_string(), "relation does not exist");
        assert!(!err.is_transport());
        assert!(StoreError::Transport("refused".into()).is_transport());
    }

    #[test]
    fn dropping_subscription_sets_stop_flag() {
        let stop = Arc::new(AtomicBool::new(false));
        let sub = Subscription::new("fluxos", stop.clone(), None);
        assert!(sub.is_active());
        assert_eq!(sub.table(), "fluxos");
        drop(sub);
        assert!(stop.load(Ordering::Relaxed));
    }
}
