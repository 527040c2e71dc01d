//! View-state controller.
//!
//! Owns the fetch/derive cycle of the dashboard:
//! - [`Loader`] runs one fetch against the store and never fails
//! - [`DashboardState`] holds the latest rows, the load flag and the banner
//! - [`derive`] partitions postings by kind and computes [`Stats`]
//! - [`Controller`] ties them together for synchronous callers and wires
//!   change notifications to refetches
//!
//! The TUI drives the same pieces from a background worker instead (see
//! `tui::refresh`).

pub mod derive;
mod fetch;
mod state;

pub use derive::{Partition, Stats, partition};
pub use fetch::{
    DEFAULT_MESSAGE_LIMIT, FetchOutcome, FetchPlan, Loader, PostingOrder, postings_error_text,
};
pub use state::DashboardState;

use std::sync::mpsc::{self, Receiver};

use tracing::info;

use crate::model::POSTINGS_TABLE;
use crate::store::{ChangeFeed, StoreError, Subscription};

/// Synchronous controller: fetch, apply, and optionally refetch on change.
pub struct Controller {
    loader: Loader,
    state: DashboardState,
    subscription: Option<Subscription>,
    changes: Option<Receiver<()>>,
}

impl Controller {
    pub fn new(loader: Loader, state: DashboardState) -> Self {
        Self {
            loader,
            state,
            subscription: None,
            changes: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Runs one full fetch and applies it.
    pub fn refresh(&mut self) -> &DashboardState {
        let outcome = self.loader.load();
        self.state.apply(outcome);
        &self.state
    }

    /// Subscribes to changes on the postings table.
    ///
    /// Notifications are queued; [`Controller::process_changes`] turns each
    /// one into a full refetch. No-op without a configured store.
    pub fn watch(&mut self, feed: &dyn ChangeFeed) -> Result<(), StoreError> {
        if self.loader.config_error().is_some() {
            return Ok(());
        }
        let (tx, rx) = mpsc::channel();
        let sub = feed.subscribe(
            POSTINGS_TABLE,
            Box::new(move || {
                let _ = tx.send(());
            }),
        )?;
        info!(table = sub.table(), "watching for changes");
        self.subscription = Some(sub);
        self.changes = Some(rx);
        Ok(())
    }

    /// Refetches once per queued change notification. Returns how many
    /// refetches ran.
    pub fn process_changes(&mut self) -> usize {
        let pending = match &self.changes {
            Some(rx) => rx.try_iter().count(),
            None => 0,
        };
        for _ in 0..pending {
            self.refresh();
        }
        pending
    }

    pub fn is_watching(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// Tears the subscription down. Also happens on drop.
    pub fn unwatch(&mut self) {
        self.changes = None;
        if let Some(sub) = self.subscription.take() {
            sub.unsubscribe();
        }
    }
}
