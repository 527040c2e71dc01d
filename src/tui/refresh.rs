//! Background refresh worker.
//!
//! Fetches block on the network, so they run on a dedicated thread. Each
//! request is tagged with a sequence number; the outcome travels back to the
//! event loop as [`Event::Fetched`] and the state drops anything older than
//! what it already shows.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::dashboard::Loader;

use super::event::Event;

/// Why a refresh was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Initial,
    Poll,
    Change,
    Manual,
}

/// Handle to the refresh thread.
pub struct RefreshWorker {
    requests: Option<Sender<(u64, Trigger)>>,
    shutdown: Arc<AtomicBool>,
    next_seq: u64,
    in_flight: u64,
    handle: Option<JoinHandle<()>>,
}

impl RefreshWorker {
    /// Spawns the worker. Outcomes are posted to `events`.
    pub fn spawn(loader: Loader, events: Sender<Event>) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<(u64, Trigger)>();
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = shutdown.clone();

        let handle = thread::Builder::new()
            .name("refresh".into())
            .spawn(move || {
                for (seq, trigger) in rx {
                    if stop.load(Ordering::Relaxed) {
                        break;
                    }
                    debug!(seq, ?trigger, "fetching");
                    let outcome = loader.load();
                    if stop.load(Ordering::Relaxed) {
                        break;
                    }
                    if events.send(Event::Fetched(seq, outcome)).is_err() {
                        break;
                    }
                }
                debug!("refresh worker stopped");
            })?;

        Ok(Self {
            requests: Some(tx),
            shutdown,
            next_seq: 0,
            in_flight: 0,
            handle: Some(handle),
        })
    }

    /// Queues one full fetch. Returns its sequence number.
    pub fn request(&mut self, trigger: Trigger) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        if let Some(tx) = &self.requests
            && tx.send((seq, trigger)).is_ok()
        {
            self.in_flight += 1;
        }
        seq
    }

    /// Marks one outcome as received.
    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Whether a fetch is queued or running.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Stops the worker. Late outcomes are discarded.
    ///
    /// Does not wait for an in-flight request; the thread exits as soon as
    /// it finishes.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.requests = None;
        if let Some(handle) = self.handle.take()
            && handle.is_finished()
        {
            let _ = handle.join();
        }
        info!("refresh worker shut down");
    }
}

impl Drop for RefreshWorker {
    fn drop(&mut self) {
        if self.requests.is_some() {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::FetchPlan;
    use crate::store::RecordStore;
    use crate::store::mock::MockStore;
    use std::time::Duration;

    #[test]
    fn outcomes_carry_request_sequence() {
        let store = Arc::new(MockStore::sample());
        let loader = Loader::new(Ok(store as Arc<dyn RecordStore>), FetchPlan::default());
        let (tx, rx) = mpsc::channel();
        let mut worker = RefreshWorker::spawn(loader, tx).unwrap();

        let first = worker.request(Trigger::Initial);
        let second = worker.request(Trigger::Change);
        assert!(second > first);
        assert!(worker.is_busy());

        let mut seen = Vec::new();
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Event::Fetched(seq, outcome) => {
                    assert!(outcome.error.is_none());
                    seen.push(seq);
                    worker.complete();
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(seen, vec![first, second]);
        assert!(!worker.is_busy());
        worker.shutdown();
    }

    #[test]
    fn no_requests_after_shutdown() {
        let store = Arc::new(MockStore::new());
        let loader = Loader::new(
            Ok(store.clone() as Arc<dyn RecordStore>),
            FetchPlan::default(),
        );
        let (tx, _rx) = mpsc::channel();
        let mut worker = RefreshWorker::spawn(loader, tx).unwrap();
        worker.shutdown();
        worker.request(Trigger::Manual);
        assert!(!worker.is_busy());
        thread::sleep(Duration::from_millis(50));
        assert_eq!(store.call_count("fluxos"), 0);
    }
}
