//! In-memory store doubles.
//!
//! [`MockStore`] answers queries from canned per-table results and records
//! every query it receives. [`MockFeed`] lets a test fire change notifications
//! by hand. [`MockStore::sample`] backs the `--demo` mode of the binary.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Value, json};

use super::{ChangeCallback, ChangeFeed, Query, RecordStore, StoreError, Subscription};

/// Canned record store.
#[derive(Default)]
pub struct MockStore {
    tables: Mutex<HashMap<String, Result<Vec<Value>, StoreError>>>,
    calls: Mutex<Vec<Query>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MockStore::set_rows`].
    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.set_rows(table, rows);
        self
    }

    /// Builder form of [`MockStore::set_error`].
    pub fn with_error(self, table: &str, error: StoreError) -> Self {
        self.set_error(table, error);
        self
    }

    /// Replaces the rows returned for `table`.
    pub fn set_rows(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table.to_string(), Ok(rows));
    }

    /// Makes every query on `table` fail with `error`.
    pub fn set_error(&self, table: &str, error: StoreError) {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table.to_string(), Err(error));
    }

    /// All queries received so far, oldest first.
    pub fn calls(&self) -> Vec<Query> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of queries received for `table`.
    pub fn call_count(&self, table: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|q| q.table_name() == table)
            .count()
    }

    /// A small, realistic data set covering both kinds, an unclassified row
    /// and a short conversation.
    pub fn sample() -> Self {
        Self::new()
            .with_rows(
                crate::model::POSTINGS_TABLE,
                vec![
                    json!({"id": 6, "tipus": "OFERTA", "descripcio": "Ofereixo sessions de reiki a Barcelona", "categoria": "reiki", "username": "lluna", "created_at": "2026-01-12T18:30:00+00:00"}),
                    json!({"id": 5, "tipus": "DEMANDA", "descripcio": "Busco transport a Girona dissabte", "categoria": "transport", "username": "pau", "created_at": "2026-01-12T09:15:00+00:00"}),
                    json!({"id": 4, "tipus": " oferta ", "descripcio": "Regalo classes de cuina vegetal", "categoria": "cuina", "created_at": "2026-01-11T20:00:00+00:00"}),
                    json!({"id": 3, "tipus": "Demanda", "descripcio": "Necessito allotjament per una setmana", "categoria": "allotjament", "username": "marta", "created_at": "2026-01-10T12:00:00+00:00"}),
                    json!({"id": 2, "tipus": "OFERTA", "descripcio": "Massatge terapèutic a canvi de fruita", "categoria": "massatge", "username": "jordi", "created_at": "2026-01-09T08:45:00+00:00"}),
                    json!({"id": 1, "tipus": "INTERCANVI", "descripcio": "Fila sense tipus reconegut", "created_at": "2026-01-08T08:00:00+00:00"}),
                ],
            )
            .with_rows(
                crate::model::MESSAGES_TABLE,
                vec![
                    json!({"id": 4, "user_id": 11, "role": "assistant", "content": "He registrat la teva oferta al Gresol.", "created_at": "2026-01-12T18:30:05+00:00"}),
                    json!({"id": 3, "user_id": 11, "role": "user", "content": "Ofereixo sessions de reiki a Barcelona", "created_at": "2026-01-12T18:30:00+00:00", "username": "lluna"}),
                    json!({"id": 2, "user_id": 22, "role": "assistant", "content": "Benvingut. Què necessites?", "created_at": "2026-01-12T09:10:02+00:00"}),
                    json!({"id": 1, "user_id": 22, "role": "user", "content": "Hola!", "created_at": "2026-01-12T09:10:00+00:00", "username": "pau"}),
                ],
            )
    }
}

impl RecordStore for MockStore {
    fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        match tables.get(query.table_name()) {
            Some(Ok(rows)) => {
                let mut rows = rows.clone();
                if let Some(limit) = query.row_limit() {
                    rows.truncate(limit);
                }
                Ok(rows)
            }
            Some(Err(e)) => Err(e.clone()),
            None => Ok(Vec::new()),
        }
    }
}

/// Change feed whose notifications are fired manually.
#[derive(Default, Clone)]
pub struct MockFeed {
    callbacks: Arc<Mutex<Vec<(String, ChangeCallback)>>>,
}

impl MockFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires every callback registered for `table`. Returns how many fired.
    pub fn notify(&self, table: &str) -> usize {
        let callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        let mut fired = 0;
        for (t, cb) in callbacks.iter() {
            if t == table {
                cb();
                fired += 1;
            }
        }
        fired
    }
}

impl ChangeFeed for MockFeed {
    fn subscribe(
        &self,
        table: &str,
        on_change: ChangeCallback,
    ) -> Result<Subscription, StoreError> {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((table.to_string(), on_change));
        Ok(Subscription::new(table, Arc::new(AtomicBool::new(false)), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn records_calls_and_applies_limit() {
        let store = MockStore::sample();
        let rows = store
            .select(&Query::table("memories").order_desc("created_at").limit(2))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(store.call_count("memories"), 1);
        assert_eq!(store.call_count("fluxos"), 0);
    }

    #[test]
    fn unknown_table_is_empty() {
        let store = MockStore::new();
        assert!(store.select(&Query::table("nothing")).unwrap().is_empty());
    }

    #[test]
    fn feed_fires_only_matching_table() {
        let feed = MockFeed::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let _sub = feed
            .subscribe(
                "fluxos",
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        assert_eq!(feed.notify("memories"), 0);
        assert_eq!(feed.notify("fluxos"), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
