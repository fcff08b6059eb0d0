//! In-memory [`RecordSource`] for harnesses that do not need HTTP.
//!
//! Serves a fixed table. When given a server-side filter it evaluates it
//! with the same matching rule the store would, so it can stand in for
//! either filter mode. Every call is counted and a delay can be set per
//! call to provoke out-of-order completions.

use refsearch_core::predicate::{Disjunction, Predicate};
use refsearch_core::Record;
use refsearch_store::{RecordSource, StoreError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct MemorySource {
    rows: Vec<Record>,
    calls: AtomicUsize,
    delays: Mutex<VecDeque<Duration>>,
    fail_status: Option<u16>,
}

impl MemorySource {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows, ..Self::default() }
    }

    /// Every fetch fails with this HTTP status.
    pub fn failing(status: u16) -> Self {
        Self { fail_status: Some(status), ..Self::default() }
    }

    /// Delay the next fetches by these durations, one per call, in order.
    pub fn with_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        *self.delays.lock().unwrap() = delays.into_iter().collect();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecordSource for MemorySource {
    async fn fetch(&self, filter: Option<&Disjunction>) -> Result<Vec<Record>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = self.fail_status {
            return Err(StoreError::Status { status, body: "unavailable".into() });
        }
        Ok(match filter {
            None => self.rows.clone(),
            Some(filter) => self
                .rows
                .iter()
                .filter(|row| filter.predicates().iter().any(|p| holds(p, row)))
                .cloned()
                .collect(),
        })
    }
}

fn holds(predicate: &Predicate, row: &Record) -> bool {
    match predicate {
        Predicate::ILike { column, term } => row
            .value_text(column)
            .is_some_and(|v| v.to_lowercase().contains(&term.to_lowercase())),
    }
}
