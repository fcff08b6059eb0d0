//! Search session — the single owned UI state for query text and results.
//!
//! ```text
//!            submit (terms)              complete (latest generation)
//!   Idle ───────────────► Searching ───────────────► Results | Empty | Failed
//!    ▲                        ▲                              │
//!    │ submit (no terms)      └──────── submit (terms) ──────┘
//!    └───────────────────────────────────────────────────────┘
//! ```
//!
//! Every submission with terms bumps the generation. A completion carrying
//! an older generation is dropped, so a slow response to an earlier query
//! can never replace the results of a later one.

use crate::query::Terms;
use crate::types::Record;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing searched yet, or the last submission had no terms.
    #[default]
    Idle,
    /// A request is in flight.
    Searching,
    /// The latest search returned at least one row.
    Results,
    /// The latest search returned no rows.
    Empty,
    /// The latest search failed; the reason is kept for diagnostics.
    Failed { reason: String },
}

/// Work the caller must perform after [`SearchSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub terms: Terms,
}

/// What [`SearchSession::complete`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    query: String,
    terms: Terms,
    results: Vec<Record>,
    phase: SearchPhase,
    generation: u64,
    completed_at: Option<DateTime<Local>>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search for `raw`. Previous rows stay visible until the
    /// response arrives.
    ///
    /// With no usable terms the previous results are cleared, the phase goes
    /// back to `Idle` and `None` is returned: nothing must be fetched.
    pub fn submit(&mut self, raw: &str) -> Option<SearchRequest> {
        self.query = raw.to_string();
        self.terms = Terms::parse(raw);

        if self.terms.is_empty() {
            tracing::debug!(query = raw, "empty query, search skipped");
            self.results.clear();
            self.completed_at = None;
            // Invalidate anything still in flight.
            self.generation += 1;
            self.phase = SearchPhase::Idle;
            return None;
        }

        self.generation += 1;
        self.phase = SearchPhase::Searching;
        tracing::info!(
            generation = self.generation,
            terms = %self.terms,
            "search submitted"
        );
        Some(SearchRequest {
            generation: self.generation,
            terms: self.terms.clone(),
        })
    }

    /// Apply the outcome of the request tagged `generation`.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        generation: u64,
        outcome: Result<Vec<Record>, E>,
    ) -> Completion {
        if generation != self.generation || self.phase != SearchPhase::Searching {
            tracing::debug!(
                generation,
                latest = self.generation,
                "discarding stale search response"
            );
            return Completion::Stale;
        }

        self.completed_at = Some(Local::now());
        match outcome {
            Ok(rows) if rows.is_empty() => {
                tracing::info!(generation, "search returned no rows");
                self.results.clear();
                self.phase = SearchPhase::Empty;
            }
            Ok(rows) => {
                tracing::info!(generation, rows = rows.len(), "search completed");
                self.results = rows;
                self.phase = SearchPhase::Results;
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::error!(generation, error = %reason, "search failed");
                self.results.clear();
                self.phase = SearchPhase::Failed { reason };
            }
        }
        Completion::Applied
    }

    /// Export is only reachable with rows on screen.
    pub fn can_export(&self) -> bool {
        self.phase == SearchPhase::Results && !self.results.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn terms(&self) -> &Terms {
        &self.terms
    }

    pub fn results(&self) -> &[Record] {
        &self.results
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
