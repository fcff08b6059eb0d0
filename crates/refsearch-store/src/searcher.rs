//! Runs one query against a [`RecordSource`] in the configured mode.
//!
//! | Mode     | Fetch                          | Filtering                                   |
//! |----------|--------------------------------|---------------------------------------------|
//! | `server` | `or=(…)` disjunction           | store-side `ilike`, then [`filter_records`] |
//! | `client` | whole table, unconditionally   | [`filter_records`] locally                  |
//!
//! The store only pre-filters. PostgREST reads `*` in a LIKE pattern as `%`,
//! so its answer can be a superset; [`filter_records`] narrows it to the
//! exact match, which keeps both modes returning the same rows.

use crate::{FilterMode, RecordSource, StoreError};
use refsearch_core::filter::filter_records;
use refsearch_core::predicate::Disjunction;
use refsearch_core::{Record, Terms};

pub struct Searcher<S> {
    source: S,
    mode: FilterMode,
    columns: Vec<String>,
}

impl<S: RecordSource> Searcher<S> {
    pub fn new(source: S, mode: FilterMode, columns: Vec<String>) -> Self {
        Self { source, mode, columns }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows matching any term in any searchable column. No terms, no fetch.
    pub async fn search(&self, terms: &Terms) -> Result<Vec<Record>, StoreError> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        match self.mode {
            FilterMode::Server => {
                let filter = Disjunction::any_term_in_any_column(terms, &self.columns);
                let candidates = self.source.fetch(Some(&filter)).await?;
                Ok(filter_records(candidates, terms, &self.columns))
            }
            FilterMode::Client => {
                let all = self.source.fetch(None).await?;
                Ok(filter_records(all, terms, &self.columns))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
