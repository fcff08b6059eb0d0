//! refsearch-store — record sources for refsearch.
//!
//! A [`RecordSource`] reads rows of the reference table, optionally narrowed
//! by a server-side [`Disjunction`]. [`Searcher`] sits on top and decides,
//! per [`FilterMode`], whether the store or the client does the filtering.

pub mod postgrest;
pub mod searcher;

use refsearch_core::predicate::Disjunction;
use refsearch_core::Record;
use std::future::Future;

pub use postgrest::PostgrestSource;
pub use refsearch_core::config::FilterMode;
pub use searcher::Searcher;

/// Anything that can answer a read-only query against the reference table.
pub trait RecordSource: Send + Sync + 'static {
    /// Fetch every row, or only the rows matching `filter` when given.
    fn fetch(
        &self,
        filter: Option<&Disjunction>,
    ) -> impl Future<Output = Result<Vec<Record>, StoreError>> + Send;
}

/// Failure to read from the store. Terminal for the search that hit it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store is not configured: set store.url and store.api_key")]
    NotConfigured,
    #[error("invalid store url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}
