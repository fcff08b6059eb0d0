//! refsearch — terminal search over the NYSE 2023 reference listings.
//!
//! Look up listings by CUSIP, ISIN, symbol or issuer name in a hosted
//! PostgREST table and export the matches to CSV. This crate re-exports the
//! workspace layers so integration tests and benches can import them from
//! one place.
//!
//! # Architecture
//!
//! ```text
//! query ──► Terms ──► Searcher ──► RecordSource (PostgREST)
//!                        │
//!                  SearchSession ──► TUI table
//!                        └─────────► CSV export
//! ```
//!
//! The TUI drives the main thread; searches run as tasks on a tokio runtime.

pub mod headless;

pub use refsearch_core::{config, export, filter, predicate, query, session, types};
pub use refsearch_core::{Record, ResultSet, SearchPhase, SearchSession, Terms};
pub use refsearch_store::{FilterMode, PostgrestSource, RecordSource, Searcher, StoreError};
