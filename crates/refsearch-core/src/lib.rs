//! refsearch-core — records, query parsing, filtering and export.
//!
//! # Architecture
//!
//! ```text
//! query bar ──► Terms ──┬──► Disjunction ──► remote store (server filter)
//!                       └──► Matcher ◄────── full table   (client filter)
//!                                 │
//!                     SearchSession (ResultSet) ──► table / CSV export
//! ```
//!
//! Nothing here performs I/O except [`config::Config::load`] and
//! [`export::export_to_path`]; fetching lives in `refsearch-store`.

pub mod config;
pub mod export;
pub mod filter;
pub mod predicate;
pub mod query;
pub mod session;
pub mod types;

pub use query::Terms;
pub use session::{SearchPhase, SearchRequest, SearchSession};
pub use types::{Record, ResultSet};
