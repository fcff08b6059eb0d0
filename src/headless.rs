//! Headless mode — one search, CSV out, exit.
//!
//! Used by `refsearch --query <q>` for scripting. The CSV goes to the
//! `--output` path when given, otherwise to the writer passed in (stdout in
//! the binary). An empty result set writes nothing.

use refsearch_core::export::{export_to_path, write_csv};
use refsearch_core::Terms;
use refsearch_store::{RecordSource, Searcher, StoreError};
use std::io::Write;
use std::path::Path;

/// How a headless run ended when the search itself succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The query had no terms; nothing was fetched.
    NoTerms,
    /// The search matched no rows; nothing was written.
    NoResults,
    /// This many rows were written.
    Exported(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error("search failed: {0}")]
    Search(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] refsearch_core::export::ExportError),
}

/// Run `query` once and write the matches as CSV.
pub async fn run<S: RecordSource, W: Write>(
    searcher: &Searcher<S>,
    query: &str,
    lead: Option<&str>,
    output: Option<&Path>,
    stdout: W,
) -> Result<Outcome, HeadlessError> {
    let terms = Terms::parse(query);
    if terms.is_empty() {
        tracing::info!(query, "query has no terms, nothing to search");
        return Ok(Outcome::NoTerms);
    }

    tracing::info!(terms = %terms, mode = %searcher.mode(), "headless search");
    let rows = searcher.search(&terms).await?;
    if rows.is_empty() {
        tracing::info!(terms = %terms, "no results found");
        return Ok(Outcome::NoResults);
    }

    let written = match output {
        Some(path) => export_to_path(path, &rows, lead)?,
        None => write_csv(stdout, &rows, lead)?,
    };
    Ok(Outcome::Exported(written))
}
