//! Client-side filter: the OR-of-substrings match over the searchable columns.
//!
//! A record matches when ANY term is a case-insensitive substring of ANY
//! searchable column. Missing and null columns never match. This is the same
//! contract the server-side `ilike` disjunction implements, see
//! [`crate::predicate`].

use crate::query::Terms;
use crate::types::Record;

/// Pre-folded terms plus the columns to look at.
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    terms: Vec<String>,
    columns: &'a [String],
}

impl<'a> Matcher<'a> {
    pub fn new(terms: &Terms, columns: &'a [String]) -> Self {
        Self {
            terms: terms.folded(),
            columns,
        }
    }

    /// Whether `record` satisfies at least one (term, column) pair.
    pub fn matches(&self, record: &Record) -> bool {
        self.columns.iter().any(|column| {
            let Some(value) = record.value_text(column) else {
                return false;
            };
            let value = value.to_lowercase();
            self.terms.iter().any(|term| value.contains(term.as_str()))
        })
    }
}

/// Keep the records matched by `terms`, preserving their order.
///
/// No terms means nothing matches.
pub fn filter_records(records: Vec<Record>, terms: &Terms, columns: &[String]) -> Vec<Record> {
    let matcher = Matcher::new(terms, columns);
    let before = records.len();
    let kept: Vec<Record> = records.into_iter().filter(|r| matcher.matches(r)).collect();
    tracing::debug!(before, after = kept.len(), terms = %terms, "client-side filter applied");
    kept
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
