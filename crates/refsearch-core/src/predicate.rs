//! Typed predicate builder for the server-side filter.
//!
//! Builds the PostgREST logical filter `or=(…)` out of per-term, per-column
//! `ilike` predicates. Terms are never spliced into the expression raw:
//!
//! 1. the term is LIKE-escaped (`\`, `%`, `_`) and wrapped as `%term%`;
//! 2. column and pattern are both double-quoted, with `"` and `\`
//!    backslash-escaped, so PostgREST reserved characters (`,` `.` `:` `(`
//!    `)`) inside a term stay inside the operand.
//!
//! The finished expression goes out as a URL query parameter and is
//! percent-encoded by the HTTP client.

use crate::query::Terms;
use std::fmt;

/// Name of the PostgREST query parameter carrying a disjunction.
pub const OR_PARAM: &str = "or";

/// A single column predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match: `column ILIKE '%term%'`.
    ILike { column: String, term: String },
}

impl Predicate {
    pub fn ilike(column: impl Into<String>, term: impl Into<String>) -> Self {
        Predicate::ILike {
            column: column.into(),
            term: term.into(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::ILike { column, term } => {
                let pattern = format!("%{}%", like_escape(term));
                write!(f, "{}.ilike.{}", quote(column), quote(&pattern))
            }
        }
    }
}

/// OR of predicates. Matches a row when any member does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disjunction(Vec<Predicate>);

impl Disjunction {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Disjunction(predicates)
    }

    /// One `ilike` per (term, column) pair, term-major.
    pub fn any_term_in_any_column(terms: &Terms, columns: &[String]) -> Self {
        Disjunction(
            terms
                .iter()
                .flat_map(|term| columns.iter().map(move |col| Predicate::ilike(col, term)))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.0
    }

    /// The `(p1,p2,…)` value for the [`OR_PARAM`] query parameter, or `None`
    /// for an empty disjunction, which must never be sent.
    pub fn to_query_value(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let inner: Vec<String> = self.0.iter().map(Predicate::to_string).collect();
        Some(format!("({})", inner.join(",")))
    }
}

/// Escape the LIKE metacharacters so the term matches literally.
fn like_escape(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Wrap an operand in PostgREST double quotes.
fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
