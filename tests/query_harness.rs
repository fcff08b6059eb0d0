#![allow(unused)]
//! Query parsing integration harness.
//!
//! # What this covers
//!
//! - **Tokenizing**: `;` separates terms, every term is trimmed, empty
//!   pieces vanish, and case is left alone.
//! - **Property: no empty terms** for arbitrary input.
//! - **Property: order and content survive** when clean terms are joined
//!   with any mix of separators and whitespace.
//! - **Predicate shape**: the server-side disjunction has one `ilike` per
//!   (term, column) pair, and no term can change the number of top-level
//!   predicates, whatever PostgREST-reserved characters it contains.
//!
//! # What this does NOT cover
//!
//! - Whether the store honours the predicate (see store_harness)
//!
//! # Running
//!
//! ```sh
//! cargo test --test query_harness
//! ```

mod common;
use common::*;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use refsearch_core::config::default_search_columns;
use refsearch_core::predicate::Disjunction;
use refsearch_core::Terms;

// ---------------------------------------------------------------------------
// Examples
// ---------------------------------------------------------------------------

#[test]
fn separators_and_whitespace() {
    let terms = Terms::parse("a; b ;c");
    assert_eq!(terms.as_slice(), ["a", "b", "c"]);
    assert!(Terms::parse(";;").is_empty());
    assert!(Terms::parse("").is_empty());
}

#[test]
fn display_joins_terms() {
    assert_eq!(Terms::parse(" AAPL ;GOOG").to_string(), "AAPL; GOOG");
}

#[test]
fn disjunction_is_term_major() {
    let columns = vec!["CUSIP".to_string(), "Issuer Name".to_string()];
    let value = Disjunction::any_term_in_any_column(&Terms::parse("a;b"), &columns)
        .to_query_value()
        .unwrap();
    assert_eq!(
        value,
        r#"("CUSIP".ilike."%a%","Issuer Name".ilike."%a%","CUSIP".ilike."%b%","Issuer Name".ilike."%b%")"#
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// Terms that need no trimming and contain no separator.
fn clean_term() -> impl Strategy<Value = String> {
    "[A-Za-z0-9.,&()\"%_\\\\-]([A-Za-z0-9 .,&()\"%_\\\\-]{0,10}[A-Za-z0-9.,&()\"%_\\\\-])?"
}

fn separator() -> impl Strategy<Value = String> {
    prop::sample::select(vec![";", " ;", "; ", " ; ", ";;", "\t;"]).prop_map(str::to_string)
}

/// Count top-level commas in an `or=(…)` value, skipping quoted operands.
fn top_level_predicates(value: &str) -> usize {
    let inner = &value[1..value.len() - 1];
    let mut count = 1;
    let mut in_quotes = false;
    let mut escaped = false;
    for c in inner.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => count += 1,
            _ => {}
        }
    }
    count
}

proptest! {
    #[test]
    fn parsed_terms_are_trimmed_and_non_empty(raw in ".{0,64}") {
        let terms = Terms::parse(&raw);
        for term in terms.iter() {
            prop_assert!(!term.is_empty());
            prop_assert_eq!(term, term.trim());
            prop_assert!(!term.contains(';'));
        }
    }

    #[test]
    fn joined_terms_round_trip(
        terms in prop::collection::vec(clean_term(), 1..6),
        seps in prop::collection::vec(separator(), 6),
    ) {
        let mut raw = String::new();
        for (i, term) in terms.iter().enumerate() {
            raw.push_str(term);
            raw.push_str(&seps[i]);
        }
        let parsed = Terms::parse(&raw);
        prop_assert_eq!(parsed.as_slice(), terms.as_slice());
    }

    #[test]
    fn reserved_characters_cannot_split_predicates(
        terms in prop::collection::vec(clean_term(), 1..5),
    ) {
        let joined = terms.join(";");
        let parsed = Terms::parse(&joined);
        let columns = default_search_columns();
        let filter = Disjunction::any_term_in_any_column(&parsed, &columns);
        let value = filter.to_query_value().unwrap();
        prop_assert_eq!(top_level_predicates(&value), parsed.len() * columns.len());
    }
}
