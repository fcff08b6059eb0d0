//! Domain-specific assertion macros for refsearch harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear which rows were expected and which came back.

/// Assert that a result set holds exactly these stock symbols, in any order.
///
/// ```rust
/// assert_symbols!(rows, ["AAPL", "GOOG"]);
/// ```
#[macro_export]
macro_rules! assert_symbols {
    ($rows:expr, [$($symbol:expr),* $(,)?]) => {{
        let mut actual: Vec<String> = $crate::common::symbols(&$rows);
        actual.sort();
        let mut expected: Vec<String> = vec![$($symbol.to_string()),*];
        expected.sort();
        pretty_assertions::assert_eq!(
            actual, expected,
            "assert_symbols! failed: result set has the wrong rows"
        );
    }};
}

/// Assert that two result sets hold the same rows, ignoring order.
#[macro_export]
macro_rules! assert_same_rows {
    ($left:expr, $right:expr) => {{
        let key = |r: &refsearch_core::Record| serde_json::to_string(r).unwrap();
        let mut left: Vec<String> = $left.iter().map(key).collect();
        let mut right: Vec<String> = $right.iter().map(key).collect();
        left.sort();
        right.sort();
        pretty_assertions::assert_eq!(
            left, right,
            "assert_same_rows! failed: result sets differ"
        );
    }};
}

/// Assert that every row in `$rows` also appears in `$universe`.
#[macro_export]
macro_rules! assert_subset_of {
    ($rows:expr, $universe:expr) => {{
        let universe = &$universe;
        for row in $rows.iter() {
            if !universe.contains(row) {
                panic!("assert_subset_of! failed: row {:?} is not in the source table", row);
            }
        }
    }};
}
