//! Turns the raw query bar text into search terms.
//!
//! Multiple terms are separated by `;`. Each piece is trimmed and empty
//! pieces are dropped, so `"a; b ;c"` and `"a;;b;c;"` both work.

/// Separator between terms in the query bar.
pub const TERM_SEPARATOR: char = ';';

/// Ordered, non-empty search terms parsed from one query string.
///
/// Terms keep their original case; [`Terms::folded`] gives the lowercase
/// form used for client-side matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terms(Vec<String>);

impl Terms {
    /// Split `raw` on `;`, trim each piece and discard the empty ones.
    pub fn parse(raw: &str) -> Self {
        Terms(
            raw.split(TERM_SEPARATOR)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// `true` when the query held no usable term. Callers skip the fetch.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Lowercased copies of the terms.
    pub fn folded(&self) -> Vec<String> {
        self.0.iter().map(|t| t.to_lowercase()).collect()
    }
}

impl std::fmt::Display for Terms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
