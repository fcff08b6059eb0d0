//! Ergonomic constructors for listing records and searchers.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use refsearch_core::config::{default_search_columns, FilterMode};
use refsearch_core::Record;
use refsearch_store::{RecordSource, Searcher};
use serde_json::Value;

// ---------------------------------------------------------------------------
// ListingBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for one row of the NYSE reference table.
///
/// Columns come out in the order the store uses: CUSIP, ISIN, Stock Symbol,
/// Issuer Name, then any extras in the order they were added.
///
/// # Example
///
/// ```rust
/// let row = ListingBuilder::new("Apple Inc.")
///     .cusip("037833100")
///     .isin("US0378331005")
///     .symbol("AAPL")
///     .build();
/// ```
pub struct ListingBuilder {
    cusip: Value,
    isin: Value,
    symbol: Value,
    issuer: Value,
    extra: Vec<(String, Value)>,
}

impl ListingBuilder {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            cusip: Value::Null,
            isin: Value::Null,
            symbol: Value::Null,
            issuer: Value::String(issuer.into()),
            extra: Vec::new(),
        }
    }

    pub fn cusip(mut self, cusip: impl Into<String>) -> Self {
        self.cusip = Value::String(cusip.into());
        self
    }

    pub fn isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Value::String(isin.into());
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Value::String(symbol.into());
        self
    }

    pub fn column(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Record {
        let mut record = Record::new()
            .with("CUSIP", self.cusip)
            .with("ISIN", self.isin)
            .with("Stock Symbol", self.symbol)
            .with("Issuer Name", self.issuer);
        for (name, value) in self.extra {
            record.insert(name, value);
        }
        record
    }
}

/// Shorthand for the common three-identifier row.
pub fn listing(issuer: &str, cusip: &str, isin: &str, symbol: &str) -> Record {
    ListingBuilder::new(issuer)
        .cusip(cusip)
        .isin(isin)
        .symbol(symbol)
        .build()
}

/// A searcher over `source` using the default searchable columns.
pub fn searcher<S: RecordSource>(source: S, mode: FilterMode) -> Searcher<S> {
    Searcher::new(source, mode, default_search_columns())
}
