//! Static reference rows used across harnesses.
//!
//! A small slice of the NYSE 2023 listings plus a few rows shaped to hit the
//! edges: null identifiers, CSV-hostile issuer names and characters that
//! mean something to PostgREST or to LIKE.

use super::builders::{listing, ListingBuilder};
use refsearch_core::Record;

/// Well-formed listings.
pub fn nyse_listings() -> Vec<Record> {
    vec![
        listing("Apple Inc.", "037833100", "US0378331005", "AAPL"),
        listing("Alphabet Inc. Class C", "02079K107", "US02079K1079", "GOOG"),
        listing("Alphabet Inc. Class A", "02079K305", "US02079K3059", "GOOGL"),
        listing("Microsoft Corporation", "594918104", "US5949181045", "MSFT"),
        listing("Tesla, Inc.", "88160R101", "US88160R1014", "TSLA"),
        listing("Berkshire Hathaway Inc. Class B", "084670702", "US0846707026", "BRK.B"),
        listing("The Coca-Cola Company", "191216100", "US1912161007", "KO"),
        listing("Johnson & Johnson", "478160104", "US4781601046", "JNJ"),
    ]
}

/// Rows with nulls and awkward characters.
pub fn awkward_listings() -> Vec<Record> {
    vec![
        // No identifiers at all, only an issuer.
        ListingBuilder::new("Pending Listing Corp").build(),
        ListingBuilder::new("Acme \"Widgets\" (Holdings), Ltd.")
            .cusip("000000AA1")
            .symbol("ACME")
            .build(),
        ListingBuilder::new("Multi\nLine Trust")
            .cusip("000000BB2")
            .isin("US000000BB21")
            .symbol("MLT")
            .build(),
        ListingBuilder::new("100% Pure Holdings")
            .cusip("000000CC3")
            .symbol("PURE_1")
            .build(),
    ]
}

/// Every fixture row.
pub fn all_listings() -> Vec<Record> {
    let mut rows = nyse_listings();
    rows.extend(awkward_listings());
    rows
}

/// Stock symbols of `rows`, in order, for compact assertions.
pub fn symbols(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .map(|r| r.text("Stock Symbol").into_owned())
        .collect()
}
