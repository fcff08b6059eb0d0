//! PostgREST source — reads the table over the hosted REST API.
//!
//! Request shape:
//!
//! ```text
//! GET {url}/rest/v1/{table}?select=*[&or=(…)]&offset={n}&limit={page}
//! apikey: <key>
//! Authorization: Bearer <key>
//! Prefer: count=exact
//! ```
//!
//! The response must be a JSON array of objects; each object becomes one
//! [`Record`] with its key order intact.
//!
//! PostgREST caps every response at its `max-rows` setting (1000 on
//! Supabase) no matter what `limit` asks for, so a fetch walks the table in
//! pages. It stops once the total from `Content-Range` is reached, or, when
//! the store does not report one, at the first short or empty page.

use crate::{RecordSource, StoreError};
use refsearch_core::config::StoreConfig;
use refsearch_core::predicate::{Disjunction, OR_PARAM};
use refsearch_core::Record;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_RANGE};
use reqwest::Url;
use serde_json::Value;

/// Path prefix of the REST API below the project URL.
const REST_PREFIX: [&str; 2] = ["rest", "v1"];

/// Rows asked for per request; matches the Supabase `max-rows` default.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct PostgrestSource {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    page_size: usize,
}

/// One response worth of rows.
struct Page {
    rows: Vec<Record>,
    /// Size of the whole result, when the store reported it.
    total: Option<usize>,
}

impl PostgrestSource {
    /// Build a source for `table` under the project at `base_url`.
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self, StoreError> {
        let invalid = |reason: String| StoreError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut endpoint = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| invalid("cannot be a base url".to_string()))?
            .pop_if_empty()
            .extend(REST_PREFIX)
            .push(table);

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key: api_key.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Ask for `rows` rows per request instead of [`DEFAULT_PAGE_SIZE`].
    pub fn with_page_size(mut self, rows: usize) -> Self {
        self.page_size = rows.max(1);
        self
    }

    /// Build from the `[store]` config section.
    pub fn from_config(cfg: &StoreConfig) -> Result<Self, StoreError> {
        if !cfg.is_configured() {
            return Err(StoreError::NotConfigured);
        }
        Self::new(&cfg.url, cfg.api_key.trim(), &cfg.table)
    }

    /// The table URL requests are sent to (without query parameters).
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl PostgrestSource {
    async fn fetch_page(&self, or_value: Option<&str>, offset: usize) -> Result<Page, StoreError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .query(&[("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .header("Prefer", "count=exact");
        if let Some(value) = or_value {
            request = request.query(&[(OR_PARAM, value)]);
        }
        request = request.query(&[("offset", offset), ("limit", self.page_size)]);

        let response = request.send().await?;
        let status = response.status();
        let total = content_range_total(response.headers());
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(Page {
            rows: decode_rows(&body)?,
            total,
        })
    }
}

impl RecordSource for PostgrestSource {
    async fn fetch(&self, filter: Option<&Disjunction>) -> Result<Vec<Record>, StoreError> {
        let or_value = filter.and_then(Disjunction::to_query_value);

        tracing::debug!(
            endpoint = %self.endpoint,
            filtered = or_value.is_some(),
            predicates = filter.map_or(0, Disjunction::len),
            page_size = self.page_size,
            "fetching rows"
        );

        let mut records = Vec::new();
        let mut pages = 0usize;
        loop {
            let page = self.fetch_page(or_value.as_deref(), records.len()).await?;
            pages += 1;
            let got = page.rows.len();
            records.extend(page.rows);

            let done = match page.total {
                Some(total) => records.len() >= total,
                None => got < self.page_size,
            };
            if done || got == 0 {
                break;
            }
        }

        tracing::debug!(rows = records.len(), pages, "rows received");
        Ok(records)
    }
}

/// The total from a `Content-Range: 0-999/2500` header; `None` for `*/*`,
/// `0-999/*` or a missing header.
fn content_range_total(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_RANGE)?
        .to_str()
        .ok()?
        .rsplit_once('/')?
        .1
        .parse()
        .ok()
}

/// Decode a JSON array of row objects.
fn decode_rows(body: &[u8]) -> Result<Vec<Record>, StoreError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(Record::from(map)),
                other => Err(StoreError::UnexpectedShape(format!(
                    "row {i} is {}, expected an object",
                    json_kind(&other)
                ))),
            })
            .collect(),
        other => Err(StoreError::UnexpectedShape(format!(
            "body is {}, expected an array of rows",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
