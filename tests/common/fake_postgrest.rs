//! Fake PostgREST server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /rest/v1/{table}`: the configured rows, narrowed by an
//!   `or=(col.ilike.pattern,…)` filter when one is sent, then windowed by
//!   `offset`/`limit` and capped at `max_rows` like PostgREST's `max-rows`
//!
//! With `Prefer: count=exact` the answer carries
//! `Content-Range: {first}-{last}/{total}`.
//!
//! The `or` expression is parsed the way PostgREST reads it: operands may be
//! double-quoted with backslash escapes, and patterns use LIKE wildcards
//! (`%`, `_`) with `\` as the escape character. Anything it cannot parse is
//! answered with `400` and a PostgREST-style error body, so a malformed
//! filter fails the test instead of silently matching nothing.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakePostgrest::start("NYSE2023", "test-key", nyse_listings()).await.unwrap();
//! let source = PostgrestSource::new(&api.base_url(), "test-key", "NYSE2023").unwrap();
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_RANGE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use refsearch_core::Record;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// What the server saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub table: String,
    pub params: Vec<(String, String)>,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
}

impl SeenRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

struct ApiState {
    table: String,
    api_key: String,
    rows: Vec<Record>,
    /// When set, every request is answered with this status.
    fail_with: Option<StatusCode>,
    /// Most rows a single response may carry.
    max_rows: Option<usize>,
    seen: Vec<SeenRequest>,
}

/// Handle to the running fake PostgREST server.
pub struct FakePostgrest {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakePostgrest {
    /// Start serving `rows` as `table`, accepting only `api_key`. Returns
    /// once the server is listening.
    pub async fn start(table: &str, api_key: &str, rows: Vec<Record>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState {
            table: table.to_string(),
            api_key: api_key.to_string(),
            rows,
            fail_with: None,
            max_rows: None,
            seen: Vec::new(),
        }));

        let app = Router::new()
            .route("/rest/v1/{table}", get(select_rows))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the project (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer every following request with `status`.
    pub async fn fail_with(&self, status: u16) {
        self.state.lock().await.fail_with =
            Some(StatusCode::from_u16(status).expect("valid status code"));
    }

    /// Never answer with more than `rows` rows, whatever `limit` says.
    pub async fn cap_rows(&self, rows: usize) {
        self.state.lock().await.max_rows = Some(rows);
    }

    /// Every request seen so far, oldest first.
    pub async fn requests(&self) -> Vec<SeenRequest> {
        self.state.lock().await.seen.clone()
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

async fn select_rows(
    State(state): State<Arc<Mutex<ApiState>>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut s = state.lock().await;
    let seen = SeenRequest {
        table: table.clone(),
        params: params.clone(),
        apikey: header("apikey"),
        authorization: header("authorization"),
    };
    s.seen.push(seen.clone());

    if let Some(status) = s.fail_with {
        return error(status, "simulated failure");
    }
    if seen.apikey.as_deref() != Some(s.api_key.as_str()) {
        return error(StatusCode::UNAUTHORIZED, "Invalid API key");
    }
    if table != s.table {
        return error(
            StatusCode::NOT_FOUND,
            &format!("relation \"public.{table}\" does not exist"),
        );
    }

    let predicates = match seen.param("or").map(parse_or).transpose() {
        Ok(p) => p,
        Err(msg) => return error(StatusCode::BAD_REQUEST, &msg),
    };

    let (offset, limit) = match (number(&seen, "offset"), number(&seen, "limit")) {
        (Ok(offset), Ok(limit)) => (offset.unwrap_or(0), limit),
        (Err(msg), _) | (_, Err(msg)) => return error(StatusCode::BAD_REQUEST, &msg),
    };

    let matched: Vec<&Record> = s
        .rows
        .iter()
        .filter(|row| match &predicates {
            None => true,
            Some(preds) => preds.iter().any(|p| p.matches(row)),
        })
        .collect();
    let total = matched.len();

    let take = [limit, s.max_rows]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(usize::MAX);
    let page: Vec<&Record> = matched.into_iter().skip(offset).take(take).collect();

    let counted = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("count=exact"));
    let mut response = Json(json!(page)).into_response();
    if counted {
        let range = if page.is_empty() {
            format!("*/{total}")
        } else {
            format!("{}-{}/{total}", offset, offset + page.len() - 1)
        };
        if let Ok(value) = range.parse() {
            response.headers_mut().insert(CONTENT_RANGE, value);
        }
    }
    response
}

fn number(seen: &SeenRequest, name: &str) -> Result<Option<usize>, String> {
    seen.param(name)
        .map(|raw| {
            raw.parse()
                .map_err(|_| format!("\"{name}\" must be a non-negative integer"))
        })
        .transpose()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "code": "PGRST100", "message": message }))).into_response()
}

// ---------------------------------------------------------------------------
// `or` expression parsing
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ILike {
    column: String,
    pattern: Vec<LikeToken>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    /// `%`
    Any,
    /// `_`
    One,
    Lit(char),
}

impl ILike {
    fn matches(&self, row: &Record) -> bool {
        let Some(value) = row.value_text(&self.column) else {
            return false;
        };
        let text: Vec<char> = value.to_lowercase().chars().collect();
        like_match(&self.pattern, &text)
    }
}

/// Parse `(a.ilike.x,"b".ilike."y")` into its predicates.
fn parse_or(raw: &str) -> Result<Vec<ILike>, String> {
    let inner = raw
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| format!("\"failed to parse logic tree ({raw})\""))?;

    split_top_level(inner)?
        .into_iter()
        .map(|part| parse_ilike(&part))
        .collect()
}

/// Split on commas that are not inside double quotes.
fn split_top_level(s: &str) -> Result<Vec<String>, String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if in_quotes => {
                current.push(c);
                let next = chars.next().ok_or("dangling escape")?;
                current.push(next);
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    parts.push(current);
    Ok(parts)
}

/// Read one operand from the front of `s`; returns (operand, rest).
fn take_operand(s: &str, stop_at_dot: bool) -> Result<(String, &str), String> {
    if let Some(body) = s.strip_prefix('"') {
        let mut out = String::new();
        let mut chars = body.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    let (_, next) = chars.next().ok_or("dangling escape")?;
                    out.push(next);
                }
                '"' => return Ok((out, &body[i + 1..])),
                _ => out.push(c),
            }
        }
        Err("unterminated quote".to_string())
    } else if stop_at_dot {
        let end = s.find('.').ok_or_else(|| format!("missing operator in {s:?}"))?;
        Ok((s[..end].to_string(), &s[end..]))
    } else {
        Ok((s.to_string(), ""))
    }
}

fn parse_ilike(part: &str) -> Result<ILike, String> {
    let (column, rest) = take_operand(part, true)?;
    let rest = rest
        .strip_prefix(".ilike.")
        .ok_or_else(|| format!("unsupported operator in {part:?}"))?;
    let (pattern, trailing) = take_operand(rest, false)?;
    if !trailing.is_empty() {
        return Err(format!("unexpected {trailing:?} after operand in {part:?}"));
    }
    Ok(ILike {
        column,
        pattern: like_tokens(&pattern.to_lowercase())?,
    })
}

fn like_tokens(pattern: &str) -> Result<Vec<LikeToken>, String> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            // PostgREST accepts `*` as an alias for `%`.
            '%' | '*' => LikeToken::Any,
            '_' => LikeToken::One,
            '\\' => LikeToken::Lit(chars.next().ok_or("LIKE pattern ends with escape")?),
            c => LikeToken::Lit(c),
        });
    }
    Ok(tokens)
}

fn like_match(pattern: &[LikeToken], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((LikeToken::Any, rest)) => (0..=text.len()).any(|i| like_match(rest, &text[i..])),
        Some((LikeToken::One, rest)) => !text.is_empty() && like_match(rest, &text[1..]),
        Some((LikeToken::Lit(c), rest)) => {
            text.first() == Some(c) && like_match(rest, &text[1..])
        }
    }
}
