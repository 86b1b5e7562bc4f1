//! Scripted providers and recording transports for tests
//!
//! [`ScriptedProvider`] serves an in-memory corpus through any of the
//! three paging idioms; [`RecordingTransport`] implements both transport
//! traits over a handler and records every request, so a blocking and an
//! async run of the same call sequence can be compared request for
//! request. A [`Gate`] holds async requests pending until opened, which is
//! how cancellation is exercised.

use crate::provider::{PageToken, Pagination, Provider};
use crate::transport::{AsyncTransport, Transport};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use patent_client_core::{
    AliasTable, Error, FieldKind, FieldValue, Model, PageBody, QuerySpec, Request, Response,
    Result, TransportError,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::Notify;

// ============================================================================
// Test model
// ============================================================================

/// Minimal record type served by [`ScriptedProvider`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    /// Identifier, `item-<n>` in [`corpus`]
    pub id: String,
    /// Optional title
    pub title: Option<String>,
    /// Integer rank, defaults to 0
    pub rank: i64,
    /// `even` or `odd` in [`corpus`]
    pub parity: Option<String>,
}

static ITEM: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Item")
        .required("id", "id", FieldKind::Str)
        .field("title", "title", FieldKind::Str)
        .with_default("rank", "rank", FieldKind::Int, FieldValue::Int(0))
        .field("parity", "parity", FieldKind::Str)
        .build()
});

impl Model for Item {
    const NAME: &'static str = "Item";

    fn alias_table() -> &'static AliasTable {
        &ITEM
    }
}

/// `n` raw items `item-0 .. item-{n-1}`
pub fn corpus(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "id": format!("item-{}", i),
                "title": format!("Title {}", i),
                "rank": i,
                "parity": if i % 2 == 0 { "even" } else { "odd" },
            })
        })
        .collect()
}

// ============================================================================
// ScriptedProvider
// ============================================================================

const SCRIPTED_URL: &str = "scripted://items";

/// Provider over an in-memory corpus
///
/// Filters compare the rendered value of the field with the same name in
/// each raw item. Sorting is supported on `id` and `rank`.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    corpus: Arc<Vec<Value>>,
    pagination: Pagination,
    report_total: bool,
    max_rows: Option<usize>,
}

impl ScriptedProvider {
    /// Offset-paged provider
    pub fn offset(corpus: Vec<Value>, page_size: usize) -> Self {
        Self::with(corpus, Pagination::Offset { page_size })
    }

    /// Cursor-paged provider
    pub fn cursor(corpus: Vec<Value>, page_size: usize) -> Self {
        Self::with(corpus, Pagination::Cursor { page_size })
    }

    /// Provider answering with the whole result at once
    pub fn unpaged(corpus: Vec<Value>) -> Self {
        Self::with(corpus, Pagination::Unpaged)
    }

    fn with(corpus: Vec<Value>, pagination: Pagination) -> Self {
        ScriptedProvider {
            corpus: Arc::new(corpus),
            pagination,
            report_total: true,
            max_rows: None,
        }
    }

    /// Stop reporting the total; exhaustion is then only learned from pages
    pub fn without_total(mut self) -> Self {
        self.report_total = false;
        self
    }

    /// Serve at most `n` rows per response, whatever limit was requested
    pub fn serving_at_most(mut self, n: usize) -> Self {
        self.max_rows = Some(n);
        self
    }

    /// A recording transport answering from this provider's corpus
    pub fn transport(&self) -> RecordingTransport {
        let provider = self.clone();
        RecordingTransport::new(move |request| Ok(provider.respond(request)))
    }

    /// Answer one request built by [`Provider::request`]
    pub fn respond(&self, request: &Request) -> Response {
        let mut rows: Vec<&Value> = self
            .corpus
            .iter()
            .filter(|item| {
                request.params.iter().all(|(name, wanted)| match name.strip_prefix("filter.") {
                    Some(field) => {
                        let actual = item.get(field).map(render).unwrap_or_default();
                        wanted.split('|').any(|w| w == actual)
                    }
                    None => true,
                })
            })
            .collect();

        if let Some(sort) = request.param_value("sort") {
            for key in sort.split(',').rev() {
                let (field, descending) = match key.strip_prefix('-') {
                    Some(field) => (field, true),
                    None => (key, false),
                };
                rows.sort_by(|a, b| {
                    let ord = compare(a.get(field), b.get(field));
                    if descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                });
            }
        }

        let len = rows.len();
        let number = |name: &str| request.param_value(name).and_then(|v| v.parse::<usize>().ok());
        let (start, limit) = match self.pagination {
            Pagination::Offset { .. } => (number("offset").unwrap_or(0), number("limit")),
            Pagination::Cursor { .. } => (number("cursor").unwrap_or(0), number("limit")),
            Pagination::Unpaged => (0, None),
        };
        let start = start.min(len);
        let limit = match (limit, self.max_rows) {
            (Some(l), Some(cap)) => Some(l.min(cap)),
            (None, Some(cap)) if !matches!(self.pagination, Pagination::Unpaged) => Some(cap),
            (limit, _) => limit,
        };
        let end = limit.map_or(len, |l| (start + l).min(len));
        let has_more = end < len;

        let mut body = json!({
            "items": rows[start..end].iter().map(|v| (*v).clone()).collect::<Vec<_>>(),
            "has_more": has_more,
        });
        if self.report_total {
            body["total"] = json!(len);
        }
        if matches!(self.pagination, Pagination::Cursor { .. }) && has_more {
            body["next"] = json!(end.to_string());
        }
        Response::json_body(&body)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => render(x).cmp(&render(y)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn request(&self, spec: &QuerySpec, token: &PageToken) -> Result<Request> {
        let mut request = Request::get(SCRIPTED_URL);
        for (field, values) in spec.filters() {
            let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            request = request.param(format!("filter.{}", field), joined.join("|"));
        }
        if !spec.sort_keys().is_empty() {
            for key in spec.sort_keys() {
                if key.field != "id" && key.field != "rank" {
                    return Err(Error::invalid_query(format!(
                        "cannot sort by `{}`",
                        key.field
                    )));
                }
            }
            let keys: Vec<String> = spec.sort_keys().iter().map(|k| k.to_string()).collect();
            request = request.param("sort", keys.join(","));
        }
        Ok(match token {
            PageToken::Offset { offset, limit } => {
                request.param("offset", offset).param("limit", limit)
            }
            PageToken::Cursor { cursor, limit, .. } => {
                let request = match cursor {
                    Some(cursor) => request.param("cursor", cursor),
                    None => request,
                };
                request.param("limit", limit)
            }
            PageToken::Whole => request,
        })
    }

    fn parse(
        &self,
        _spec: &QuerySpec,
        response: &Response,
    ) -> std::result::Result<PageBody, TransportError> {
        let body: Value = response.json()?;
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| TransportError::Malformed("missing `items`".into()))?;
        Ok(PageBody {
            items,
            total: body.get("total").and_then(Value::as_u64).map(|t| t as usize),
            has_more: body.get("has_more").and_then(Value::as_bool).unwrap_or(false),
            cursor: body.get("next").and_then(Value::as_str).map(str::to_string),
        })
    }
}

// ============================================================================
// Gate
// ============================================================================

/// Holds async requests pending until opened
#[derive(Debug, Clone, Default)]
pub struct Gate {
    inner: Arc<GateInner>,
}

#[derive(Debug, Default)]
struct GateInner {
    open: AtomicBool,
    waiting: AtomicUsize,
    notify: Notify,
}

impl Gate {
    /// A closed gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every current and future waiter
    pub fn open(&self) {
        self.inner.open.store(true, AtomicOrdering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Number of requests that have reached the gate
    pub fn arrivals(&self) -> usize {
        self.inner.waiting.load(AtomicOrdering::SeqCst)
    }

    async fn pass(&self) {
        self.inner.waiting.fetch_add(1, AtomicOrdering::SeqCst);
        loop {
            let notified = self.inner.notify.notified();
            if self.inner.open.load(AtomicOrdering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}

// ============================================================================
// RecordingTransport
// ============================================================================

type Handler = dyn Fn(&Request) -> std::result::Result<Response, TransportError> + Send + Sync;

/// Transport serving both execution forms from one handler
#[derive(Clone)]
pub struct RecordingTransport {
    handler: Arc<Handler>,
    log: Arc<Mutex<Vec<Request>>>,
    failures: Arc<Mutex<VecDeque<TransportError>>>,
    gate: Option<Gate>,
}

impl RecordingTransport {
    /// Transport answering every request with `handler`
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> std::result::Result<Response, TransportError> + Send + Sync + 'static,
    {
        RecordingTransport {
            handler: Arc::new(handler),
            log: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            gate: None,
        }
    }

    /// Transport answering with `responses` in order
    pub fn replying(responses: Vec<Response>) -> Self {
        let queue = Mutex::new(VecDeque::from(responses));
        Self::new(move |_| {
            queue
                .lock()
                .pop_front()
                .ok_or_else(|| TransportError::Network("no scripted response left".into()))
        })
    }

    /// Transport answering every request with the same response
    pub fn fixed(response: Response) -> Self {
        Self::new(move |_| Ok(response.clone()))
    }

    /// Hold async requests at `gate`
    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Fail the next request with `error`
    pub fn fail_next(&self, error: TransportError) {
        self.failures.lock().push_back(error);
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().clone()
    }

    /// Number of requests seen so far
    pub fn request_count(&self) -> usize {
        self.log.lock().len()
    }

    /// Forget recorded requests
    pub fn clear(&self) {
        self.log.lock().clear();
    }

    fn record(&self, request: &Request) {
        self.log.lock().push(request.clone());
    }

    fn answer(&self, request: &Request) -> std::result::Result<Response, TransportError> {
        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error);
        }
        (self.handler)(request)
    }
}

impl Transport for RecordingTransport {
    fn get(&self, request: &Request) -> std::result::Result<Response, TransportError> {
        self.record(request);
        self.answer(request)
    }
}

#[async_trait]
impl AsyncTransport for RecordingTransport {
    async fn get(&self, request: &Request) -> std::result::Result<Response, TransportError> {
        self.record(request);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.answer(request)
    }
}
