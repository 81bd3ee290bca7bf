//! In-process fake of the admin backend for tests.
//!
//! Serves the `/api` routes the console uses plus two static assets
//! (`/qr.png`, anything else 404s) on an ephemeral localhost port. State is
//! shared with the test through [`FakeBackend`] so a test can seed orders,
//! inspect recorded requests or make the next call fail.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use crate::models::{AdminUser, Order, OrderStatus, SystemConfig};

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "secret";
pub const TEST_TOKEN: &str = "test-token";

/// One request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug)]
struct BackendState {
    admin: AdminUser,
    orders: Vec<Order>,
    config: SystemConfig,
    requests: Vec<RecordedRequest>,
    tokens_expired: bool,
    fail_next: Option<(StatusCode, String)>,
}

type Shared = Arc<Mutex<BackendState>>;

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Running fake backend. Shuts down on drop.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind `127.0.0.1:0` and start serving.
    pub async fn start() -> std::io::Result<Self> {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            admin: AdminUser {
                id: "admin-1".into(),
                username: TEST_USERNAME.into(),
            },
            orders: Vec::new(),
            config: sample_config(),
            requests: Vec::new(),
            tokens_expired: false,
            fail_next: None,
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(Arc::clone(&state));
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "fake backend stopped");
            }
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Admin API base URL (`<base>/api`).
    pub fn api_url(&self) -> String {
        format!("{}/api", self.base_url())
    }

    pub fn set_orders(&self, orders: Vec<Order>) {
        lock(&self.state).orders = orders;
    }

    pub fn orders(&self) -> Vec<Order> {
        lock(&self.state).orders.clone()
    }

    pub fn order(&self, id: &str) -> Option<Order> {
        lock(&self.state).orders.iter().find(|o| o.id == id).cloned()
    }

    pub fn config(&self) -> SystemConfig {
        lock(&self.state).config.clone()
    }

    pub fn set_config(&self, config: SystemConfig) {
        lock(&self.state).config = config;
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests whose path starts with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }

    /// Reject every bearer token from now on.
    pub fn expire_tokens(&self) {
        lock(&self.state).tokens_expired = true;
    }

    /// Answer the next request with `status` and `{"message": message}`.
    pub fn fail_next(&self, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        lock(&self.state).fail_next = Some((status, message.to_string()));
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An order with fixed amount, wallet and creation time.
pub fn sample_order(id: &str, status: OrderStatus) -> Order {
    Order {
        id: id.to_string(),
        amount: Decimal::new(1005, 1),
        wallet_address: "0x1234567890abcdef1234567890abcdef12345678".into(),
        status,
        // 2024-05-01T08:30:00Z
        created_at: DateTime::from_timestamp(1_714_552_200, 0).unwrap_or_default(),
        tx_hash: None,
    }
}

/// The configuration the backend starts with.
pub fn sample_config() -> SystemConfig {
    let mut extra = serde_json::Map::new();
    extra.insert("id".into(), json!("cfg-1"));
    SystemConfig {
        bank_name: "Vietcombank".into(),
        account_number: "0123456789".into(),
        account_holder: "NGUYEN VAN A".into(),
        qr_image_url: String::new(),
        note: "Transfer with the order code".into(),
        admin_wallet_address: "0xAbCdEf0123456789abcdef0123456789ABCDEF01".into(),
        usdt_rate: Decimal::new(25_400, 0),
        extra,
    }
}

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/admin/login", post(login))
        .route("/admin/p2p/orders", get(list_orders))
        .route("/admin/p2p/orders/{id}/confirm", post(confirm_order))
        .route("/admin/p2p/orders/{id}/cancel", post(cancel_order))
        .route("/config", get(get_config))
        .route("/admin/config", put(update_config))
        .route("/tokens", get(list_tokens))
        .route("/tokens/refresh", post(refresh_tokens))
        .route("/prices", get(prices));

    Router::new()
        .nest("/api", api)
        .route("/qr.png", get(qr_image))
        .with_state(state)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// Record the request and apply any injected failure.
fn begin(
    state: &Shared,
    method: Method,
    uri: &OriginalUri,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<(), Response> {
    let mut s = lock(state);
    s.requests.push(RecordedRequest {
        method,
        path: uri
            .0
            .path_and_query()
            .map_or_else(|| uri.0.path().to_string(), ToString::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(body).ok(),
    });
    if let Some((status, text)) = s.fail_next.take() {
        return Err(message(status, &text));
    }
    Ok(())
}

fn authorize(state: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TEST_TOKEN}");
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if lock(state).tokens_expired || presented != Some(expected.as_str()) {
        return Err(message(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    Ok(())
}

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<Shared>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body) {
        return resp;
    }
    let creds: Credentials = match serde_json::from_slice(&body) {
        Ok(c) => c,
        Err(_) => return message(StatusCode::BAD_REQUEST, "Malformed body"),
    };
    if creds.username != TEST_USERNAME || creds.password != TEST_PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let admin = lock(&state).admin.clone();
    Json(json!({ "access_token": TEST_TOKEN, "admin": admin })).into_response()
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

async fn list_orders(
    State(state): State<Shared>,
    Query(query): Query<PageQuery>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body)
        .and_then(|()| authorize(&state, &headers))
    {
        return resp;
    }
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).max(1);
    let s = lock(&state);
    let total = s.orders.len();
    let total_pages = total.div_ceil(limit as usize);
    let orders: Vec<&Order> = s
        .orders
        .iter()
        .skip((page as usize - 1) * limit as usize)
        .take(limit as usize)
        .collect();
    Json(json!({
        "orders": orders,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "totalPages": total_pages,
        }
    }))
    .into_response()
}

async fn confirm_order(
    State(state): State<Shared>,
    Path(id): Path<String>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body)
        .and_then(|()| authorize(&state, &headers))
    {
        return resp;
    }
    let tx_hash = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("txHash").and_then(Value::as_str).map(String::from));

    let mut s = lock(&state);
    let Some(order) = s.orders.iter_mut().find(|o| o.id == id) else {
        return message(StatusCode::NOT_FOUND, "Order not found");
    };
    if order.status != OrderStatus::Paid {
        return message(StatusCode::BAD_REQUEST, "Order is not awaiting confirmation");
    }
    order.status = OrderStatus::Confirmed;
    order.tx_hash = tx_hash;
    Json(json!({ "success": true, "order": order })).into_response()
}

async fn cancel_order(
    State(state): State<Shared>,
    Path(id): Path<String>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body)
        .and_then(|()| authorize(&state, &headers))
    {
        return resp;
    }
    let mut s = lock(&state);
    let Some(order) = s.orders.iter_mut().find(|o| o.id == id) else {
        return message(StatusCode::NOT_FOUND, "Order not found");
    };
    if !order.status.can_cancel() {
        return message(StatusCode::BAD_REQUEST, "Order can no longer be cancelled");
    }
    order.status = OrderStatus::Cancelled;
    Json(json!({ "success": true, "order": order })).into_response()
}

async fn get_config(
    State(state): State<Shared>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body) {
        return resp;
    }
    Json(lock(&state).config.clone()).into_response()
}

async fn update_config(
    State(state): State<Shared>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body)
        .and_then(|()| authorize(&state, &headers))
    {
        return resp;
    }
    let config: SystemConfig = match serde_json::from_slice(&body) {
        Ok(c) => c,
        Err(e) => return message(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    lock(&state).config = config.clone();
    Json(config).into_response()
}

async fn list_tokens(
    State(state): State<Shared>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body) {
        return resp;
    }
    Json(json!([
        { "symbol": "USDT", "name": "Tether USD", "decimals": 18 },
        { "symbol": "BNB", "name": "BNB", "decimals": 18 },
    ]))
    .into_response()
}

async fn refresh_tokens(
    State(state): State<Shared>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body)
        .and_then(|()| authorize(&state, &headers))
    {
        return resp;
    }
    Json(json!({ "refreshed": 2 })).into_response()
}

#[derive(Deserialize)]
struct PriceQuery {
    #[serde(default)]
    symbols: String,
}

async fn prices(
    State(state): State<Shared>,
    Query(query): Query<PriceQuery>,
    method: Method,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(resp) = begin(&state, method, &uri, &headers, &body) {
        return resp;
    }
    let quotes: serde_json::Map<String, Value> = query
        .symbols
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let price = if s == "USDT" { json!(1.0) } else { json!(600.25) };
            (s.to_string(), price)
        })
        .collect();
    Json(Value::Object(quotes)).into_response()
}

async fn qr_image() -> impl IntoResponse {
    // PNG signature only; enough for a content-type probe.
    (
        [(header::CONTENT_TYPE, "image/png")],
        &b"\x89PNG\r\n\x1a\n"[..],
    )
}
