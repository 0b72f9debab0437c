//! Query relay.
//!
//! Accepts the explorer's bounds + year window, renders the fixed SPARQL
//! query, forwards it to the upstream endpoint and answers with either
//! `{rows: [...]}` or the error envelope.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use protocol::{ErrorEnvelope, QueryParams, QueryRows, QUERY_PATH};
use query::results::parse_results_json;
use query::template::{render_query, QueryWindow};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

pub const DEFAULT_UPSTREAM_URL: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "geotime-explorer/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/geotime/explorer)"
);

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub addr: SocketAddr,
    pub upstream_url: String,
    pub user_agent: String,
    pub upstream_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 9200)),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            upstream_timeout: Duration::from_secs(60),
        }
    }
}

impl RelayConfig {
    /// Read `RELAY_ADDR`, `UPSTREAM_URL`, `UPSTREAM_USER_AGENT` and
    /// `UPSTREAM_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let addr = match env::var("RELAY_ADDR") {
            Ok(v) => v
                .parse()
                .map_err(|e| format!("invalid RELAY_ADDR {v:?}: {e}"))?,
            Err(_) => defaults.addr,
        };
        Ok(Self {
            addr,
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            user_agent: env::var("UPSTREAM_USER_AGENT").unwrap_or(defaults.user_agent),
            upstream_timeout: Duration::from_secs(env_var_u64(
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout.as_secs(),
            )),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    upstream_url: String,
    user_agent: String,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(Self {
            upstream_url: config.upstream_url.clone(),
            user_agent: config.user_agent.clone(),
            http,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(healthz))
        .route(QUERY_PATH, post(post_query))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("relay listening on http://{addr}");
    }
    axum::serve(listener, router(state)).await
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn post_query(State(state): State<AppState>, body: Bytes) -> Response {
    let params: QueryParams = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(err) => {
            error!("unreadable query body: {err}");
            return api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope::new(err.to_string()),
            );
        }
    };
    let window = match QueryWindow::from_params(&params) {
        Ok(w) => w,
        Err(err) => {
            debug!("rejecting query params: {err}");
            return api_error(StatusCode::BAD_REQUEST, ErrorEnvelope::new(err.to_string()));
        }
    };

    match forward(&state, &window).await {
        Ok(rows) => json_response(StatusCode::OK, &rows),
        Err(RelayFailure::Upstream { status, reason }) => {
            warn!("upstream answered {status}");
            api_error(status, ErrorEnvelope::upstream(status.as_u16(), reason))
        }
        Err(RelayFailure::Internal(message)) => {
            error!("query relay failed: {message}");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope::new(message),
            )
        }
    }
}

enum RelayFailure {
    Upstream { status: StatusCode, reason: String },
    Internal(String),
}

async fn forward(state: &AppState, window: &QueryWindow) -> Result<QueryRows, RelayFailure> {
    let sparql = render_query(window);
    let resp = state
        .http
        .post(&state.upstream_url)
        .header(CONTENT_TYPE, "application/sparql-query")
        .header(ACCEPT, "application/sparql-results+json")
        .header(USER_AGENT, state.user_agent.as_str())
        .header(CACHE_CONTROL, "no-cache")
        .body(sparql)
        .send()
        .await
        .map_err(|e| RelayFailure::Internal(e.to_string()))?;

    if !resp.status().is_success() {
        let status =
            StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let reason = resp
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string();
        return Err(RelayFailure::Upstream { status, reason });
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| RelayFailure::Internal(e.to_string()))?;
    let parsed =
        parse_results_json(&bytes).map_err(|e| RelayFailure::Internal(e.to_string()))?;
    if parsed.dropped > 0 {
        debug!("dropped {} rows without item or coord", parsed.dropped);
    }
    info!("relayed {} rows", parsed.rows.len());
    Ok(QueryRows { rows: parsed.rows })
}

fn api_error(status: StatusCode, envelope: ErrorEnvelope) -> Response {
    json_response(status, &envelope)
}

fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> Response {
    let body = match serde_json::to_string(value) {
        Ok(v) => v,
        Err(err) => {
            error!("response serialization failed: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "serialization error").into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (status, headers, Body::from(body)).into_response()
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
