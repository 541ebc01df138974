//! HTTP API
//!
//! Routes:
//! - GET /api/stock-prices?stock=<sym>[,<sym>]&like=true
//! - GET /api/metrics

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::engine::{StockPriceResponse, StockPriceService, StockQuery};
use crate::infrastructure::metrics::{MetricsCollector, MetricsSnapshot};
use crate::quotes::QuoteSource;
use crate::storage::LikeStore;
use crate::{CheckerError, ServerConfig};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Shared application state
pub struct AppState<S, Q> {
    pub service: Arc<StockPriceService<S, Q>>,
    pub metrics: Arc<MetricsCollector>,
    pub trust_forwarded_for: bool,
}

impl<S, Q> Clone for AppState<S, Q> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            metrics: self.metrics.clone(),
            trust_forwarded_for: self.trust_forwarded_for,
        }
    }
}

/// Build the API router
pub fn create_router<S, Q>(service: Arc<StockPriceService<S, Q>>, config: &ServerConfig) -> Router
where
    S: LikeStore + 'static,
    Q: QuoteSource + 'static,
{
    let state = AppState {
        metrics: service.metrics(),
        service,
        trust_forwarded_for: config.trust_forwarded_for,
    };

    Router::new()
        .route("/api/stock-prices", get(get_stock_prices::<S, Q>))
        .route("/api/metrics", get(get_metrics::<S, Q>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn start_server<S, Q>(
    service: Arc<StockPriceService<S, Q>>,
    config: &ServerConfig,
) -> Result<(), CheckerError>
where
    S: LikeStore + 'static,
    Q: QuoteSource + 'static,
{
    let app = create_router(service, config);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let local_addr = listener.local_addr()?;
    crate::log_api!(tracing::Level::INFO, "API Server listening on {}", local_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        crate::log_api!(tracing::Level::ERROR, "Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    crate::log_api!(tracing::Level::INFO, "Shutdown signal received");
}

/// Handler for /api/stock-prices
async fn get_stock_prices<S, Q>(
    State(state): State<AppState<S, Q>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<StockPriceResponse>, ApiError>
where
    S: LikeStore + 'static,
    Q: QuoteSource + 'static,
{
    let request_id = uuid::Uuid::new_v4();

    let query = match StockQuery::from_params(&params) {
        Ok(query) => query,
        Err(e) => {
            state.metrics.record_client_error();
            crate::log_api!(tracing::Level::WARN, %request_id, "Rejected stock query: {}", e);
            return Err(ApiError::from(CheckerError::from(e)));
        }
    };

    let caller = caller_address(&headers, peer, state.trust_forwarded_for);

    match state.service.handle(query, caller).await {
        Ok(stock_data) => Ok(Json(StockPriceResponse { stock_data })),
        Err(e) => {
            match &e {
                CheckerError::Quote(_) => state.metrics.record_upstream_error(),
                _ => state.metrics.record_internal_error(),
            }
            crate::log_api!(tracing::Level::ERROR, %request_id, "Error processing stock data: {}", e);
            Err(ApiError::from(e))
        }
    }
}

/// Handler for /api/metrics
async fn get_metrics<S, Q>(State(state): State<AppState<S, Q>>) -> Json<MetricsSnapshot>
where
    S: LikeStore + 'static,
    Q: QuoteSource + 'static,
{
    Json(state.metrics.snapshot())
}

/// Resolve the caller address used for identity derivation
///
/// With `trust_forwarded_for`, the left-most parseable X-Forwarded-For entry
/// wins; otherwise, or when the header is unusable, the socket peer is used.
/// IPv4-mapped IPv6 addresses are reduced to plain IPv4.
pub fn caller_address(headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> IpAddr {
    if trust_forwarded_for {
        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').find_map(|entry| entry.trim().parse::<IpAddr>().ok()));
        if let Some(addr) = forwarded {
            return addr.to_canonical();
        }
    }
    peer.ip().to_canonical()
}

// === Error Handling ===

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest,
    Internal,
}

impl From<CheckerError> for ApiError {
    fn from(e: CheckerError) -> Self {
        if e.is_client_error() {
            ApiError::BadRequest
        } else {
            ApiError::Internal
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest => (StatusCode::BAD_REQUEST, "Invalid stock query"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Error processing stock data"),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}
