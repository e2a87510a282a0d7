//! HTTP server setup and pipeline composition.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Compose the request pipeline in its fixed nesting order
//! - Dispatch forwarded requests through registry lookup to the forwarder
//! - Map typed gateway errors to wire responses (the only place that does)
//!
//! # Pipeline order (outermost first)
//! ```text
//! rate limiter → timing interceptor → dispatcher → forwarder
//! ```
//! A rejected request is answered immediately and never reaches the timing
//! interceptor. `/` and `/health` sit on a sibling router outside the
//! pipeline entirely.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderName, HeaderValue, Request, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, on, MethodFilter},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::schema::{CounterBackend, GatewayConfig};
use crate::error::GatewayError;
use crate::http::request_id::{MakeGatewayRequestId, X_REQUEST_ID};
use crate::http::timing::timing_middleware;
use crate::limit::{
    CounterStore, FixedWindowLimiter, MemoryCounterStore, RateLimitDecision, RedisCounterStore,
};
use crate::observability::metrics;
use crate::proxy::{Forwarder, ProxyResult};
use crate::routing::{self, ServiceRegistry};

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub limiter: Option<Arc<FixedWindowLimiter>>,
    pub forwarder: Arc<Forwarder>,
    pub max_body_bytes: usize,
}

/// HTTP server for the API gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    registry: Arc<ServiceRegistry>,
}

impl GatewayServer {
    /// Create a server with the counting store selected by config.
    pub fn new(config: GatewayConfig) -> Self {
        let store = build_store(&config);
        Self::with_store(config, store)
    }

    /// Create a server with an explicit counting store (tests inject
    /// in-memory or failing stores here).
    pub fn with_store(config: GatewayConfig, store: Arc<dyn CounterStore>) -> Self {
        let registry = Arc::new(ServiceRegistry::from_config(&config.services));
        let limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(FixedWindowLimiter::new(store, &config.rate_limit)));
        let forwarder = Arc::new(Forwarder::new(&config.timeouts, &config.limits));

        let state = AppState {
            registry: registry.clone(),
            limiter,
            forwarder,
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = build_router(state);
        Self {
            router,
            config,
            registry,
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            services = self.registry.len(),
            rate_limit_enabled = self.config.rate_limit.enabled,
            "HTTP server starting"
        );
        if self.registry.is_empty() {
            tracing::warn!("No services registered; every forwarded request will get 404");
        }

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Select the counting store backend from config.
fn build_store(config: &GatewayConfig) -> Arc<dyn CounterStore> {
    match config.rate_limit.backend {
        CounterBackend::Memory => Arc::new(MemoryCounterStore::new()),
        CounterBackend::Redis => {
            let timeout = Duration::from_secs(config.redis.connect_timeout_secs);
            match RedisCounterStore::new(&config.redis.url, timeout) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::error!(
                        url = %config.redis.url,
                        error = %e,
                        "Invalid redis URL, falling back to in-memory counters"
                    );
                    Arc::new(MemoryCounterStore::new())
                }
            }
        }
    }
}

/// Build the full router. This is the single place the pipeline order is
/// declared: layers wrap bottom-up, so the rate limiter added last sits
/// outermost, with the timing interceptor directly inside it.
fn build_router(state: AppState) -> Router {
    let forward_methods = MethodFilter::GET
        .or(MethodFilter::POST)
        .or(MethodFilter::PUT)
        .or(MethodFilter::DELETE)
        .or(MethodFilter::PATCH)
        .or(MethodFilter::OPTIONS);

    let pipeline = Router::new()
        .route("/{service}", on(forward_methods, gateway_handler))
        .route("/{service}/{*path}", on(forward_methods, gateway_handler))
        .layer(middleware::from_fn(timing_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(pipeline)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            X_REQUEST_ID,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(X_REQUEST_ID),
            MakeGatewayRequestId,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Outermost pipeline gate: admit or answer 429 without touching the
/// rest of the chain.
async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = &state.limiter else {
        return next.run(request).await;
    };

    match limiter.admit(&addr.ip().to_string()).await {
        RateLimitDecision::Admit => next.run(request).await,
        RateLimitDecision::Reject => GatewayError::RateLimitExceeded.into_response(),
    }
}

/// Root status endpoint: enumerates configured services.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "API Gateway is running",
        "status": "healthy",
        "services": state.registry.service_names(),
    }))
}

/// Plain liveness endpoint.
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "api-gateway",
    }))
}

/// Fallback for paths no route matched.
async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": format!("Route not found: {}", uri.path()) })),
    )
}

/// Dispatch + forward: resolve the service from the first path segment
/// and hand the request to the forwarder.
async fn gateway_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(str::to_string);

    let target = routing::route(&state.registry, &path)?;
    let service = target.service.to_string();

    let body = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| GatewayError::Internal(format!("failed to read request body: {}", e)))?;

    let result = state
        .forwarder
        .forward(
            target.service,
            target.base_url,
            target.rest,
            parts.method.clone(),
            &parts.headers,
            query.as_deref(),
            body,
        )
        .await;

    match result {
        Ok(proxy) => {
            metrics::record_request(parts.method.as_str(), proxy.status.as_u16(), &service, start);
            Ok(proxy_response(proxy))
        }
        Err(e) => {
            metrics::record_request(
                parts.method.as_str(),
                e.status_code().as_u16(),
                &service,
                start,
            );
            Err(e)
        }
    }
}

/// Mirror a ProxyResult back to the client: body bytes, status, and
/// content-type pass through unmodified.
fn proxy_response(result: ProxyResult) -> Response {
    let mut response = Response::builder().status(result.status);
    if let Ok(value) = HeaderValue::from_str(&result.content_type) {
        response = response.header(header::CONTENT_TYPE, value);
    }
    response
        .body(Body::from(result.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
