//! HTTP API for the activities service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use activity_store::Store;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Activity registration store
    pub store: Arc<Store>,
    /// Directory served under /static
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: Arc::new(store),
            static_dir: static_dir.into(),
        }
    }
}

/// Create the API router without registration throttling.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::disabled())
}

/// Create the API router, throttling signup and unregister per client.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    let registration = Router::new()
        .route("/activities/:activity_name/signup", post(handlers::signup))
        .route(
            "/activities/:activity_name/unregister",
            post(handlers::unregister),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/activities", get(handlers::list_activities))
        .merge(registration)
        .nest_service("/static", static_files)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
