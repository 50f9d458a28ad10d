//! Registration throttling and request logging middleware.

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
};
use tracing::{debug, warn};

/// Signup and unregister attempts, counted per client address.
pub type ClientLimiter = DefaultKeyedRateLimiter<IpAddr>;

// Idle clients are forgotten once this many addresses are tracked.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Per-client throttle for the registration routes. Disabled by default.
#[derive(Clone, Default)]
pub struct RateLimitState {
    limiter: Option<Arc<ClientLimiter>>,
}

impl RateLimitState {
    /// Admit every request.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Allow each client address `requests_per_minute` registration calls.
    pub fn per_client(requests_per_minute: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Self {
            limiter: Some(Arc::new(RateLimiter::keyed(quota))),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        config
            .per_client_per_minute
            .map_or_else(Self::disabled, Self::per_client)
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Count one attempt from `client`. False once its quota is spent.
    pub fn admit(&self, client: IpAddr) -> bool {
        let Some(limiter) = &self.limiter else {
            return true;
        };

        if limiter.len() > MAX_TRACKED_CLIENTS {
            limiter.retain_recent();
        }

        limiter.check_key(&client).is_ok()
    }
}

/// Reject a client's registration call with 429 once its quota is spent.
///
/// Requests without a peer address (no `ConnectInfo`) are not throttled.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if let Some(client) = client {
        if !rate_limit.admit(client) {
            warn!(%client, uri = %request.uri(), "Registration rate limit exceeded");
            return Err(ApiError::RateLimitExceeded);
        }
    }

    Ok(next.run(request).await)
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    } else {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    }

    response
}
