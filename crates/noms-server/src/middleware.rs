use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Fingerprint of an authenticated caller, stored as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

/// Rate limit key shared by every request when auth is disabled.
const ANONYMOUS_CALLER: &str = "anonymous";

/// API key auth settings used by middleware.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from `NOMS_API_KEYS` as loaded into [`noms_core::AppConfig`].
    ///
    /// # Errors
    ///
    /// Fails outside development when no keys are configured.
    pub fn from_config(config: &noms_core::AppConfig) -> anyhow::Result<Self> {
        Self::from_keys(
            config.api_keys.as_deref(),
            config.env == noms_core::Environment::Development,
        )
    }

    /// Parses comma-separated bearer tokens.
    ///
    /// In development, empty/missing keys disable auth for local iteration.
    /// In non-development envs, empty/missing keys fail startup.
    ///
    /// # Errors
    ///
    /// Fails when no keys are given and `is_development` is false.
    pub fn from_keys(raw: Option<&str>, is_development: bool) -> anyhow::Result<Self> {
        let keys: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "NOMS_API_KEYS not set; bearer auth disabled in development environment"
                );
                return Ok(Self {
                    api_keys: Arc::new(Vec::new()),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "NOMS_API_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            api_keys: Arc::new(keys),
            enabled: true,
        })
    }

    /// Compares against every configured key without short-circuiting.
    fn allows(&self, token: &str) -> bool {
        self.api_keys
            .iter()
            .fold(false, |found, key| {
                found | bool::from(key.as_bytes().ct_eq(token.as_bytes()))
            })
    }
}

/// Short, non-reversible caller identity derived from a bearer token.
#[must_use]
pub fn caller_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().take(6).map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter with one window per caller fingerprint.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, RateLimitWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts one request for `caller`; false once its budget is spent.
    async fn try_acquire(&self, caller: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let window = windows
            .entry(caller.to_owned())
            .or_insert(RateLimitWindow {
                started_at: now,
                count: 0,
            });
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Recorded on the current span
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    tracing::Span::current().record("request_id", id.as_str());
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing Bearer token auth when enabled.
///
/// Accepted callers are attributed on the request span by fingerprint only.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    let token = extract_bearer_token(req.headers().get(AUTHORIZATION));

    match token {
        Some(token) if auth.allows(token) => {
            let caller = caller_fingerprint(token);
            tracing::Span::current().record("caller", caller.as_str());
            req.extensions_mut().insert(CallerId(caller));
            next.run(req).await
        }
        _ => ApiError::new(
            request_id_of(&req),
            "unauthorized",
            "missing or invalid bearer token",
        )
        .into_response(),
    }
}

/// Middleware enforcing a fixed request-per-window limit per caller.
///
/// Runs after [`require_bearer_auth`]; requests without a [`CallerId`] share
/// one anonymous budget.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let caller = req
        .extensions()
        .get::<CallerId>()
        .map_or_else(|| ANONYMOUS_CALLER.to_owned(), |id| id.0.clone());

    if !rate_limit.try_acquire(&caller).await {
        tracing::warn!(caller = %caller, "request rate limit exceeded");
        return ApiError::new(
            request_id_of(&req),
            "too_many_requests",
            "request rate limit exceeded",
        )
        .into_response();
    }

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
