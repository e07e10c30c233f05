use thiserror::Error;

/// Errors surfaced by place lookups.
///
/// "No such place" is never an error: the gateway and coordinator return
/// `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// The upstream quota is exhausted. Safe to retry later.
    #[error("places API rate limit exceeded ({status})")]
    RateLimited { status: String },

    /// Credentials are missing or rejected, or upstream refused the request
    /// as malformed. Retrying will not help.
    #[error("places API rejected the request ({status}): {message}")]
    Configuration { status: String, message: String },

    /// Any other non-success upstream status, including undecodable bodies.
    #[error("places API error ({status}): {message}")]
    Upstream { status: String, message: String },

    /// Connect, timeout, or body-read failure reaching upstream.
    #[error("places API unreachable: {message}")]
    Unavailable { message: String },

    /// The cache could not be read where no upstream fallback exists.
    #[error("place store unavailable: {0}")]
    Store(#[source] StoreError),
}

impl PlacesError {
    /// Whether a caller may retry the same request later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Upstream { .. } | Self::Unavailable { .. }
        )
    }
}

/// Errors returned by a [`crate::PlaceStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] noms_db::DbError),

    #[error("place store backend error: {0}")]
    Backend(String),
}

/// A store write that failed while serving an otherwise successful lookup.
///
/// Never propagated as an error; carried alongside the value in
/// [`crate::Outcome`] and logged.
#[derive(Debug, Error)]
#[error("failed to cache place {external_id}: {source}")]
pub struct CacheWriteFailure {
    pub external_id: String,
    #[source]
    pub source: StoreError,
}
