//! Age-based staleness rule for cached place rows.

use chrono::{DateTime, Duration, Utc};

/// Default freshness window.
pub const DEFAULT_CACHE_TTL_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    /// Fetched, but at least one full window ago.
    Stale,
    /// No fetch time recorded. Always refetched.
    NeverFetched,
}

impl Freshness {
    #[must_use]
    pub fn is_fresh(self) -> bool {
        self == Self::Fresh
    }
}

/// Classifies a row's `last_fetched_at` against `now`.
///
/// A row is fresh iff `now - last_fetched_at < ttl`. Timestamps in the future
/// (clock skew between writers) count as fresh.
#[must_use]
pub fn classify(
    last_fetched_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Freshness {
    match last_fetched_at {
        None => Freshness::NeverFetched,
        Some(fetched_at) if now.signed_duration_since(fetched_at) < ttl => Freshness::Fresh,
        Some(_) => Freshness::Stale,
    }
}
