//! Read-through / write-through policy over the gateway and the store.
//!
//! Search always goes upstream and caches each hit as a side effect. Details
//! are served from the cache while the row is fresh, otherwise refetched and
//! written back. Photos resolve their reference through the cache and stream
//! upstream bytes without storing them.
//!
//! Store writes are advisory: a failed upsert is logged and reported in
//! [`Outcome::cache_failures`], never returned as an error.

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::error::{CacheWriteFailure, PlacesError};
use crate::freshness::{classify, DEFAULT_CACHE_TTL_DAYS};
use crate::gateway::PlaceGateway;
use crate::model::{
    NewPlaceRecord, PlaceDetails, PlacePhoto, PlaceRecord, PlaceSearchResult, SearchQuery,
};
use crate::store::PlaceStore;

pub const DEFAULT_PHOTO_WIDTH: u32 = 400;
pub const MAX_PHOTO_WIDTH: u32 = 1600;

/// Upper bound on concurrent cache writes per search.
const MAX_CONCURRENT_WRITES: usize = 8;

/// A successful lookup plus any store writes that failed while serving it.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub cache_failures: Vec<CacheWriteFailure>,
}

impl<T> Outcome<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            cache_failures: Vec::new(),
        }
    }

    /// True when the value was served but could not be cached.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.cache_failures.is_empty()
    }

    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Decides, per lookup, between the cached copy and the upstream API.
///
/// Built once at startup and shared behind an `Arc`; holds no per-request
/// state and takes no locks.
pub struct PlacesCoordinator {
    gateway: Arc<dyn PlaceGateway>,
    store: Arc<dyn PlaceStore>,
    ttl: Duration,
}

impl PlacesCoordinator {
    #[must_use]
    pub fn new(gateway: Arc<dyn PlaceGateway>, store: Arc<dyn PlaceStore>) -> Self {
        Self {
            gateway,
            store,
            ttl: Duration::days(i64::from(DEFAULT_CACHE_TTL_DAYS)),
        }
    }

    /// Overrides the freshness window.
    #[must_use]
    pub fn with_ttl_days(mut self, days: u32) -> Self {
        self.ttl = Duration::days(i64::from(days));
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Searches upstream and caches every hit.
    ///
    /// Result order is upstream order. Hits whose upsert succeeded carry the
    /// internal id; the rest are returned without one.
    ///
    /// # Errors
    ///
    /// Propagates the gateway's [`PlacesError`] unchanged.
    pub async fn search_places(
        &self,
        query: &SearchQuery,
    ) -> Result<Outcome<Vec<PlaceSearchResult>>, PlacesError> {
        let places = self.gateway.search(query).await?;
        if places.is_empty() {
            return Ok(Outcome::clean(Vec::new()));
        }

        let fetched_at = Utc::now();
        let records: Vec<NewPlaceRecord> = places
            .iter()
            .map(|place| NewPlaceRecord::from_upstream(place, fetched_at))
            .collect();
        // `buffered` yields in input order.
        let writes: Vec<_> = stream::iter(records)
            .map(|record| self.cache(record))
            .buffered(MAX_CONCURRENT_WRITES)
            .collect()
            .await;

        let mut cache_failures = Vec::new();
        let mut results = Vec::with_capacity(places.len());
        for (place, write) in places.into_iter().zip(writes) {
            let internal_id = match write {
                Ok(id) => Some(id),
                Err(failure) => {
                    cache_failures.push(failure);
                    None
                }
            };
            results.push(PlaceSearchResult::from_upstream(place, internal_id));
        }

        tracing::debug!(
            query = %query.query,
            results = results.len(),
            cache_failures = cache_failures.len(),
            "place search served"
        );

        Ok(Outcome {
            value: results,
            cache_failures,
        })
    }

    /// Returns details for a place, from the cache when fresh.
    ///
    /// `Ok(None)` means upstream does not know the place.
    ///
    /// # Errors
    ///
    /// Propagates the gateway's [`PlacesError`] when a refresh is needed and
    /// fails. The store is not written in that case.
    pub async fn get_place_details(
        &self,
        external_id: &str,
    ) -> Result<Option<Outcome<PlaceDetails>>, PlacesError> {
        let cached = self.lookup_cached(external_id).await;
        let cached_id = cached.as_ref().map(|record| record.internal_id);

        if let Some(record) = cached {
            let freshness = classify(record.last_fetched_at, Utc::now(), self.ttl);
            if freshness.is_fresh() {
                tracing::debug!(external_id, "place cache hit");
                return Ok(Some(Outcome::clean(PlaceDetails::from_record(record))));
            }
            tracing::debug!(external_id, ?freshness, "cached place needs refresh");
        } else {
            tracing::debug!(external_id, "place cache miss");
        }

        let Some(mut details) = self.gateway.details(external_id).await? else {
            return Ok(None);
        };

        // Upstream answers an obsolete id with the place's current one. The
        // row stays keyed on the id callers ask for, or it never turns fresh.
        if details.place.external_id != external_id {
            tracing::debug!(
                external_id,
                upstream_id = %details.place.external_id,
                "upstream returned a different place id"
            );
            details.place.external_id = external_id.to_string();
        }

        let fetched_at = Utc::now();
        let (internal_id, cache_failures) = match self
            .cache(NewPlaceRecord::from_upstream(&details.place, fetched_at))
            .await
        {
            Ok(id) => (Some(id), Vec::new()),
            // The id is stable across refreshes, so a previously cached one
            // is still correct when this write fails.
            Err(failure) => (cached_id, vec![failure]),
        };

        Ok(Some(Outcome {
            value: PlaceDetails::from_upstream(details, internal_id, fetched_at),
            cache_failures,
        }))
    }

    /// Fetches the photo for a cached place, passing bytes through untouched.
    ///
    /// `Ok(None)` when the place is not cached, has no photo reference, or
    /// upstream has no such photo. `max_width` is clamped to
    /// `1..=MAX_PHOTO_WIDTH`.
    ///
    /// # Errors
    ///
    /// [`PlacesError::Store`] if the cache cannot be read, otherwise the
    /// gateway's error unchanged.
    pub async fn get_place_photo(
        &self,
        external_id: &str,
        max_width: u32,
    ) -> Result<Option<PlacePhoto>, PlacesError> {
        let record = self
            .store
            .get_by_external_id(external_id)
            .await
            .map_err(PlacesError::Store)?;

        let Some(photo_reference) = record.and_then(|r| r.photo_reference) else {
            tracing::debug!(external_id, "no cached photo reference");
            return Ok(None);
        };

        self.gateway
            .photo(&photo_reference, clamp_photo_width(max_width))
            .await
    }

    /// Store read for the details path. A failed read, including a row that
    /// cannot be decoded, is a miss.
    async fn lookup_cached(&self, external_id: &str) -> Option<PlaceRecord> {
        match self.store.get_by_external_id(external_id).await {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(external_id, error = %error, "place cache read failed; treating as miss");
                None
            }
        }
    }

    async fn cache(&self, record: NewPlaceRecord) -> Result<Uuid, CacheWriteFailure> {
        self.store
            .upsert_by_external_id(&record)
            .await
            .map_err(|source| {
                tracing::warn!(
                    external_id = %record.external_id,
                    error = %source,
                    "place cache write failed; serving upstream data"
                );
                CacheWriteFailure {
                    external_id: record.external_id.clone(),
                    source,
                }
            })
    }
}

#[must_use]
pub fn clamp_photo_width(max_width: u32) -> u32 {
    max_width.clamp(1, MAX_PHOTO_WIDTH)
}
