//! Domain types shared by the gateway, the store, and the coordinator.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Parameters for a nearby text search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub location: LatLng,
    pub radius_meters: u32,
}

// ---------------------------------------------------------------------------
// Gateway output
// ---------------------------------------------------------------------------

/// A place decoded from an upstream search or details response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamPlace {
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<LatLng>,
    pub photo_reference: Option<String>,
    pub categories: Vec<String>,
    pub rating: Option<f64>,
    pub price_level: Option<i16>,
    pub open_now: Option<bool>,
}

/// Details-only fields on top of [`UpstreamPlace`]. None of these are cached.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamPlaceDetails {
    pub place: UpstreamPlace,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub opening_hours: Vec<String>,
}

/// Raw photo payload, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacePhoto {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

// ---------------------------------------------------------------------------
// Cache rows
// ---------------------------------------------------------------------------

/// The cached projection of an upstream place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    /// Store-assigned; stable across refreshes of the same `external_id`.
    pub internal_id: Uuid,
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub photo_reference: Option<String>,
    pub categories: Vec<String>,
    pub location: Option<LatLng>,
    pub rating: Option<f64>,
    pub price_level: Option<i16>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

/// A complete snapshot to write over whatever is cached for `external_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlaceRecord {
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub photo_reference: Option<String>,
    pub categories: Vec<String>,
    pub location: Option<LatLng>,
    pub rating: Option<f64>,
    pub price_level: Option<i16>,
    pub fetched_at: DateTime<Utc>,
}

impl NewPlaceRecord {
    #[must_use]
    pub fn from_upstream(place: &UpstreamPlace, fetched_at: DateTime<Utc>) -> Self {
        Self {
            external_id: place.external_id.clone(),
            name: place.name.clone(),
            address: place.address.clone(),
            photo_reference: place.photo_reference.clone(),
            categories: place.categories.clone(),
            location: place.location,
            rating: place.rating,
            price_level: place.price_level,
            fetched_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Caller-facing projections
// ---------------------------------------------------------------------------

/// One search hit, in upstream order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSearchResult {
    /// Present when the place is cached (or was just cached).
    #[serde(rename = "id")]
    pub internal_id: Option<Uuid>,
    #[serde(rename = "google_place_id")]
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<LatLng>,
    pub photo_reference: Option<String>,
    #[serde(rename = "types")]
    pub categories: Vec<String>,
    pub rating: Option<f64>,
    pub price_level: Option<i16>,
    pub open_now: Option<bool>,
}

impl PlaceSearchResult {
    #[must_use]
    pub fn from_upstream(place: UpstreamPlace, internal_id: Option<Uuid>) -> Self {
        Self {
            internal_id,
            external_id: place.external_id,
            name: place.name,
            address: place.address,
            location: place.location,
            photo_reference: place.photo_reference,
            categories: place.categories,
            rating: place.rating,
            price_level: place.price_level,
            open_now: place.open_now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailsSource {
    Cache,
    Upstream,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetails {
    #[serde(rename = "id")]
    pub internal_id: Option<Uuid>,
    #[serde(rename = "google_place_id")]
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<LatLng>,
    pub photo_reference: Option<String>,
    #[serde(rename = "types")]
    pub categories: Vec<String>,
    pub rating: Option<f64>,
    pub price_level: Option<i16>,
    pub open_now: Option<bool>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    #[serde(rename = "hours")]
    pub opening_hours: Vec<String>,
    pub source: DetailsSource,
    /// When the underlying data was last fetched from upstream.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl PlaceDetails {
    /// Projection built entirely from a cached row.
    #[must_use]
    pub fn from_record(record: PlaceRecord) -> Self {
        Self {
            internal_id: Some(record.internal_id),
            external_id: record.external_id,
            name: record.name,
            address: record.address,
            location: record.location,
            photo_reference: record.photo_reference,
            categories: record.categories,
            rating: record.rating,
            price_level: record.price_level,
            open_now: None,
            website: None,
            phone_number: None,
            opening_hours: Vec::new(),
            source: DetailsSource::Cache,
            fetched_at: record.last_fetched_at,
        }
    }

    /// Projection built from a live upstream response.
    #[must_use]
    pub fn from_upstream(
        details: UpstreamPlaceDetails,
        internal_id: Option<Uuid>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let place = details.place;
        Self {
            internal_id,
            external_id: place.external_id,
            name: place.name,
            address: place.address,
            location: place.location,
            photo_reference: place.photo_reference,
            categories: place.categories,
            rating: place.rating,
            price_level: place.price_level,
            open_now: place.open_now,
            website: details.website,
            phone_number: details.phone_number,
            opening_hours: details.opening_hours,
            source: DetailsSource::Upstream,
            fetched_at: Some(fetched_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_serializes_with_client_field_names() {
        let result = PlaceSearchResult {
            internal_id: None,
            external_id: "ChIJabc".to_string(),
            name: "Zuni Cafe".to_string(),
            address: None,
            location: Some(LatLng {
                lat: 37.77,
                lng: -122.42,
            }),
            photo_reference: None,
            categories: vec!["restaurant".to_string()],
            rating: Some(4.4),
            price_level: Some(3),
            open_now: Some(true),
        };

        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["google_place_id"], "ChIJabc");
        assert_eq!(json["types"][0], "restaurant");
        assert!(json["id"].is_null());
        assert_eq!(json["location"]["lat"], 37.77);
    }

    #[test]
    fn details_from_record_leaves_live_only_fields_empty() {
        let record = PlaceRecord {
            internal_id: Uuid::new_v4(),
            external_id: "ChIJabc".to_string(),
            name: "Zuni Cafe".to_string(),
            address: Some("1658 Market St".to_string()),
            photo_reference: Some("ref".to_string()),
            categories: vec!["restaurant".to_string()],
            location: None,
            rating: Some(4.4),
            price_level: Some(3),
            last_fetched_at: None,
        };

        let details = PlaceDetails::from_record(record.clone());
        assert_eq!(details.internal_id, Some(record.internal_id));
        assert_eq!(details.source, DetailsSource::Cache);
        assert!(details.website.is_none());
        assert!(details.opening_hours.is_empty());

        let json = serde_json::to_value(&details).expect("serialize");
        assert_eq!(json["source"], "cache");
    }
}
