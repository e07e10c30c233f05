//! Google Places web service response types.
//!
//! These model the JSON returned by the legacy `textsearch` and `details`
//! endpoints. Every response carries a top-level `status` string; the client
//! inspects it before touching the payload. Nothing outside the gateway sees
//! these types.

use serde::Deserialize;

/// Envelope for `textsearch/json`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<RawPlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Envelope for `details/json`.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<RawPlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A place as returned by either search or details.
///
/// Details responses only include the fields requested via `fields=`; search
/// responses use `vicinity` or `formatted_address` depending on the query.
#[derive(Debug, Deserialize)]
pub struct RawPlace {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
    #[serde(default)]
    pub photos: Vec<RawPhoto>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<i16>,
    #[serde(default)]
    pub opening_hours: Option<RawOpeningHours>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawGeometry {
    pub location: RawLatLng,
}

#[derive(Debug, Deserialize)]
pub struct RawLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawPhoto {
    pub photo_reference: String,
}

#[derive(Debug, Deserialize)]
pub struct RawOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}
