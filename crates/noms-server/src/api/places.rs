use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use noms_places::{LatLng, PlaceDetails, PlaceSearchResult, SearchQuery, DEFAULT_PHOTO_WIDTH};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_places_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) const DEFAULT_RADIUS_METERS: u32 = 1000;
pub(super) const MIN_RADIUS_METERS: u32 = 100;
pub(super) const MAX_RADIUS_METERS: u32 = 50_000;

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchParams {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoParams {
    pub max_width: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    places: Vec<PlaceSearchResult>,
    count: usize,
}

/// Checks search parameters and builds the coordinator query.
pub(super) fn validate_search(params: SearchParams) -> Result<SearchQuery, String> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err("q must not be empty".to_string());
    }

    let lat = params.lat.ok_or("lat is required")?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err("lat must be between -90 and 90".to_string());
    }

    let lng = params.lng.ok_or("lng is required")?;
    if !(-180.0..=180.0).contains(&lng) {
        return Err("lng must be between -180 and 180".to_string());
    }

    let radius_meters = params.radius.unwrap_or(DEFAULT_RADIUS_METERS);
    if !(MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&radius_meters) {
        return Err(format!(
            "radius must be between {MIN_RADIUS_METERS} and {MAX_RADIUS_METERS}"
        ));
    }

    Ok(SearchQuery {
        query: query.to_string(),
        location: LatLng { lat, lng },
        radius_meters,
    })
}

pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let Query(params) = params
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;
    let query = validate_search(params)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let places = state
        .places
        .search_places(&query)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?
        .into_value();

    Ok(Json(ApiResponse {
        data: SearchData {
            count: places.len(),
            places,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_place(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(google_place_id): Path<String>,
) -> Result<Json<ApiResponse<PlaceDetails>>, ApiError> {
    let details = state
        .places
        .get_place_details(&google_place_id)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "place not found"))?;

    Ok(Json(ApiResponse {
        data: details.into_value(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_place_photo(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(google_place_id): Path<String>,
    params: Result<Query<PhotoParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;
    let max_width = params.max_width.unwrap_or(DEFAULT_PHOTO_WIDTH);

    let photo = state
        .places
        .get_place_photo(&google_place_id, max_width)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0, "not_found", "photo not found"))?;

    Ok(([(header::CONTENT_TYPE, photo.content_type)], photo.bytes).into_response())
}
