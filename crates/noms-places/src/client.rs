//! HTTP client for the Google Places web service.
//!
//! Wraps `reqwest` with API key management, typed response decoding, and the
//! translation of HTTP and envelope `status` outcomes into [`PlacesError`].
//! The client never retries; every request is bounded by the configured
//! timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::gateway::PlaceGateway;
use crate::model::{PlacePhoto, SearchQuery, UpstreamPlace, UpstreamPlaceDetails};
use crate::normalize::{normalize_details, normalize_place};
use crate::types::{DetailsResponse, SearchResponse};

/// Fields requested from the details endpoint. Anything not listed here is
/// billed but never read.
const DETAILS_FIELDS: &str = "place_id,name,formatted_address,geometry,photos,types,rating,\
                              price_level,opening_hours,website,formatted_phone_number";

const SEARCH_PLACE_TYPE: &str = "restaurant";

const DEFAULT_PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// Client for the Google Places web service.
///
/// Use [`GooglePlacesClient::new`] for production or
/// [`GooglePlacesClient::with_base_url`] to point at a mock server in tests.
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for GooglePlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePlacesClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl GooglePlacesClient {
    /// Creates a client pointed at the production Places endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Configuration`] if the API key is blank or the
    /// HTTP client cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, noms_core::DEFAULT_PLACES_BASE_URL)
    }

    /// Creates a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Configuration`] if `GOOGLE_PLACES_API_KEY` is
    /// unset or any client setting is invalid.
    pub fn from_config(config: &noms_core::AppConfig) -> Result<Self, PlacesError> {
        let api_key = config.google_places_api_key.as_deref().unwrap_or_default();
        Self::with_base_url(
            api_key,
            config.places_request_timeout_secs,
            &config.places_base_url,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Configuration`] if the API key is blank, the
    /// base URL does not parse, or the HTTP client cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        if api_key.trim().is_empty() {
            return Err(PlacesError::Configuration {
                status: "MISSING_API_KEY".to_string(),
                message: "GOOGLE_PLACES_API_KEY is not set".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("noms/0.1 (places-cache)")
            .build()
            .map_err(|e| PlacesError::Configuration {
                status: "CLIENT_BUILD".to_string(),
                message: e.to_string(),
            })?;

        // Exactly one trailing slash so Url::join appends to the path instead
        // of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::Configuration {
            status: "INVALID_BASE_URL".to_string(),
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Builds the request URL for `endpoint`, appending `extra` and the API
    /// key as percent-encoded query parameters.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::Configuration {
                status: "INVALID_BASE_URL".to_string(),
                message: format!("cannot build {endpoint} URL: {e}"),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET, checks the HTTP status, and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        op: &'static str,
        url: Url,
    ) -> Result<T, PlacesError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;

        let status = response.status();
        tracing::debug!(op, status = status.as_u16(), "places API responded");
        check_http_status(op, status)?;

        let body = response.text().await.map_err(|e| transport_error(op, e))?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Upstream {
            status: "INVALID_RESPONSE".to_string(),
            message: format!("{op}: {e}"),
        })
    }
}

#[async_trait]
impl PlaceGateway for GooglePlacesClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<UpstreamPlace>, PlacesError> {
        let location = format!("{},{}", query.location.lat, query.location.lng);
        let radius = query.radius_meters.to_string();
        let url = self.build_url(
            "textsearch/json",
            &[
                ("query", query.query.as_str()),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", SEARCH_PLACE_TYPE),
            ],
        )?;

        let response: SearchResponse = self.get_json("textsearch", url).await?;
        if response.status == "ZERO_RESULTS" {
            return Ok(Vec::new());
        }
        check_api_status("textsearch", &response.status, response.error_message)?;

        Ok(response.results.into_iter().map(normalize_place).collect())
    }

    async fn details(
        &self,
        external_id: &str,
    ) -> Result<Option<UpstreamPlaceDetails>, PlacesError> {
        let url = self.build_url(
            "details/json",
            &[("place_id", external_id), ("fields", DETAILS_FIELDS)],
        )?;

        let response: DetailsResponse = self.get_json("details", url).await?;
        if matches!(response.status.as_str(), "NOT_FOUND" | "ZERO_RESULTS") {
            return Ok(None);
        }
        check_api_status("details", &response.status, response.error_message)?;

        let raw = response.result.ok_or_else(|| PlacesError::Upstream {
            status: response.status.clone(),
            message: "details: response has no result".to_string(),
        })?;
        Ok(Some(normalize_details(raw)))
    }

    async fn photo(
        &self,
        photo_reference: &str,
        max_width: u32,
    ) -> Result<Option<PlacePhoto>, PlacesError> {
        let max_width = max_width.to_string();
        let url = self.build_url(
            "photo",
            &[
                ("photo_reference", photo_reference),
                ("maxwidth", max_width.as_str()),
            ],
        )?;

        // Redirects to the image host are followed by reqwest.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error("photo", e))?;

        let status = response.status();
        tracing::debug!(op = "photo", status = status.as_u16(), "places API responded");

        // Upstream answers an unknown or expired reference with 400.
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_http_status("photo", status)?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or_else(|| DEFAULT_PHOTO_CONTENT_TYPE.to_string(), str::to_owned);
        check_photo_content_type(&content_type)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error("photo", e))?;

        Ok(Some(PlacePhoto {
            bytes: bytes.to_vec(),
            content_type,
        }))
    }
}

/// A 2xx photo response that is not an image is an upstream fault.
fn check_photo_content_type(content_type: &str) -> Result<(), PlacesError> {
    let is_image = content_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"));
    if is_image {
        Ok(())
    } else {
        Err(PlacesError::Upstream {
            status: "INVALID_CONTENT_TYPE".to_string(),
            message: format!("photo response has content type {content_type}"),
        })
    }
}

/// Maps a non-2xx HTTP status onto the error taxonomy.
fn check_http_status(op: &str, status: StatusCode) -> Result<(), PlacesError> {
    if status.is_success() {
        return Ok(());
    }

    let label = format!("HTTP {}", status.as_u16());
    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(PlacesError::RateLimited { status: label }),
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(PlacesError::Configuration {
                status: label,
                message: format!("{op}: request rejected"),
            })
        }
        _ => Err(PlacesError::Upstream {
            status: label,
            message: format!("{op}: unexpected HTTP status"),
        }),
    }
}

/// Maps the envelope `status` onto the error taxonomy.
///
/// Only `OK` passes. Callers handle their own "empty" statuses before calling
/// this; anything unrecognised is an error, never a success.
fn check_api_status(
    op: &str,
    status: &str,
    error_message: Option<String>,
) -> Result<(), PlacesError> {
    let message = error_message.unwrap_or_else(|| format!("{op} failed"));
    match status {
        "OK" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(PlacesError::RateLimited {
            status: status.to_string(),
        }),
        "REQUEST_DENIED" | "INVALID_REQUEST" | "OVER_DAILY_LIMIT" => {
            Err(PlacesError::Configuration {
                status: status.to_string(),
                message,
            })
        }
        _ => Err(PlacesError::Upstream {
            status: status.to_string(),
            message,
        }),
    }
}

/// Transport-level failure. The URL is stripped because it carries the key.
fn transport_error(op: &str, error: reqwest::Error) -> PlacesError {
    let error = error.without_url();
    let message = if error.is_timeout() {
        format!("{op}: timed out")
    } else {
        format!("{op}: {error}")
    };
    PlacesError::Unavailable { message }
}
