//! Places cache and upstream gateway.
//!
//! [`PlacesCoordinator`] sits between request handlers and two injected
//! collaborators: a [`PlaceGateway`] (the Google Places web service via
//! [`GooglePlacesClient`]) and a [`PlaceStore`] (the Postgres `places` table
//! via [`PgPlaceStore`]).

pub mod client;
pub mod coordinator;
pub mod error;
pub mod freshness;
pub mod gateway;
pub mod model;
pub mod normalize;
pub mod store;
pub mod types;

pub use client::GooglePlacesClient;
pub use coordinator::{
    clamp_photo_width, Outcome, PlacesCoordinator, DEFAULT_PHOTO_WIDTH, MAX_PHOTO_WIDTH,
};
pub use error::{CacheWriteFailure, PlacesError, StoreError};
pub use freshness::{classify, Freshness, DEFAULT_CACHE_TTL_DAYS};
pub use gateway::PlaceGateway;
pub use model::{
    DetailsSource, LatLng, NewPlaceRecord, PlaceDetails, PlacePhoto, PlaceRecord,
    PlaceSearchResult, SearchQuery, UpstreamPlace, UpstreamPlaceDetails,
};
pub use store::{PgPlaceStore, PlaceStore};
