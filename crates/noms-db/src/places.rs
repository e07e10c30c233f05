//! Database operations for the `places` cache table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `places` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PlaceRow {
    pub id: Uuid,
    pub google_place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub photo_reference: Option<String>,
    pub types: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub price_level: Option<i16>,
    /// `NULL` for rows written before fetch tracking existed; such rows are
    /// always refetched.
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input record for upserting a place snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    pub google_place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub photo_reference: Option<String>,
    pub types: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub price_level: Option<i16>,
    pub last_fetched_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// places operations
// ---------------------------------------------------------------------------

/// Fetches a cached place by its upstream identifier.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or a column cannot be decoded.
pub async fn get_place_by_google_id(
    pool: &PgPool,
    google_place_id: &str,
) -> Result<Option<PlaceRow>, DbError> {
    let row = sqlx::query_as::<_, PlaceRow>(
        "SELECT id, google_place_id, name, address, photo_reference, types, \
                latitude, longitude, rating, price_level, last_fetched_at, \
                created_at, updated_at \
         FROM places \
         WHERE google_place_id = $1",
    )
    .bind(google_place_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts a place snapshot keyed on `google_place_id`.
///
/// Conflicts overwrite every descriptive column and `last_fetched_at` with
/// the incoming snapshot. `id` is left untouched so the internal identifier
/// survives refreshes. Concurrent writers for the same key resolve as
/// last-writer-wins.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_place(pool: &PgPool, place: &NewPlace) -> Result<Uuid, DbError> {
    let id: Uuid = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO places \
             (google_place_id, name, address, photo_reference, types, \
              latitude, longitude, rating, price_level, last_fetched_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (google_place_id) DO UPDATE SET \
             name            = EXCLUDED.name, \
             address         = EXCLUDED.address, \
             photo_reference = EXCLUDED.photo_reference, \
             types           = EXCLUDED.types, \
             latitude        = EXCLUDED.latitude, \
             longitude       = EXCLUDED.longitude, \
             rating          = EXCLUDED.rating, \
             price_level     = EXCLUDED.price_level, \
             last_fetched_at = EXCLUDED.last_fetched_at, \
             updated_at      = NOW() \
         RETURNING id",
    )
    .bind(&place.google_place_id)
    .bind(&place.name)
    .bind(&place.address)
    .bind(&place.photo_reference)
    .bind(&place.types)
    .bind(place.latitude)
    .bind(place.longitude)
    .bind(place.rating)
    .bind(place.price_level)
    .bind(place.last_fetched_at)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
