//! Persistence seam for cached place rows.

use async_trait::async_trait;
use noms_db::{NewPlace, PlaceRow};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{LatLng, NewPlaceRecord, PlaceRecord};

#[async_trait]
pub trait PlaceStore: Send + Sync {
    async fn get_by_external_id(&self, external_id: &str)
        -> Result<Option<PlaceRecord>, StoreError>;

    /// Inserts or fully overwrites the row for `record.external_id` and
    /// returns its internal id, which never changes once assigned.
    async fn upsert_by_external_id(&self, record: &NewPlaceRecord) -> Result<Uuid, StoreError>;
}

/// [`PlaceStore`] backed by the Postgres `places` table.
#[derive(Debug, Clone)]
pub struct PgPlaceStore {
    pool: PgPool,
}

impl PgPlaceStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceStore for PgPlaceStore {
    async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<PlaceRecord>, StoreError> {
        let row = noms_db::get_place_by_google_id(&self.pool, external_id).await?;
        Ok(row.map(record_from_row))
    }

    async fn upsert_by_external_id(&self, record: &NewPlaceRecord) -> Result<Uuid, StoreError> {
        let id = noms_db::upsert_place(&self.pool, &new_place_from_record(record)).await?;
        Ok(id)
    }
}

fn record_from_row(row: PlaceRow) -> PlaceRecord {
    let location = match (row.latitude, row.longitude) {
        (Some(lat), Some(lng)) => Some(LatLng { lat, lng }),
        _ => None,
    };

    PlaceRecord {
        internal_id: row.id,
        external_id: row.google_place_id,
        name: row.name,
        address: row.address,
        photo_reference: row.photo_reference,
        categories: row.types,
        location,
        rating: row.rating,
        price_level: row.price_level,
        last_fetched_at: row.last_fetched_at,
    }
}

fn new_place_from_record(record: &NewPlaceRecord) -> NewPlace {
    NewPlace {
        google_place_id: record.external_id.clone(),
        name: record.name.clone(),
        address: record.address.clone(),
        photo_reference: record.photo_reference.clone(),
        types: record.categories.clone(),
        latitude: record.location.map(|l| l.lat),
        longitude: record.location.map(|l| l.lng),
        rating: record.rating,
        price_level: record.price_level,
        last_fetched_at: record.fetched_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(latitude: Option<f64>, longitude: Option<f64>) -> PlaceRow {
        let now = Utc::now();
        PlaceRow {
            id: Uuid::new_v4(),
            google_place_id: "ChIJrow".to_string(),
            name: "Flour + Water".to_string(),
            address: Some("2401 Harrison St".to_string()),
            photo_reference: None,
            types: vec!["restaurant".to_string()],
            latitude,
            longitude,
            rating: Some(4.3),
            price_level: Some(3),
            last_fetched_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_with_both_coordinates_has_location() {
        let record = record_from_row(row(Some(37.759), Some(-122.412)));
        assert_eq!(
            record.location,
            Some(LatLng {
                lat: 37.759,
                lng: -122.412
            })
        );
        assert_eq!(record.external_id, "ChIJrow");
    }

    #[test]
    fn row_with_half_a_coordinate_has_no_location() {
        let record = record_from_row(row(Some(37.759), None));
        assert!(record.location.is_none());
    }

    #[test]
    fn record_maps_to_new_place_columns() {
        let fetched_at = Utc::now();
        let record = NewPlaceRecord {
            external_id: "ChIJnew".to_string(),
            name: "Lazy Bear".to_string(),
            address: None,
            photo_reference: Some("ref".to_string()),
            categories: vec!["bar".to_string()],
            location: Some(LatLng {
                lat: 37.76,
                lng: -122.42,
            }),
            rating: None,
            price_level: Some(4),
            fetched_at,
        };

        let place = new_place_from_record(&record);
        assert_eq!(place.google_place_id, "ChIJnew");
        assert_eq!(place.types, vec!["bar"]);
        assert_eq!(place.latitude, Some(37.76));
        assert_eq!(place.longitude, Some(-122.42));
        assert_eq!(place.last_fetched_at, fetched_at);
    }
}
