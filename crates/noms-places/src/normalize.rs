//! Conversion from upstream wire shapes into domain types.

use crate::model::{LatLng, UpstreamPlace, UpstreamPlaceDetails};
use crate::types::RawPlace;

/// Flattens a raw place into an [`UpstreamPlace`].
///
/// `vicinity` wins over `formatted_address`; only the first photo is kept.
#[must_use]
pub fn normalize_place(raw: RawPlace) -> UpstreamPlace {
    split_details(raw).place
}

/// Flattens a raw details result, keeping the details-only fields.
#[must_use]
pub fn normalize_details(raw: RawPlace) -> UpstreamPlaceDetails {
    split_details(raw)
}

fn split_details(raw: RawPlace) -> UpstreamPlaceDetails {
    let (open_now, opening_hours) = match raw.opening_hours {
        Some(hours) => (hours.open_now, hours.weekday_text),
        None => (None, Vec::new()),
    };

    let place = UpstreamPlace {
        external_id: raw.place_id,
        name: raw.name,
        address: raw
            .vicinity
            .filter(|a| !a.trim().is_empty())
            .or(raw.formatted_address)
            .filter(|a| !a.trim().is_empty()),
        location: raw.geometry.map(|g| LatLng {
            lat: g.location.lat,
            lng: g.location.lng,
        }),
        photo_reference: raw.photos.into_iter().next().map(|p| p.photo_reference),
        categories: raw.types,
        rating: raw.rating,
        price_level: raw.price_level,
        open_now,
    };

    UpstreamPlaceDetails {
        place,
        website: raw.website,
        phone_number: raw.formatted_phone_number,
        opening_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawPlace {
        serde_json::from_value(json).expect("valid raw place")
    }

    #[test]
    fn prefers_vicinity_over_formatted_address() {
        let place = normalize_place(raw(serde_json::json!({
            "place_id": "ChIJ1",
            "name": "Nopa",
            "formatted_address": "560 Divisadero St, San Francisco",
            "vicinity": "560 Divisadero St"
        })));
        assert_eq!(place.address.as_deref(), Some("560 Divisadero St"));
    }

    #[test]
    fn falls_back_to_formatted_address_when_vicinity_is_blank() {
        let details = normalize_details(raw(serde_json::json!({
            "place_id": "ChIJ4",
            "name": "Zuni Cafe",
            "vicinity": "  ",
            "formatted_address": "1658 Market St, San Francisco"
        })));
        assert_eq!(
            details.place.address.as_deref(),
            Some("1658 Market St, San Francisco")
        );
    }

    #[test]
    fn falls_back_to_vicinity_and_first_photo() {
        let place = normalize_place(raw(serde_json::json!({
            "place_id": "ChIJ2",
            "name": "Souvla",
            "vicinity": "517 Hayes St",
            "photos": [
                { "photo_reference": "first", "width": 400, "height": 300 },
                { "photo_reference": "second" }
            ],
            "geometry": { "location": { "lat": 37.776, "lng": -122.426 } },
            "opening_hours": { "open_now": false }
        })));
        assert_eq!(place.address.as_deref(), Some("517 Hayes St"));
        assert_eq!(place.photo_reference.as_deref(), Some("first"));
        assert_eq!(
            place.location,
            Some(LatLng {
                lat: 37.776,
                lng: -122.426
            })
        );
        assert_eq!(place.open_now, Some(false));
    }

    #[test]
    fn details_keep_contact_fields_and_hours() {
        let details = normalize_details(raw(serde_json::json!({
            "place_id": "ChIJ3",
            "name": "State Bird Provisions",
            "types": ["restaurant", "food", "point_of_interest"],
            "website": "https://statebirdsf.com",
            "formatted_phone_number": "(415) 795-1272",
            "opening_hours": {
                "open_now": true,
                "weekday_text": ["Monday: Closed", "Tuesday: 5:30 – 10:00 PM"]
            }
        })));
        assert_eq!(details.place.categories.len(), 3);
        assert_eq!(details.website.as_deref(), Some("https://statebirdsf.com"));
        assert_eq!(details.phone_number.as_deref(), Some("(415) 795-1272"));
        assert_eq!(details.opening_hours.len(), 2);
        assert_eq!(details.place.open_now, Some(true));
        assert!(details.place.address.is_none());
    }
}
