use async_trait::async_trait;

use crate::error::PlacesError;
use crate::model::{PlacePhoto, SearchQuery, UpstreamPlace, UpstreamPlaceDetails};

/// The upstream places provider, already translated into domain types and
/// the [`PlacesError`] taxonomy.
///
/// Implementations must not retry internally and must bound every call with
/// a timeout.
#[async_trait]
pub trait PlaceGateway: Send + Sync {
    /// Text search around a point. An upstream "no results" is an empty vec.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<UpstreamPlace>, PlacesError>;

    /// Full details for one place, or `None` if upstream does not know it.
    async fn details(&self, external_id: &str)
        -> Result<Option<UpstreamPlaceDetails>, PlacesError>;

    /// Photo bytes for a reference, or `None` if upstream has no such photo.
    async fn photo(
        &self,
        photo_reference: &str,
        max_width: u32,
    ) -> Result<Option<PlacePhoto>, PlacesError>;
}
