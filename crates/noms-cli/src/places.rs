//! Place lookup command handlers for the CLI.
//!
//! Both subcommands go through the same coordinator the server uses, so a
//! search warms the cache and a details lookup honours the freshness window.

use std::sync::Arc;

use clap::Subcommand;
use noms_places::{
    GooglePlacesClient, LatLng, PgPlaceStore, PlaceSearchResult, PlacesCoordinator, SearchQuery,
};

/// Sub-commands available under `places`.
#[derive(Debug, Subcommand)]
pub enum PlacesCommands {
    /// Text search near a point and cache every hit
    Search {
        /// Free-text query (e.g. "ramen")
        #[arg(long)]
        query: String,
        /// Latitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters
        #[arg(long, default_value = "1000")]
        radius: u32,
    },
    /// Show details for one place, from cache when fresh
    Details {
        /// Google place id
        google_place_id: String,
    },
}

fn build_coordinator(
    pool: &sqlx::PgPool,
    config: &noms_core::AppConfig,
) -> anyhow::Result<PlacesCoordinator> {
    let gateway = GooglePlacesClient::from_config(config)?;
    let store = PgPlaceStore::new(pool.clone());
    Ok(PlacesCoordinator::new(Arc::new(gateway), Arc::new(store))
        .with_ttl_days(config.places_cache_ttl_days))
}

fn format_result_line(index: usize, place: &PlaceSearchResult) -> String {
    let address = place.address.as_deref().unwrap_or("-");
    let rating = place
        .rating
        .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
    format!(
        "{:>2}. {} [{}] {} (rating {})",
        index + 1,
        place.name,
        place.external_id,
        address,
        rating
    )
}

/// Dispatch a `places` subcommand.
///
/// # Errors
///
/// Returns an error if the gateway cannot be built, the upstream call fails,
/// or a details lookup finds nothing.
pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &noms_core::AppConfig,
    command: PlacesCommands,
) -> anyhow::Result<()> {
    let coordinator = build_coordinator(pool, config)?;

    match command {
        PlacesCommands::Search {
            query,
            lat,
            lng,
            radius,
        } => {
            let outcome = coordinator
                .search_places(&SearchQuery {
                    query,
                    location: LatLng { lat, lng },
                    radius_meters: radius,
                })
                .await?;

            if outcome.is_degraded() {
                tracing::warn!(
                    failures = outcome.cache_failures.len(),
                    "some results could not be cached"
                );
            }
            for (index, place) in outcome.value.iter().enumerate() {
                println!("{}", format_result_line(index, place));
            }
            println!("{} result(s)", outcome.value.len());
        }
        PlacesCommands::Details { google_place_id } => {
            let Some(outcome) = coordinator.get_place_details(&google_place_id).await? else {
                anyhow::bail!("place {google_place_id} not found");
            };
            println!("{}", serde_json::to_string_pretty(&outcome.value)?);
        }
    }

    Ok(())
}
