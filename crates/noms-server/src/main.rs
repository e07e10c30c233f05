mod api;
mod middleware;

use std::sync::Arc;

use noms_places::{GooglePlacesClient, PgPlaceStore, PlacesCoordinator};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = noms_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = noms_db::PoolConfig::from_app_config(&config);
    let pool = noms_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = noms_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let gateway = GooglePlacesClient::from_config(&config)?;
    let store = PgPlaceStore::new(pool.clone());
    let places = PlacesCoordinator::new(Arc::new(gateway), Arc::new(store))
        .with_ttl_days(config.places_cache_ttl_days);

    let auth = AuthState::from_config(&config)?;
    let app = build_app(
        AppState {
            pool,
            places: Arc::new(places),
        },
        auth,
        default_rate_limit_state(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "noms-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
