mod places;


use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::places::PlacesCommands;

#[derive(Debug, Parser)]
#[command(name = "noms-cli")]
#[command(about = "Noms backend command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Query places through the cache
    Places {
        #[command(subcommand)]
        command: PlacesCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = noms_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = noms_db::PoolConfig::from_app_config(&config);
    let pool = noms_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Migrate => {
            let applied = noms_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Places { command } => places::run(&pool, &config, command).await?,
    }

    Ok(())
}
