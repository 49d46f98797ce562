use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quest_api::config::AppConfig;
use quest_api::database::users::PgUserStore;
use quest_api::database::{manager, schema};
use quest_api::routes;
use quest_api::search::PgSearchStore;
use quest_api::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "quest-api", about = "Authenticated search service")]
struct Args {
    /// Port to listen on; falls back to PORT, then the config default
    #[arg(long)]
    port: Option<u16>,

    /// Env file to load before configuration (default: ./.env if present)
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load env first so DATABASE_URL and the APP_ENV presets are visible
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Quest API in {:?} mode", config.environment);

    let pool = manager::connect(&config.database)
        .await
        .context("database connection failed")?;
    schema::ensure_schema(&pool)
        .await
        .context("schema bootstrap failed")?;

    let port = args.port.unwrap_or(config.server.port);

    let state = AppState::new(
        config,
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgSearchStore::new(pool)),
    );

    let app = routes::app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server")?;

    Ok(())
}
