use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use common::storage::filesystem::LocalFileStore;
use tracing::{Level, info};

use storeadmin::config::AppConfig;
use storeadmin::database::init_db;
use storeadmin::repository::SeaOrmBrandRepository;
use storeadmin::state::AppState;
use storeadmin::utils::hash::hash_password;
use storeadmin::views::Views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("hash-password") {
        let password = args
            .next()
            .context("usage: storeadmin hash-password <password>")?;
        let hash = hash_password(&password).map_err(|e| anyhow!("Password hash error: {e}"))?;
        println!("{hash}");
        return Ok(());
    }

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;

    let file_store = LocalFileStore::new(
        config.storage.root.clone(),
        config.storage.url_prefix.clone(),
        config.storage.max_file_size,
    )
    .await
    .context("Failed to initialize file storage")?;

    let views = Views::new(&config.views).context("Failed to compile page shell")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        config,
        brands: Arc::new(SeaOrmBrandRepository::new(db)),
        file_store: Arc::new(file_store),
        views: Arc::new(views),
    };

    let app = storeadmin::build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
