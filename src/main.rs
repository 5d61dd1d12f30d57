//! Bookrent library service
//!
//! Serves accounts, the book catalog and rentals over REST.

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;

use bookrent_server::{
    api,
    config::AppConfig,
    logging,
    repository::Repository,
    services::{transaction_client::HttpTransactionClient, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init(&config.logging);

    tracing::info!("Starting Bookrent Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let transactions = HttpTransactionClient::new(&config.transactions)?;
    tracing::info!(base_url = %config.transactions.base_url, "Transaction service client ready");

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config.auth, Arc::new(transactions));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
