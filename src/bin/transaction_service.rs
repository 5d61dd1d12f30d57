//! Bookrent transaction service
//!
//! Records the monetary transactions and line items of rentals.

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;

use bookrent_server::{
    api,
    config::TransactionServiceConfig,
    logging,
    repository::transactions::TransactionsRepository,
    services::transactions::TransactionsService,
    TransactionState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = TransactionServiceConfig::load()?;
    logging::init(&config.logging);

    tracing::info!("Starting Bookrent Transaction Service v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./transaction_migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let state = TransactionState {
        transactions: TransactionsService::new(TransactionsRepository::new(pool)),
    };
    let app = api::transactions::router(state, config.server.request_timeout());

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Transaction service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
