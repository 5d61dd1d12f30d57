//! Bookrent book lending backend
//!
//! Two HTTP services share this crate: the library service (accounts, catalog,
//! rentals) and the transaction service that records what each rental cost.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all library handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// State of the transaction service
#[derive(Clone)]
pub struct TransactionState {
    pub transactions: services::transactions::TransactionsService,
}
