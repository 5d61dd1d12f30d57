//! Repository layer for database operations

pub mod books;
pub mod rents;
pub mod transactions;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppError;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub rents: rents::RentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            rents: rents::RentsRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Turn constraint violations into typed errors, everything else stays a database error.
pub(crate) fn map_constraint_error(err: sqlx::Error, conflict: &str, missing_reference: &str) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::Conflict(conflict.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::Validation(missing_reference.to_string());
        }
    }
    AppError::Database(err)
}
