//! Rent orchestration and rental history service
//!
//! Renting books touches two systems: the local rental history and the remote
//! transaction service. The flow is strictly sequential:
//!
//! 1. write the history rows (one local transaction),
//! 2. resolve the user's name,
//! 3. price every line,
//! 4. open a remote transaction,
//! 5. add one remote item per line.
//!
//! Only step 5 is compensated (the remote transaction is deleted). History rows
//! written in step 1 are never rolled back, so callers get a [`Reconciliation`]
//! telling them what a failed request left behind.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        rent::{BorrowedBook, RentReceipt, RentRequest, RentalLine},
        transaction::{BookSnapshot, CreateTransaction, CreateTransactionItem},
        user::User,
    },
    repository::{books::BooksRepository, rents::RentsRepository, users::UsersRepository, Repository},
};

use super::transaction_client::{ClientError, TransactionClient};

/// Writes the rental history rows of one request atomically
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryWriter: Send + Sync {
    async fn create_history(&self, user_id: i32, lines: &[RentalLine]) -> AppResult<Vec<i32>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_user(&self, user_id: i32) -> AppResult<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookLookup: Send + Sync {
    async fn find_book(&self, book_id: i32) -> AppResult<Option<Book>>;
}

#[async_trait]
impl HistoryWriter for RentsRepository {
    async fn create_history(&self, user_id: i32, lines: &[RentalLine]) -> AppResult<Vec<i32>> {
        RentsRepository::create_history(self, user_id, lines).await
    }
}

#[async_trait]
impl UserLookup for UsersRepository {
    async fn find_user(&self, user_id: i32) -> AppResult<Option<User>> {
        self.find_by_id(user_id).await
    }
}

#[async_trait]
impl BookLookup for BooksRepository {
    async fn find_book(&self, book_id: i32) -> AppResult<Option<Book>> {
        self.find_by_id(book_id).await
    }
}

/// What a failed rent left persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    NothingPersisted,
    /// History rows exist but no transaction was recorded
    HistoryOnly,
    /// History rows exist, the transaction was opened then deleted
    TransactionRolledBack,
    /// History rows exist and a partial transaction could not be deleted
    TransactionOrphaned,
}

#[derive(Debug, Error)]
pub enum RentError {
    #[error("{0}")]
    Validation(String),

    #[error("couldn't record rental history: {0}")]
    HistoryWrite(Box<AppError>),

    #[error("user {0} not found")]
    UserNotFound(i32),

    #[error("book {0} not found")]
    BookNotFound(i32),

    #[error("lookup failed after history was recorded: {0}")]
    Lookup(Box<AppError>),

    #[error("couldn't open transaction: {0}")]
    TransactionCreate(#[source] ClientError),

    #[error("transaction {transaction_id} rolled back after item failure: {source}")]
    ItemsRolledBack {
        transaction_id: i64,
        source: ClientError,
    },

    #[error("transaction {transaction_id} left behind: item failed ({item_error}), delete failed ({delete_error})")]
    CompensationFailed {
        transaction_id: i64,
        item_error: String,
        delete_error: String,
    },

    /// The recording task died, the transaction may be partial
    #[error("transaction recording task failed: {0}")]
    TransactionTask(String),
}

impl RentError {
    pub fn reconciliation(&self) -> Reconciliation {
        match self {
            RentError::Validation(_) | RentError::HistoryWrite(_) => Reconciliation::NothingPersisted,
            RentError::UserNotFound(_)
            | RentError::BookNotFound(_)
            | RentError::Lookup(_)
            | RentError::TransactionCreate(_) => Reconciliation::HistoryOnly,
            RentError::ItemsRolledBack { .. } => Reconciliation::TransactionRolledBack,
            RentError::CompensationFailed { .. } | RentError::TransactionTask(_) => {
                Reconciliation::TransactionOrphaned
            }
        }
    }
}

/// Composes history, lookups and the transaction client into one rent operation
#[derive(Clone)]
pub struct RentOrchestrator {
    history: Arc<dyn HistoryWriter>,
    users: Arc<dyn UserLookup>,
    books: Arc<dyn BookLookup>,
    transactions: Arc<dyn TransactionClient>,
}

impl RentOrchestrator {
    pub fn new(
        history: Arc<dyn HistoryWriter>,
        users: Arc<dyn UserLookup>,
        books: Arc<dyn BookLookup>,
        transactions: Arc<dyn TransactionClient>,
    ) -> Self {
        Self {
            history,
            users,
            books,
            transactions,
        }
    }

    /// Record the rental and its financial transaction
    pub async fn rent_books(&self, user_id: i32, lines: &[RentalLine]) -> Result<RentReceipt, RentError> {
        let result = self.run(user_id, lines).await;

        match &result {
            Ok(receipt) => tracing::info!(
                user_id,
                transaction_id = receipt.transaction_id,
                amount = %receipt.amount,
                "Books rented"
            ),
            Err(err) => match err.reconciliation() {
                Reconciliation::NothingPersisted => {
                    tracing::warn!(user_id, error = %err, "Rent rejected")
                }
                state => tracing::error!(
                    user_id,
                    reconciliation = ?state,
                    error = %err,
                    "Rent failed after rental history was recorded"
                ),
            },
        }

        result
    }

    async fn run(&self, user_id: i32, lines: &[RentalLine]) -> Result<RentReceipt, RentError> {
        if lines.is_empty() {
            return Err(RentError::Validation("At least one book is required".to_string()));
        }
        if let Some(line) = lines.iter().find(|line| line.quantity < 1) {
            return Err(RentError::Validation(format!(
                "Quantity for book {} must be at least 1",
                line.book_id
            )));
        }

        let history_ids = self
            .history
            .create_history(user_id, lines)
            .await
            .map_err(|e| RentError::HistoryWrite(Box::new(e)))?;

        let user = self
            .users
            .find_user(user_id)
            .await
            .map_err(|e| RentError::Lookup(Box::new(e)))?
            .ok_or(RentError::UserNotFound(user_id))?;

        let mut amount = Decimal::ZERO;
        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let book = self
                .books
                .find_book(line.book_id)
                .await
                .map_err(|e| RentError::Lookup(Box::new(e)))?
                .ok_or(RentError::BookNotFound(line.book_id))?;
            amount += book.price * Decimal::from(line.quantity);
            priced.push((book, line.quantity));
        }

        // Opening the transaction, writing its items and compensating run on
        // their own task so a dropped request cannot leave a partial record.
        let recording = tokio::spawn(record_transaction(
            Arc::clone(&self.transactions),
            CreateTransaction {
                user_name: user.full_name,
                amount,
            },
            priced,
        ));

        let transaction_id = recording
            .await
            .map_err(|e| RentError::TransactionTask(e.to_string()))??;

        Ok(RentReceipt {
            transaction_id,
            history_ids,
            amount,
        })
    }
}

/// Open a transaction and add one item per priced line. On the first item
/// failure the transaction is deleted.
async fn record_transaction(
    client: Arc<dyn TransactionClient>,
    transaction: CreateTransaction,
    priced: Vec<(Book, i32)>,
) -> Result<i64, RentError> {
    let transaction_id = client
        .create_transaction(transaction)
        .await
        .map_err(RentError::TransactionCreate)?;

    for (book, quantity) in priced {
        let item = CreateTransactionItem {
            transaction_id,
            book: BookSnapshot {
                title: book.name,
                author: book.author,
                price: book.price,
            },
            quantity,
        };

        if let Err(item_error) = client.create_transaction_item(item).await {
            return Err(compensate(client.as_ref(), transaction_id, item_error).await);
        }
    }

    Ok(transaction_id)
}

async fn compensate(
    client: &dyn TransactionClient,
    transaction_id: i64,
    item_error: ClientError,
) -> RentError {
    match client.delete_transaction(transaction_id).await {
        Ok(()) => {
            tracing::warn!(transaction_id, error = %item_error, "Transaction rolled back");
            RentError::ItemsRolledBack {
                transaction_id,
                source: item_error,
            }
        }
        Err(delete_error) => {
            tracing::error!(
                transaction_id,
                reconciliation = ?Reconciliation::TransactionOrphaned,
                item_error = %item_error,
                delete_error = %delete_error,
                "Transaction could not be rolled back"
            );
            RentError::CompensationFailed {
                transaction_id,
                item_error: item_error.to_string(),
                delete_error: delete_error.to_string(),
            }
        }
    }
}

/// Rental history service
#[derive(Clone)]
pub struct RentsService {
    repository: Repository,
    orchestrator: RentOrchestrator,
}

impl RentsService {
    pub fn new(repository: Repository, transactions: Arc<dyn TransactionClient>) -> Self {
        let orchestrator = RentOrchestrator::new(
            Arc::new(repository.rents.clone()),
            Arc::new(repository.users.clone()),
            Arc::new(repository.books.clone()),
            transactions,
        );
        Self {
            repository,
            orchestrator,
        }
    }

    pub async fn rent_books(&self, user_id: i32, request: RentRequest) -> AppResult<RentReceipt> {
        request
            .validate()
            .map_err(|e| RentError::Validation(e.to_string()))?;
        Ok(self.orchestrator.rent_books(user_id, &request.books).await?)
    }

    pub async fn current_borrowed(&self) -> AppResult<Vec<BorrowedBook>> {
        self.repository.rents.current_borrowed().await
    }

    /// Unreturned rentals created in the last 30 days
    pub async fn last_month(&self) -> AppResult<Vec<BorrowedBook>> {
        self.repository
            .rents
            .open_since(Utc::now() - Duration::days(30))
            .await
    }

    pub async fn mark_returned(&self, id: i32) -> AppResult<i32> {
        self.repository.rents.mark_returned(id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<i32> {
        self.repository.rents.delete(id).await?;
        Ok(id)
    }
}
