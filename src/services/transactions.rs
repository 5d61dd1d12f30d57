//! Transaction service business logic

use validator::Validate;

use crate::{
    error::AppResult,
    models::transaction::{CreateTransaction, CreateTransactionItem, TransactionDetails},
    repository::transactions::TransactionsRepository,
};

#[derive(Clone)]
pub struct TransactionsService {
    repository: TransactionsRepository,
}

impl TransactionsService {
    pub fn new(repository: TransactionsRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateTransaction) -> AppResult<i64> {
        request.validate()?;
        let id = self
            .repository
            .create(request.user_name.trim(), request.amount)
            .await?;
        tracing::info!(transaction_id = id, amount = %request.amount, "Transaction created");
        Ok(id)
    }

    pub async fn add_item(&self, item: CreateTransactionItem) -> AppResult<i64> {
        item.validate()?;
        let id = self.repository.create_item(&item).await?;
        tracing::debug!(transaction_id = item.transaction_id, item_id = id, "Transaction item added");
        Ok(id)
    }

    pub async fn get(&self, id: i64) -> AppResult<TransactionDetails> {
        self.repository.get_with_items(id).await
    }

    /// Remove a transaction and all of its items
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.delete(id).await?;
        tracing::info!(transaction_id = id, "Transaction deleted");
        Ok(())
    }
}
