//! Transactions repository, used by the transaction service only

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::transaction::{CreateTransactionItem, Transaction, TransactionDetails, TransactionItem},
};

use super::map_constraint_error;

#[derive(Clone)]
pub struct TransactionsRepository {
    pool: Pool<Postgres>,
}

impl TransactionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_name: &str, amount: Decimal) -> AppResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO transactions (user_name, amount) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_name)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn create_item(&self, item: &CreateTransactionItem) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO transaction_items (transaction_id, book_title, book_author, price, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(item.transaction_id)
        .bind(&item.book.title)
        .bind(&item.book.author)
        .bind(item.book.price)
        .bind(item.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_constraint_error(e, "Duplicate item", "") {
            AppError::Validation(_) => {
                AppError::NotFound(format!("Transaction {} not found", item.transaction_id))
            }
            other => other,
        })
    }

    pub async fn get_with_items(&self, id: i64) -> AppResult<TransactionDetails> {
        let transaction = sqlx::query_as::<_, Transaction>(
            "SELECT id, user_name, amount, created_at FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;

        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT id, transaction_id, book_title, book_author, price, quantity
            FROM transaction_items
            WHERE transaction_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(TransactionDetails { transaction, items })
    }

    /// Delete a transaction; its items are removed by cascade
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Transaction {} not found", id)));
        }

        Ok(())
    }
}
