//! Book issue history (rentals) repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::rent::{BIHistory, BorrowedBook, RentalLine},
};

use super::map_constraint_error;

const BORROWED_BOOK_COLUMNS: &str = r#"
    h.id, u.full_name AS user_name, b.name AS book_name, b.author AS book_author,
    h.quantity, h.created_at AS issue_date, h.return_date
"#;

#[derive(Clone)]
pub struct RentsRepository {
    pool: Pool<Postgres>,
}

impl RentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert one history row per line, all in a single transaction.
    ///
    /// Rows share the user and the creation time. Unknown users or books
    /// violate the foreign keys and roll the whole insert back.
    pub async fn create_history(&self, user_id: i32, lines: &[RentalLine]) -> AppResult<Vec<i32>> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(lines.len());

        for line in lines {
            let id = sqlx::query_scalar::<_, i32>(
                r#"
                INSERT INTO book_issue_history (user_id, book_id, quantity, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(user_id)
            .bind(line.book_id)
            .bind(line.quantity)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                map_constraint_error(
                    e,
                    "Duplicate rental row",
                    &format!("Unknown user {} or book {}", user_id, line.book_id),
                )
            })?;
            ids.push(id);
        }

        tx.commit().await?;
        Ok(ids)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BIHistory> {
        sqlx::query_as::<_, BIHistory>(
            r#"
            SELECT id, user_id, book_id, quantity, created_at, return_date
            FROM book_issue_history WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rental history {} not found", id)))
    }

    /// Books not returned yet
    pub async fn current_borrowed(&self) -> AppResult<Vec<BorrowedBook>> {
        let query = format!(
            r#"
            SELECT {}
            FROM book_issue_history h
            JOIN users u ON u.id = h.user_id
            JOIN books b ON b.id = h.book_id
            WHERE h.return_date IS NULL
            ORDER BY h.created_at, h.id
            "#,
            BORROWED_BOOK_COLUMNS
        );

        let books = sqlx::query_as::<_, BorrowedBook>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Rentals created since `since` and not returned yet
    pub async fn open_since(&self, since: DateTime<Utc>) -> AppResult<Vec<BorrowedBook>> {
        let query = format!(
            r#"
            SELECT {}
            FROM book_issue_history h
            JOIN users u ON u.id = h.user_id
            JOIN books b ON b.id = h.book_id
            WHERE h.created_at >= $1 AND h.return_date IS NULL
            ORDER BY h.created_at, h.id
            "#,
            BORROWED_BOOK_COLUMNS
        );

        let books = sqlx::query_as::<_, BorrowedBook>(&query)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Set the return date of an open rental
    pub async fn mark_returned(&self, id: i32) -> AppResult<i32> {
        let updated = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE book_issue_history
            SET return_date = NOW()
            WHERE id = $1 AND return_date IS NULL
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => Ok(id),
            None => {
                // Either missing or already returned
                self.get_by_id(id).await?;
                Err(AppError::Conflict(format!("Rental history {} already returned", id)))
            }
        }
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_issue_history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Rental history {} not found", id)));
        }

        Ok(())
    }
}
