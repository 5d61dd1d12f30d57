//! Rental (book issue history) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// One requested (book, quantity) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct RentalLine {
    pub book_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Rent request body; the renting user comes from the bearer token
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RentRequest {
    #[validate(length(min = 1, message = "At least one book is required"), nested)]
    pub books: Vec<RentalLine>,
}

/// History row as stored, one per rented book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BIHistory {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Rental joined with user and book for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowedBook {
    pub id: i32,
    pub user_name: String,
    pub book_name: String,
    pub book_author: String,
    pub quantity: i32,
    pub issue_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Outcome of a successful rent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RentReceipt {
    pub transaction_id: i64,
    pub history_ids: Vec<i32>,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_request_requires_lines() {
        let empty = RentRequest { books: vec![] };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_rent_request_rejects_zero_quantity() {
        let request = RentRequest {
            books: vec![
                RentalLine { book_id: 1, quantity: 2 },
                RentalLine { book_id: 2, quantity: 0 },
            ],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_rent_request_deserializes() {
        let request: RentRequest = serde_json::from_str(
            r#"{"books":[{"book_id":1,"quantity":2},{"book_id":2,"quantity":5}]}"#,
        )
        .unwrap();
        assert_eq!(request.books.len(), 2);
        assert!(request.validate().is_ok());
    }
}
