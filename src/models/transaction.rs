//! Transaction (billing) model shared by the transaction service and its client

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: i64,
    pub user_name: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Book as it was priced when the transaction was made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookSnapshot {
    pub title: String,
    pub author: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransactionItem {
    pub id: i64,
    pub transaction_id: i64,
    pub book_title: String,
    pub book_author: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Transaction together with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransactionDetails {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTransaction {
    #[validate(length(min = 1, message = "User name is required"))]
    pub user_name: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTransactionItem {
    pub transaction_id: i64,
    #[validate(nested)]
    pub book: BookSnapshot,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Id returned by create endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Created {
    pub id: i64,
}

impl TransactionDetails {
    /// Sum of price x quantity over the items
    pub fn items_total(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum()
    }
}

fn non_negative_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_total() {
        let now = Utc::now();
        let item = |id, price, quantity| TransactionItem {
            id,
            transaction_id: 1,
            book_title: "t".to_string(),
            book_author: "a".to_string(),
            price,
            quantity,
        };
        let details = TransactionDetails {
            transaction: Transaction {
                id: 1,
                user_name: "Ada".to_string(),
                amount: Decimal::new(3500, 2),
                created_at: now,
            },
            items: vec![item(1, Decimal::new(1000, 2), 2), item(2, Decimal::new(300, 2), 5)],
        };
        assert_eq!(details.items_total(), details.transaction.amount);
    }

    #[test]
    fn test_negative_item_price_rejected() {
        let item = |price| CreateTransactionItem {
            transaction_id: 1,
            book: BookSnapshot {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                price,
            },
            quantity: 1,
        };
        assert!(item(Decimal::new(-250, 2)).validate().is_err());
        assert!(item(Decimal::ZERO).validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let create = CreateTransaction {
            user_name: "Ada".to_string(),
            amount: Decimal::new(-1, 0),
        };
        assert!(create.validate().is_err());
    }

    #[test]
    fn test_details_flatten_transaction_fields() {
        let details = TransactionDetails {
            transaction: Transaction {
                id: 9,
                user_name: "Ada".to_string(),
                amount: Decimal::ZERO,
                created_at: Utc::now(),
            },
            items: vec![],
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["id"], 9);
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
