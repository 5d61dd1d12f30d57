//! Client for the external transaction service

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::{
    config::TransactionsConfig,
    models::transaction::{CreateTransaction, CreateTransactionItem, Created},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transaction service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("transaction service answered {0}")]
    Status(StatusCode),
}

/// Operations the rent flow needs from the transaction service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionClient: Send + Sync {
    /// Open a transaction and return its id
    async fn create_transaction(&self, transaction: CreateTransaction) -> Result<i64, ClientError>;

    async fn create_transaction_item(&self, item: CreateTransactionItem) -> Result<(), ClientError>;

    async fn delete_transaction(&self, transaction_id: i64) -> Result<(), ClientError>;
}

/// reqwest implementation talking JSON over HTTP
#[derive(Clone)]
pub struct HttpTransactionClient {
    client: Client,
    base_url: String,
}

impl HttpTransactionClient {
    pub fn new(config: &TransactionsConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn ensure_success(response: &reqwest::Response) -> Result<(), ClientError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(ClientError::Status(response.status()))
    }
}

#[async_trait]
impl TransactionClient for HttpTransactionClient {
    async fn create_transaction(&self, transaction: CreateTransaction) -> Result<i64, ClientError> {
        let response = self
            .client
            .post(self.url("/transactions"))
            .json(&transaction)
            .send()
            .await?;
        ensure_success(&response)?;

        let created: Created = response.json().await?;
        tracing::debug!(transaction_id = created.id, "Transaction opened");
        Ok(created.id)
    }

    async fn create_transaction_item(&self, item: CreateTransactionItem) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/transactions/items"))
            .json(&item)
            .send()
            .await?;
        ensure_success(&response)
    }

    async fn delete_transaction(&self, transaction_id: i64) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/transactions/{}", transaction_id)))
            .send()
            .await?;
        ensure_success(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::BookSnapshot;
    use httpmock::prelude::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn client_for(server: &MockServer) -> HttpTransactionClient {
        HttpTransactionClient::new(&TransactionsConfig {
            base_url: format!("{}/api/v1/", server.base_url()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_transaction_returns_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/transactions")
                    .json_body(json!({"user_name": "Ada", "amount": "35.00"}));
                then.status(200).json_body(json!({"id": 17}));
            })
            .await;

        let id = client_for(&server)
            .create_transaction(CreateTransaction {
                user_name: "Ada".to_string(),
                amount: Decimal::new(3500, 2),
            })
            .await
            .unwrap();

        assert_eq!(id, 17);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_item_failure_is_status_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/transactions/items");
                then.status(500);
            })
            .await;

        let err = client_for(&server)
            .create_transaction_item(CreateTransactionItem {
                transaction_id: 1,
                book: BookSnapshot {
                    title: "Dune".to_string(),
                    author: "Frank Herbert".to_string(),
                    price: Decimal::new(1000, 2),
                },
                quantity: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/v1/transactions/5");
                then.status(200);
            })
            .await;

        client_for(&server).delete_transaction(5).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let client = HttpTransactionClient::new(&TransactionsConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        let err = client.delete_transaction(1).await.unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
    }
}
