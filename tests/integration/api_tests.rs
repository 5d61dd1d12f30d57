//! API integration tests against running services
//!
//! Start both binaries with migrated databases, then run:
//! `cargo test --test api_tests -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const TRANSACTIONS_URL: &str = "http://localhost:8081/api/v1";

fn unique_email() -> String {
    format!("reader{}@example.com", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

/// Register a fresh user and return (user id, token)
async fn sign_up_and_in(client: &Client) -> (i64, String) {
    let email = unique_email();

    let response = client
        .post(format!("{}/users/sign-up", BASE_URL))
        .json(&json!({
            "full_name": "Ada Lovelace",
            "email": email,
            "password": "secret-password"
        }))
        .send()
        .await
        .expect("Failed to send sign-up request");
    assert!(response.status().is_success());
    let user: Value = response.json().await.expect("Failed to parse sign-up response");

    let response = client
        .post(format!("{}/users/sign-in", BASE_URL))
        .json(&json!({"email": email, "password": "secret-password"}))
        .send()
        .await
        .expect("Failed to send sign-in request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse sign-in response");

    (
        user["id"].as_i64().expect("No id in user"),
        body["token"].as_str().expect("No token in response").to_string(),
    )
}

async fn create_book(client: &Client, name: &str, price: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({"name": name, "author": "Frank Herbert", "price": price}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let book: Value = response.json().await.expect("Failed to parse response");
    book["id"].as_i64().expect("No id in book")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_live() {
    let client = Client::new();

    let response = client
        .get("http://localhost:8080/live")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflicts() {
    let client = Client::new();
    let email = unique_email();
    let body = json!({"full_name": "Ada Lovelace", "email": email, "password": "secret-password"});

    let first = client
        .post(format!("{}/users/sign-up", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert!(first.status().is_success());

    let second = client
        .post(format!("{}/users/sign-up", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_sign_in_wrong_password() {
    let client = Client::new();
    sign_up_and_in(&client).await;

    let response = client
        .post(format!("{}/users/sign-in", BASE_URL))
        .json(&json!({"email": "nobody@example.com", "password": "wrong"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_rent_records_transaction() {
    let client = Client::new();
    let (_, token) = sign_up_and_in(&client).await;
    let first = create_book(&client, "Dune", "10.00").await;
    let second = create_book(&client, "Children of Dune", "3.00").await;

    let response = client
        .post(format!("{}/rents", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"books": [
            {"book_id": first, "quantity": 2},
            {"book_id": second, "quantity": 5}
        ]}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let receipt: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(receipt["amount"], "35.00");
    assert_eq!(receipt["history_ids"].as_array().map(Vec::len), Some(2));

    let transaction_id = receipt["transaction_id"].as_i64().expect("No transaction id");
    let details: Value = client
        .get(format!("{}/transactions/{}", TRANSACTIONS_URL, transaction_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(details["user_name"], "Ada Lovelace");
    assert_eq!(details["items"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
#[ignore]
async fn test_rent_unknown_book() {
    let client = Client::new();
    let (_, token) = sign_up_and_in(&client).await;

    let response = client
        .post(format!("{}/rents", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"books": [{"book_id": i32::MAX, "quantity": 1}]}))
        .send()
        .await
        .expect("Failed to send request");

    // The history insert hits the foreign key, nothing is written
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reconciliation"], "nothing_persisted");
}

#[tokio::test]
#[ignore]
async fn test_return_twice_conflicts() {
    let client = Client::new();
    let (_, token) = sign_up_and_in(&client).await;
    let book = create_book(&client, "Dune Messiah", "4.50").await;

    let receipt: Value = client
        .post(format!("{}/rents", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"books": [{"book_id": book, "quantity": 1}]}))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let rent_id = receipt["history_ids"][0].as_i64().expect("No history id");

    let first = client
        .patch(format!("{}/rents/{}", BASE_URL, rent_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(first.status().is_success());

    let second = client
        .patch(format!("{}/rents/{}", BASE_URL, rent_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_missing_rental_is_not_found() {
    let client = Client::new();

    let response = client
        .delete(format!("{}/rents/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NoSuchData");

    let response = client
        .patch(format!("{}/rents/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
#[ignore]
async fn test_last_month_excludes_returned_rentals() {
    let client = Client::new();
    let (_, token) = sign_up_and_in(&client).await;
    let book = create_book(&client, "God Emperor of Dune", "6.00").await;

    let receipt: Value = client
        .post(format!("{}/rents", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"books": [{"book_id": book, "quantity": 1}]}))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let rent_id = receipt["history_ids"][0].as_i64().expect("No history id");

    let listed = |rents: &Value| {
        rents
            .as_array()
            .map(|rows| rows.iter().any(|row| row["id"].as_i64() == Some(rent_id)))
            .unwrap_or(false)
    };

    let before: Value = client
        .get(format!("{}/rents/months", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(listed(&before));

    let returned = client
        .patch(format!("{}/rents/{}", BASE_URL, rent_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(returned.status().is_success());

    let after: Value = client
        .get(format!("{}/rents/months", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(!listed(&after));
}
