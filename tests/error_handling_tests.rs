//! Tests for error responses outside the order guards
//!
//! These tests verify that:
//! - Storage failures surface as 500 without leaking details
//! - Malformed bodies are rejected with the standard envelope
//! - Unknown paths and unsupported methods get JSON errors

mod common;

use anyhow::anyhow;
use axum::http::StatusCode;
use axum_test::TestServer;
use common::*;
use orders::prelude::*;
use serde_json::{Value, json};

/// Store whose every call fails
struct BrokenStore;

#[async_trait]
impl OrderStore for BrokenStore {
    async fn get(&self, _id: &str) -> Result<Option<Order>> {
        Err(anyhow!("connection refused"))
    }

    async fn list(&self) -> Result<Vec<Order>> {
        Err(anyhow!("connection refused"))
    }

    async fn append(&self, _order: Order) -> Result<Order> {
        Err(anyhow!("connection refused"))
    }

    async fn update_if(
        &self,
        _id: &str,
        _expected: OrderStatus,
        _order: Order,
    ) -> Result<Option<Order>> {
        Err(anyhow!("connection refused"))
    }

    async fn remove_if(&self, _id: &str, _expected: OrderStatus) -> Result<Option<Order>> {
        Err(anyhow!("connection refused"))
    }
}

fn broken_server() -> TestServer {
    let app = ServerBuilder::new()
        .with_store(BrokenStore)
        .build()
        .expect("router should build");
    TestServer::new(app).expect("Failed to create test server")
}

mod storage_failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_storage_failure_is_500() {
        let response = broken_server().get("/orders").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body, json!({ "message": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_500() {
        let response = broken_server().post("/orders").json(&create_body()).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert!(!body["message"].as_str().unwrap().contains("refused"));
    }

    #[tokio::test]
    async fn test_validation_runs_before_storage() {
        let response = broken_server().post("/orders").json(&json!({ "data": {} })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

mod request_error_tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let server = server_with(InMemoryOrderStore::new());

        let response = server
            .post("/orders")
            .content_type("application/json")
            .bytes("{ not json".into())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid JSON body")
        );
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let server = server_with(InMemoryOrderStore::new());

        let response = server.get("/dishes").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["message"], "Path not found: /dishes");
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405() {
        let server = server_with(InMemoryOrderStore::new());

        let response = server.delete("/orders").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

        let body: Value = response.json();
        assert_eq!(body["message"], "DELETE not allowed for /orders");
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = server_with(InMemoryOrderStore::new());

        let body: Value = server.get("/health").await.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "restaurant-orders");

        server
            .get("/healthz")
            .await
            .assert_status(StatusCode::OK);
    }
}
