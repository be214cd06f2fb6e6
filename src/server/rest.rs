//! REST API exposure
//!
//! Assembles the order routes, health checks and the fallback handlers that
//! answer unknown paths and unsupported methods with the standard
//! `{ "message" }` envelope.

use crate::core::ErrorResponse;
use crate::orders::{self, OrderService};
use axum::{
    Json, Router,
    http::{Method, StatusCode, Uri},
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Name reported by the health endpoints
pub const SERVICE_NAME: &str = "restaurant-orders";

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router around an order service
    ///
    /// The returned router carries:
    /// - Health check routes
    /// - Order CRUD routes
    /// - Custom routes
    /// - 404 / 405 fallbacks
    /// - Request tracing and CORS layers
    pub fn build_router(service: Arc<OrderService>, custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes().merge(orders::routes(service));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.method_not_allowed_fallback(method_not_allowed)
            .fallback(not_found)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    tracing::debug!(path = %uri.path(), "no route");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: format!("Path not found: {}", uri.path()),
        }),
    )
}

async fn method_not_allowed(method: Method, uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            message: format!("{} not allowed for {}", method, uri.path()),
        }),
    )
}
