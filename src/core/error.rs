//! Typed error handling for the orders service
//!
//! Every guard and every order operation reports failures through
//! [`OrderError`]. The enum knows its HTTP status and renders itself through
//! axum's [`IntoResponse`], so handlers can simply return
//! `Result<_, OrderError>`.
//!
//! # Response shapes
//!
//! Most errors use the standard envelope:
//!
//! ```json
//! { "message": "Order must include a deliverTo" }
//! ```
//!
//! The update path's id mismatch keeps its legacy envelope:
//!
//! ```json
//! { "error": "Order id does not match route id. Order: 9, Route: 5" }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Message returned to clients when the storage layer fails
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// The error type for all order operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Missing or malformed input, or a rejected status transition
    #[error("{message}")]
    InvalidInput { message: String },

    /// No order exists with the requested id
    #[error("Order id not found: {id}")]
    NotFound { id: String },

    /// The body's `data.id` disagrees with the route id on update
    #[error("Order id does not match route id. Order: {order_id}, Route: {route_id}")]
    IdMismatch { order_id: String, route_id: String },

    /// The backing store failed
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Standard error envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Legacy error envelope used only by the update id check
#[derive(Debug, Serialize)]
pub struct LegacyErrorResponse {
    pub error: String,
}

impl OrderError {
    /// Build an `InvalidInput` error from any message
    pub fn invalid(message: impl Into<String>) -> Self {
        OrderError::InvalidInput {
            message: message.into(),
        }
    }

    /// Build a `NotFound` error for an order id
    pub fn not_found(id: impl Into<String>) -> Self {
        OrderError::NotFound { id: id.into() }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::IdMismatch { .. } => StatusCode::BAD_REQUEST,
            OrderError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error, used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::InvalidInput { .. } => "INVALID_INPUT",
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::IdMismatch { .. } => "ORDER_ID_MISMATCH",
            OrderError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// The message shown to the client
    ///
    /// Storage details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            OrderError::Storage(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            OrderError::Storage(err) => {
                tracing::error!(code = self.error_code(), error = %err, "order store failed");
            }
            _ => {
                tracing::warn!(code = self.error_code(), status = %status, "{}", self);
            }
        }

        let message = self.client_message();
        if matches!(self, OrderError::IdMismatch { .. }) {
            (status, Json(LegacyErrorResponse { error: message })).into_response()
        } else {
            (status, Json(ErrorResponse { message })).into_response()
        }
    }
}
