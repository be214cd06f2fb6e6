//! Order HTTP handlers

use super::{model::Order, service::OrderService};
use crate::core::OrderError;
use axum::{
    Json, Router,
    extract::{FromRequest, Path, Query, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Order-specific AppState
#[derive(Clone)]
pub struct OrderAppState {
    pub service: Arc<OrderService>,
}

/// Success envelope: `{ "data": ... }`
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

/// Query string accepted by `GET /orders`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
}

/// JSON request body
///
/// Malformed JSON is rejected through the standard `{ "message" }` envelope.
pub struct OrderBody(pub Value);

impl<S> FromRequest<S> for OrderBody
where
    S: Send + Sync,
{
    type Rejection = OrderError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(body)) => Ok(OrderBody(body)),
            Err(rejection) => Err(OrderError::invalid(format!(
                "Invalid JSON body: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Build the `/orders` routes
pub fn routes(service: Arc<OrderService>) -> Router {
    let state = OrderAppState { service };

    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{order_id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .with_state(state)
}

pub async fn list_orders(
    State(state): State<OrderAppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DataEnvelope<Vec<Order>>>, OrderError> {
    let orders = state.service.list(query.order_id.as_deref()).await?;
    Ok(DataEnvelope::new(orders))
}

pub async fn get_order(
    State(state): State<OrderAppState>,
    Path(order_id): Path<String>,
) -> Result<Json<DataEnvelope<Order>>, OrderError> {
    let order = state.service.read(&order_id).await?;
    Ok(DataEnvelope::new(order))
}

pub async fn create_order(
    State(state): State<OrderAppState>,
    OrderBody(body): OrderBody,
) -> Result<impl IntoResponse, OrderError> {
    let order = state.service.create(&body).await?;
    Ok((StatusCode::CREATED, DataEnvelope::new(order)))
}

pub async fn update_order(
    State(state): State<OrderAppState>,
    Path(order_id): Path<String>,
    OrderBody(body): OrderBody,
) -> Result<Json<DataEnvelope<Order>>, OrderError> {
    let order = state.service.update(&order_id, &body).await?;
    Ok(DataEnvelope::new(order))
}

pub async fn delete_order(
    State(state): State<OrderAppState>,
    Path(order_id): Path<String>,
) -> Result<StatusCode, OrderError> {
    state.service.destroy(&order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
