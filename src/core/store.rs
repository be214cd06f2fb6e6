//! Storage trait for orders

use crate::orders::{Order, OrderStatus};
use anyhow::Result;
use async_trait::async_trait;

/// Storage backend for orders
///
/// Implementations keep orders in insertion order. The order service is
/// agnostic to the underlying storage mechanism, so swapping the in-memory
/// backend for a database never touches the validation logic.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Get an order by id
    async fn get(&self, id: &str) -> Result<Option<Order>>;

    /// List all orders in insertion order
    async fn list(&self) -> Result<Vec<Order>>;

    /// Append a new order to the end of the collection
    async fn append(&self, order: Order) -> Result<Order>;

    /// Replace the order with the same id while its status is still `expected`
    ///
    /// The status check and the write happen atomically. Returns `None` when
    /// no such order exists or its status has moved on.
    async fn update_if(
        &self,
        id: &str,
        expected: OrderStatus,
        order: Order,
    ) -> Result<Option<Order>>;

    /// Remove an order by id while its status is still `expected`
    ///
    /// Returns the removed order, or `None` when no such order exists or its
    /// status has moved on.
    async fn remove_if(&self, id: &str, expected: OrderStatus) -> Result<Option<Order>>;
}
