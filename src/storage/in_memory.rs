//! In-memory implementation of OrderStore for testing and development

use crate::core::OrderStore;
use crate::orders::{Order, OrderStatus};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory order store
///
/// Keeps orders in a `Vec` so listing preserves insertion order. Cloning the
/// store shares the underlying collection.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with orders
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(RwLock::new(orders)),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, id: &str) -> Result<Option<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders.iter().find(|order| order.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders.clone())
    }

    async fn append(&self, order: Order) -> Result<Order> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if orders.iter().any(|existing| existing.id == order.id) {
            bail!("Order id already exists: {}", order.id);
        }

        orders.push(order.clone());

        Ok(order)
    }

    async fn update_if(
        &self,
        id: &str,
        expected: OrderStatus,
        order: Order,
    ) -> Result<Option<Order>> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(slot) = orders
            .iter_mut()
            .find(|existing| existing.id == id && existing.status == expected)
        else {
            return Ok(None);
        };
        *slot = order.clone();

        Ok(Some(order))
    }

    async fn remove_if(&self, id: &str, expected: OrderStatus) -> Result<Option<Order>> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(orders
            .iter()
            .position(|order| order.id == id && order.status == expected)
            .map(|index| orders.remove(index)))
    }
}
