//! Order operations
//!
//! [`OrderService`] implements list, read, create, update and destroy on top
//! of an injected [`OrderStore`] and [`IdGenerator`]. It knows nothing about
//! HTTP; the REST handlers translate its results into responses.

use super::guards::{OrderContext, Pipeline, create_pipeline, is_truthy, update_pipeline};
use super::model::{Dish, Order, OrderStatus, STATUS_ENUMERATION_MESSAGE};
use crate::core::{IdGenerator, OrderError, OrderStore};
use anyhow::anyhow;
use serde_json::Value;
use std::sync::Arc;

/// Bound on id redraws and on conditional write retries
const MAX_ATTEMPTS: usize = 16;

/// Service owning the order guards and the storage seams
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    ids: Arc<dyn IdGenerator>,
    create_guards: Pipeline,
    update_guards: Pipeline,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            ids,
            create_guards: create_pipeline(),
            update_guards: update_pipeline(),
        }
    }

    /// List orders, optionally narrowed to a single id
    ///
    /// An empty id means no filter.
    pub async fn list(&self, order_id: Option<&str>) -> Result<Vec<Order>, OrderError> {
        let orders = self.store.list().await?;

        Ok(match order_id.filter(|id| !id.is_empty()) {
            Some(id) => orders.into_iter().filter(|order| order.id == id).collect(),
            None => orders,
        })
    }

    /// Existence guard: extend the context with the stored order for its route id
    pub async fn locate(&self, context: OrderContext) -> Result<OrderContext, OrderError> {
        let id = context.route_id().unwrap_or_default().to_string();

        match self.store.get(&id).await? {
            Some(order) => Ok(context.with_order(order)),
            None => Err(OrderError::not_found(id)),
        }
    }

    /// Fetch a single order
    pub async fn read(&self, order_id: &str) -> Result<Order, OrderError> {
        let context = self.locate(OrderContext::for_route(order_id)).await?;
        tracing::debug!(order_id = %order_id, "order read");
        context
            .into_order()
            .ok_or_else(|| OrderError::not_found(order_id))
    }

    /// Validate a request body and append a new order
    pub async fn create(&self, body: &Value) -> Result<Order, OrderError> {
        let context = OrderContext::new(None, body);
        self.create_guards.run(&context)?;

        let status = match context.field("status") {
            Some(value) if is_truthy(value) => parse_status(value)?,
            _ => OrderStatus::Pending,
        };

        let order = Order {
            id: self.fresh_id().await?,
            deliver_to: string_field(&context, "deliverTo")?,
            mobile_number: string_field(&context, "mobileNumber")?,
            status,
            dishes: copy_dishes(&context)?,
        };

        let order = self.store.append(order).await?;
        tracing::info!(order_id = %order.id, dishes = order.dishes.len(), "order created");
        Ok(order)
    }

    /// Draw ids until one is not already taken
    async fn fresh_id(&self) -> Result<String, OrderError> {
        for _ in 0..MAX_ATTEMPTS {
            let id = self.ids.next_id();
            if self.store.get(&id).await?.is_none() {
                return Ok(id);
            }
            tracing::debug!(order_id = %id, "generated id already taken");
        }

        Err(OrderError::Storage(anyhow!(
            "no unused order id after {} attempts",
            MAX_ATTEMPTS
        )))
    }

    /// Validate a request body and replace the mutable fields of an order
    ///
    /// The id never changes. A truthy `data.id` that differs from the route
    /// id is rejected with [`OrderError::IdMismatch`]. When the stored status
    /// changes between validation and write, the request is validated again
    /// against the new state.
    pub async fn update(&self, order_id: &str, body: &Value) -> Result<Order, OrderError> {
        for _ in 0..MAX_ATTEMPTS {
            if let Some(order) = self.try_update(order_id, body).await? {
                return Ok(order);
            }
            tracing::debug!(order_id = %order_id, "order changed during update, retrying");
        }

        Err(OrderError::Storage(anyhow!(
            "order {} kept changing during update",
            order_id
        )))
    }

    /// One validate-then-write pass; `None` when the stored status moved on
    async fn try_update(
        &self,
        order_id: &str,
        body: &Value,
    ) -> Result<Option<Order>, OrderError> {
        let context = OrderContext::new(Some(order_id.to_string()), body);
        let context = self.locate(context).await?;
        self.update_guards.run(&context)?;

        if let Some(body_id) = context.field("id").filter(|id| is_truthy(id)) {
            if body_id.as_str() != Some(order_id) {
                return Err(OrderError::IdMismatch {
                    order_id: display_id(body_id),
                    route_id: order_id.to_string(),
                });
            }
        }

        let status = context
            .field("status")
            .map(parse_status)
            .transpose()?
            .unwrap_or_default();

        let updated = Order {
            id: order_id.to_string(),
            deliver_to: string_field(&context, "deliverTo")?,
            mobile_number: string_field(&context, "mobileNumber")?,
            status,
            dishes: copy_dishes(&context)?,
        };

        let previous = context
            .order()
            .map(|order| order.status)
            .ok_or_else(|| OrderError::not_found(order_id))?;
        let Some(order) = self.store.update_if(order_id, previous, updated).await? else {
            return Ok(None);
        };

        tracing::info!(
            order_id = %order.id,
            from = %previous,
            to = %order.status,
            "order updated"
        );
        Ok(Some(order))
    }

    /// Remove a pending order
    pub async fn destroy(&self, order_id: &str) -> Result<(), OrderError> {
        for _ in 0..MAX_ATTEMPTS {
            let context = self.locate(OrderContext::for_route(order_id)).await?;

            let pending = context
                .order()
                .is_some_and(|order| order.status == OrderStatus::Pending);
            if !pending {
                return Err(OrderError::invalid(
                    "An order cannot be deleted unless it is pending.",
                ));
            }

            if self
                .store
                .remove_if(order_id, OrderStatus::Pending)
                .await?
                .is_some()
            {
                tracing::info!(order_id = %order_id, "order deleted");
                return Ok(());
            }
            tracing::debug!(order_id = %order_id, "order changed during delete, retrying");
        }

        Err(OrderError::Storage(anyhow!(
            "order {} kept changing during delete",
            order_id
        )))
    }
}

fn parse_status(value: &Value) -> Result<OrderStatus, OrderError> {
    value
        .as_str()
        .and_then(OrderStatus::parse)
        .ok_or_else(|| OrderError::invalid(STATUS_ENUMERATION_MESSAGE))
}

fn string_field(context: &OrderContext, name: &str) -> Result<String, OrderError> {
    context
        .field(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| OrderError::invalid(format!("Order {} must be a string", name)))
}

/// Owned copies of the request's dishes, detached from the body
fn copy_dishes(context: &OrderContext) -> Result<Vec<Dish>, OrderError> {
    context
        .field("dishes")
        .and_then(Value::as_array)
        .and_then(|dishes| dishes.iter().map(Dish::from_value).collect())
        .ok_or_else(|| OrderError::invalid("Order must include at least one dish"))
}

fn display_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SequentialIdGenerator;
    use crate::storage::InMemoryOrderStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Generator that hands out the same id forever
    struct FixedIdGenerator;

    impl IdGenerator for FixedIdGenerator {
        fn next_id(&self) -> String {
            "1".to_string()
        }
    }

    /// Store whose first lookup reports `stale` instead of the stored status
    ///
    /// Stands in for a concurrent request changing the order between the
    /// guards and the write.
    struct StaleReadStore {
        inner: InMemoryOrderStore,
        stale: OrderStatus,
        served: AtomicBool,
    }

    impl StaleReadStore {
        fn new(inner: InMemoryOrderStore, stale: OrderStatus) -> Self {
            Self {
                inner,
                stale,
                served: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl OrderStore for StaleReadStore {
        async fn get(&self, id: &str) -> anyhow::Result<Option<Order>> {
            let order = self.inner.get(id).await?;
            if self.served.swap(true, Ordering::SeqCst) {
                return Ok(order);
            }
            Ok(order.map(|order| Order {
                status: self.stale,
                ..order
            }))
        }

        async fn list(&self) -> anyhow::Result<Vec<Order>> {
            self.inner.list().await
        }

        async fn append(&self, order: Order) -> anyhow::Result<Order> {
            self.inner.append(order).await
        }

        async fn update_if(
            &self,
            id: &str,
            expected: OrderStatus,
            order: Order,
        ) -> anyhow::Result<Option<Order>> {
            self.inner.update_if(id, expected, order).await
        }

        async fn remove_if(
            &self,
            id: &str,
            expected: OrderStatus,
        ) -> anyhow::Result<Option<Order>> {
            self.inner.remove_if(id, expected).await
        }
    }

    fn service_with(store: InMemoryOrderStore) -> OrderService {
        OrderService::new(Arc::new(store), Arc::new(SequentialIdGenerator::new()))
    }

    fn seeded(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            deliver_to: "1600 Pennsylvania Avenue NW".to_string(),
            mobile_number: "(202) 456-1111".to_string(),
            status,
            dishes: vec![Dish {
                quantity: 1,
                details: serde_json::Map::new(),
            }],
        }
    }

    fn update_body(status: &str) -> Value {
        json!({
            "data": {
                "deliverTo": "Rick Sanchez (C-132)",
                "mobileNumber": "(202) 456-1111",
                "status": status,
                "dishes": [{ "id": "d1", "quantity": 2 }]
            }
        })
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let service = service_with(InMemoryOrderStore::new());
        let body = json!({
            "data": {
                "deliverTo": "here",
                "mobileNumber": "555",
                "dishes": [{ "quantity": 1 }]
            }
        });

        let first = service.create(&body).await.unwrap();
        let second = service.create(&body).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.status, OrderStatus::Pending);
        assert_eq!(service.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_skips_taken_ids() {
        let store = InMemoryOrderStore::with_orders(vec![seeded("1", OrderStatus::Pending)]);
        let service = service_with(store);
        let body = json!({
            "data": { "deliverTo": "here", "mobileNumber": "555", "dishes": [{ "quantity": 1 }] }
        });

        let order = service.create(&body).await.unwrap();
        assert_eq!(order.id, "2");
    }

    #[tokio::test]
    async fn test_create_rejects_non_string_address() {
        let service = service_with(InMemoryOrderStore::new());
        let body = json!({
            "data": { "deliverTo": 12, "mobileNumber": "555", "dishes": [{ "quantity": 1 }] }
        });

        let err = service.create(&body).await.unwrap_err();
        assert_eq!(err.to_string(), "Order deliverTo must be a string");
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_status() {
        let service = service_with(InMemoryOrderStore::new());
        let body = json!({
            "data": {
                "deliverTo": "here",
                "mobileNumber": "555",
                "status": "lost",
                "dishes": [{ "quantity": 1 }]
            }
        });

        let err = service.create(&body).await.unwrap_err();
        assert_eq!(err.to_string(), STATUS_ENUMERATION_MESSAGE);
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_id() {
        let store = InMemoryOrderStore::with_orders(vec![
            seeded("1", OrderStatus::Pending),
            seeded("2", OrderStatus::Pending),
        ]);
        let service = service_with(store);

        let filtered = service.list(Some("2")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
        assert!(service.list(Some("3")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_empty_filter_is_ignored() {
        let store = InMemoryOrderStore::with_orders(vec![
            seeded("1", OrderStatus::Pending),
            seeded("2", OrderStatus::Pending),
        ]);
        let service = service_with(store);

        assert_eq!(service.list(Some("")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_gives_up_on_repeating_generator() {
        let store = InMemoryOrderStore::with_orders(vec![seeded("1", OrderStatus::Pending)]);
        let service = OrderService::new(Arc::new(store), Arc::new(FixedIdGenerator));
        let body = json!({
            "data": { "deliverTo": "here", "mobileNumber": "555", "dishes": [{ "quantity": 1 }] }
        });

        let err = service.create(&body).await.unwrap_err();
        assert!(matches!(err, OrderError::Storage(_)));
        assert_eq!(service.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_unknown_order() {
        let service = service_with(InMemoryOrderStore::new());
        let err = service.read("unknown-id").await.unwrap_err();
        assert!(matches!(err, OrderError::NotFound { .. }));
        assert!(err.to_string().contains("unknown-id"));
    }

    #[tokio::test]
    async fn test_update_keeps_route_id() {
        let service = service_with(InMemoryOrderStore::with_orders(vec![seeded(
            "5",
            OrderStatus::Pending,
        )]));

        let order = service.update("5", &update_body("preparing")).await.unwrap();
        assert_eq!(order.id, "5");
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.dishes[0].quantity, 2);

        let stored = service.read("5").await.unwrap();
        assert_eq!(stored, order);
    }

    #[tokio::test]
    async fn test_update_id_mismatch() {
        let service = service_with(InMemoryOrderStore::with_orders(vec![seeded(
            "5",
            OrderStatus::Pending,
        )]));
        let mut body = update_body("pending");
        body["data"]["id"] = json!("9");

        let err = service.update("5", &body).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Order id does not match route id. Order: 9, Route: 5"
        );
    }

    #[tokio::test]
    async fn test_update_matching_or_empty_id_is_accepted() {
        let service = service_with(InMemoryOrderStore::with_orders(vec![seeded(
            "5",
            OrderStatus::Pending,
        )]));

        let mut body = update_body("pending");
        body["data"]["id"] = json!("5");
        assert!(service.update("5", &body).await.is_ok());

        body["data"]["id"] = json!("");
        assert!(service.update("5", &body).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_delivered_order_fails() {
        let service = service_with(InMemoryOrderStore::with_orders(vec![seeded(
            "5",
            OrderStatus::Delivered,
        )]));

        let err = service.update("5", &update_body("pending")).await.unwrap_err();
        assert_eq!(err.to_string(), "A delivered order cannot be changed");
    }

    #[tokio::test]
    async fn test_destroy_requires_pending() {
        let service = service_with(InMemoryOrderStore::with_orders(vec![
            seeded("1", OrderStatus::Preparing),
            seeded("2", OrderStatus::Pending),
        ]));

        let err = service.destroy("1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "An order cannot be deleted unless it is pending."
        );
        assert_eq!(service.list(None).await.unwrap().len(), 2);

        service.destroy("2").await.unwrap();
        let remaining = service.list(None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "1");
    }

    #[tokio::test]
    async fn test_destroy_rechecks_status_at_write() {
        let inner = InMemoryOrderStore::with_orders(vec![seeded("1", OrderStatus::Preparing)]);
        let store = StaleReadStore::new(inner.clone(), OrderStatus::Pending);
        let service = OrderService::new(Arc::new(store), Arc::new(SequentialIdGenerator::new()));

        let err = service.destroy("1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "An order cannot be deleted unless it is pending."
        );
        assert_eq!(inner.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_rechecks_status_at_write() {
        let inner = InMemoryOrderStore::with_orders(vec![seeded("5", OrderStatus::Delivered)]);
        let store = StaleReadStore::new(inner.clone(), OrderStatus::OutForDelivery);
        let service = OrderService::new(Arc::new(store), Arc::new(SequentialIdGenerator::new()));

        let err = service
            .update("5", &update_body("delivered"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "A delivered order cannot be changed");

        let stored = inner.get("5").await.unwrap().unwrap();
        assert_eq!(stored, seeded("5", OrderStatus::Delivered));
    }
}
