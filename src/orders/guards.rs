//! Request guards for order operations
//!
//! A guard inspects an [`OrderContext`] and either lets the request through
//! or stops it with an [`OrderError`]. Guards are composed into a
//! [`Pipeline`] which runs them in order and stops at the first failure.
//!
//! ```rust,ignore
//! let pipeline = Pipeline::new()
//!     .then(body_data_has("deliverTo"))
//!     .then(validate_dishes);
//!
//! pipeline.run(&context)?;
//! ```

use super::model::{Dish, Order, OrderStatus, STATUS_ENUMERATION_MESSAGE};
use crate::core::OrderError;
use serde_json::{Map, Value};

/// Immutable per-request state threaded through the guards
///
/// Starts with the route id and the body's `data` object. The existence
/// lookup extends it with the stored order via [`OrderContext::with_order`].
#[derive(Debug, Clone)]
pub struct OrderContext {
    route_id: Option<String>,
    data: Value,
    order: Option<Order>,
}

impl OrderContext {
    /// Build a context from a request body shaped `{ "data": { ... } }`
    ///
    /// A body without `data` behaves like `data = {}`.
    pub fn new(route_id: Option<String>, body: &Value) -> Self {
        let data = match body.get("data") {
            Some(data) if !data.is_null() => data.clone(),
            _ => Value::Object(Map::new()),
        };

        Self {
            route_id,
            data,
            order: None,
        }
    }

    /// Context for operations that carry no body (read, destroy)
    pub fn for_route(route_id: impl Into<String>) -> Self {
        Self::new(Some(route_id.into()), &Value::Null)
    }

    /// Extend the context with the order found for the route id
    pub fn with_order(self, order: Order) -> Self {
        Self {
            order: Some(order),
            ..self
        }
    }

    pub fn route_id(&self) -> Option<&str> {
        self.route_id.as_deref()
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Look up `data[name]`
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn into_order(self) -> Option<Order> {
        self.order
    }
}

/// JavaScript-style truthiness of a JSON value
///
/// Falsy: `null`, `false`, `0`, `""`. Arrays and objects are always truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A single validation step
pub trait Guard: Send + Sync {
    fn check(&self, context: &OrderContext) -> Result<(), OrderError>;
}

impl<F> Guard for F
where
    F: Fn(&OrderContext) -> Result<(), OrderError> + Send + Sync,
{
    fn check(&self, context: &OrderContext) -> Result<(), OrderError> {
        self(context)
    }
}

/// Ordered list of guards, short-circuiting on the first failure
#[derive(Default)]
pub struct Pipeline {
    guards: Vec<Box<dyn Guard>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guard to the end of the pipeline
    pub fn then(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Run every guard in order
    pub fn run(&self, context: &OrderContext) -> Result<(), OrderError> {
        self.guards.iter().try_for_each(|guard| guard.check(context))
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Guard: `data[field]` is present and truthy
pub fn body_data_has(
    field: &'static str,
) -> impl Fn(&OrderContext) -> Result<(), OrderError> + Send + Sync + Clone {
    move |context: &OrderContext| match context.field(field) {
        Some(value) if is_truthy(value) => Ok(()),
        _ => Err(OrderError::invalid(format!("Order must include a {}", field))),
    }
}

/// Guard: `data.dishes` is a non-empty array of dishes with positive integer quantities
pub fn validate_dishes(context: &OrderContext) -> Result<(), OrderError> {
    let dishes = match context.field("dishes").and_then(Value::as_array) {
        Some(dishes) if !dishes.is_empty() => dishes,
        _ => return Err(OrderError::invalid("Order must include at least one dish")),
    };

    for (index, dish) in dishes.iter().enumerate() {
        let quantity = dish.get("quantity").and_then(Dish::quantity_of);
        if quantity.is_none() {
            return Err(OrderError::invalid(format!(
                "Dish {} must have a quantity that is an integer greater than 0",
                index
            )));
        }
    }

    Ok(())
}

/// Guard: `data.status` is a known status and the transition is allowed
///
/// Compares against the stored order when the context carries one.
pub fn validate_status(context: &OrderContext) -> Result<(), OrderError> {
    let requested = context
        .field("status")
        .and_then(Value::as_str)
        .and_then(OrderStatus::parse)
        .ok_or_else(|| OrderError::invalid(STATUS_ENUMERATION_MESSAGE))?;

    let Some(current) = context.order().map(|order| order.status) else {
        return Ok(());
    };

    if current == OrderStatus::Delivered {
        return Err(OrderError::invalid("A delivered order cannot be changed"));
    }

    if requested == OrderStatus::Delivered && current != OrderStatus::OutForDelivery {
        return Err(OrderError::invalid(
            "Order status must be 'out-for-delivery' before it can be marked as 'delivered'",
        ));
    }

    Ok(())
}

/// Guards run before an order is created
pub fn create_pipeline() -> Pipeline {
    Pipeline::new()
        .then(body_data_has("deliverTo"))
        .then(body_data_has("mobileNumber"))
        .then(body_data_has("dishes"))
        .then(validate_dishes)
}

/// Guards run before an existing order is updated
///
/// Expects the context to already carry the stored order.
pub fn update_pipeline() -> Pipeline {
    Pipeline::new()
        .then(body_data_has("deliverTo"))
        .then(body_data_has("mobileNumber"))
        .then(body_data_has("status"))
        .then(body_data_has("dishes"))
        .then(validate_status)
        .then(validate_dishes)
}
