//! Order, status and dish line item types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Message used whenever a status is missing or outside the known set
pub const STATUS_ENUMERATION_MESSAGE: &str =
    "Order must have a status of pending, preparing, out-for-delivery, delivered";

/// Lifecycle of an order
///
/// `pending → preparing → out-for-delivery → delivered`. `Delivered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Parse the wire form (`"out-for-delivery"`, ...)
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dish line item inside an order
///
/// Only `quantity` is interpreted; every other field (dish id, name, price,
/// ...) is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub quantity: u64,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Dish {
    /// Read a strictly positive integer quantity
    ///
    /// Accepts `2` and `2.0`; rejects `0`, negatives, fractions, non-numbers
    /// and floats too large to be stored exactly as a `u64`.
    pub fn quantity_of(value: &Value) -> Option<u64> {
        if let Some(n) = value.as_u64() {
            return (n > 0).then_some(n);
        }
        let n = value.as_f64()?;
        if n > 0.0 && n.fract() == 0.0 && n < u64::MAX as f64 {
            Some(n as u64)
        } else {
            None
        }
    }

    /// Build an owned dish from a request value
    ///
    /// Returns `None` when the value is not an object with a valid quantity.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let quantity = object.get("quantity").and_then(Self::quantity_of)?;
        let details = object
            .iter()
            .filter(|(key, _)| key.as_str() != "quantity")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self { quantity, details })
    }
}

/// A customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub deliver_to: String,
    pub mobile_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub dishes: Vec<Dish>,
}
