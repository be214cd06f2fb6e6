//! Order entity module

pub mod guards;
pub mod handlers;
pub mod model;
pub mod service;

pub use guards::{Guard, OrderContext, Pipeline};
pub use handlers::{DataEnvelope, OrderAppState, routes};
pub use model::{Dish, Order, OrderStatus};
pub use service::OrderService;
