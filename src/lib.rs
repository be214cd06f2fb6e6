//! # Restaurant Orders
//!
//! REST service managing restaurant orders: delivery address, phone number,
//! status and dish line items.
//!
//! ## Features
//!
//! - **Guard Pipelines**: every write runs an ordered list of validation guards
//!   that stop at the first failure
//! - **Status Lifecycle**: `pending → preparing → out-for-delivery → delivered`,
//!   with `delivered` terminal
//! - **Pluggable Storage**: orders live behind the [`core::OrderStore`] trait;
//!   an in-memory backend ships by default
//! - **Typed Errors**: [`core::OrderError`] maps to HTTP status codes and JSON bodies
//! - **Configuration-Based**: bind address, id strategy and seed orders via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use orders::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(ServiceConfig::from_env()?)
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod orders;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        IdGenerator, OrderError, OrderStore, RandomIdGenerator, SequentialIdGenerator,
    };

    // === Orders ===
    pub use crate::orders::{
        DataEnvelope, Dish, Guard, Order, OrderContext, OrderService, OrderStatus, Pipeline,
    };

    // === Storage ===
    pub use crate::storage::InMemoryOrderStore;

    // === Config ===
    pub use crate::config::{IdStrategy, ServiceConfig};

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
