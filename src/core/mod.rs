//! Core module containing the error type and the storage/id seams

pub mod error;
pub mod id;
pub mod store;

pub use error::{ErrorResponse, LegacyErrorResponse, OrderError};
pub use id::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use store::OrderStore;
