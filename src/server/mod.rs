//! Server module for building the orders HTTP server

pub mod builder;
pub mod rest;

pub use builder::ServerBuilder;
pub use rest::RestExposure;
