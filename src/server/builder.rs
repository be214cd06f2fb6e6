//! ServerBuilder for fluent API to build HTTP servers

use super::rest::RestExposure;
use crate::config::{IdStrategy, ServiceConfig};
use crate::core::{IdGenerator, OrderStore, RandomIdGenerator, SequentialIdGenerator};
use crate::orders::OrderService;
use crate::storage::InMemoryOrderStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the orders HTTP server
///
/// Without an explicit store, orders live in an [`InMemoryOrderStore`]
/// seeded from the configuration. Without an explicit id generator, the
/// configured [`IdStrategy`] decides.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ServiceConfig::from_env()?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: ServiceConfig,
    store: Option<Arc<dyn OrderStore>>,
    id_generator: Option<Arc<dyn IdGenerator>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
            store: None,
            id_generator: None,
            custom_routes: Vec::new(),
        }
    }

    /// Use the given configuration
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific order store
    ///
    /// Seed orders from the configuration are ignored when a store is given.
    pub fn with_store(mut self, store: impl OrderStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Use a specific id generator
    pub fn with_id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Some(Arc::new(generator));
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the order service from the configured parts
    pub fn build_service(&mut self) -> Result<OrderService> {
        self.config.validate()?;

        let store = match self.store.take() {
            Some(store) => store,
            None => Arc::new(InMemoryOrderStore::with_orders(
                self.config.seed_orders.clone(),
            )),
        };

        let ids: Arc<dyn IdGenerator> = match self.id_generator.take() {
            Some(generator) => generator,
            None => match self.config.id_strategy {
                IdStrategy::Random => Arc::new(RandomIdGenerator),
                IdStrategy::Sequential => Arc::new(SequentialIdGenerator::starting_after(
                    self.config.last_numeric_seed_id(),
                )),
            },
        };

        Ok(OrderService::new(store, ids))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let service = Arc::new(self.build_service()?);
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(RestExposure::build_router(service, custom_routes))
    }

    /// Serve on the configured `host:port`
    pub async fn serve_configured(self) -> Result<()> {
        let addr = self.config.bind_address();
        self.serve(&addr).await
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
