//! Configuration loading and management

use crate::orders::Order;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Environment variable naming a YAML config file
pub const CONFIG_PATH_ENV: &str = "ORDERS_CONFIG";

/// Environment variable overriding the bind host
pub const HOST_ENV: &str = "ORDERS_HOST";

/// Environment variable overriding the bind port
pub const PORT_ENV: &str = "ORDERS_PORT";

/// How new order ids are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// 32-character random hex ids
    #[default]
    Random,
    /// "1", "2", "3", ... continuing after the largest numeric seed id
    Sequential,
}

/// Complete configuration for the orders service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Orders present when the service starts
    #[serde(default)]
    pub seed_orders: Vec<Order>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            id_strategy: IdStrategy::default(),
            seed_orders: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `ORDERS_CONFIG` when set, then apply env overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(
            std::env::var(HOST_ENV).ok(),
            std::env::var(PORT_ENV).ok(),
        )?;
        Ok(config)
    }

    /// Override host and port with externally supplied values
    pub fn apply_overrides(&mut self, host: Option<String>, port: Option<String>) -> Result<()> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid port '{}': {}", port, e))?;
        }
        Ok(())
    }

    /// Reject seed data that would break the store invariants
    ///
    /// Quantities deserialize as unsigned integers, so only zero needs checking.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for order in &self.seed_orders {
            if !seen.insert(order.id.as_str()) {
                bail!("Duplicate seed order id: {}", order.id);
            }
            if let Some(index) = order.dishes.iter().position(|dish| dish.quantity == 0) {
                bail!(
                    "Seed order {}: dish {} must have a quantity greater than 0",
                    order.id,
                    index
                );
            }
        }

        Ok(())
    }

    /// Address to bind, as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Largest numeric id among the seed orders
    pub fn last_numeric_seed_id(&self) -> u64 {
        self.seed_orders
            .iter()
            .filter_map(|order| order.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }
}
