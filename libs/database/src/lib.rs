//! Document store connectivity shared by the services
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client, config, health checks
//! - `config` - load connection settings with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "store");
//! let client = mongodb::connect_from_config(&config).await?;
//! let products = client.database(config.database()).collection::<Document>("products");
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{RetryConfig, retry, retry_with_backoff};
