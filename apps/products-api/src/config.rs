//! Configuration for Products API

use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Collection used when `PRODUCTS_COLLECTION` is unset
pub const DEFAULT_PRODUCTS_COLLECTION: &str = domain_products::mongodb::PRODUCTS_COLLECTION;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub products_collection: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let mongodb = MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME"));
        let products_collection =
            env_or_default("PRODUCTS_COLLECTION", DEFAULT_PRODUCTS_COLLECTION);

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            products_collection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("store")),
                ("PRODUCTS_COLLECTION", None),
                ("APP_ENV", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.url(), "mongodb://db:27017");
                assert_eq!(config.mongodb.database(), "store");
                assert_eq!(config.mongodb.app_name.as_deref(), Some("products_api"));
                assert_eq!(config.products_collection, "products");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.environment, Environment::Development);
                assert_eq!(config.app.name, "products_api");
            },
        );
    }

    #[test]
    fn test_config_custom_collection() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("store")),
                ("PRODUCTS_COLLECTION", Some("catalog")),
            ],
            || {
                assert_eq!(Config::from_env().unwrap().products_collection, "catalog");
            },
        );
    }

    #[test]
    fn test_config_requires_mongodb_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None),
                ("MONGODB_DATABASE", Some("store")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_URL"));
            },
        );
    }
}
