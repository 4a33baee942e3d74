mod app_config;
pub mod cities;
mod config;
pub mod inputs;
pub mod records;

use thiserror::Error;

pub use app_config::AppConfig;
pub use cities::{city_id, CITIES, DEFAULT_CITY};
pub use config::{load_app_config, load_app_config_from_env, load_app_config_with_overrides};
pub use inputs::{load_categories, load_proxies, Category, ProxyEndpoint};
pub use records::{Assets, Characteristics, PriceData, ProductMetadata, ProductRecord, Stock};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read input file {path}: {source}")]
    InputFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
