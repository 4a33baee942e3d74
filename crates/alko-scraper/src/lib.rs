pub mod client;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod proxy;
pub mod rate_limit;
pub mod types;

pub use client::{AlkotekaClient, ClientSettings};
pub use error::ScraperError;
pub use normalize::normalize_product;
pub use pipeline::{run_pipeline, CategoryReport, CategoryStatus, RunReport};
pub use proxy::{proxy_for, ProxyCredentials, ProxyCursor, ProxyPool, ProxyRoute};
pub use rate_limit::RetryPolicy;
pub use types::{ProductDetailResponse, ProductListResponse, RawProduct};
