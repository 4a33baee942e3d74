use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed response for {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    #[error("cannot compute discount for product {item}: original price is zero")]
    DiscountUndefined { item: String },

    #[error("giving up on {item} after {attempts} attempts: {last}")]
    RetriesExhausted {
        item: String,
        attempts: u32,
        #[source]
        last: Box<ScraperError>,
    },

    #[error("invalid proxy {proxy}: {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("concurrency gate closed")]
    GateClosed(#[from] tokio::sync::AcquireError),
}
