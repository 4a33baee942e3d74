//! HTTP client for the alkoteka `web-api/v1/product` endpoints.

mod detail;
mod listing;

use std::time::Duration;

use alko_core::{AppConfig, ProxyEndpoint};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use tokio::sync::Semaphore;

use crate::error::ScraperError;
use crate::proxy::{ProxyCredentials, ProxyPool};
use crate::rate_limit::RetryPolicy;

const PRODUCT_API_PATH: [&str; 3] = ["web-api", "v1", "product"];

/// Header set of a desktop Chrome fetch from the storefront itself.
const BROWSER_HEADERS: [(&str, &str); 9] = [
    ("accept", "*/*"),
    (
        "accept-language",
        "ru,ru-RU;q=0.9,en-US;q=0.8,en;q=0.7,th;q=0.6",
    ),
    ("priority", "u=1, i"),
    (
        "sec-ch-ua",
        "\"Google Chrome\";v=\"135\", \"Not-A.Brand\";v=\"8\", \"Chromium\";v=\"135\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
];

/// Everything needed to build an [`AlkotekaClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Storefront origin, e.g. `"https://alkoteka.com"`.
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Number of detail fetches allowed in flight at once.
    pub max_concurrent_requests: usize,
    pub retry: RetryPolicy,
    /// `per_page` for category listings; large enough to get a whole category.
    pub listing_page_size: u32,
    pub proxies: Vec<ProxyEndpoint>,
    pub proxy_credentials: Option<ProxyCredentials>,
}

impl ClientSettings {
    /// Client settings from the application config plus the loaded proxy pool.
    #[must_use]
    pub fn from_config(config: &AppConfig, proxies: Vec<ProxyEndpoint>) -> Self {
        let proxy_credentials = config
            .proxy_login
            .clone()
            .map(|login| ProxyCredentials {
                login,
                password: config.proxy_password.clone().unwrap_or_default(),
            });

        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            max_concurrent_requests: config.max_concurrent_requests,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                pacing: Duration::from_millis(config.inter_request_delay_ms),
                backoff_initial: Duration::from_secs(config.backoff_initial_secs),
                backoff_step: Duration::from_secs(config.backoff_step_secs),
            },
            listing_page_size: config.listing_page_size,
            proxies,
            proxy_credentials,
        }
    }
}

/// HTTP client for the catalog listing and product detail endpoints.
///
/// Detail fetches share a fixed number of concurrency slots; a slot is held
/// for the whole fetch including retries. Listing requests bypass the slots
/// and the proxy pool.
pub struct AlkotekaClient {
    pub(super) base_url: String,
    /// Direct (unproxied) client, used for listings and when the pool is empty.
    pub(super) direct: Client,
    pub(super) proxies: ProxyPool,
    pub(super) gate: Semaphore,
    pub(super) retry: RetryPolicy,
    pub(super) listing_page_size: u32,
    pub(super) headers: HeaderMap,
}

impl AlkotekaClient {
    /// Creates the direct client and one proxied client per pool endpoint.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` is not an absolute URL.
    /// - [`ScraperError::InvalidProxy`] / [`ScraperError::Http`] if a client
    ///   cannot be constructed.
    pub fn new(settings: ClientSettings) -> Result<Self, ScraperError> {
        let base_url = settings.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let direct = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .no_proxy()
            .build()?;

        let proxies = ProxyPool::build(
            settings.proxies,
            settings.proxy_credentials.as_ref(),
            settings.request_timeout,
            &settings.user_agent,
        )?;

        Ok(Self {
            base_url,
            direct,
            proxies,
            gate: Semaphore::new(settings.max_concurrent_requests.max(1)),
            retry: settings.retry,
            listing_page_size: settings.listing_page_size,
            headers: browser_headers(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn proxies(&self) -> &ProxyPool {
        &self.proxies
    }

    /// Concurrency slots currently free.
    #[must_use]
    pub fn available_slots(&self) -> usize {
        self.gate.available_permits()
    }

    /// `{base}/web-api/v1/product[/{item}]` with the given query pairs.
    fn api_url(&self, item: Option<&str>, query: &[(&str, &str)]) -> Result<Url, ScraperError> {
        let invalid = |reason: &str| ScraperError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            reason: reason.to_owned(),
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(&e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| invalid("URL cannot be a base"))?;
            segments.pop_if_empty().extend(PRODUCT_API_PATH);
            if let Some(item) = item {
                segments.push(item);
            }
        }
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    /// Detail URL for `item` in `city_id`.
    fn product_url(&self, item: &str, city_id: &str) -> Result<Url, ScraperError> {
        self.api_url(Some(item), &[("city_uuid", city_id)])
    }

    /// Listing URL for every product of `category_slug` in `city_id`.
    fn listing_url(&self, category_slug: &str, city_id: &str) -> Result<Url, ScraperError> {
        let per_page = self.listing_page_size.to_string();
        self.api_url(
            None,
            &[
                ("city_uuid", city_id),
                ("page", "1"),
                ("per_page", per_page.as_str()),
                ("root_category_slug", category_slug),
            ],
        )
    }
}

fn browser_headers() -> HeaderMap {
    BROWSER_HEADERS
        .into_iter()
        .map(|(name, value)| {
            (
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
