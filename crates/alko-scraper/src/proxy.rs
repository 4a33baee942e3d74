//! Round-robin proxy assignment.
//!
//! `reqwest` binds proxies at client construction, so the pool keeps one
//! pre-built client per endpoint and a request picks its route by position.

use std::time::Duration;

use alko_core::ProxyEndpoint;
use reqwest::Client;

use crate::error::ScraperError;

/// Returns the entry serving the `counter`-th request: `pool[counter % len]`.
/// `None` only for an empty pool.
#[must_use]
pub fn proxy_for<T>(pool: &[T], counter: usize) -> Option<&T> {
    if pool.is_empty() {
        None
    } else {
        pool.get(counter % pool.len())
    }
}

/// Monotonic position into the proxy pool.
#[derive(Debug, Default, Clone)]
pub struct ProxyCursor {
    position: usize,
}

impl ProxyCursor {
    /// Returns the current position and moves to the next one.
    pub fn advance(&mut self) -> usize {
        let current = self.position;
        self.position = self.position.wrapping_add(1);
        current
    }
}

/// Basic-auth credentials shared by every proxy in the pool.
#[derive(Clone)]
pub struct ProxyCredentials {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("login", &self.login)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// One proxy endpoint and the client that tunnels through it.
#[derive(Debug)]
pub struct ProxyRoute {
    pub endpoint: ProxyEndpoint,
    pub(crate) client: Client,
}

/// Fixed, ordered pool of proxy routes.
#[derive(Debug, Default)]
pub struct ProxyPool {
    routes: Vec<ProxyRoute>,
}

impl ProxyPool {
    /// Builds one client per endpoint, in order.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidProxy`] if an endpoint cannot be used as a proxy URL.
    /// - [`ScraperError::Http`] if a client cannot be constructed.
    pub fn build(
        endpoints: Vec<ProxyEndpoint>,
        credentials: Option<&ProxyCredentials>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let routes = endpoints
            .into_iter()
            .map(|endpoint| {
                let mut proxy = reqwest::Proxy::all(endpoint.url()).map_err(|source| {
                    ScraperError::InvalidProxy {
                        proxy: endpoint.to_string(),
                        source,
                    }
                })?;
                if let Some(creds) = credentials {
                    proxy = proxy.basic_auth(&creds.login, &creds.password);
                }

                let client = Client::builder()
                    .timeout(timeout)
                    .connect_timeout(Duration::from_secs(10))
                    .user_agent(user_agent)
                    .proxy(proxy)
                    .build()?;

                Ok(ProxyRoute { endpoint, client })
            })
            .collect::<Result<Vec<_>, ScraperError>>()?;

        Ok(Self { routes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route for the `counter`-th request; `None` means connect directly.
    #[must_use]
    pub fn route(&self, counter: usize) -> Option<&ProxyRoute> {
        proxy_for(&self.routes, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(raw: &[&str]) -> Vec<ProxyEndpoint> {
        raw.iter()
            .map(|r| ProxyEndpoint::parse(r).unwrap())
            .collect()
    }

    #[test]
    fn proxy_for_cycles_through_pool() {
        let pool = ["a", "b", "c"];
        let picked: Vec<&str> = (0..7).map(|i| *proxy_for(&pool, i).unwrap()).collect();
        assert_eq!(picked, ["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn proxy_for_empty_pool_is_none() {
        let pool: [&str; 0] = [];
        assert!(proxy_for(&pool, 0).is_none());
        assert!(proxy_for(&pool, 5).is_none());
    }

    #[test]
    fn cursor_advances_from_zero() {
        let mut cursor = ProxyCursor::default();
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
    }

    #[test]
    fn pool_routes_in_endpoint_order() {
        let pool = ProxyPool::build(
            endpoints(&["10.0.0.1:8000", "10.0.0.2:8000"]),
            None,
            Duration::from_secs(5),
            "alko-test/0.1",
        )
        .unwrap();
        assert_eq!(pool.len(), 2);
        let picked: Vec<&str> = (0..4)
            .map(|i| pool.route(i).unwrap().endpoint.as_str())
            .collect();
        assert_eq!(
            picked,
            ["10.0.0.1:8000", "10.0.0.2:8000", "10.0.0.1:8000", "10.0.0.2:8000"]
        );
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = ProxyCredentials {
            login: "scraper".to_owned(),
            password: "hunter2".to_owned(),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("scraper"));
        assert!(!rendered.contains("hunter2"));
    }
}
