//! Line-oriented input lists: category URLs and proxy endpoints.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A catalog category to scrape, e.g.
/// `https://alkoteka.com/catalog/slaboalkogolnye-napitki-2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub url: String,
    /// Last non-empty path segment of `url`; sent upstream as
    /// `root_category_slug`.
    pub slug: String,
}

impl Category {
    /// Builds a category from its URL, deriving the slug.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the URL has no usable path segment.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        let without_query = url.split(['?', '#']).next().unwrap_or_default();
        let slug = without_query
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();

        if slug.is_empty() || slug.contains(':') {
            return Err(ConfigError::Validation(format!(
                "category URL \"{url}\" has no category slug"
            )));
        }

        Ok(Self {
            url: url.to_string(),
            slug: slug.to_string(),
        })
    }
}

/// A forward proxy given as `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyEndpoint(String);

impl ProxyEndpoint {
    /// Parses a `host:port` string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the host is empty or the port is
    /// not a valid `u16`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let (host, port) = raw.rsplit_once(':').ok_or_else(|| {
            ConfigError::Validation(format!("proxy \"{raw}\" is not in host:port form"))
        })?;
        if host.is_empty() || host.contains('/') {
            return Err(ConfigError::Validation(format!(
                "proxy \"{raw}\" has an invalid host"
            )));
        }
        port.parse::<u16>().map_err(|e| {
            ConfigError::Validation(format!("proxy \"{raw}\" has an invalid port: {e}"))
        })?;
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Proxy URL for an HTTP forward proxy, e.g. `"http://10.0.0.1:8000"`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.0)
    }
}

impl std::fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads non-blank, non-comment (`#`) lines from a text file.
fn read_lines(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InputFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Load the category URL list, one URL per line.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or a line is not a usable
/// category URL.
pub fn load_categories(path: &Path) -> Result<Vec<Category>, ConfigError> {
    read_lines(path)?
        .iter()
        .map(|line| Category::from_url(line))
        .collect()
}

/// Load the proxy pool, one `host:port` per line. An empty file yields an
/// empty pool.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or a line is malformed.
pub fn load_proxies(path: &Path) -> Result<Vec<ProxyEndpoint>, ConfigError> {
    read_lines(path)?
        .iter()
        .map(|line| ProxyEndpoint::parse(line))
        .collect()
}
