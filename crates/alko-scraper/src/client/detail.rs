//! Per-product detail fetch for `AlkotekaClient`.

use alko_core::ProductRecord;
use reqwest::StatusCode;

use crate::error::ScraperError;
use crate::normalize::normalize_product;
use crate::proxy::ProxyRoute;
use crate::rate_limit::retry_with_linear_backoff;
use crate::types::ProductDetailResponse;

use super::AlkotekaClient;

impl AlkotekaClient {
    /// Fetches and normalizes one product.
    ///
    /// Waits for a concurrency slot, then requests the detail endpoint through
    /// `route` (directly when `None`), pacing every attempt and retrying
    /// transport failures and non-200 responses with linear backoff. The slot
    /// is released once a 200 body has been read or the attempts run out;
    /// normalization happens outside the slot.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RetriesExhausted`]: every attempt failed at the
    ///   transport or status level; wraps the last failure.
    /// - [`ScraperError::Deserialize`]: 200 body is not JSON (not retried).
    /// - [`ScraperError::MalformedResponse`] / [`ScraperError::DiscountUndefined`]
    ///   as raised by [`normalize_product`] (not retried).
    pub async fn fetch_product(
        &self,
        item: &str,
        route: Option<&ProxyRoute>,
        city_id: &str,
    ) -> Result<ProductRecord, ScraperError> {
        let url = self.product_url(item, city_id)?;
        let http = route.map_or(&self.direct, |r| &r.client);
        let headers = &self.headers;

        if let Some(route) = route {
            tracing::debug!(item, proxy = %route.endpoint, "fetching product");
        } else {
            tracing::debug!(item, "fetching product without proxy");
        }

        let (timestamp, body) = {
            let _permit = self.gate.acquire().await?;
            retry_with_linear_backoff(&self.retry, item, || {
                let url = url.clone();
                async move {
                    let response = http.get(url.clone()).headers(headers.clone()).send().await?;
                    let status = response.status();
                    if status != StatusCode::OK {
                        return Err(ScraperError::UnexpectedStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }

                    let timestamp = chrono::Utc::now().timestamp();
                    let body = response.text().await?;
                    Ok((timestamp, body))
                }
            })
            .await?
        };

        let parsed = serde_json::from_str::<ProductDetailResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("product {item}"),
                source: e,
            }
        })?;

        normalize_product(parsed, item, timestamp, &self.base_url)
    }
}
