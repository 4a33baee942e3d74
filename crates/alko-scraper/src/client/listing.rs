//! Category listing for `AlkotekaClient`.

use alko_core::Category;

use crate::error::ScraperError;
use crate::types::ProductListResponse;

use super::AlkotekaClient;

impl AlkotekaClient {
    /// Lists the product slugs of `category` in `city_id` with a single
    /// request sized to cover the whole category.
    ///
    /// Goes out directly, outside the concurrency slots, without retries.
    /// Entries without a slug are skipped.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`]: network or TLS failure.
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx status.
    /// - [`ScraperError::Deserialize`]: body is not JSON.
    /// - [`ScraperError::MalformedResponse`]: body has no `results` list.
    pub async fn list_category(
        &self,
        category: &Category,
        city_id: &str,
    ) -> Result<Vec<String>, ScraperError> {
        let url = self.listing_url(&category.slug, city_id)?;
        let response = self.direct.get(url.clone()).send().await?;
        let status = response.status();
        tracing::info!(category = %category.slug, status = status.as_u16(), "category listing response");

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ProductListResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("listing for category {}", category.slug),
                source: e,
            }
        })?;

        let results = parsed
            .results
            .ok_or_else(|| ScraperError::MalformedResponse {
                context: format!("listing for category {}", category.slug),
                reason: "missing `results` list".to_owned(),
            })?;

        if let Some(section) = results
            .first()
            .and_then(|first| first.category.as_ref())
            .and_then(|c| c.parent.as_ref())
            .and_then(|p| p.name.as_deref())
        {
            tracing::info!(
                category = %category.slug,
                section,
                products = results.len(),
                "listed category"
            );
        }

        let listed = results.len();
        let slugs: Vec<String> = results
            .into_iter()
            .filter_map(|product| product.slug.filter(|s| !s.is_empty()))
            .collect();

        if slugs.len() < listed {
            tracing::warn!(
                category = %category.slug,
                skipped = listed - slugs.len(),
                "listing entries without a slug"
            );
        }

        Ok(slugs)
    }
}
