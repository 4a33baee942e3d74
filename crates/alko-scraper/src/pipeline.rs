//! Category-by-category scrape coordinator.
//!
//! Each category is listed, then every listed product is fetched concurrently
//! (bounded by the client's slots) and collected in completion order.

use alko_core::{Category, ProductRecord};
use futures::stream::{FuturesUnordered, StreamExt};

use crate::client::AlkotekaClient;
use crate::error::ScraperError;
use crate::proxy::{ProxyCursor, ProxyPool, ProxyRoute};

/// How a category ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryStatus {
    /// Listing succeeded with at least one product; items may still have failed.
    Completed,
    /// Listing succeeded with no products.
    Empty,
    /// Listing failed; the message is the rendered error.
    ListingFailed(String),
}

/// Per-category counters for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub slug: String,
    pub listed: usize,
    pub fetched: usize,
    pub failed: usize,
    pub status: CategoryStatus,
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Normalized products in completion order, across all categories.
    pub records: Vec<ProductRecord>,
    pub categories: Vec<CategoryReport>,
}

impl RunReport {
    /// Items that were listed but produced no record.
    #[must_use]
    pub fn failed_items(&self) -> usize {
        self.categories.iter().map(|c| c.failed).sum()
    }

    /// Categories whose listing failed.
    #[must_use]
    pub fn failed_categories(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| matches!(c.status, CategoryStatus::ListingFailed(_)))
            .count()
    }
}

/// Pairs each item with the proxy route that will serve it.
///
/// Routes follow the cursor in listing order, so the assignment depends only on
/// the item's position and the pool, never on how earlier fetches went.
pub(crate) fn plan_fanout<'p>(
    items: Vec<String>,
    pool: &'p ProxyPool,
    cursor: &mut ProxyCursor,
) -> Vec<(String, Option<&'p ProxyRoute>)> {
    items
        .into_iter()
        .map(|item| {
            let route = pool.route(cursor.advance());
            (item, route)
        })
        .collect()
}

/// Scrapes `categories` one after another in `city_id`.
///
/// Never fails as a whole: a category whose listing fails is skipped, an item
/// whose fetch or normalization fails is left out, and both are logged and
/// counted in the returned report.
pub async fn run_pipeline(
    client: &AlkotekaClient,
    categories: &[Category],
    city_id: &str,
) -> RunReport {
    let mut report = RunReport::default();

    for category in categories {
        let category_report = scrape_category(client, category, city_id, &mut report.records).await;
        tracing::info!(
            category = %category_report.slug,
            listed = category_report.listed,
            fetched = category_report.fetched,
            failed = category_report.failed,
            "category done"
        );
        report.categories.push(category_report);
    }

    tracing::info!(
        records = report.records.len(),
        categories = report.categories.len(),
        failed_items = report.failed_items(),
        failed_categories = report.failed_categories(),
        "scrape finished"
    );
    report
}

async fn scrape_category(
    client: &AlkotekaClient,
    category: &Category,
    city_id: &str,
    records: &mut Vec<ProductRecord>,
) -> CategoryReport {
    let mut category_report = CategoryReport {
        slug: category.slug.clone(),
        listed: 0,
        fetched: 0,
        failed: 0,
        status: CategoryStatus::Empty,
    };

    let items = match client.list_category(category, city_id).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(category = %category.slug, error = %e, "listing failed, skipping category");
            category_report.status = CategoryStatus::ListingFailed(e.to_string());
            return category_report;
        }
    };

    category_report.listed = items.len();
    if items.is_empty() {
        tracing::info!(category = %category.slug, "category has no products");
        return category_report;
    }
    category_report.status = CategoryStatus::Completed;

    let mut cursor = ProxyCursor::default();
    let mut in_flight: FuturesUnordered<_> = plan_fanout(items, client.proxies(), &mut cursor)
        .into_iter()
        .map(|(item, route)| async move {
            let result = client.fetch_product(&item, route, city_id).await;
            (item, result)
        })
        .collect();

    while let Some((item, result)) = in_flight.next().await {
        match result {
            Ok(record) => {
                category_report.fetched += 1;
                records.push(record);
            }
            Err(e) => {
                category_report.failed += 1;
                log_item_failure(&category.slug, &item, &e);
            }
        }
    }

    category_report
}

fn log_item_failure(category: &str, item: &str, err: &ScraperError) {
    match err {
        ScraperError::RetriesExhausted { attempts, .. } => {
            tracing::error!(category, item, attempts, error = %err, "product skipped after retries");
        }
        ScraperError::DiscountUndefined { .. } => {
            tracing::error!(category, item, error = %err, "product skipped: zero original price");
        }
        ScraperError::Deserialize { .. } | ScraperError::MalformedResponse { .. } => {
            tracing::error!(category, item, error = %err, "product skipped: malformed response");
        }
        _ => {
            tracing::error!(category, item, error = %err, "product skipped");
        }
    }
}
