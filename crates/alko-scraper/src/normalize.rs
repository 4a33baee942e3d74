//! Normalization from raw alkoteka detail responses to
//! [`alko_core::ProductRecord`].
//!
//! Only the `results` object and its `category.slug` are required; every other
//! field falls back to an empty value.

use alko_core::{Assets, Characteristics, PriceData, ProductMetadata, ProductRecord, Stock};
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::{BlockKind, DescriptionBlock, FilterLabel, ProductDetailResponse, TextBlock};

/// Filter classifier carrying the bottle volume.
pub const VOLUME_FILTER: &str = "obem";

/// Description block code carrying the brand.
pub const BRAND_CODE: &str = "brend";

/// Title of the text blocks that make up the product description.
pub const DESCRIPTION_TITLE: &str = "Описание";

const LINE_BREAK_MARKUP: &str = "<br>\n";

/// Output key of the description; a characteristic may not reuse it.
const DESCRIPTION_KEY: &str = "__description";

/// Normalizes a detail response for `item` into a [`ProductRecord`].
///
/// `timestamp` is the Unix time at which the response was accepted and
/// `base_url` the storefront origin used to build the canonical URL.
///
/// # Errors
///
/// - [`ScraperError::MalformedResponse`] if `results`, `results.category`, or
///   `results.category.slug` is missing, or a price is not a finite number.
/// - [`ScraperError::DiscountUndefined`] if the original price is zero.
pub fn normalize_product(
    response: ProductDetailResponse,
    item: &str,
    timestamp: i64,
    base_url: &str,
) -> Result<ProductRecord, ScraperError> {
    let malformed = |reason: &str| ScraperError::MalformedResponse {
        context: format!("product {item}"),
        reason: reason.to_owned(),
    };

    let product = response
        .results
        .ok_or_else(|| malformed("missing `results` object"))?;
    let category = product
        .category
        .ok_or_else(|| malformed("missing `results.category` object"))?;
    let category_slug = category
        .slug
        .filter(|s| !s.is_empty())
        .ok_or_else(|| malformed("missing `results.category.slug`"))?;

    let filter_labels = product.filter_labels.unwrap_or_default();
    let description_blocks = product.description_blocks.unwrap_or_default();
    let text_blocks = product.text_blocks.unwrap_or_default();

    let price_data = price_data(product.price, product.prev_price, item)?;
    let title = title_with_volume(product.name.unwrap_or_default(), &filter_labels);
    let marketing_tags = filter_labels
        .iter()
        .map(|label| label.title.clone().unwrap_or_default())
        .collect();
    let (brand, characteristics) = extract_characteristics(&description_blocks);

    let section = vec![
        category
            .parent
            .and_then(|parent| parent.name)
            .unwrap_or_default(),
        category.name.unwrap_or_default(),
    ];

    Ok(ProductRecord {
        timestamp,
        rpc: product.vendor_code.unwrap_or_default(),
        url: format!(
            "{}/product/{category_slug}/{item}",
            base_url.trim_end_matches('/')
        ),
        title,
        marketing_tags,
        brand,
        section,
        price_data,
        stock: Stock {
            in_stock: product.available.unwrap_or(false),
            count: product.quantity_total.unwrap_or(0),
        },
        // Gallery, 360 view, and video are not exposed by the detail endpoint.
        assets: Assets {
            main_image: product.image_url.unwrap_or_default(),
            ..Assets::default()
        },
        metadata: ProductMetadata {
            description: description_text(&text_blocks),
            characteristics,
        },
        variants: 1,
    })
}

/// Appends the volume filter title to the product name, separated by a space.
fn title_with_volume(name: String, filter_labels: &[FilterLabel]) -> String {
    let volume = filter_labels
        .iter()
        .find(|label| label.filter.as_deref() == Some(VOLUME_FILTER))
        .and_then(|label| label.title.as_deref())
        .filter(|title| !title.is_empty());

    match volume {
        Some(volume) => format!("{name} {volume}"),
        None => name,
    }
}

/// Splits description blocks into the brand and the characteristic map.
fn extract_characteristics(blocks: &[DescriptionBlock]) -> (String, Characteristics) {
    let mut brand = String::new();
    let mut characteristics = Characteristics::new();

    for block in blocks {
        if block.code.as_deref() == Some(BRAND_CODE) {
            brand = block.first_value_name();
            continue;
        }

        let Some(title) = block
            .title
            .as_deref()
            .filter(|t| !t.is_empty() && *t != DESCRIPTION_KEY)
        else {
            continue;
        };

        let value = match block.block_kind() {
            BlockKind::Range => format!(
                "{}{}",
                render_scalar(block.max.as_ref()),
                block.unit.as_deref().unwrap_or_default()
            ),
            BlockKind::Select => block.first_value_name(),
            BlockKind::Flag => block.placeholder.clone().unwrap_or_default(),
            BlockKind::Other => continue,
        };

        characteristics.insert(title.to_owned(), value);
    }

    (brand, characteristics)
}

/// Renders a JSON scalar the way it appears in the payload: `40` stays `40`,
/// `0.5` stays `0.5`, strings are unquoted, anything else is empty.
fn render_scalar(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Concatenates every description text block, turning `<br>\n` into `". "`.
fn description_text(text_blocks: &[TextBlock]) -> String {
    text_blocks
        .iter()
        .filter(|block| block.title.as_deref() == Some(DESCRIPTION_TITLE))
        .map(|block| {
            block
                .content
                .as_deref()
                .unwrap_or_default()
                .replace(LINE_BREAK_MARKUP, ". ")
        })
        .collect()
}

fn is_zero(value: f64) -> bool {
    value.abs() < f64::EPSILON
}

/// Resolves current/original prices and the discount label.
///
/// The current price falls back to the original price when the upstream
/// reports none (absent, `null`, or `0`).
fn price_data(
    price: Option<f64>,
    prev_price: Option<f64>,
    item: &str,
) -> Result<PriceData, ScraperError> {
    if let Some(bad) = [price, prev_price].into_iter().flatten().find(|p| !p.is_finite()) {
        return Err(ScraperError::MalformedResponse {
            context: format!("product {item}"),
            reason: format!("price {bad} is not a finite number"),
        });
    }

    let original = prev_price.unwrap_or(0.0);
    let current = price.filter(|p| !is_zero(*p)).unwrap_or(original);
    let sale_tag = sale_tag(current, original, item)?;

    Ok(PriceData {
        current,
        original,
        sale_tag,
    })
}

/// Largest ratio magnitude that survives the integer conversion exactly.
const MAX_PRICE_RATIO: f64 = 1e15;

/// Formats `"Discount {P}%"` with `P = 100 - round(100 * current / original)`,
/// rounding half to even.
///
/// # Errors
///
/// - [`ScraperError::DiscountUndefined`] when `original` is zero.
/// - [`ScraperError::MalformedResponse`] when the price ratio is not finite or
///   too large to express as a percentage.
pub(crate) fn sale_tag(current: f64, original: f64, item: &str) -> Result<String, ScraperError> {
    if is_zero(original) {
        return Err(ScraperError::DiscountUndefined {
            item: item.to_owned(),
        });
    }

    let ratio = (100.0 * current / original).round_ties_even();
    if !ratio.is_finite() || ratio.abs() > MAX_PRICE_RATIO {
        return Err(ScraperError::MalformedResponse {
            context: format!("product {item}"),
            reason: format!("price ratio {current}/{original} is out of range"),
        });
    }

    #[allow(clippy::cast_possible_truncation)]
    let percent = 100 - ratio as i64;
    Ok(format!("Discount {percent}%"))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
