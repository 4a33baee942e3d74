//! Response types for the alkoteka `web-api/v1/product` endpoints.
//!
//! ## Observed shape
//!
//! ### Listing (`GET /web-api/v1/product?root_category_slug=...`)
//! `{"results": [{"slug": "...", "category": {...}, ...}], "meta": {...}}`.
//! Only `slug` is needed; `category.parent.name` of the first entry is logged.
//!
//! ### Detail (`GET /web-api/v1/product/{slug}`)
//! `{"results": {...}}` with a flat product object plus three optional lists:
//! - `filter_labels`: `[{"filter": "obem", "title": "0.5 L"}, ...]`; the titles
//!   double as marketing tags.
//! - `description_blocks`: characteristic blocks discriminated by `type`
//!   (`"range"`, `"select"`, `"flag"`), with the brand encoded as a block whose
//!   `code` is `"brend"`.
//! - `text_blocks`: `[{"title": "Описание", "content": "...<br>\n..."}]`.
//!
//! Any of these may be absent or `null`. Numeric fields have been seen both
//! as JSON numbers and as numeric strings, so they go through the lenient
//! helpers below and land as `Option`s; defaults are applied in
//! `normalize.rs`, never here.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level response from the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub results: Option<Vec<ListedProduct>>,
}

/// One entry of a category listing.
#[derive(Debug, Deserialize)]
pub struct ListedProduct {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<RawCategory>,
}

/// Top-level response from the detail endpoint.
#[derive(Debug, Deserialize)]
pub struct ProductDetailResponse {
    #[serde(default)]
    pub results: Option<RawProduct>,
}

/// The product object inside a detail response.
#[derive(Debug, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Article number. Integer on most products, string on some.
    #[serde(default, deserialize_with = "lenient_string")]
    pub vendor_code: Option<String>,

    /// Current (possibly discounted) price. `0`, `null`, or absent when the
    /// product only has a regular price.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,

    /// Regular price before discount.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub prev_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub available: Option<bool>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub quantity_total: Option<i64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub category: Option<RawCategory>,

    #[serde(default)]
    pub filter_labels: Option<Vec<FilterLabel>>,

    #[serde(default)]
    pub description_blocks: Option<Vec<DescriptionBlock>>,

    #[serde(default)]
    pub text_blocks: Option<Vec<TextBlock>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCategory {
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: Option<RawParentCategory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawParentCategory {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterLabel {
    /// Filter classifier, e.g. `"obem"` for volume.
    #[serde(default, deserialize_with = "lenient_string")]
    pub filter: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
}

/// Shape of a description block, from its `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Numeric range; rendered as `max` followed by `unit`.
    Range,
    /// Pick-list; rendered as the first value's name.
    Select,
    /// Boolean marker; rendered as its placeholder text.
    Flag,
    Other,
}

#[derive(Debug, Default, Deserialize)]
pub struct DescriptionBlock {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default)]
    pub max: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub values: Option<Vec<BlockValue>>,
}

impl DescriptionBlock {
    #[must_use]
    pub fn block_kind(&self) -> BlockKind {
        match self.kind.as_deref() {
            Some("range") => BlockKind::Range,
            Some("select") => BlockKind::Select,
            Some("flag") => BlockKind::Flag,
            _ => BlockKind::Other,
        }
    }

    /// Name of the first associated value, or `""` when there are none.
    #[must_use]
    pub fn first_value_name(&self) -> String {
        self.values
            .as_ref()
            .and_then(|values| values.first())
            .and_then(|value| value.name.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlockValue {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextBlock {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
}

/// Strings and numbers both become `Some(String)`; anything else is `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn detail_accepts_numeric_strings() {
        let raw: ProductDetailResponse = serde_json::from_value(json!({
            "results": {
                "vendor_code": 26537,
                "price": "799.5",
                "prev_price": 1000,
                "quantity_total": "7",
                "available": 1
            }
        }))
        .unwrap();
        let product = raw.results.unwrap();
        assert_eq!(product.vendor_code.as_deref(), Some("26537"));
        assert_eq!(product.price, Some(799.5));
        assert_eq!(product.prev_price, Some(1000.0));
        assert_eq!(product.quantity_total, Some(7));
        assert_eq!(product.available, Some(true));
    }

    #[test]
    fn detail_tolerates_null_lists() {
        let raw: ProductDetailResponse = serde_json::from_value(json!({
            "results": {
                "name": "Vodka X",
                "filter_labels": null,
                "description_blocks": null,
                "text_blocks": null,
                "price": null
            }
        }))
        .unwrap();
        let product = raw.results.unwrap();
        assert!(product.filter_labels.is_none());
        assert!(product.description_blocks.is_none());
        assert!(product.price.is_none());
    }

    #[test]
    fn missing_results_is_none() {
        let raw: ProductDetailResponse = serde_json::from_value(json!({"message": "x"})).unwrap();
        assert!(raw.results.is_none());
    }

    #[test]
    fn block_kind_from_type_discriminator() {
        let blocks: Vec<DescriptionBlock> = serde_json::from_value(json!([
            {"type": "range"},
            {"type": "select"},
            {"type": "flag"},
            {"type": "matrix"},
            {}
        ]))
        .unwrap();
        let kinds: Vec<BlockKind> = blocks.iter().map(DescriptionBlock::block_kind).collect();
        assert_eq!(
            kinds,
            [
                BlockKind::Range,
                BlockKind::Select,
                BlockKind::Flag,
                BlockKind::Other,
                BlockKind::Other
            ]
        );
    }

    #[test]
    fn first_value_name_defaults_to_empty() {
        let block: DescriptionBlock =
            serde_json::from_value(json!({"code": "brend", "values": []})).unwrap();
        assert_eq!(block.first_value_name(), "");
    }
}
