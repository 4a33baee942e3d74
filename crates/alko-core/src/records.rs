use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A product scraped from the catalog, flattened into the output schema.
///
/// Every field is always present in the serialized form; upstream gaps are
/// filled with empty strings, zeros, `false`, or empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unix seconds at which the detail response was accepted.
    pub timestamp: i64,
    /// Upstream vendor code (article number).
    #[serde(rename = "RPC")]
    pub rpc: String,
    /// Canonical product page, e.g. `"https://alkoteka.com/product/vino/chateau-x"`.
    pub url: String,
    /// Product name, with the volume appended when the upstream reports one.
    pub title: String,
    pub marketing_tags: Vec<String>,
    pub brand: String,
    /// Always `[parent category name, category name]`.
    pub section: Vec<String>,
    pub price_data: PriceData,
    pub stock: Stock,
    pub assets: Assets,
    pub metadata: ProductMetadata,
    /// Number of purchasable variants; the upstream has no variant grouping.
    pub variants: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    pub current: f64,
    pub original: f64,
    /// e.g. `"Discount 20%"`.
    pub sale_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub in_stock: bool,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    pub main_image: String,
    pub set_images: Vec<String>,
    pub view360: Vec<String>,
    pub video: Vec<String>,
}

/// Free-form product metadata: the description plus every characteristic
/// extracted from the description blocks, keyed by its display title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(rename = "__description")]
    pub description: String,
    #[serde(flatten)]
    pub characteristics: Characteristics,
}

/// Product characteristics in upstream block order.
///
/// Serializes as a JSON object whose keys keep insertion order. Inserting an
/// existing title replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Characteristics(Vec<(String, String)>);

impl Characteristics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: String, value: String) {
        if let Some(entry) = self.0.iter_mut().find(|(t, _)| *t == title) {
            entry.1 = value;
        } else {
            self.0.push((title, value));
        }
    }

    #[must_use]
    pub fn get(&self, title: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Titles in insertion order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(t, _)| t.as_str())
    }
}

impl<const N: usize> From<[(String, String); N]> for Characteristics {
    fn from(entries: [(String, String); N]) -> Self {
        let mut out = Self::new();
        for (title, value) in entries {
            out.insert(title, value);
        }
        out
    }
}

impl Serialize for Characteristics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (title, value) in &self.0 {
            map.serialize_entry(title, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Characteristics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CharacteristicsVisitor;

        impl<'de> Visitor<'de> for CharacteristicsVisitor {
            type Value = Characteristics;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of characteristic titles to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = Characteristics::new();
                while let Some((title, value)) = access.next_entry::<String, String>()? {
                    out.insert(title, value);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(CharacteristicsVisitor)
    }
}
