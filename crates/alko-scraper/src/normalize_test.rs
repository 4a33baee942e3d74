use serde_json::json;

use super::*;

const BASE: &str = "https://alkoteka.com";
const TS: i64 = 1_745_000_000;

fn parse(value: serde_json::Value) -> ProductDetailResponse {
    serde_json::from_value(value).expect("fixture should deserialize")
}

/// Smallest payload the normalizer accepts.
fn minimal() -> serde_json::Value {
    json!({
        "results": {
            "prev_price": 1000,
            "category": {"slug": "vodka"}
        }
    })
}

fn full() -> serde_json::Value {
    json!({
        "results": {
            "name": "Vodka X",
            "vendor_code": 26537,
            "price": 800,
            "prev_price": 1000,
            "available": true,
            "quantity_total": 14,
            "image_url": "https://cdn.alkoteka.com/vodka-x.png",
            "category": {
                "slug": "vodka",
                "name": "Водка",
                "parent": {"name": "Крепкий алкоголь"}
            },
            "filter_labels": [
                {"filter": "dopolnitelno", "title": "Новинка"},
                {"filter": "obem", "title": "0.5 L"}
            ],
            "description_blocks": [
                {"code": "brend", "type": "select", "title": "Бренд", "values": [{"name": "X"}]},
                {"code": "krepost", "type": "range", "title": "Крепость", "max": 40, "unit": "%"},
                {"code": "obem", "type": "range", "title": "Объем", "max": 0.5, "unit": "л"},
                {"code": "strana", "type": "select", "title": "Страна", "values": [{"name": "Россия"}, {"name": "Беларусь"}]},
                {"code": "podarok", "type": "flag", "title": "Подарочная упаковка", "placeholder": "Есть"},
                {"code": "vkus", "type": "matrix", "title": "Вкус"}
            ],
            "text_blocks": [
                {"title": "Описание", "content": "Чистая.<br>\nМягкая"},
                {"title": "Дегустационные характеристики", "content": "ignored"},
                {"title": "Описание", "content": "<br>\nФинал"}
            ]
        }
    })
}

#[test]
fn normalize_minimal_payload_fills_defaults() {
    let record = normalize_product(parse(minimal()), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.timestamp, TS);
    assert_eq!(record.rpc, "");
    assert_eq!(record.title, "");
    assert!(record.marketing_tags.is_empty());
    assert_eq!(record.brand, "");
    assert_eq!(record.section, ["", ""]);
    assert!(!record.stock.in_stock);
    assert_eq!(record.stock.count, 0);
    assert_eq!(record.assets.main_image, "");
    assert!(record.assets.set_images.is_empty());
    assert!(record.assets.view360.is_empty());
    assert!(record.assets.video.is_empty());
    assert_eq!(record.metadata.description, "");
    assert!(record.metadata.characteristics.is_empty());
    assert_eq!(record.variants, 1);
}

#[test]
fn normalize_builds_canonical_url() {
    let record = normalize_product(parse(minimal()), "vodka-x", TS, "https://alkoteka.com/")
        .unwrap();
    assert_eq!(record.url, "https://alkoteka.com/product/vodka/vodka-x");
}

#[test]
fn normalize_full_payload() {
    let record = normalize_product(parse(full()), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.rpc, "26537");
    assert_eq!(record.title, "Vodka X 0.5 L");
    assert_eq!(record.marketing_tags, ["Новинка", "0.5 L"]);
    assert_eq!(record.brand, "X");
    assert_eq!(record.section, ["Крепкий алкоголь", "Водка"]);
    assert!(record.stock.in_stock);
    assert_eq!(record.stock.count, 14);
    assert_eq!(record.assets.main_image, "https://cdn.alkoteka.com/vodka-x.png");
}

#[test]
fn normalize_extracts_characteristics_by_block_type() {
    let record = normalize_product(parse(full()), "vodka-x", TS, BASE).unwrap();
    let chars = &record.metadata.characteristics;
    assert_eq!(chars.get("Крепость"), Some("40%"));
    assert_eq!(chars.get("Объем"), Some("0.5л"));
    assert_eq!(chars.get("Страна"), Some("Россия"));
    assert_eq!(chars.get("Подарочная упаковка"), Some("Есть"));
    // Brand block feeds `brand`, unknown types are dropped.
    assert!(!chars.contains_key("Бренд"));
    assert!(!chars.contains_key("Вкус"));
    assert_eq!(chars.len(), 4);
}

#[test]
fn normalize_joins_description_blocks() {
    let record = normalize_product(parse(full()), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.metadata.description, "Чистая.. Мягкая. Финал");
}

#[test]
fn title_without_volume_label_is_bare_name() {
    let mut payload = full();
    payload["results"]["filter_labels"] = json!([{"filter": "dopolnitelno", "title": "Новинка"}]);
    let record = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.title, "Vodka X");
}

#[test]
fn title_ignores_empty_volume_title() {
    let mut payload = full();
    payload["results"]["filter_labels"] = json!([{"filter": "obem", "title": ""}]);
    let record = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.title, "Vodka X");
}

#[test]
fn discount_from_price_and_prev_price() {
    let record = normalize_product(parse(full()), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.price_data.current, 800.0);
    assert_eq!(record.price_data.original, 1000.0);
    assert_eq!(record.price_data.sale_tag, "Discount 20%");
}

#[test]
fn missing_price_falls_back_to_prev_price() {
    let mut payload = full();
    payload["results"]
        .as_object_mut()
        .unwrap()
        .remove("price");
    let record = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.price_data.current, 1000.0);
    assert_eq!(record.price_data.original, 1000.0);
    assert_eq!(record.price_data.sale_tag, "Discount 0%");
}

#[test]
fn zero_price_falls_back_to_prev_price() {
    let mut payload = full();
    payload["results"]["price"] = json!(0);
    let record = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.price_data.current, 1000.0);
}

#[test]
fn zero_original_price_is_discount_error() {
    let mut payload = full();
    payload["results"]["prev_price"] = json!(0);
    let err = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap_err();
    assert!(
        matches!(err, ScraperError::DiscountUndefined { ref item } if item == "vodka-x"),
        "expected DiscountUndefined, got: {err:?}"
    );
}

#[test]
fn sale_tag_rounds_half_to_even() {
    // 100 * 0.875 = 87.5 → 88 → 12%; 100 * 0.865 ≈ 86.5 → 86 → 14%.
    assert_eq!(sale_tag(875.0, 1000.0, "x").unwrap(), "Discount 12%");
    assert_eq!(sale_tag(865.0, 1000.0, "x").unwrap(), "Discount 14%");
    assert_eq!(sale_tag(333.0, 1000.0, "x").unwrap(), "Discount 67%");
}

#[test]
fn missing_results_is_malformed() {
    let err = normalize_product(parse(json!({})), "vodka-x", TS, BASE).unwrap_err();
    assert!(
        matches!(err, ScraperError::MalformedResponse { ref reason, .. } if reason.contains("results")),
        "expected MalformedResponse, got: {err:?}"
    );
}

#[test]
fn missing_category_slug_is_malformed() {
    let payload = json!({"results": {"prev_price": 10, "category": {"name": "Водка"}}});
    let err = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap_err();
    assert!(
        matches!(err, ScraperError::MalformedResponse { ref reason, .. } if reason.contains("slug")),
        "expected MalformedResponse, got: {err:?}"
    );
}

#[test]
fn brand_block_without_values_leaves_brand_empty() {
    let mut payload = full();
    payload["results"]["description_blocks"] = json!([{"code": "brend", "type": "select", "values": []}]);
    let record = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap();
    assert_eq!(record.brand, "");
    assert!(record.metadata.characteristics.is_empty());
}

#[test]
fn untitled_blocks_are_skipped() {
    let mut payload = full();
    payload["results"]["description_blocks"] = json!([{"type": "flag", "placeholder": "Да"}]);
    let record = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap();
    assert!(record.metadata.characteristics.is_empty());
}

#[test]
fn characteristics_keep_upstream_block_order() {
    let record = normalize_product(parse(full()), "vodka-x", TS, BASE).unwrap();
    let titles: Vec<&str> = record.metadata.characteristics.titles().collect();
    assert_eq!(titles, ["Крепость", "Объем", "Страна", "Подарочная упаковка"]);
}

#[test]
fn block_titled_like_description_key_is_skipped() {
    let mut payload = full();
    payload["results"]["description_blocks"] = json!([
        {"type": "flag", "title": "__description", "placeholder": "Да"},
        {"type": "flag", "title": "Подарок", "placeholder": "Есть"}
    ]);
    let record = normalize_product(parse(payload), "vodka-x", TS, BASE).unwrap();
    assert!(!record.metadata.characteristics.contains_key("__description"));

    let value = serde_json::to_value(&record.metadata).unwrap();
    assert_eq!(
        value,
        json!({"__description": "Чистая.. Мягкая. Финал", "Подарок": "Есть"})
    );
}

#[test]
fn non_finite_prices_are_malformed() {
    for (price, prev_price) in [
        (json!("800"), json!("NaN")),
        (json!("-inf"), json!(1000)),
        (json!("inf"), json!(1000)),
    ] {
        let payload = json!({
            "results": {"price": price, "prev_price": prev_price, "category": {"slug": "vino"}}
        });
        let err = normalize_product(parse(payload), "vino-x", TS, BASE).unwrap_err();
        assert!(
            matches!(err, ScraperError::MalformedResponse { ref reason, .. } if reason.contains("finite")),
            "expected MalformedResponse for {price}/{prev_price}, got: {err:?}"
        );
    }
}

#[test]
fn extreme_price_ratio_is_an_error_not_a_panic() {
    let err = sale_tag(-1e300, 1.0, "x").unwrap_err();
    assert!(matches!(err, ScraperError::MalformedResponse { .. }), "got: {err:?}");

    let err = sale_tag(1e300, 0.5, "x").unwrap_err();
    assert!(matches!(err, ScraperError::MalformedResponse { .. }), "got: {err:?}");

    let payload = json!({
        "results": {"price": -1e300, "prev_price": 1, "category": {"slug": "vino"}}
    });
    let err = normalize_product(parse(payload), "vino-x", TS, BASE).unwrap_err();
    assert!(matches!(err, ScraperError::MalformedResponse { .. }), "got: {err:?}");
}

#[test]
fn negative_discount_within_range_is_formatted() {
    assert_eq!(sale_tag(1500.0, 1000.0, "x").unwrap(), "Discount -50%");
}

