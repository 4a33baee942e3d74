//! City name → upstream `city_uuid` table.
//!
//! Prices and stock on the upstream API are per city, so every listing and
//! detail request carries one of these identifiers.

/// City used when `ALKO_CITY` is not set.
pub const DEFAULT_CITY: &str = "Краснодар";

/// Known cities and their upstream identifiers, in display order.
pub const CITIES: &[(&str, &str)] = &[
    ("Москва", "396df2b5-7b2b-11eb-80cd-00155d03900"),
    ("Краснодар", "4a70f9e0-46ae-11e7-83ff-00155d026416"),
    ("Ростов-на-Дону", "878a9eb4-46b2-11e7-83ff-00155d026416"),
    ("Сочи", "985b3eea-46b4-11e7-83ff-00155d026416"),
];

/// Looks up the upstream identifier for a city name. Matching is exact after
/// trimming surrounding whitespace.
#[must_use]
pub fn city_id(name: &str) -> Option<&'static str> {
    let name = name.trim();
    CITIES
        .iter()
        .find(|(city, _)| *city == name)
        .map(|(_, id)| *id)
}
