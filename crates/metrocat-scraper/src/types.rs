//! Catalog API response types.
//!
//! The products API answers a category query with
//! `{"data": {"category": {"products": [...]}}}`. Only the fields the export
//! needs are modelled; everything else in the payload is ignored.
//!
//! ### `stocks`
//! One entry per store the query was scoped to. With a single `storeId`
//! the API returns exactly one entry, and its `prices` block is the price at
//! that store. An empty or missing list is treated as a malformed item.
//!
//! ### `old_price`
//! Present and numeric when `is_promo` is `true`. Non-promo items send
//! `null` or omit it.

use serde::Deserialize;
use serde_json::Number;

/// A single product from a category page.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub id: i64,

    pub name: String,

    /// Path relative to the storefront origin, e.g. `"/products/chay-1"`.
    pub url: String,

    pub manufacturer: RawManufacturer,

    #[serde(default)]
    pub stocks: Vec<RawStock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawManufacturer {
    pub name: String,
}

/// Availability and pricing at one store.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStock {
    pub prices: RawPrices,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPrices {
    pub is_promo: bool,

    /// Current shelf price; the discounted price when `is_promo` is set.
    pub price: Number,

    /// Pre-discount price. Only meaningful when `is_promo` is set.
    #[serde(default)]
    pub old_price: Option<Number>,
}
