//! Normalization from raw catalog items to [`metrocat_core::NormalizedRecord`].

use metrocat_core::NormalizedRecord;
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::RawItem;

/// Deserializes one element of `data.category.products` into a [`RawItem`].
///
/// # Errors
///
/// Returns [`ScraperError::MalformedRecord`] if a required field is missing or
/// has the wrong type. The item id is taken from the raw JSON when present.
pub fn parse_item(value: Value) -> Result<RawItem, ScraperError> {
    let item_id = value
        .get("id")
        .map_or_else(|| "<unknown>".to_string(), ToString::to_string);

    serde_json::from_value(value).map_err(|e| ScraperError::MalformedRecord {
        item_id,
        reason: e.to_string(),
    })
}

/// Normalizes a raw [`RawItem`] into a [`NormalizedRecord`].
///
/// Pricing is read from the first stock entry. A promo item takes its regular
/// price from `old_price` and its sale price from `price`; any other item
/// uses `price` as the regular price and has no sale price. The absolute URL
/// is `base_url` followed by the item's relative path, with no encoding.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedRecord`] if the item has no stock entries
/// or is flagged as a promo without an `old_price`.
pub fn normalize_item(item: RawItem, base_url: &str) -> Result<NormalizedRecord, ScraperError> {
    let Some(stock) = item.stocks.into_iter().next() else {
        return Err(ScraperError::MalformedRecord {
            item_id: item.id.to_string(),
            reason: "item has no stock entries".into(),
        });
    };
    let prices = stock.prices;

    let (regular_price, sale_price) = if prices.is_promo {
        let Some(old_price) = prices.old_price else {
            return Err(ScraperError::MalformedRecord {
                item_id: item.id.to_string(),
                reason: "promo item is missing old_price".into(),
            });
        };
        (old_price, Some(prices.price))
    } else {
        (prices.price, None)
    };

    Ok(NormalizedRecord {
        id: item.id,
        name: item.name,
        absolute_url: format!("{base_url}{}", item.url),
        regular_price,
        sale_price,
        brand: item.manufacturer.name,
    })
}

/// Parses and normalizes one page of raw items, preserving API order.
///
/// Stops at the first malformed item.
///
/// # Errors
///
/// Propagates [`ScraperError::MalformedRecord`] from [`parse_item`] or
/// [`normalize_item`].
pub fn normalize_page(
    products: Vec<Value>,
    base_url: &str,
) -> Result<Vec<NormalizedRecord>, ScraperError> {
    products
        .into_iter()
        .map(|value| parse_item(value).and_then(|item| normalize_item(item, base_url)))
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
