use serde_json::Number;

/// Header row of the exported TSV, in the same order as [`NormalizedRecord::as_row`].
pub const TSV_HEADERS: [&str; 6] = [
    "ID",
    "Name",
    "URL",
    "Regular Price, RUB",
    "Sale Price, RUB",
    "Brand Name",
];

/// A catalog item flattened into one output row.
///
/// Exactly one pricing state holds: on promotion, `regular_price` is the
/// pre-discount price and `sale_price` is `Some(current price)`; otherwise
/// `regular_price` is the current price and `sale_price` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub id: i64,
    pub name: String,
    /// Storefront origin joined with the item's relative path.
    pub absolute_url: String,
    /// Kept as the API's JSON number so `90` and `90.5` round-trip unchanged.
    pub regular_price: Number,
    pub sale_price: Option<Number>,
    /// Manufacturer name.
    pub brand: String,
}

impl NormalizedRecord {
    /// Projects the record onto the six TSV columns. A missing sale price
    /// becomes an empty cell.
    #[must_use]
    pub fn as_row(&self) -> [String; 6] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.absolute_url.clone(),
            self.regular_price.to_string(),
            self.sale_price
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            self.brand.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sale_price: Option<Number>) -> NormalizedRecord {
        NormalizedRecord {
            id: 1,
            name: "Tea".to_string(),
            absolute_url: "https://online.metro-cc.ru/p/1".to_string(),
            regular_price: Number::from(120),
            sale_price,
            brand: "Acme".to_string(),
        }
    }

    #[test]
    fn as_row_follows_header_order() {
        let row = record(Some(Number::from(90))).as_row();
        assert_eq!(
            row,
            [
                "1",
                "Tea",
                "https://online.metro-cc.ru/p/1",
                "120",
                "90",
                "Acme"
            ]
        );
        assert_eq!(row.len(), TSV_HEADERS.len());
    }

    #[test]
    fn as_row_leaves_sale_price_empty_when_not_on_sale() {
        let row = record(None).as_row();
        assert_eq!(row[4], "");
        assert_eq!(row[3], "120");
    }

    #[test]
    fn as_row_keeps_fractional_prices() {
        let mut rec = record(None);
        rec.regular_price = Number::from_f64(89.99).unwrap();
        assert_eq!(rec.as_row()[3], "89.99");
    }
}
