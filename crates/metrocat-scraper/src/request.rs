//! Request body for the catalog GraphQL endpoint.
//!
//! The body doubles as the pagination cursor: `variables.from` is the number
//! of items to skip, and it is the only field that changes between pages.

use serde::Serialize;

use metrocat_core::ExportConfig;

/// Full POST body for one category page.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogRequest {
    pub query: String,
    pub variables: CatalogVariables,
}

/// GraphQL variables. Field names follow the API, which mixes camelCase
/// and `snake_case`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogVariables {
    #[serde(rename = "isShouldFetchOnlyProducts")]
    pub is_should_fetch_only_products: bool,
    pub slug: String,
    #[serde(rename = "storeId")]
    pub store_id: u32,
    pub sort: String,
    pub size: u32,
    pub from: u64,
    pub filters: Vec<CatalogFilter>,
    pub attributes: Vec<serde_json::Value>,
    pub in_stock: bool,
    pub eshop_order: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogFilter {
    pub field: String,
    pub value: String,
}

impl CatalogRequest {
    /// Builds the first-page request for the configured category and store:
    /// in-stock items only, default sort, main articles only, offset zero.
    #[must_use]
    pub fn first_page(config: &ExportConfig, query: String) -> Self {
        Self {
            query,
            variables: CatalogVariables {
                is_should_fetch_only_products: true,
                slug: config.category.clone(),
                store_id: config.store_id,
                sort: "default".to_string(),
                size: config.page_size,
                from: 0,
                filters: vec![CatalogFilter {
                    field: "main_article".to_string(),
                    value: "0".to_string(),
                }],
                attributes: Vec::new(),
                in_stock: true,
                eshop_order: false,
            },
        }
    }

    /// Current offset into the category.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.variables.from
    }

    /// Moves the cursor past one full page.
    pub(crate) fn advance(&mut self, page_size: u32) {
        self.variables.from = self.variables.from.saturating_add(u64::from(page_size));
    }
}
