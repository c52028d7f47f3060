pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
mod rate_limit;
pub mod request;
pub mod types;

pub use client::CatalogClient;
pub use error::ScraperError;
pub use normalize::{normalize_item, normalize_page, parse_item};
pub use pagination::{CatalogPages, RetrievalStatus};
pub use request::CatalogRequest;
pub use types::RawItem;
