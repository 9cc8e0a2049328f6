//! # Response Formatting
//!
//! Response envelope for product listings.

use serde::Serialize;
use serde_json::Value;

/// Product list envelope. `nbHits` counts the items on the returned
/// page, not total matches across pages.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Value>,

    #[serde(rename = "nbHits")]
    pub nb_hits: usize,
}

impl ProductListResponse {
    pub fn new(products: Vec<Value>) -> Self {
        let nb_hits = products.len();
        Self { products, nb_hits }
    }
}
