//! # Product Model & Seed Data
//!
//! The product entity served by the listing API, plus the sample data
//! set used to populate the collection for the dev server and tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Collection, StoreResult};

/// A product document. Read-only from the API's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub rating: f64,
    pub featured: bool,
    pub company: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Serialize into a collection document
    pub fn to_document(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Sample product set. Creation timestamps are spaced one day apart in
/// listing order, so the default `createdAt` sort reproduces this
/// order.
pub fn sample_products() -> Vec<Product> {
    let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single().unwrap_or_default();

    let entries: [(&str, f64, f64, bool, &str); 8] = [
        ("accent chair", 25.99, 4.1, false, "marcos"),
        ("albany sectional", 109.99, 4.5, false, "liddy"),
        ("leather sofa", 259.89, 4.8, true, "liddy"),
        ("armchair", 125.09, 4.3, false, "marcos"),
        ("entertainment center", 149.99, 4.2, false, "ikea"),
        ("wooden desk", 28.55, 3.9, false, "ikea"),
        ("dining table", 42.99, 4.9, true, "caressa"),
        ("utility shelf", 30.99, 3.5, false, "caressa"),
    ];

    entries
        .iter()
        .enumerate()
        .map(|(i, (name, price, rating, featured, company))| Product {
            name: name.to_string(),
            price: *price,
            rating: *rating,
            featured: *featured,
            company: company.to_string(),
            created_at: base + Duration::days(i as i64),
        })
        .collect()
}

/// Populate a collection with the sample product set
pub fn seed(collection: &Collection) -> StoreResult<usize> {
    collection.insert_many(sample_products().iter().map(Product::to_document))
}
