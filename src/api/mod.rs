//! # Product API Module
//!
//! HTTP endpoints for product listings: query parameter translation,
//! filter assembly, and response shaping.

pub mod errors;
pub mod filter;
pub mod parser;
pub mod response;
pub mod server;

pub use errors::{ApiError, ApiResult};
pub use filter::{CmpOp, Condition, FilterSpec};
pub use parser::{NumericFilter, ProductQuery, QueryPlan};
pub use response::ProductListResponse;
pub use server::{ApiServer, AppState};
