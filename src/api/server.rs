//! # Product API HTTP Server
//!
//! Axum-based HTTP server for the product listing endpoints.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::api::filter::{CmpOp, FilterSpec};
use crate::api::parser::ProductQuery;
use crate::api::response::ProductListResponse;
use crate::config::ServerConfig;
use crate::observability::{Logger, Severity};
use crate::store::Collection;

use super::errors::{ApiError, ApiResult};

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub products: Collection,
}

/// HTTP server for the product API
pub struct ApiServer {
    config: ServerConfig,
    router: Router,
}

impl ApiServer {
    /// Create a server with default configuration
    pub fn new(products: Collection) -> Self {
        Self::with_config(products, ServerConfig::default())
    }

    /// Create a server with custom configuration
    pub fn with_config(products: Collection, config: ServerConfig) -> Self {
        let router = Self::build_router(products, &config);
        Self { config, router }
    }

    /// Build the router with all endpoints
    fn build_router(products: Collection, config: &ServerConfig) -> Router {
        // Configure CORS from config; no configured origins means
        // permissive (development)
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/api/v1/products", get(list_products))
            .route("/api/v1/products/static", get(list_products_static))
            .fallback(not_found_handler)
            .layer(cors)
            .with_state(AppState { products })
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid listen address: {}", e),
            )
        })?;

        Logger::log(
            Severity::Info,
            "server_started",
            &[("addr", &addr.to_string())],
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

/// Health check handler
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Fallback for unmatched routes
async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

/// Query-translating product listing.
///
/// Translates the recognized query parameters into a query plan and
/// executes it. Malformed filter input degrades silently; store
/// failures propagate to the error responder.
async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ProductListResponse>> {
    let plan = ProductQuery::from_params(&params).plan();

    let mut handle = state
        .products
        .find(plan.filter)
        .sort(&plan.sort)
        .skip(plan.skip)
        .limit(plan.limit);
    if let Some(projection) = &plan.projection {
        handle = handle.select(projection);
    }

    let products = handle.fetch().await?;

    Logger::log(
        Severity::Info,
        "products_listed",
        &[("nb_hits", &products.len().to_string())],
    );

    Ok(Json(ProductListResponse::new(products)))
}

/// Fixed-filter product listing: price over 30, ascending by price,
/// name and price fields only, no pagination.
async fn list_products_static(
    State(state): State<AppState>,
) -> ApiResult<Json<ProductListResponse>> {
    let filter = FilterSpec::new().cmp("price", CmpOp::Gt, 30.0);

    let products = state
        .products
        .find(filter)
        .sort("price")
        .select("name price")
        .fetch()
        .await?;

    Logger::log(
        Severity::Info,
        "products_listed_static",
        &[("nb_hits", &products.len().to_string())],
    );

    Ok(Json(ProductListResponse::new(products)))
}
