pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;
pub mod viewer;

use crate::config::AppConfig;
use crate::services::catalog::CatalogService;
use crate::services::storage::ObjectStorage;
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::products::upload::upload_product,
        api::handlers::products::list::list_products,
        api::handlers::products::get::get_product,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            services::catalog::ModelRecord,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "products", description = "Model catalog endpoints"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn ObjectStorage>,
    pub catalog: Arc<CatalogService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/api/products",
            get(api::handlers::products::list_products)
                .post(api::handlers::products::upload_product)
                .layer(DefaultBodyLimit::max(
                    state.config.max_upload_size + 10 * 1024 * 1024, // multipart overhead buffer
                )),
        )
        .route(
            "/api/products/:id",
            get(api::handlers::products::get_product),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
