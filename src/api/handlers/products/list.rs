use axum::{extract::State, Json};

use crate::api::error::AppError;
use crate::services::catalog::ModelRecord;

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All catalog entries, newest first", body = Vec<ModelRecord>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<ModelRecord>>, AppError> {
    Ok(Json(state.catalog.list().await?))
}
