use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::error::AppError;
use crate::services::catalog::ModelRecord;

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Catalog entry id")
    ),
    responses(
        (status = 200, description = "Catalog entry", body = ModelRecord),
        (status = 404, description = "No entry with this id"),
        (status = 500, description = "Retrieval failure")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<ModelRecord>, AppError> {
    Ok(Json(state.catalog.get(&id).await?))
}
