use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::api::error::AppError;
use crate::services::catalog::{ModelRecord, NewModelSubmission};

use super::types::*;

struct Attachment {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = Multipart, description = "Model file upload with metadata"),
    responses(
        (status = 201, description = "Model ingested", body = ModelRecord),
        (status = 400, description = "Missing file or required field"),
        (status = 500, description = "Storage or insert failure")
    ),
    tag = "products"
)]
pub async fn upload_product(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ModelRecord>), AppError> {
    let mut attachment: Option<Attachment> = None;
    let mut model_name = String::new();
    let mut category = String::new();
    let mut description = String::new();
    let mut applications_raw = String::new();
    let mut features_raw = String::new();
    let mut specifications_raw = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "modelFile" => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                attachment = Some(Attachment {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "modelName" => model_name = field.text().await.unwrap_or_default(),
            "category" => category = field.text().await.unwrap_or_default(),
            "description" => description = field.text().await.unwrap_or_default(),
            "applications" => applications_raw = field.text().await.unwrap_or_default(),
            "features" => features_raw = field.text().await.unwrap_or_default(),
            "specifications" => specifications_raw = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }

    let attachment =
        attachment.ok_or_else(|| AppError::Validation("Model file is required".to_string()))?;

    let submission = NewModelSubmission {
        file_name: attachment.file_name,
        content_type: attachment.content_type,
        bytes: attachment.bytes,
        model_name: require_text("modelName", model_name)?,
        category: require_text("category", category)?,
        description: require_text("description", description)?,
        applications: parse_label_array("applications", &applications_raw)?,
        features: parse_label_array("features", &features_raw)?,
        specifications: parse_spec_object(&specifications_raw)?,
    };

    let record = state.catalog.ingest(submission).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
