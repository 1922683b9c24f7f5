//! Catalog operations: ingest one model, list the catalog, fetch one entry.
//!
//! Ingest writes the binary and the row as two separate steps. A storage
//! write that succeeds before a failed insert leaves an orphaned object;
//! the key is logged and the object is not cleaned up.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::entities::{models, prelude::Models};
use crate::services::normalize::{normalize, normalize_specs};
use crate::services::storage::ObjectStorage;
use crate::utils::validation::sanitize_filename;

/// A validated ingest submission: one binary attachment plus its metadata.
pub struct NewModelSubmission {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub model_name: String,
    pub category: String,
    pub description: String,
    pub applications: Vec<String>,
    pub features: Vec<String>,
    pub specifications: BTreeMap<String, String>,
}

/// Wire shape of a catalog entry. List-valued fields are always arrays
/// here, whatever the persisted form was.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelRecord {
    pub id: String,
    pub model_name: String,
    pub category: String,
    pub description: String,
    pub file_path: String,
    /// Public URL of the stored binary, resolved from `file_path`.
    pub file_url: String,
    pub applications: Vec<String>,
    pub features: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub created_at: chrono::DateTime<Utc>,
}

pub struct CatalogService {
    db: DatabaseConnection,
    storage: Arc<dyn ObjectStorage>,
    key_prefix: String,
}

impl CatalogService {
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn ObjectStorage>,
        config: &AppConfig,
    ) -> Self {
        Self {
            db,
            storage,
            key_prefix: config.storage_prefix.clone(),
        }
    }

    /// Stores the binary, then inserts the catalog row referencing it.
    pub async fn ingest(&self, submission: NewModelSubmission) -> Result<ModelRecord, AppError> {
        let now = Utc::now();
        let key = format!(
            "{}/{}_{}",
            self.key_prefix,
            now.timestamp_millis(),
            sanitize_filename(&submission.file_name)
        );
        let content_type = submission
            .content_type
            .as_deref()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref());

        self.storage
            .put_object(&key, submission.bytes, content_type)
            .await
            .map_err(|e| AppError::Ingest(format!("storage write failed: {}", e)))?;

        let row = models::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            model_name: Set(submission.model_name),
            category: Set(submission.category),
            description: Set(submission.description),
            file_path: Set(key.clone()),
            applications: Set(serde_json::json!(submission.applications)),
            features: Set(serde_json::json!(submission.features)),
            specifications: Set(serde_json::json!(submission.specifications)),
            created_at: Set(now),
        };

        let inserted = match row.insert(&self.db).await {
            Ok(model) => model,
            Err(e) => {
                // Known consistency gap: the object is already in storage
                // with no row referencing it.
                warn!(key = %key, "insert failed after storage write, object orphaned: {}", e);
                return Err(AppError::Ingest(format!("insert failed: {}", e)));
            }
        };

        info!(id = %inserted.id, key = %key, "model ingested");
        Ok(self.to_record(inserted))
    }

    /// All catalog entries, newest first.
    pub async fn list(&self) -> Result<Vec<ModelRecord>, AppError> {
        let rows = Models::find()
            .order_by_desc(models::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AppError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(|m| self.to_record(m)).collect())
    }

    pub async fn get(&self, id: &str) -> Result<ModelRecord, AppError> {
        let row = Models::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AppError::Query(e.to_string()))?;

        match row {
            Some(model) => Ok(self.to_record(model)),
            None => Err(AppError::NotFound(format!("model {} not found", id))),
        }
    }

    fn to_record(&self, model: models::Model) -> ModelRecord {
        ModelRecord {
            file_url: self.storage.public_url(&model.file_path),
            applications: normalize(Some(&model.applications)),
            features: normalize(Some(&model.features)),
            specifications: normalize_specs(Some(&model.specifications)),
            id: model.id,
            model_name: model.model_name,
            category: model.category,
            description: model.description,
            file_path: model.file_path,
            created_at: model.created_at,
        }
    }
}
