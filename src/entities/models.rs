use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One catalog entry describing an uploaded 3D asset.
///
/// `applications` and `features` are canonically JSON arrays of strings, but
/// rows written before arrays became the write shape may hold a single
/// comma-delimited string. Readers go through the normalizer and never see
/// the raw column value.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "models")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub model_name: String,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Storage key of the uploaded binary; set once at creation.
    pub file_path: String,
    pub applications: Json,
    pub features: Json,
    pub specifications: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
