use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use model_catalog::config::AppConfig;
use model_catalog::entities::models;
use model_catalog::infrastructure::database;
use model_catalog::services::catalog::CatalogService;
use model_catalog::services::storage::ObjectStorage;
use model_catalog::{create_app, AppState};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct MockObjectStorage {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MockObjectStorage {
    fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
        }
    }

    fn stored_content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, ct)| ct.clone())
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn get_object(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| anyhow::anyhow!("Key not found"))
    }

    async fn object_exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://storage.test/3d-models/{}", key)
    }
}

async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

async fn setup_app() -> (axum::Router, DatabaseConnection, Arc<MockObjectStorage>) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("model_catalog=debug,tower_http=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();

    let db = setup_test_db().await;
    let mock = Arc::new(MockObjectStorage::new());
    let storage: Arc<dyn ObjectStorage> = mock.clone();
    let config = AppConfig::default();

    let catalog = Arc::new(CatalogService::new(db.clone(), storage.clone(), &config));

    let state = AppState {
        db: db.clone(),
        storage,
        catalog,
        config,
    };

    (create_app(state), db, mock)
}

const BOUNDARY: &str = "---------------------------123456789012345678901234567";

fn text_part(name: &str, value: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
        Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
        {value}\r\n"
    )
}

fn file_part(filename: &str, content_type: &str, contents: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
        Content-Disposition: form-data; name=\"modelFile\"; filename=\"{filename}\"\r\n\
        Content-Type: {content_type}\r\n\r\n\
        {contents}\r\n"
    )
}

fn multipart_request(parts: &[String]) -> Request<Body> {
    let mut body = parts.concat();
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn insert_raw_model(
    db: &DatabaseConnection,
    name: &str,
    applications: Value,
    features: Value,
    created_at: chrono::DateTime<Utc>,
) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    models::ActiveModel {
        id: Set(id.clone()),
        model_name: Set(name.to_string()),
        category: Set("Test".to_string()),
        description: Set("d".to_string()),
        file_path: Set(format!("public/0_{}.obj", name)),
        applications: Set(applications),
        features: Set(features),
        specifications: Set(json!({})),
        created_at: Set(created_at),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let (app, _db, _mock) = setup_app().await;

    let request = multipart_request(&[
        text_part("modelName", "Cube"),
        text_part("category", "Test"),
        text_part("description", "d"),
    ]);

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Model file"));
}

#[tokio::test]
async fn test_upload_with_blank_required_field_is_rejected() {
    let (app, _db, _mock) = setup_app().await;

    let request = multipart_request(&[
        file_part("cube.obj", "model/obj", "v 0 0 0\n"),
        text_part("modelName", "   "),
        text_part("category", "Test"),
        text_part("description", "d"),
    ]);

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("modelName"));
}

#[tokio::test]
async fn test_upload_with_malformed_labels_is_rejected() {
    let (app, _db, _mock) = setup_app().await;

    let request = multipart_request(&[
        file_part("cube.obj", "model/obj", "v 0 0 0\n"),
        text_part("modelName", "Cube"),
        text_part("category", "Test"),
        text_part("description", "d"),
        text_part("applications", "not json"),
    ]);

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_and_fetch_round_trip() {
    let (app, _db, mock) = setup_app().await;

    let request = multipart_request(&[
        file_part("cube.glb", "model/gltf-binary", "binary-model-bytes"),
        text_part("modelName", "Cube"),
        text_part("category", "Test"),
        text_part("description", "d"),
        text_part("applications", r#"["a","b"]"#),
        text_part("features", r#"["f1"]"#),
        text_part("specifications", r#"{"Weight":"1kg"}"#),
    ]);

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;

    assert_eq!(created["model_name"], "Cube");
    assert_eq!(created["category"], "Test");
    assert_eq!(created["description"], "d");
    assert_eq!(created["applications"], json!(["a", "b"]));
    assert_eq!(created["features"], json!(["f1"]));
    assert_eq!(created["specifications"], json!({"Weight": "1kg"}));

    let file_path = created["file_path"].as_str().unwrap();
    assert!(file_path.starts_with("public/"));
    assert!(file_path.ends_with("_cube.glb"));
    assert_eq!(
        created["file_url"].as_str().unwrap(),
        format!("http://storage.test/3d-models/{}", file_path)
    );

    // The binary went to storage tagged with the declared content type.
    assert_eq!(
        mock.stored_content_type(file_path).as_deref(),
        Some("model/gltf-binary")
    );

    // Fetching the fresh id returns the identical logical record.
    let id = created["id"].as_str().unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(&format!("/api/products/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json_body(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let (app, db, _mock) = setup_app().await;

    let base = Utc::now();
    let mut ids = Vec::new();
    for i in 0..3i64 {
        let id = insert_raw_model(
            &db,
            &format!("model-{}", i),
            json!([]),
            json!([]),
            base + Duration::seconds(i),
        )
        .await;
        ids.push(id);
    }

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed = json_body(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 3);

    // Last inserted comes back first.
    let listed_ids: Vec<&str> = listed.iter().map(|m| m["id"].as_str().unwrap()).collect();
    assert_eq!(listed_ids, vec![&ids[2], &ids[1], &ids[0]]);

    let timestamps: Vec<chrono::DateTime<Utc>> = listed
        .iter()
        .map(|m| m["created_at"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] > w[1]));
}

#[tokio::test]
async fn test_empty_listing_is_ok() {
    let (app, _db, _mock) = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let (app, _db, _mock) = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(&format!("/api/products/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_string_rows_are_normalized() {
    let (app, db, _mock) = setup_app().await;

    let id = insert_raw_model(
        &db,
        "legacy",
        json!("x, y"),
        json!("f1,f2"),
        Utc::now(),
    )
    .await;

    // Single fetch splits the delimited string.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(&format!("/api/products/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json_body(response).await;
    assert_eq!(fetched["applications"], json!(["x", "y"]));
    assert_eq!(fetched["features"], json!(["f1", "f2"]));

    // The listing path normalizes the same way.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed = json_body(response).await;
    let entry = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == json!(id))
        .unwrap()
        .clone();
    assert_eq!(entry["applications"], json!(["x", "y"]));
    assert_eq!(entry["features"], json!(["f1", "f2"]));
}
