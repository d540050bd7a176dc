#![allow(dead_code)]

use attendance_service::config::{AttendanceConfig, CorsConfig, MongoConfig, StoreBackend};
use attendance_service::services::{InMemoryRecordStore, RecordStore};
use attendance_service::startup::Application;
use secrecy::{ExposeSecret, Secret};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn RecordStore>,
    pub config: AttendanceConfig,
}

pub fn test_config(store: StoreBackend, database: String) -> AttendanceConfig {
    AttendanceConfig {
        common: CoreConfig {
            port: 0, // Random port
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
        mongodb: MongoConfig {
            uri: Secret::new(
                std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            database,
            collection: "records".to_string(),
        },
        store,
        cors: CorsConfig::default(),
    }
}

impl TestApp {
    /// Spawns the service on the in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(InMemoryRecordStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn RecordStore>) -> Self {
        let config = test_config(StoreBackend::Memory, "unused".to_string());
        let app = Application::with_store(config.clone(), store)
            .await
            .expect("Failed to build test application");
        Self::start(app, config).await
    }

    /// Spawns the service against a fresh MongoDB database.
    pub async fn spawn_mongo() -> Self {
        let db_name = format!("attendance_test_{}", uuid::Uuid::new_v4().simple());
        let config = test_config(StoreBackend::Mongo, db_name);
        let app = Application::build(config.clone())
            .await
            .expect("Failed to build test application");
        Self::start(app, config).await
    }

    async fn start(app: Application, config: AttendanceConfig) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);
        let store = app.store();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            config,
        }
    }

    pub fn records_url(&self) -> String {
        format!("{}/api/records", self.address)
    }

    pub async fn post_record(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.records_url())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_records(&self) -> Vec<serde_json::Value> {
        let response = reqwest::Client::new()
            .get(self.records_url())
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("Failed to parse JSON")
    }

    /// Drops the MongoDB test database, if one was used.
    pub async fn cleanup(&self) {
        if self.config.store != StoreBackend::Mongo {
            return;
        }

        let client = mongodb::Client::with_uri_str(self.config.mongodb.uri.expose_secret())
            .await
            .expect("Failed to connect to MongoDB");
        client
            .database(&self.config.mongodb.database)
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }
}
