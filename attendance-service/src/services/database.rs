use super::store::RecordStore;
use crate::config::MongoConfig;
use crate::models::{document_to_record, record_to_document, Record};
use crate::startup::SERVICE_NAME;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOptions},
    Client as MongoClient, Collection, Database,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

/// Parses the connection string and tags connections with the service name.
pub async fn client_options(config: &MongoConfig) -> Result<ClientOptions, AppError> {
    let mut client_options = ClientOptions::parse(config.uri.expose_secret())
        .await
        .map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
    client_options.app_name = Some(SERVICE_NAME.to_string());
    Ok(client_options)
}

impl MongoDb {
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(database = %config.database, "Connecting to MongoDB");

        let client_options = client_options(config).await?;
        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB client ready"
        );

        Ok(Self {
            client,
            db,
            collection: config.collection.clone(),
        })
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Untyped handle: records have no fixed schema.
    pub fn records(&self) -> Collection<Document> {
        self.db.collection(&self.collection)
    }
}

#[derive(Clone)]
pub struct MongoRecordStore {
    db: MongoDb,
}

impl MongoRecordStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn list_records(&self) -> Result<Vec<Record>, AppError> {
        let options = FindOptions::builder()
            .projection(doc! { "_id": 0 })
            .build();

        let cursor = self
            .db
            .records()
            .find(doc! {}, options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query attendance records: {}", e);
                AppError::from(e)
            })?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect attendance records: {}", e);
            AppError::from(e)
        })?;

        Ok(documents.into_iter().map(document_to_record).collect())
    }

    async fn insert_record(&self, record: Record) -> Result<(), AppError> {
        let document = record_to_document(&record)?;

        let result = self
            .db
            .records()
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert attendance record: {}", e);
                AppError::from(e)
            })?;

        tracing::debug!(inserted_id = %result.inserted_id, "Attendance record inserted");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }

    fn backend(&self) -> &'static str {
        "mongo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn mongo_config(uri: &str) -> MongoConfig {
        MongoConfig {
            uri: Secret::new(uri.to_string()),
            database: "attendance_db".to_string(),
            collection: "records".to_string(),
        }
    }

    #[tokio::test]
    async fn client_options_carry_service_name() {
        let options = client_options(&mongo_config("mongodb://localhost:27017"))
            .await
            .unwrap();
        assert_eq!(options.app_name.as_deref(), Some(SERVICE_NAME));
    }

    #[tokio::test]
    async fn invalid_connection_string_is_a_database_error() {
        let result = client_options(&mongo_config("not-a-mongodb-uri")).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }
}
