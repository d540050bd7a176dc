use super::store::RecordStore;
use crate::models::{document_to_record, record_to_document, Record, INTERNAL_ID_FIELD};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use service_core::error::AppError;
use tokio::sync::RwLock;

/// Process-local record store.
///
/// Documents are kept in insertion order and carry an `_id` exactly like the
/// MongoDB driver assigns one, so identifier stripping is exercised the same way.
#[derive(Default)]
pub struct InMemoryRecordStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_records(&self) -> Result<Vec<Record>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().cloned().map(document_to_record).collect())
    }

    async fn insert_record(&self, record: Record) -> Result<(), AppError> {
        let mut document = record_to_document(&record)?;
        if !document.contains_key(INTERNAL_ID_FIELD) {
            document.insert(INTERNAL_ID_FIELD, ObjectId::new());
        }

        self.documents.write().await.push(document);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
