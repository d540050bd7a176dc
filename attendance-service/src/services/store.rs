use crate::models::Record;
use async_trait::async_trait;
use service_core::error::AppError;

/// The document collection holding attendance records.
///
/// Implementations never return the internal `_id` field from `list_records`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every stored record, in the store's natural order.
    async fn list_records(&self) -> Result<Vec<Record>, AppError>;

    /// Stores `record` verbatim.
    async fn insert_record(&self, record: Record) -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
