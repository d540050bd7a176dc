//! Attendance records.
//!
//! A record is whatever JSON object the caller posted: student id, subject,
//! date, status, progress marks, or any other fields. No schema is imposed.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};
use service_core::error::AppError;

/// An attendance record as seen by API clients.
pub type Record = Map<String, Value>;

/// Store-assigned identifier, never exposed to clients.
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Converts a client record into a BSON document for insertion.
///
/// Objects are copied key by key, so extended JSON shapes such as
/// `{"$numberLong": "5"}` are stored as plain sub-documents. Fails only for
/// values BSON cannot hold, such as integers above `i64::MAX`.
pub fn record_to_document(record: &Record) -> Result<Document, AppError> {
    object_to_document(record)
}

fn object_to_document(object: &Map<String, Value>) -> Result<Document, AppError> {
    let mut document = Document::new();
    for (key, value) in object {
        document.insert(key.clone(), value_to_bson(value)?);
    }
    Ok(document)
}

fn value_to_bson(value: &Value) -> Result<Bson, AppError> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else if let Some(u) = n.as_u64() {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Record cannot be stored: integer {} exceeds the supported range",
                    u
                )));
            } else {
                Bson::Double(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(
            items
                .iter()
                .map(value_to_bson)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(object) => Bson::Document(object_to_document(object)?),
    })
}

/// Converts a stored document back into a client record, dropping `_id`.
///
/// Values go through relaxed extended JSON, so plain JSON types come back as
/// they were sent.
pub fn document_to_record(mut document: Document) -> Record {
    document.remove(INTERNAL_ID_FIELD);

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
