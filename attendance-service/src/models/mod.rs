pub mod record;

pub use record::{document_to_record, record_to_document, Record, INTERNAL_ID_FIELD};
