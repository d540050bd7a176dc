use serde::{Deserialize, Serialize};

/// Acknowledgement returned after a record is stored.
pub const RECORD_ADDED: &str = "Record added";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn record_added() -> Self {
        Self {
            message: RECORD_ADDED.to_string(),
        }
    }
}
