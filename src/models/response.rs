use serde::{Deserialize, Serialize};

use crate::models::StoredDocument;

pub const DOCUMENT_SAVED_MESSAGE: &str = "Document saved successfully";

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveDocumentResponse {
    pub message: String,
    pub document: StoredDocument,
}

impl SaveDocumentResponse {
    pub fn new(document: StoredDocument) -> Self {
        Self {
            message: DOCUMENT_SAVED_MESSAGE.to_string(),
            document,
        }
    }
}

/// Error body shared by every non-2xx response of the backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub document_store: StoreHealth,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreHealth {
    pub backend: String,
    pub reachable: bool,
}
