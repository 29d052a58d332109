use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated record waiting to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub document_type: String,
    pub data: Value,
}

impl NewDocument {
    pub fn new(document_type: impl Into<String>, data: Value) -> Self {
        Self {
            document_type: document_type.into(),
            data,
        }
    }
}

/// A record as held by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub document_type: String,
    pub data: Value,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    pub fn from_new(id: impl Into<String>, doc: NewDocument, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            document_type: doc.document_type,
            data: doc.data,
            created_at: now,
            updated_at: now,
        }
    }
}
