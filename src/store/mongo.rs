use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::Value;
use tracing::{debug, info};

use super::DocumentStore;
use crate::error::AppResult;
use crate::models::{NewDocument, StoredDocument};

/// MongoDB-backed store. Records carry `createdAt`/`updatedAt` and a `__v`
/// version key of zero.
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoDocumentStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> AppResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let store = Self {
            collection: client.database(database).collection(collection),
            client,
        };

        store.ping().await?;
        info!(database = database, collection = collection, "Connected to MongoDB");
        Ok(store)
    }
}

/// Converts request JSON into BSON without failing. Integers outside the
/// `i64` range become doubles, which is how mongoose stores them.
pub(crate) fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Bson::Int64(i),
            None => Bson::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_bson(value)))
                .collect(),
        ),
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn insert(&self, new_doc: NewDocument) -> AppResult<StoredDocument> {
        let id = ObjectId::new();
        let now = Utc::now();
        let stamp = bson::DateTime::from_millis(now.timestamp_millis());

        let record = doc! {
            "_id": id,
            "document_type": new_doc.document_type.clone(),
            "data": json_to_bson(&new_doc.data),
            "createdAt": stamp,
            "updatedAt": stamp,
            "__v": 0_i32,
        };

        self.collection.insert_one(record, None).await?;
        debug!(id = %id, document_type = %new_doc.document_type, "Document inserted");

        Ok(StoredDocument::from_new(id.to_hex(), new_doc, now))
    }

    async fn ping(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}
