//! Durable home of finalized extraction results.

mod memory;
mod mongo;

pub use memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewDocument, StoredDocument};

/// Append-only document store. Identity and timestamps are assigned on insert.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;

    async fn insert(&self, doc: NewDocument) -> AppResult<StoredDocument>;

    async fn ping(&self) -> AppResult<()>;
}
