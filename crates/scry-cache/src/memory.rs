//! In-memory document collection for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::CacheError;
use crate::vector::{DocumentCollection, StoredDocument};

/// Test double for the vector backend's collection.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    docs: Mutex<HashMap<String, StoredDocument>>,
}

impl DocumentCollection for MemoryCollection {
    async fn upsert(&self, doc: StoredDocument) -> Result<(), CacheError> {
        self.docs.lock().unwrap().insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredDocument>, CacheError> {
        Ok(self.docs.lock().unwrap().get(id).cloned())
    }
}
