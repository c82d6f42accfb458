use super::{Collection, DocumentStore};
use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// In-memory document store, used by tests and when Redis is unavailable
#[derive(Debug, Default)]
pub struct InMemoryDb {
    collections: RwLock<HashMap<Collection, BTreeMap<String, String>>>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDb {
    async fn list(&self, collection: Collection) -> AppResult<Vec<String>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<String>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.get(id).cloned()))
    }

    async fn put(&self, collection: Collection, id: &str, document: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), document.to_string());
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&collection)
            .map(|documents| documents.remove(id).is_some())
            .unwrap_or(false))
    }
}
