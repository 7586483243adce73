use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::id::DocumentId;
use crate::store::{ensure_update, ensure_writable, Document, DocumentStore, StoredDocument};

#[derive(Debug, Default)]
struct MemoryCollection {
    // Insertion order is the natural order.
    documents: Vec<StoredDocument>,
    indexes: BTreeSet<String>,
}

impl MemoryCollection {
    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| &doc.id == id)
    }
}

/// Process-local document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields that currently carry an index in `collection`.
    pub async fn index_fields(&self, collection: &str) -> Vec<String> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.indexes.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<StoredDocument>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|c| c.documents.clone())
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: &str, fields: Document) -> StoreResult<DocumentId> {
        ensure_writable(&fields)?;
        let id = DocumentId::new();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .documents
            .push(StoredDocument {
                id: id.into(),
                fields,
            });
        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> StoreResult<Vec<DocumentId>> {
        for fields in &documents {
            ensure_writable(fields)?;
        }

        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_string()).or_default();
        let ids = documents
            .into_iter()
            .map(|fields| {
                let id = DocumentId::new();
                target.documents.push(StoredDocument {
                    id: id.into(),
                    fields,
                });
                id
            })
            .collect();
        Ok(ids)
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Document,
    ) -> StoreResult<u64> {
        ensure_update(&fields)?;

        let mut collections = self.collections.write().await;
        let Some(target) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let Some(pos) = target.position(id) else {
            return Ok(0);
        };

        let stored = &mut target.documents[pos].fields;
        for (key, value) in fields {
            stored.insert(key, value);
        }
        Ok(1)
    }

    async fn delete_one(&self, collection: &str, id: &DocumentId) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|target| target.position(id).map(|pos| target.documents.remove(pos)));
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_many(&self, collection: &str) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .map(|target| std::mem::take(&mut target.documents).len())
            .unwrap_or(0);
        Ok(removed as u64)
    }

    async fn create_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .indexes
            .insert(field.to_string());
        Ok(())
    }
}
