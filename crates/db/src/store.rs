use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::id::{DocumentId, StoredId};

/// Schema-less document body. The identifier lives outside of it.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Key under which backends keep the document identifier.
pub const ID_FIELD: &str = "_id";

/// A document as read back from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: StoredId,
    pub fields: Document,
}

/// Collection-scoped primitives over a document database.
///
/// Every call is a single storage operation; there is no transaction spanning calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend label used in logs.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> StoreResult<()>;

    /// Every document of `collection`, in the backend's natural order.
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<StoredDocument>>;

    async fn insert_one(&self, collection: &str, fields: Document) -> StoreResult<DocumentId>;

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> StoreResult<Vec<DocumentId>>;

    /// Merge `fields` into the matched document. Returns the matched count (0 or 1).
    async fn update_one(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Document,
    ) -> StoreResult<u64>;

    /// Returns the deleted count (0 or 1).
    async fn delete_one(&self, collection: &str, id: &DocumentId) -> StoreResult<u64>;

    /// Remove every document of `collection`. Returns the deleted count.
    async fn delete_many(&self, collection: &str) -> StoreResult<u64>;

    /// Ensure an ascending index on `field` exists.
    async fn create_index(&self, collection: &str, field: &str) -> StoreResult<()>;
}

/// Writes never carry the identifier key; it is assigned by the store and immutable.
pub(crate) fn ensure_writable(fields: &Document) -> StoreResult<()> {
    if fields.contains_key(ID_FIELD) {
        return Err(StoreError::ReservedField(ID_FIELD.to_string()));
    }
    Ok(())
}

pub(crate) fn ensure_update(fields: &Document) -> StoreResult<()> {
    if fields.is_empty() {
        return Err(StoreError::EmptyUpdate);
    }
    ensure_writable(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn identifier_key_is_not_writable() {
        let err = ensure_writable(&doc(json!({"_id": "x", "title": "Emma"}))).unwrap_err();
        assert!(matches!(err, StoreError::ReservedField(ref f) if f == "_id"));
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(matches!(
            ensure_update(&Document::new()),
            Err(StoreError::EmptyUpdate)
        ));
        assert!(ensure_update(&doc(json!({"quantity": 3}))).is_ok());
    }
}
