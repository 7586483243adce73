use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::error::{StoreError, StoreResult};
use crate::id::{DocumentId, StoredId};
use crate::store::{
    ensure_update, ensure_writable, Document, DocumentStore, StoredDocument, ID_FIELD,
};

const APP_NAME: &str = "cozy-reads";

/// Document store backed by a MongoDB database.
///
/// The driver keeps its own connection pool, so one instance is created at
/// startup and shared for the lifetime of the process.
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Parse `uri` and bind to database `name`. The driver connects lazily.
    pub async fn connect(uri: &str, name: &str) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;
        Ok(Self {
            database: client.database(name),
        })
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.database.collection(name)
    }
}

fn to_bson(fields: &Document) -> StoreResult<bson::Document> {
    Ok(bson::to_document(fields)?)
}

fn from_bson(mut raw: bson::Document) -> StoreResult<StoredDocument> {
    let id = match raw.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => StoredId::Assigned(DocumentId::from(oid)),
        Some(Bson::String(text)) => StoredId::Foreign(text),
        Some(other) => StoredId::Foreign(other.to_string()),
        None => return Err(StoreError::UnexpectedDocument("missing _id".to_string())),
    };

    match dates_to_text(Bson::Document(raw)).into_relaxed_extjson() {
        serde_json::Value::Object(fields) => Ok(StoredDocument { id, fields }),
        other => Err(StoreError::UnexpectedDocument(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// BSON dates become RFC 3339 text, the same shape the seed writes.
fn dates_to_text(value: Bson) -> Bson {
    match value {
        Bson::DateTime(at) => match at.try_to_rfc3339_string() {
            Ok(text) => Bson::String(text),
            Err(_) => Bson::DateTime(at),
        },
        Bson::Document(fields) => Bson::Document(
            fields
                .into_iter()
                .map(|(key, value)| (key, dates_to_text(value)))
                .collect(),
        ),
        Bson::Array(items) => Bson::Array(items.into_iter().map(dates_to_text).collect()),
        other => other,
    }
}

fn inserted_id(value: &Bson) -> StoreResult<DocumentId> {
    value
        .as_object_id()
        .map(DocumentId::from)
        .ok_or_else(|| StoreError::UnexpectedDocument(format!("inserted id {value}")))
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<StoredDocument>> {
        let cursor = self.collection(collection).find(doc! {}).await?;
        let raw: Vec<bson::Document> = cursor.try_collect().await?;
        raw.into_iter().map(from_bson).collect()
    }

    async fn insert_one(&self, collection: &str, fields: Document) -> StoreResult<DocumentId> {
        ensure_writable(&fields)?;
        let result = self.collection(collection).insert_one(to_bson(&fields)?).await?;
        inserted_id(&result.inserted_id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> StoreResult<Vec<DocumentId>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let encoded = documents
            .iter()
            .map(|fields| {
                ensure_writable(fields)?;
                to_bson(fields)
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let result = self.collection(collection).insert_many(encoded).await?;
        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);
        ids.iter().map(|(_, value)| inserted_id(value)).collect()
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Document,
    ) -> StoreResult<u64> {
        ensure_update(&fields)?;
        let result = self
            .collection(collection)
            .update_one(
                doc! { ID_FIELD: id.object_id() },
                doc! { "$set": to_bson(&fields)? },
            )
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, collection: &str, id: &DocumentId) -> StoreResult<u64> {
        let result = self
            .collection(collection)
            .delete_one(doc! { ID_FIELD: id.object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn delete_many(&self, collection: &str) -> StoreResult<u64> {
        let result = self.collection(collection).delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    async fn create_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut keys = bson::Document::new();
        keys.insert(field, 1);
        self.collection(collection)
            .create_index(IndexModel::builder().keys(keys).build())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn stored_documents_expose_id_as_document_id() {
        let oid = ObjectId::new();
        let raw = doc! {
            "_id": oid,
            "title": "1984",
            "author": "George Orwell",
            "price": 11.5,
            "quantity": 8_i64,
        };

        let stored = from_bson(raw).unwrap();
        assert_eq!(stored.id, DocumentId::from(oid));
        assert!(!stored.fields.contains_key("_id"));
        assert_eq!(
            serde_json::Value::Object(stored.fields),
            json!({"title": "1984", "author": "George Orwell", "price": 11.5, "quantity": 8})
        );
    }

    #[test]
    fn documents_without_id_are_rejected() {
        assert!(matches!(
            from_bson(doc! { "title": "1984" }),
            Err(StoreError::UnexpectedDocument(_))
        ));
    }

    #[test]
    fn foreign_ids_are_kept_as_text() {
        let stored = from_bson(doc! { "_id": "isbn-0451524934", "title": "1984" }).unwrap();
        assert_eq!(stored.id, StoredId::Foreign("isbn-0451524934".to_string()));

        let stored = from_bson(doc! { "_id": 42_i32, "title": "Emma" }).unwrap();
        assert_eq!(stored.id.to_string(), "42");
        assert_eq!(stored.id.document_id(), None);
    }

    #[test]
    fn dates_are_read_as_rfc3339_text() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "title": "1984",
            "createdAt": bson::DateTime::from_millis(1_700_000_000_000),
            "history": [{ "at": bson::DateTime::from_millis(0) }],
        };

        let stored = from_bson(raw).unwrap();
        let created_at = stored.fields["createdAt"].as_str().unwrap();
        assert!(created_at.starts_with("2023-11-14T22:13:20"));
        assert!(stored.fields["history"][0]["at"]
            .as_str()
            .unwrap()
            .starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn json_fields_encode_to_bson() {
        let fields = json!({"title": "Emma", "price": 9.99, "quantity": 5})
            .as_object()
            .cloned()
            .unwrap();
        let encoded = to_bson(&fields).unwrap();
        assert_eq!(encoded.get_str("title").unwrap(), "Emma");
        assert_eq!(encoded.get_f64("price").unwrap(), 9.99);
    }
}
