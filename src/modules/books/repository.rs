use std::sync::Arc;

use anyhow::Context;
use cozy_db::{DocumentId, DocumentStore};

use super::models::{Book, BookFields};

/// Collection holding every book record.
pub const COLLECTION: &str = "books";

/// Book operations, each a single call on the document store.
#[derive(Clone)]
pub struct BookRepository {
    store: Arc<dyn DocumentStore>,
}

impl BookRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Every stored book in the store's natural order, fields as stored.
    pub async fn list_all(&self) -> anyhow::Result<Vec<Book>> {
        let documents = self
            .store
            .find_all(COLLECTION)
            .await
            .context("listing books")?;
        Ok(documents.into_iter().map(Book::from).collect())
    }

    /// Store a new book as given and return its identifier.
    pub async fn create(&self, fields: BookFields) -> anyhow::Result<DocumentId> {
        let id = self
            .store
            .insert_one(COLLECTION, fields.into_document())
            .await
            .context("inserting book")?;
        tracing::debug!(book_id = %id, "book created");
        Ok(id)
    }

    /// Merge `fields` into the book with text identifier `id`.
    ///
    /// An identifier that matches nothing is not an error.
    pub async fn replace_fields(&self, id: &str, fields: BookFields) -> anyhow::Result<()> {
        let id: DocumentId = id.parse()?;
        let matched = self
            .store
            .update_one(COLLECTION, &id, fields.into_document())
            .await
            .with_context(|| format!("updating book {id}"))?;
        if matched == 0 {
            tracing::debug!(book_id = %id, "update matched no book");
        }
        Ok(())
    }

    /// Remove the book with text identifier `id`; unknown identifiers are a no-op.
    pub async fn delete_one(&self, id: &str) -> anyhow::Result<()> {
        let id: DocumentId = id.parse()?;
        let deleted = self
            .store
            .delete_one(COLLECTION, &id)
            .await
            .with_context(|| format!("deleting book {id}"))?;
        if deleted == 0 {
            tracing::debug!(book_id = %id, "delete matched no book");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_db::MemoryStore;

    fn repository() -> BookRepository {
        BookRepository::new(Arc::new(MemoryStore::new()))
    }

    fn orwell() -> BookFields {
        BookFields {
            title: Some("1984".to_string()),
            author: Some("George Orwell".to_string()),
            price: Some(11.5),
            quantity: Some(8),
        }
    }

    #[tokio::test]
    async fn created_book_is_listed_with_submitted_values() {
        let repo = repository();
        let id = repo.create(orwell()).await.unwrap();

        let books = repo.list_all().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, id.to_string());
        assert_eq!(
            serde_json::Value::Object(books[0].fields.clone()),
            serde_json::json!({
                "title": "1984",
                "author": "George Orwell",
                "price": 11.5,
                "quantity": 8
            })
        );
    }

    #[tokio::test]
    async fn replace_fields_only_touches_given_fields() {
        let repo = repository();
        let id = repo.create(orwell()).await.unwrap();

        repo.replace_fields(
            &id.to_string(),
            BookFields {
                quantity: Some(3),
                ..BookFields::default()
            },
        )
        .await
        .unwrap();

        let book = &repo.list_all().await.unwrap()[0];
        assert_eq!(book.fields["quantity"], 3);
        assert_eq!(book.fields["title"], "1984");
        assert_eq!(book.fields["author"], "George Orwell");
        assert_eq!(book.fields["price"], 11.5);
    }

    #[tokio::test]
    async fn unknown_ids_are_no_ops() {
        let repo = repository();
        repo.create(orwell()).await.unwrap();
        let missing = DocumentId::new().to_string();

        repo.replace_fields(&missing, orwell()).await.unwrap();
        repo.delete_one(&missing).await.unwrap();

        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_book() {
        let repo = repository();
        let id = repo.create(orwell()).await.unwrap();
        repo.delete_one(&id.to_string()).await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_written_elsewhere_are_listed_whole() {
        let repo = repository();
        repo.create(orwell()).await.unwrap();
        repo.store()
            .insert_one(
                COLLECTION,
                serde_json::json!({
                    "title": "Emma",
                    "isbn": "978-0141439587",
                    "createdAt": { "$date": "2024-03-01T10:00:00Z" }
                })
                .as_object()
                .cloned()
                .unwrap(),
            )
            .await
            .unwrap();

        let books = repo.list_all().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].fields["isbn"], "978-0141439587");
        assert_eq!(books[1].fields["createdAt"]["$date"], "2024-03-01T10:00:00Z");
        assert!(!books[1].fields.contains_key("author"));
    }

    #[tokio::test]
    async fn malformed_ids_fail() {
        let repo = repository();
        assert!(repo.delete_one("not-an-id").await.is_err());
        assert!(repo.replace_fields("not-an-id", orwell()).await.is_err());
    }

    #[tokio::test]
    async fn empty_update_fails() {
        let repo = repository();
        let id = repo.create(orwell()).await.unwrap();
        assert!(repo
            .replace_fields(&id.to_string(), BookFields::default())
            .await
            .is_err());
    }
}
