//! One-shot bootstrap of the books collection.

use anyhow::Context;
use cozy_db::{Document, DocumentStore};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::repository::COLLECTION;
use super::BooksModule;

/// Title, author, price, quantity
const SEED_BOOKS: [(&str, &str, f64, i64); 5] = [
    ("The Hitchhiker's Guide to the Galaxy", "Douglas Adams", 12.99, 10),
    ("Pride and Prejudice", "Jane Austen", 9.99, 5),
    ("1984", "George Orwell", 11.50, 8),
    ("To Kill a Mockingbird", "Harper Lee", 10.99, 12),
    ("The Great Gatsby", "F. Scott Fitzgerald", 8.99, 7),
];

/// Outcome of a seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub removed: u64,
    pub inserted: usize,
    pub indexes: Vec<&'static str>,
}

fn seed_documents(created_at: &str) -> Vec<Document> {
    SEED_BOOKS
        .iter()
        .map(|&(title, author, price, quantity)| {
            let mut document = Document::new();
            document.insert("title".into(), title.into());
            document.insert("author".into(), author.into());
            document.insert("price".into(), price.into());
            document.insert("quantity".into(), quantity.into());
            document.insert("createdAt".into(), created_at.into());
            document
        })
        .collect()
}

/// Clear the collection, insert the fixed book set and build the lookup indexes.
pub async fn seed(store: &dyn DocumentStore) -> anyhow::Result<SeedSummary> {
    tracing::info!(collection = COLLECTION, "clearing existing books");
    let removed = store
        .delete_many(COLLECTION)
        .await
        .context("failed to clear books collection")?;

    let created_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("failed to format seed timestamp")?;
    let documents = seed_documents(&created_at);
    tracing::info!("inserting {} books", documents.len());
    let inserted = store
        .insert_many(COLLECTION, documents)
        .await
        .context("failed to insert seed books")?
        .len();

    let migrations = BooksModule::index_migrations();
    tracing::info!("creating indexes");
    for migration in &migrations {
        store
            .create_index(migration.collection, migration.index_field)
            .await
            .with_context(|| format!("failed to create index on '{}'", migration.index_field))?;
    }

    Ok(SeedSummary {
        removed,
        inserted,
        indexes: migrations.iter().map(|m| m.index_field).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_db::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn seed_replaces_collection_contents() {
        let store = MemoryStore::new();
        store
            .insert_one(
                COLLECTION,
                json!({"title": "Leftover"}).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();

        let summary = seed(&store).await.unwrap();
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.inserted, 5);
        assert_eq!(summary.indexes, vec!["title", "author"]);

        let books = store.find_all(COLLECTION).await.unwrap();
        let titles: Vec<&str> = books
            .iter()
            .map(|b| b.fields["title"].as_str().unwrap())
            .collect();
        assert_eq!(
            titles,
            vec![
                "The Hitchhiker's Guide to the Galaxy",
                "Pride and Prejudice",
                "1984",
                "To Kill a Mockingbird",
                "The Great Gatsby",
            ]
        );
        assert!(books.iter().all(|b| b.fields.contains_key("createdAt")));
        assert_eq!(
            store.index_fields(COLLECTION).await,
            vec!["author".to_string(), "title".to_string()]
        );
    }

    #[tokio::test]
    async fn seeding_twice_yields_the_same_set() {
        let store = MemoryStore::new();
        seed(&store).await.unwrap();
        let summary = seed(&store).await.unwrap();
        assert_eq!(summary.removed, 5);
        assert_eq!(store.find_all(COLLECTION).await.unwrap().len(), 5);
    }

    #[test]
    fn seed_documents_carry_price_and_quantity() {
        let documents = seed_documents("2024-01-01T00:00:00Z");
        let orwell = &documents[2];
        assert_eq!(orwell["author"], "George Orwell");
        assert_eq!(orwell["price"], 11.5);
        assert_eq!(orwell["quantity"], 8);
        assert_eq!(orwell["createdAt"], "2024-01-01T00:00:00Z");
    }
}
