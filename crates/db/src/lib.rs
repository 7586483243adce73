//! Storage handle for Cozy Reads: the [`DocumentStore`] contract, its MongoDB
//! and in-memory backends, and index migrations.

use std::sync::Arc;

use anyhow::Context;
use cozy_kernel::settings::{DatabaseSettings, StoreBackend};
use cozy_kernel::Migration;

pub mod error;
pub mod id;
pub mod memory;
pub mod module;
pub mod mongo;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use id::{DocumentId, StoredId};
pub use memory::MemoryStore;
pub use module::StoreModule;
pub use mongo::MongoStore;
pub use store::{Document, DocumentStore, StoredDocument, ID_FIELD};

/// Build the process-wide storage handle selected by `settings`.
pub async fn connect(settings: &DatabaseSettings) -> StoreResult<Arc<dyn DocumentStore>> {
    match settings.backend {
        StoreBackend::Mongo => {
            tracing::info!(target: "cozy-db", database = %settings.name, "using MongoDB store");
            let store = MongoStore::connect(&settings.uri, &settings.name).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::info!(target: "cozy-db", "using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Apply index migrations in the given order.
pub async fn run_migrations(
    store: &dyn DocumentStore,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    for (module, migration) in migrations {
        tracing::info!(
            target: "cozy-db",
            module = %module,
            migration = migration.id,
            collection = migration.collection,
            field = migration.index_field,
            "applying index migration"
        );
        store
            .create_index(migration.collection, migration.index_field)
            .await
            .with_context(|| format!("migration '{}' of module '{}' failed", migration.id, module))?;
    }
    Ok(())
}
