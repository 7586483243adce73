//! Application wiring: storage handle, module registry and HTTP router.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use cozy_db::DocumentStore;
use cozy_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// A fully wired service around one shared storage handle.
pub struct Application {
    settings: Settings,
    store: Arc<dyn DocumentStore>,
    registry: ModuleRegistry,
}

impl Application {
    /// Connect the storage backend selected by `settings` and register all modules.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let store = cozy_db::connect(&settings.database)
            .await
            .context("failed to create document store")?;
        Ok(Self::with_store(settings, store))
    }

    /// Wire the application around an existing storage handle.
    pub fn with_store(settings: Settings, store: Arc<dyn DocumentStore>) -> Self {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, Arc::clone(&store));
        Self {
            settings,
            store,
            registry,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Apply every module's index migrations.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        let migrations = self.registry.collect_migrations();
        cozy_db::run_migrations(self.store.as_ref(), &migrations).await
    }

    /// Initialize and start modules, then build the router.
    pub async fn prepare(&self) -> anyhow::Result<Router> {
        let ctx = InitCtx {
            settings: &self.settings,
        };

        self.registry.init_all(&ctx).await?;

        // Indexes only speed up lookups; serve without them rather than not at all.
        if let Err(error) = self.migrate().await {
            tracing::warn!(error = %format!("{error:#}"), "index migrations failed");
        }

        self.registry.start_all(&ctx).await?;

        Ok(cozy_http::build_router(&self.registry, &self.settings))
    }

    /// Serve until shutdown, then stop modules in reverse order.
    pub async fn run(self) -> anyhow::Result<()> {
        let router = self.prepare().await?;
        let served = cozy_http::start_server(router, &self.settings).await;
        self.registry
            .stop_all()
            .await
            .context("failed to stop modules")?;
        served
    }
}
