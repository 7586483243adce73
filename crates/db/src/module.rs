use std::sync::Arc;

use async_trait::async_trait;
use cozy_kernel::{InitCtx, Module};

use crate::store::DocumentStore;

/// Core module owning the shared storage handle.
pub struct StoreModule {
    store: Arc<dyn DocumentStore>,
}

impl StoreModule {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for StoreModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        // The driver reconnects on demand, so an unreachable server is not fatal here.
        match self.store.ping().await {
            Ok(()) => tracing::info!(
                module = self.name(),
                backend = self.store.backend(),
                database = %ctx.settings.database.name,
                "document store reachable"
            ),
            Err(error) => tracing::warn!(
                module = self.name(),
                backend = self.store.backend(),
                %error,
                "document store ping failed"
            ),
        }
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "document store released");
        Ok(())
    }
}
