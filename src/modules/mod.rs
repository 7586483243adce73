pub mod books;
pub mod ui;

use std::sync::Arc;

use cozy_db::{DocumentStore, StoreModule};
use cozy_kernel::ModuleRegistry;

/// Register the storage core module and every feature module with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn DocumentStore>) {
    registry.register_core(Arc::new(StoreModule::new(Arc::clone(&store))));
    registry.register_custom(books::create_module(store));
    registry.register_custom(ui::create_module());
}
