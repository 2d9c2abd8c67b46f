pub mod books;

use std::sync::Arc;

use bookstore_kernel::{settings::Settings, ModuleRegistry};

/// Register all service modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let store = Arc::new(books::build_store(&settings.catalog)?);
    registry.register(books::create_module(store))?;
    Ok(())
}
