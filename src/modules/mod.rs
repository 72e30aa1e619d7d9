pub mod books;
pub mod users;

use shelf_kernel::ModuleRegistry;

use crate::Dependencies;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, deps: &Dependencies) {
    registry.register(books::create_module(
        deps.store.clone(),
        deps.metadata.clone(),
    ));
    registry.register(users::create_module(deps.store.clone(), deps.hasher));
}
