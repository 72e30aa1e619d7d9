//! Shelf application library
//!
//! Wires the catalog and account modules to their injected dependencies.

use std::sync::Arc;

use axum::Router;
use shelf_authz::PasswordHasher;
use shelf_db::DocumentStore;
use shelf_kernel::{ModuleRegistry, Settings};
use shelf_metadata::VolumeSearch;

pub mod modules;

/// Everything the modules need from the outside world.
#[derive(Clone)]
pub struct Dependencies {
    pub store: Arc<dyn DocumentStore>,
    pub metadata: Arc<dyn VolumeSearch>,
    pub hasher: PasswordHasher,
}

/// Registry holding every module, in mount order.
pub fn build_registry(deps: &Dependencies) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, deps);
    registry
}

/// The complete HTTP application.
pub fn build_app(deps: &Dependencies, settings: &Settings) -> Router {
    shelf_http::build_router(&build_registry(deps), settings)
}
