//! Document store client for the `books` and `users` collections.
//!
//! Handlers talk to a [`DocumentStore`] trait object; [`connect`] picks the
//! implementation named in [`DatabaseSettings`].

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use shelf_kernel::settings::{DatabaseSettings, StoreBackend};

pub mod error;
pub mod memory;
pub mod models;
pub mod mongo;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{Book, BookEnrichment, BookKey, User};
pub use mongo::MongoStore;

/// Single-call operations against the catalog and account collections.
///
/// No operation spans more than one store call, and none retries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new, unenriched book.
    async fn insert_book(&self, title: &str, author: &str) -> Result<(), StoreError>;

    /// Set `fields` on every book matching `key`; returns the number matched.
    async fn update_book_fields(
        &self,
        key: &BookKey,
        fields: &BookEnrichment,
    ) -> Result<u64, StoreError>;

    /// All books in insertion order.
    async fn find_all_books(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new account. Fails with [`StoreError::DuplicateUsername`] when the
    /// username is taken, independently of any check the caller made first.
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;
}

/// Build the configured document store.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match settings.backend {
        StoreBackend::Mongo => {
            let store = MongoStore::connect(&settings.uri, &settings.name)
                .await
                .with_context(|| format!("failed to connect to MongoDB at {}", settings.uri))?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
