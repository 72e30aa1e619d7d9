//! Client for the third-party volumes-search API used to enrich catalog entries.

use async_trait::async_trait;

pub mod client;
pub mod error;
pub mod models;

pub use client::GoogleBooksClient;
pub use error::MetadataError;
pub use models::VolumeInfo;

/// Free-text lookup against a bibliographic provider.
///
/// An empty result is a valid outcome, not an error. Callers validate that
/// `query` is non-empty.
#[async_trait]
pub trait VolumeSearch: Send + Sync {
    async fn search_volumes(&self, query: &str) -> Result<Vec<VolumeInfo>, MetadataError>;
}
