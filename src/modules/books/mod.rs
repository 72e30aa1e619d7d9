pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use shelf_db::DocumentStore;
use shelf_http::error::{ErrorBody, MessageBody};
use shelf_kernel::{InitCtx, Module};
use shelf_metadata::{VolumeInfo, VolumeSearch};
use utoipa::OpenApi;

/// Dependencies shared by the catalog handlers.
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<dyn DocumentStore>,
    pub metadata: Arc<dyn VolumeSearch>,
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::add_book, handlers::list_books, handlers::search_books),
    components(schemas(
        models::AddBookForm,
        models::BookSummary,
        VolumeInfo,
        MessageBody,
        ErrorBody
    )),
    tags((name = "Books", description = "Catalog submission, listing and metadata search"))
)]
struct BooksApi;

/// Catalog module: submission with metadata enrichment, listing, and search.
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(store: Arc<dyn DocumentStore>, metadata: Arc<dyn VolumeSearch>) -> Self {
        Self {
            state: BooksState { store, metadata },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            metadata_provider = %ctx.settings.metadata.base_url,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/add", post(handlers::add_book))
            .route("/list", get(handlers::list_books))
            .route("/search", get(handlers::search_books))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(BooksApi::openapi())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(
    store: Arc<dyn DocumentStore>,
    metadata: Arc<dyn VolumeSearch>,
) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store, metadata))
}
