use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// What a module can see while it is brought up.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// A feature slice of the service: its routes, API description and lifecycle hooks.
///
/// Dependencies are handed to the module when it is constructed, so the hooks
/// only receive settings.
#[async_trait]
pub trait Module: Sync + Send {
    fn name(&self) -> &'static str;

    /// Runs once before any route is mounted.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes merged at the service root. State must already be applied.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Paths and schemas merged into the served OpenAPI document.
    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        None
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called in reverse registration order on shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
