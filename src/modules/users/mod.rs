pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use shelf_authz::PasswordHasher;
use shelf_db::DocumentStore;
use shelf_http::error::{ErrorBody, MessageBody};
use shelf_kernel::{InitCtx, Module};
use utoipa::OpenApi;

/// Dependencies shared by the account handlers.
#[derive(Clone)]
pub struct UsersState {
    pub store: Arc<dyn DocumentStore>,
    pub hasher: PasswordHasher,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register,
        handlers::login,
        handlers::logout,
        handlers::profile
    ),
    components(schemas(
        models::CredentialsRequest,
        models::ProfileResponse,
        MessageBody,
        ErrorBody
    )),
    tags((name = "Users", description = "Registration and session login"))
)]
struct UsersApi;

/// Account module: registration, session login/logout, and profile.
pub struct UsersModule {
    state: UsersState,
}

impl UsersModule {
    pub fn new(store: Arc<dyn DocumentStore>, hasher: PasswordHasher) -> Self {
        Self {
            state: UsersState { store, hasher },
        }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            bcrypt_cost = self.state.hasher.cost(),
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/register", post(handlers::register))
            .route("/login", post(handlers::login))
            .route("/logout", post(handlers::logout))
            .route("/profile", get(handlers::profile))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(UsersApi::openapi())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

/// Create a new instance of the users module
pub fn create_module(store: Arc<dyn DocumentStore>, hasher: PasswordHasher) -> Arc<dyn Module> {
    Arc::new(UsersModule::new(store, hasher))
}
