use std::sync::Arc;

use anyhow::Context;
use shelf_app::Dependencies;
use shelf_authz::PasswordHasher;
use shelf_kernel::{settings::Settings, InitCtx};
use shelf_metadata::GoogleBooksClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        store = ?settings.database.backend,
        "shelf bootstrap starting"
    );

    let store = shelf_db::connect(&settings.database).await?;
    let metadata = GoogleBooksClient::new(&settings.metadata)
        .context("failed to build metadata client")?;

    let deps = Dependencies {
        store,
        metadata: Arc::new(metadata),
        hasher: PasswordHasher::new(settings.auth.bcrypt_cost),
    };
    let registry = shelf_app::build_registry(&deps);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("shelf bootstrap complete");

    let served = shelf_http::start_server(&registry, &settings).await;
    registry.stop_modules().await?;
    served
}
