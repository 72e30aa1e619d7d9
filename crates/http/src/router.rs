//! Router builder for the shelf HTTP server

use axum::{
    extract::Request,
    http::HeaderValue,
    routing::{get, MethodRouter},
    Json, Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};
use uuid::{Timestamp, Uuid};

use shelf_kernel::settings::SessionSettings;
use shelf_kernel::ModuleRegistry;

/// Path the merged OpenAPI document is served from.
pub const OPENAPI_PATH: &str = "/docs/openapi.json";

/// Builder for constructing the main HTTP router
///
/// Middleware only wraps routes added before it, so mount routes first.
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Merge a module's router at the service root
    pub fn mount_module(mut self, module_router: Router) -> Self {
        self.router = self.router.merge(module_router);
        self
    }

    /// Serve one OpenAPI document built from every module's fragment
    pub fn with_openapi(mut self, registry: &ModuleRegistry, base: Option<OpenApi>) -> Self {
        let mut document = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("Shelf API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .description(Some("Book catalog with metadata enrichment"))
                    .build(),
            )
            .build();

        if let Some(base) = base {
            document.merge(base);
        }
        for module in registry.modules() {
            if let Some(fragment) = module.openapi() {
                document.merge(fragment);
            }
        }

        self.router = self.router.route(
            OPENAPI_PATH,
            get(move || async move { Json(document.clone()) }),
        );
        self
    }

    /// Add cookie-backed server-side sessions
    ///
    /// Records live in the process-local `tower_sessions::MemoryStore`: they
    /// are lost on restart and not shared between replicas. Expired records
    /// are refused on load but only removed on logout, so memory held by
    /// abandoned sessions grows until the process restarts.
    pub fn with_sessions(mut self, settings: &SessionSettings) -> Self {
        let layer = SessionManagerLayer::new(MemoryStore::default())
            .with_name(settings.cookie_name.clone())
            .with_secure(settings.secure)
            .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
                settings.inactivity_timeout_secs,
            )));
        self.router = self.router.layer(layer);
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add request ID middleware; the id is generated when absent and echoed on the response
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Request ID generator producing time-ordered UUIDs
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_module_mounting() {
        let module_router = Router::new().route("/list", get(|| async { "module" }));

        let router = RouterBuilder::new().mount_module(module_router).build();

        let response = router
            .oneshot(Request::builder().uri("/list").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let router = RouterBuilder::new()
            .route("/health", get(|| async { "ok" }))
            .with_tracing()
            .with_cors()
            .with_timeout(5000)
            .with_request_id()
            .build();

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert_eq!(Uuid::parse_str(id).unwrap().get_version_num(), 7);
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_preserved() {
        let router = RouterBuilder::new()
            .route("/health", get(|| async { "ok" }))
            .with_request_id()
            .build();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let registry = ModuleRegistry::new();
        let router = RouterBuilder::new()
            .with_openapi(&registry, None)
            .build();

        let response = router
            .oneshot(Request::builder().uri(OPENAPI_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let document: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(document["info"]["title"], "Shelf API");
    }
}
