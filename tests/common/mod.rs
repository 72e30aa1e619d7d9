#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

use shelf_app::{build_app, Dependencies};
use shelf_authz::PasswordHasher;
use shelf_db::MemoryStore;
use shelf_kernel::Settings;
use shelf_metadata::{MetadataError, VolumeInfo, VolumeSearch};

/// Lowest cost bcrypt accepts; keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Canned answer for every volumes search.
#[derive(Debug, Clone)]
pub enum StubReply {
    Volumes(Vec<VolumeInfo>),
    Status(u16),
}

/// Volumes search double that records the queries it receives.
pub struct StubVolumes {
    reply: StubReply,
    queries: Mutex<Vec<String>>,
}

impl StubVolumes {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl VolumeSearch for StubVolumes {
    async fn search_volumes(&self, query: &str) -> Result<Vec<VolumeInfo>, MetadataError> {
        self.queries.lock().push(query.to_string());
        match &self.reply {
            StubReply::Volumes(volumes) => Ok(volumes.clone()),
            StubReply::Status(status) => Err(MetadataError::UpstreamUnavailable { status: *status }),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub metadata: Arc<StubVolumes>,
}

impl TestApp {
    pub fn new(reply: StubReply) -> Self {
        Self::with_store(MemoryStore::new(), reply)
    }

    pub fn with_store(store: MemoryStore, reply: StubReply) -> Self {
        Self::build(store, reply, &Settings::default())
    }

    pub fn with_settings(settings: &Settings, reply: StubReply) -> Self {
        Self::build(MemoryStore::new(), reply, settings)
    }

    fn build(store: MemoryStore, reply: StubReply, settings: &Settings) -> Self {
        let store = Arc::new(store);
        let metadata = Arc::new(StubVolumes::new(reply));
        let deps = Dependencies {
            store: store.clone(),
            metadata: metadata.clone(),
            hasher: PasswordHasher::new(TEST_BCRYPT_COST),
        };
        let router = build_app(&deps, settings);
        Self {
            router,
            store,
            metadata,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` pair from the first `Set-Cookie` header, ready to send back.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

pub fn volume(title: &str, authors: &[&str], publisher: Option<&str>) -> VolumeInfo {
    VolumeInfo {
        title: Some(title.to_string()),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        publisher: publisher.map(str::to_string),
        published_date: None,
        description: None,
    }
}
