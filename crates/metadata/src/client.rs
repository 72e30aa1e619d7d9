use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use shelf_kernel::settings::MetadataSettings;

use crate::models::VolumesResponse;
use crate::{MetadataError, VolumeInfo, VolumeSearch};

/// HTTP client for a Google Books compatible `/volumes` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    http: reqwest::Client,
    volumes_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(settings: &MetadataSettings) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            volumes_url: format!("{}/volumes", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl VolumeSearch for GoogleBooksClient {
    async fn search_volumes(&self, query: &str) -> Result<Vec<VolumeInfo>, MetadataError> {
        let mut request = self.http.get(&self.volumes_url).query(&[("q", query)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(query, status = status.as_u16(), "volumes search rejected");
            return Err(MetadataError::UpstreamUnavailable {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let volumes = serde_json::from_slice::<VolumesResponse>(&body)?.into_volumes();

        tracing::debug!(query, results = volumes.len(), "volumes search complete");
        Ok(volumes)
    }
}
