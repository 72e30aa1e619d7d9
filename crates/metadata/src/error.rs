use thiserror::Error;

/// Failures talking to the volumes-search provider.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata provider responded with status {status}")]
    UpstreamUnavailable { status: u16 },

    #[error("metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("metadata response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}
