use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized bibliographic data extracted from one upstream result item.
///
/// Missing scalar fields stay `None` and serialize as `null`; missing
/// `authors` becomes an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
    pub description: Option<String>,
}

/// Top-level search response; `items` is absent when nothing matched.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<VolumeItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VolumeItem {
    #[serde(default, rename = "volumeInfo")]
    pub volume_info: VolumeInfo,
}

impl VolumesResponse {
    pub(crate) fn into_volumes(self) -> Vec<VolumeInfo> {
        self.items.into_iter().map(|item| item.volume_info).collect()
    }
}
