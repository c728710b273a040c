pub mod fields;
pub mod utils;

pub use utils::get_current_timestamp_ms;

use serde::{Deserialize, Serialize};

/// Response body of a signed upload, as returned by the image host.
/// Every field is optional and unknown fields are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct UploadResult {
    pub asset_id: Option<String>,
    pub public_id: Option<String>,
    pub version: Option<u64>,
    pub version_id: Option<String>,
    pub signature: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub resource_type: Option<String>,
    pub created_at: Option<String>,
    pub tags: Vec<serde_json::Value>,
    pub bytes: Option<u64>,
    #[serde(rename = "type")]
    pub delivery_type: Option<String>,
    pub etag: Option<String>,
    pub placeholder: Option<bool>,
    pub url: Option<String>,
    pub secure_url: Option<String>,
    pub folder: Option<String>,
    pub original_filename: Option<String>,
    pub api_key: Option<String>,
    pub eager: Vec<EagerItem>,
}

/// One eagerly generated derivative of an uploaded image
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct EagerItem {
    pub transformation: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bytes: Option<u64>,
    pub format: Option<String>,
    pub url: Option<String>,
    pub secure_url: Option<String>,
}

/// Error body returned by the image host on rejected requests
#[derive(Deserialize, Clone, Debug)]
pub struct HostErrorResponse {
    pub error: HostErrorDetail,
}

#[derive(Deserialize, Clone, Debug)]
pub struct HostErrorDetail {
    pub message: String,
}

/// A fully read HTTP response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WebResponse {
    pub headers: Vec<(String, String)>, // wire order
    pub status: u16,
    pub reason_phrase: String,
    pub body: String,
}

impl WebResponse {
    /// First value of the named header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Result of a command handed to the command-processing collaborator
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandProcessingResult {
    pub resource_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Response from health check endpoint
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String, // "ok" when healthy
}
