//! Image host and HTTP client configuration

use crate::error::ConfigError;
use std::fmt;
use std::time::Duration;

/// Credentials and endpoints of the signed upload API
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub secret: String,
    /// Eager transformations requested with every upload
    pub eager: String,
    pub upload_url: String,
    /// Configured for completeness; deletions are not issued
    pub delete_url: Option<String>,
}

impl CloudinaryConfig {
    /// Default upload endpoint for a cloud name
    pub fn default_upload_url(cloud_name: &str) -> String {
        format!("https://api.cloudinary.com/v1_1/{}/image/upload", cloud_name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api key"));
        }
        if self.secret.is_empty() {
            return Err(ConfigError::Missing("api secret"));
        }
        // The default endpoint embeds the cloud name
        if self.cloud_name.trim().is_empty()
            && self.upload_url == Self::default_upload_url(&self.cloud_name)
        {
            return Err(ConfigError::Missing("cloud name"));
        }
        if !self.upload_url.starts_with("http://") && !self.upload_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "upload url",
                value: self.upload_url.clone(),
            });
        }
        Ok(())
    }
}

// Keep the secret out of logs
impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .field("eager", &self.eager)
            .field("upload_url", &self.upload_url)
            .field("delete_url", &self.delete_url)
            .finish()
    }
}

/// Timeouts applied to the shared HTTP client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebConfig {
    pub connect_timeout_seconds: u64,
    pub read_timeout_seconds: u64,
}

impl WebConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }
}
