//! Signed image uploads and payload enrichment for user creation

pub mod bulk;
pub mod cloudinary;
pub mod config;
pub mod enrich;
pub mod error;
pub mod web_client;

pub use bulk::{BulkUploadCoordinator, NamedStreamBatch};
pub use cloudinary::CloudinaryClient;
pub use config::{CloudinaryConfig, WebConfig};
pub use enrich::{enrich, set_field};
pub use error::{ConfigError, PayloadError, UploadError};
pub use web_client::WebClient;

use async_trait::async_trait;
use tokio::io::AsyncRead;
use tracing::error;

/// A binary input consumed exactly once by an upload
pub type UploadStream = Box<dyn AsyncRead + Send + Unpin>;

/// Every failed upload string starts with this
pub const UPLOAD_ERROR_PREFIX: &str = "Upload to image host failed";

/// Remote host that stores an image and returns its delivery URL
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload a stream; the stream is dropped before this returns
    async fn try_upload(&self, stream: UploadStream) -> Result<String, UploadError>;

    /// Upload a stream, reporting failure as a message instead of an error.
    /// The returned string is either a URL or starts with [`UPLOAD_ERROR_PREFIX`].
    async fn upload(&self, stream: UploadStream) -> String {
        into_url_or_message(self.try_upload(stream).await)
    }
}

/// Flatten an upload outcome into the string contract
pub fn into_url_or_message(outcome: Result<String, UploadError>) -> String {
    match outcome {
        Ok(url) => url,
        Err(e) => {
            let message = format!("{}: {}", UPLOAD_ERROR_PREFIX, e);
            error!("{}", message);
            message
        }
    }
}

/// Whether a value produced by [`ImageHost::upload`] reports a failure
pub fn is_upload_failure(value: &str) -> bool {
    value.starts_with(UPLOAD_ERROR_PREFIX)
}
