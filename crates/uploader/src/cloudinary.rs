//! Signed upload client for a Cloudinary-compatible image host

use crate::config::CloudinaryConfig;
use crate::error::UploadError;
use crate::web_client::WebClient;
use crate::{ImageHost, UploadStream};
use async_trait::async_trait;
use common::fields::{
    API_KEY_PART, EAGER_PART, FILE_PART, PUBLIC_ID_PART, SIGNATURE_PART, TIMESTAMP_PART,
};
use common::{get_current_timestamp_ms, HostErrorResponse, UploadResult, WebResponse};
use crypto::sign_upload_params;
use reqwest::multipart::{Form, Part};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

/// Uploads images with a signature derived from the shared secret
pub struct CloudinaryClient {
    web: WebClient,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(web: WebClient, config: CloudinaryConfig) -> Self {
        Self { web, config }
    }

    /// Build the multipart form for one upload.
    /// The timestamp doubles as public id and file name.
    fn build_multipart_form(
        &self,
        content: Vec<u8>,
        timestamp: &str,
        signature: String,
    ) -> Result<Form, UploadError> {
        let form = Form::new()
            .part(
                FILE_PART,
                Part::bytes(content)
                    .file_name(timestamp.to_string())
                    .mime_str("application/octet-stream")?,
            )
            .text(PUBLIC_ID_PART, timestamp.to_string())
            .text(TIMESTAMP_PART, timestamp.to_string())
            .text(SIGNATURE_PART, signature)
            .text(API_KEY_PART, self.config.api_key.clone())
            .text(EAGER_PART, self.config.eager.clone());

        Ok(form)
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn try_upload(&self, mut stream: UploadStream) -> Result<String, UploadError> {
        let mut content = Vec::new();
        let read = stream.read_to_end(&mut content).await;
        drop(stream);
        read?;

        let timestamp = get_current_timestamp_ms().to_string();
        let signature =
            sign_upload_params(&timestamp, &timestamp, &self.config.eager, &self.config.secret);

        info!(
            url = %self.config.upload_url,
            timestamp = %timestamp,
            eager = %self.config.eager,
            bytes = content.len(),
            "Uploading image"
        );

        let form = self.build_multipart_form(content, &timestamp, signature)?;
        let response = self
            .web
            .post_multipart(&self.config.upload_url, &[("connection", "keep-alive")], form)
            .await?;

        parse_upload_response(&response)
    }
}

/// Extract the delivery URL from the host's response
fn parse_upload_response(response: &WebResponse) -> Result<String, UploadError> {
    if !response.is_success() {
        let message = serde_json::from_str::<HostErrorResponse>(&response.body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| response.body.clone());
        warn!(
            status = response.status,
            reason = %response.reason_phrase,
            "Image host rejected upload"
        );
        return Err(UploadError::Rejected {
            status: response.status,
            message,
        });
    }

    let result: UploadResult = serde_json::from_str(&response.body)?;
    match result.url {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(UploadError::MissingUrl),
    }
}
