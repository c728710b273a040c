//! Upload a fixed set of named streams for one request

use crate::error::UploadError;
use crate::{into_url_or_message, ImageHost, UploadStream};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Field name to stream, e.g. `photoOfIndividual`, `frontId`, `backId`
pub type NamedStreamBatch = Vec<(String, UploadStream)>;

/// Drives one upload per named stream and collects the resulting URLs
#[derive(Clone)]
pub struct BulkUploadCoordinator {
    host: Arc<dyn ImageHost>,
}

impl BulkUploadCoordinator {
    pub fn new(host: Arc<dyn ImageHost>) -> Self {
        Self { host }
    }

    /// Upload every stream, keeping typed outcomes.
    /// Uploads run one after another; each key yields exactly one entry.
    pub async fn try_upload_all(
        &self,
        batch: NamedStreamBatch,
    ) -> HashMap<String, Result<String, UploadError>> {
        let mut results = HashMap::with_capacity(batch.len());
        for (name, stream) in batch {
            let outcome = self.host.try_upload(stream).await;
            results.insert(name, outcome);
        }

        let failed = results.values().filter(|r| r.is_err()).count();
        info!(
            "Bulk upload done: {} uploaded, {} failed",
            results.len() - failed,
            failed
        );
        results
    }

    /// Upload every stream; failed uploads map to an error message
    pub async fn upload_all(&self, batch: NamedStreamBatch) -> HashMap<String, String> {
        self.try_upload_all(batch)
            .await
            .into_iter()
            .map(|(name, outcome)| (name, into_url_or_message(outcome)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CloudinaryConfig, WebConfig};
    use crate::{is_upload_failure, CloudinaryClient, WebClient};
    use async_trait::async_trait;
    use common::fields::{BACK_ID, FRONT_ID, PHOTO_OF_INDIVIDUAL};
    use mockito::{Matcher, Server};
    use std::io::Cursor;
    use tokio::io::AsyncReadExt;

    /// Echoes stream contents into a URL; contents "fail" are rejected
    struct EchoHost;

    #[async_trait]
    impl ImageHost for EchoHost {
        async fn try_upload(&self, mut stream: UploadStream) -> Result<String, UploadError> {
            let mut content = String::new();
            stream.read_to_string(&mut content).await?;
            if content == "fail" {
                return Err(UploadError::MissingUrl);
            }
            Ok(format!("http://x/{}.jpg", content))
        }
    }

    fn stream(bytes: &[u8]) -> UploadStream {
        Box::new(Cursor::new(bytes.to_vec()))
    }

    fn batch(entries: &[(&str, &[u8])]) -> NamedStreamBatch {
        entries
            .iter()
            .map(|(name, bytes)| (name.to_string(), stream(bytes)))
            .collect()
    }

    #[tokio::test]
    async fn test_one_entry_per_key_despite_failures() {
        let coordinator = BulkUploadCoordinator::new(Arc::new(EchoHost));
        let results = coordinator
            .upload_all(batch(&[
                (PHOTO_OF_INDIVIDUAL, b"face"),
                (FRONT_ID, b"fail"),
                (BACK_ID, b"back"),
            ]))
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[PHOTO_OF_INDIVIDUAL], "http://x/face.jpg");
        assert!(is_upload_failure(&results[FRONT_ID]));
        assert_eq!(results[BACK_ID], "http://x/back.jpg");
    }

    #[tokio::test]
    async fn test_typed_outcomes() {
        let coordinator = BulkUploadCoordinator::new(Arc::new(EchoHost));
        let results = coordinator
            .try_upload_all(batch(&[(FRONT_ID, b"fail"), (BACK_ID, b"back")]))
            .await;

        assert!(matches!(results[FRONT_ID], Err(UploadError::MissingUrl)));
        assert_eq!(results[BACK_ID].as_deref().ok(), Some("http://x/back.jpg"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let coordinator = BulkUploadCoordinator::new(Arc::new(EchoHost));
        assert!(coordinator.upload_all(Vec::new()).await.is_empty());
    }

    fn cloudinary(upload_url: String) -> Arc<dyn ImageHost> {
        let web = WebClient::new(&WebConfig {
            connect_timeout_seconds: 5,
            read_timeout_seconds: 5,
        })
        .unwrap();
        Arc::new(CloudinaryClient::new(
            web,
            CloudinaryConfig {
                cloud_name: "demo".to_string(),
                api_key: "key".to_string(),
                secret: "secret".to_string(),
                eager: "w_400,h_300,c_pad".to_string(),
                upload_url,
                delete_url: None,
            },
        ))
    }

    #[tokio::test]
    async fn test_identity_images_against_stub_host() {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        for (field, content) in [
            (PHOTO_OF_INDIVIDUAL, "photo"),
            (FRONT_ID, "front"),
            (BACK_ID, "backk"),
        ] {
            let mock = server
                .mock("POST", "/upload")
                .match_body(Matcher::Regex(format!("\r\n\r\n{}\r\n", content)))
                .with_status(200)
                .with_body(format!(r#"{{"url":"http://x/{}.jpg"}}"#, field))
                .create_async()
                .await;
            mocks.push(mock);
        }

        let coordinator = BulkUploadCoordinator::new(cloudinary(format!("{}/upload", server.url())));
        let results = coordinator
            .upload_all(batch(&[
                (PHOTO_OF_INDIVIDUAL, b"photo"),
                (FRONT_ID, b"front"),
                (BACK_ID, b"backk"),
            ]))
            .await;

        for mock in &mocks {
            mock.assert_async().await;
        }
        let expected: HashMap<String, String> = [
            (PHOTO_OF_INDIVIDUAL, "http://x/photoOfIndividual.jpg"),
            (FRONT_ID, "http://x/frontId.jpg"),
            (BACK_ID, "http://x/backId.jpg"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(results, expected);
    }

    #[tokio::test]
    async fn test_batch_completes_when_host_returns_garbage() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/upload")
            .with_status(200)
            .with_body("not json at all")
            .expect(2)
            .create_async()
            .await;

        let coordinator = BulkUploadCoordinator::new(cloudinary(format!("{}/upload", server.url())));
        let results = coordinator
            .upload_all(batch(&[(FRONT_ID, b"front"), (BACK_ID, b"backk")]))
            .await;

        assert_eq!(results.len(), 2);
        assert!(results.values().all(|v| is_upload_failure(v)));
    }
}
