//! Shared HTTP client used for outbound multipart requests

use crate::config::WebConfig;
use crate::error::{ConfigError, UploadError};
use common::WebResponse;
use reqwest::multipart::Form;
use reqwest::Client;
use tracing::{debug, info};

/// Connection-pooled HTTP client; cheap to clone
#[derive(Clone, Debug)]
pub struct WebClient {
    client: Client,
}

impl WebClient {
    /// Build a client with the configured timeouts.
    /// reqwest 0.11 has no separate read timeout, so it bounds the whole request.
    pub fn new(config: &WebConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.read_timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;

        info!(
            "Timeouts configured: connect => {}s, read => {}s",
            config.connect_timeout_seconds, config.read_timeout_seconds
        );

        Ok(Self { client })
    }

    /// POST a multipart form and read the whole response
    pub async fn post_multipart(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        form: Form,
    ) -> Result<WebResponse, UploadError> {
        let mut request = self.client.post(url).multipart(form);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let web_response = Self::process_response(response).await?;
        debug!(
            status = web_response.status,
            reason = %web_response.reason_phrase,
            body = %web_response.body,
            "Response from image host"
        );
        Ok(web_response)
    }

    async fn process_response(response: reqwest::Response) -> Result<WebResponse, UploadError> {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        Ok(WebResponse {
            headers,
            status: status.as_u16(),
            reason_phrase: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn web_client() -> WebClient {
        WebClient::new(&WebConfig {
            connect_timeout_seconds: 5,
            read_timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_post_multipart_captures_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("x-trace", "abc")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::Regex(r#"name="greeting"\r\n\r\nhello"#.to_string()))
            .with_status(201)
            .with_header("x-upload-id", "42")
            .with_body("created")
            .create_async()
            .await;

        let form = Form::new().text("greeting", "hello");
        let response = web_client()
            .post_multipart(&format!("{}/echo", server.url()), &[("x-trace", "abc")], form)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 201);
        assert_eq!(response.reason_phrase, "Created");
        assert_eq!(response.body, "created");
        assert_eq!(response.header("X-Upload-Id"), Some("42"));
        assert!(response.is_success());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_post_multipart_slow_host_times_out() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/slow")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(std::time::Duration::from_secs(3));
                std::io::Write::write_all(w, br#"{"url":"http://x/late.jpg"}"#)
            })
            .create_async()
            .await;

        let client = WebClient::new(&WebConfig {
            connect_timeout_seconds: 1,
            read_timeout_seconds: 1,
        })
        .unwrap();
        let started = std::time::Instant::now();
        let result = client
            .post_multipart(&format!("{}/slow", server.url()), &[], Form::new())
            .await;

        assert!(matches!(result, Err(UploadError::Network(ref e)) if e.is_timeout()));
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_post_multipart_connection_refused() {
        let result = web_client()
            .post_multipart("http://127.0.0.1:1/upload", &[], Form::new())
            .await;
        assert!(matches!(result, Err(UploadError::Network(_))));
    }
}
