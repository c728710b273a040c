use crate::constants::{USERS_ENDPOINT, USERS_WITH_IMAGE_ENDPOINT};
use anyhow::{Context, Result};
use common::fields::API_REQUEST_BODY;
use common::CommandProcessingResult;
use log::info;
use reqwest::blocking::{multipart, Client, RequestBuilder};
use serde_json::Value;
use std::path::PathBuf;

/// Talks to the users resource of the server
pub struct UsersClient {
    server: String,
    client: Client,
}

impl UsersClient {
    pub fn new(server: &str) -> Self {
        Self {
            server: server.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a user; images are sent as named file parts
    pub fn create_user(
        &self,
        json: String,
        images: &[(&str, PathBuf)],
    ) -> Result<CommandProcessingResult> {
        let mut form = multipart::Form::new().part(
            API_REQUEST_BODY,
            multipart::Part::text(json)
                .mime_str("text/plain")
                .context("Failed to set MIME type")?,
        );
        for (field, path) in images {
            form = form
                .file(field.to_string(), path)
                .with_context(|| format!("Failed to read image {:?}", path))?;
            info!("Attaching {} from {:?}", field, path);
        }

        let url = format!("{}{}", self.server, USERS_WITH_IMAGE_ENDPOINT);
        let response = Self::send(self.client.post(&url).multipart(form))?;
        response.json().context("Failed to parse command result")
    }

    /// List users, optionally restricted to some fields
    pub fn list_users(&self, fields: Option<&str>) -> Result<Value> {
        let url = format!("{}{}", self.server, USERS_ENDPOINT);
        let mut request = self.client.get(&url);
        if let Some(fields) = fields {
            request = request.query(&[("fields", fields)]);
        }
        Self::send(request)?
            .json()
            .context("Failed to parse user list")
    }

    pub fn get_user(&self, user_id: u64, template: bool) -> Result<Value> {
        let url = format!("{}{}/{}", self.server, USERS_ENDPOINT, user_id);
        let mut request = self.client.get(&url);
        if template {
            request = request.query(&[("template", "true")]);
        }
        Self::send(request)?.json().context("Failed to parse user")
    }

    pub fn delete_user(&self, user_id: u64) -> Result<CommandProcessingResult> {
        let url = format!("{}{}/{}", self.server, USERS_ENDPOINT, user_id);
        Self::send(self.client.delete(&url))?
            .json()
            .context("Failed to parse command result")
    }

    /// Send a request and fail on non-success status
    fn send(request: RequestBuilder) -> Result<reqwest::blocking::Response> {
        let response = request.send().context("Failed to connect to server")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Request failed: {} - {}", status, error_text);
        }
        Ok(response)
    }
}
