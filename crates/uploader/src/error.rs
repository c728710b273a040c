use thiserror::Error;

/// Failure of a single signed upload
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read upload stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("Request to image host failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Image host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Malformed response from image host: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Image host response has no url")]
    MissingUrl,
}

/// The user-creation payload could not be enriched
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed JSON payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("JSON payload must be an object, got {0}")]
    NotAnObject(&'static str),
}

/// Invalid upload or web client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
