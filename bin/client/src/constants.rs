/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Users resource path
pub const USERS_ENDPOINT: &str = "/v1/users";

/// Create-with-images path
pub const USERS_WITH_IMAGE_ENDPOINT: &str = "/v1/users/withImage";
