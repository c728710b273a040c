//! Field names shared by the REST resource, the CLI and the upload client

/// Multipart part carrying the identity photo
pub const PHOTO_OF_INDIVIDUAL: &str = "photoOfIndividual";

/// Multipart part carrying the front of the identity document
pub const FRONT_ID: &str = "frontId";

/// Multipart part carrying the back of the identity document
pub const BACK_ID: &str = "backId";

/// Image fields that get rewritten to hosted URLs, in payload order
pub const IMAGE_FIELDS: [&str; 3] = [PHOTO_OF_INDIVIDUAL, FRONT_ID, BACK_ID];

/// Multipart part carrying the user-creation JSON
pub const API_REQUEST_BODY: &str = "apiRequestBodyAsJson";

/// Upload form parts expected by the image host
pub const FILE_PART: &str = "file";
pub const PUBLIC_ID_PART: &str = "public_id";
pub const TIMESTAMP_PART: &str = "timestamp";
pub const SIGNATURE_PART: &str = "signature";
pub const API_KEY_PART: &str = "api_key";
pub const EAGER_PART: &str = "eager";
