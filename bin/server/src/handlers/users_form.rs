use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};

/// Multipart form for creating a user with identity images
#[derive(MultipartForm)]
pub struct CreateUserWithImageForm {
    #[multipart(rename = "photoOfIndividual", limit = "10MB")]
    pub photo_of_individual: Option<TempFile>,

    #[multipart(rename = "frontId", limit = "10MB")]
    pub front_id: Option<TempFile>,

    #[multipart(rename = "backId", limit = "10MB")]
    pub back_id: Option<TempFile>,

    /// User-creation JSON
    #[multipart(rename = "apiRequestBodyAsJson")]
    pub api_request_body: Text<String>,
}
