use crate::directory::DirectoryError;
use tracing::error;

/// Helper function for bad request errors
pub fn handle_error<E: std::fmt::Display>(msg: &str, e: E) -> actix_web::Error {
    error!("{}: {}", msg, e);
    actix_web::error::ErrorBadRequest(format!("{}: {}", msg, e))
}

/// Helper function for server errors
pub fn handle_server_error<E: std::fmt::Display>(msg: &str, e: E) -> actix_web::Error {
    error!("{}: {}", msg, e);
    actix_web::error::ErrorInternalServerError(format!("{}: {}", msg, e))
}

/// Helper function for not found errors
pub fn handle_not_found<E: std::fmt::Display>(msg: &str, e: E) -> actix_web::Error {
    error!("{}: {}", msg, e);
    actix_web::error::ErrorNotFound(format!("{}: {}", msg, e))
}

/// Map a collaborator failure to the matching HTTP error
pub fn handle_directory_error(msg: &str, e: DirectoryError) -> actix_web::Error {
    match e {
        DirectoryError::NotFound(_) => handle_not_found(msg, e),
        DirectoryError::Validation(_) => handle_error(msg, e),
        DirectoryError::Unavailable(_) => handle_server_error(msg, e),
    }
}
