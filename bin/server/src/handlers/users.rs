use crate::directory::CommandWrapper;
use crate::handlers::error::{handle_directory_error, handle_error, handle_server_error};
use crate::handlers::users_form::CreateUserWithImageForm;
use crate::query::ApiRequestParameters;
use crate::state::AppState;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::MultipartForm;
use actix_web::{delete, get, post, put, web, HttpResponse, Result as ActixResult};
use common::fields::{BACK_ID, FRONT_ID, PHOTO_OF_INDIVIDUAL};
use serde_json::Value;
use tracing::info;
use uploader::enrich::{enrich, parse_object};
use uploader::{NamedStreamBatch, UploadStream};

/// Retrieve list of users
#[get("/v1/users")]
pub async fn retrieve_all(
    query: web::Query<ApiRequestParameters>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let users = state
        .users
        .retrieve_all_users()
        .await
        .map_err(|e| handle_directory_error("Failed to retrieve users", e))?;

    let body: Vec<_> = users.iter().map(|user| query.project(user)).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Retrieve a user; `template=true` adds the office list
#[get("/v1/users/{user_id}")]
pub async fn retrieve_one(
    path: web::Path<u64>,
    query: web::Query<ApiRequestParameters>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();
    let mut user = state
        .users
        .retrieve_user(user_id)
        .await
        .map_err(|e| handle_directory_error("Failed to retrieve user", e))?;

    if query.template {
        let offices = state
            .users
            .retrieve_offices_for_dropdown()
            .await
            .map_err(|e| handle_directory_error("Failed to retrieve offices", e))?;
        user.insert("allowedOffices".to_string(), Value::Array(offices));
    }

    Ok(HttpResponse::Ok().json(query.project(&user)))
}

/// Retrieve the new-user template
#[get("/v1/users/template")]
pub async fn template(
    query: web::Query<ApiRequestParameters>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let template = state
        .users
        .retrieve_new_user_details()
        .await
        .map_err(|e| handle_directory_error("Failed to retrieve user template", e))?;

    Ok(HttpResponse::Ok().json(query.project(&template)))
}

/// Create a user from a raw JSON body
#[post("/v1/users")]
pub async fn create(body: String, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    info!("POST /v1/users - Request received");

    let result = state
        .commands
        .log_command_source(CommandWrapper::create_user(body))
        .await
        .map_err(|e| handle_directory_error("Failed to create user", e))?;

    Ok(HttpResponse::Ok().json(result))
}

/// Create a user, uploading identity images first and storing their URLs
#[post("/v1/users/withImage")]
pub async fn create_with_image(
    form: MultipartForm<CreateUserWithImageForm>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let CreateUserWithImageForm {
        photo_of_individual,
        front_id,
        back_id,
        api_request_body,
    } = form.into_inner();
    let payload = api_request_body.into_inner();

    // Reject a bad payload before anything is sent to the image host
    parse_object(&payload).map_err(|e| handle_error("Malformed user payload", e))?;

    let mut batch: NamedStreamBatch = Vec::new();
    for (name, file) in [
        (PHOTO_OF_INDIVIDUAL, photo_of_individual),
        (FRONT_ID, front_id),
        (BACK_ID, back_id),
    ] {
        if let Some(file) = file {
            let stream = open_upload_stream(file)
                .map_err(|e| handle_server_error("Failed to read uploaded file", e))?;
            batch.push((name.to_string(), stream));
        }
    }

    info!(
        images = batch.len(),
        "POST /v1/users/withImage - Request received"
    );

    let urls = state.uploads.upload_all(batch).await;
    info!("POST /v1/users/withImage - Upload done");

    let enriched = enrich(&payload, &urls).map_err(|e| handle_error("Malformed user payload", e))?;
    let result = state
        .commands
        .log_command_source(CommandWrapper::create_user(enriched))
        .await
        .map_err(|e| handle_directory_error("Failed to create user", e))?;

    Ok(HttpResponse::Ok().json(result))
}

/// Update a user
#[put("/v1/users/{user_id}")]
pub async fn update(
    path: web::Path<u64>,
    body: String,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();
    info!(user_id, "PUT /v1/users - Request received");

    let result = state
        .commands
        .log_command_source(CommandWrapper::update_user(user_id, body))
        .await
        .map_err(|e| handle_directory_error("Failed to update user", e))?;

    Ok(HttpResponse::Ok().json(result))
}

/// Delete a user
#[delete("/v1/users/{user_id}")]
pub async fn delete_user(path: web::Path<u64>, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();
    info!(user_id, "DELETE /v1/users - Request received");

    let result = state
        .commands
        .log_command_source(CommandWrapper::delete_user(user_id))
        .await
        .map_err(|e| handle_directory_error("Failed to delete user", e))?;

    Ok(HttpResponse::Ok().json(result))
}

/// Hand the uploaded temp file to the uploader as an owned stream
fn open_upload_stream(file: TempFile) -> std::io::Result<UploadStream> {
    let handle = file.file.reopen()?;
    Ok(Box::new(tokio::fs::File::from_std(handle)))
}
