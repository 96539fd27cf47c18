use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::chirps::dtos::{
    ChirpFormDto, ChirpPayload, ChirpResponseDto, DeleteChirpResponseDto, NewImage,
};
use crate::features::chirps::services::ChirpService;
use crate::shared::types::{ApiResponse, Meta};

/// Read the chirp form out of a multipart request.
///
/// Fields: `message` (text), `image` (file, optional). A missing message
/// becomes an empty string so validation reports the field rather than the
/// transport.
async fn read_chirp_form(mut multipart: Multipart) -> Result<ChirpPayload> {
    let mut message = String::new();
    let mut image: Option<NewImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "message" => {
                message = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read message field: {}", e))
                })?;
            }
            "image" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;

                // An empty file part means "no image" (browsers submit the
                // field even when nothing was picked)
                if !data.is_empty() {
                    image = Some(NewImage {
                        data: data.to_vec(),
                        content_type,
                        filename,
                    });
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(ChirpPayload { message, image })
}

/// List all chirps
///
/// Newest first, each with its author's id and display name.
#[utoipa::path(
    get,
    path = "/api/chirps",
    responses(
        (status = 200, description = "List of chirps", body = ApiResponse<Vec<ChirpResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    tag = "chirps"
)]
pub async fn list_chirps(
    _user: AuthenticatedUser,
    State(service): State<Arc<ChirpService>>,
) -> Result<Json<ApiResponse<Vec<ChirpResponseDto>>>> {
    let chirps = service.list().await?;
    let total = chirps.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(chirps),
        None,
        Some(Meta { total }),
    )))
}

/// Create a chirp
///
/// Accepts multipart/form-data with a `message` text field and an optional
/// `image` file (jpeg/png/jpg/gif, max 2048 KB).
#[utoipa::path(
    post,
    path = "/api/chirps",
    request_body(
        content = ChirpFormDto,
        content_type = "multipart/form-data",
        description = "Chirp form with message and optional image",
    ),
    responses(
        (status = 201, description = "Chirp created", body = ApiResponse<ChirpResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 422, description = "Validation errors")
    ),
    tag = "chirps"
)]
pub async fn create_chirp(
    user: AuthenticatedUser,
    State(service): State<Arc<ChirpService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ChirpResponseDto>>)> {
    let payload = read_chirp_form(multipart).await?;
    let chirp = service.create(&user, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(chirp),
            Some("Chirp created successfully.".to_string()),
            None,
        )),
    ))
}

/// Update a chirp
///
/// Owner-only. Same form as create; supplying a new image replaces (and
/// deletes) the previously stored one.
#[utoipa::path(
    put,
    path = "/api/chirps/{id}",
    params(
        ("id" = Uuid, Path, description = "Chirp id")
    ),
    request_body(
        content = ChirpFormDto,
        content_type = "multipart/form-data",
        description = "Chirp form with message and optional image",
    ),
    responses(
        (status = 200, description = "Chirp updated", body = ApiResponse<ChirpResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the chirp's owner"),
        (status = 404, description = "Chirp not found"),
        (status = 422, description = "Validation errors")
    ),
    tag = "chirps"
)]
pub async fn update_chirp(
    user: AuthenticatedUser,
    State(service): State<Arc<ChirpService>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ChirpResponseDto>>> {
    let payload = read_chirp_form(multipart).await?;
    let chirp = service.update(&user, id, payload).await?;

    Ok(Json(ApiResponse::success(
        Some(chirp),
        Some("Chirp updated successfully.".to_string()),
        None,
    )))
}

/// Delete a chirp
///
/// Owner-only. Removes the stored image (when present), then the record.
#[utoipa::path(
    delete,
    path = "/api/chirps/{id}",
    params(
        ("id" = Uuid, Path, description = "Chirp id")
    ),
    responses(
        (status = 200, description = "Chirp deleted", body = ApiResponse<DeleteChirpResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the chirp's owner"),
        (status = 404, description = "Chirp not found")
    ),
    tag = "chirps"
)]
pub async fn delete_chirp(
    user: AuthenticatedUser,
    State(service): State<Arc<ChirpService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteChirpResponseDto>>> {
    service.delete(&user, id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteChirpResponseDto { deleted: true }),
        None,
        None,
    )))
}
