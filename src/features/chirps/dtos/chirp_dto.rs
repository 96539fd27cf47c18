use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};

/// Allowed MIME types for chirp images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Maximum image size in bytes (2048 KB)
pub const MAX_IMAGE_SIZE: usize = 2048 * 1024;

/// Check if a MIME type is allowed for chirp images
pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// Get file extension from image content type
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// An image file read out of the multipart form
#[derive(Debug, Clone)]
pub struct NewImage {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Validated input for creating or updating a chirp
#[derive(Debug, Clone, Validate)]
pub struct ChirpPayload {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub message: String,
    pub image: Option<NewImage>,
}

impl ChirpPayload {
    /// Check all field constraints, collecting every violation.
    ///
    /// Message length comes from the `Validate` derive; the image checks
    /// (size cap, allowed types) are explicit because they apply to raw
    /// multipart bytes rather than a deserialized field.
    pub fn validate_fields(&self) -> Result<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.validate() {
            for (field, field_errors) in e.field_errors() {
                for err in field_errors {
                    let detail = err
                        .message
                        .clone()
                        .unwrap_or_else(|| "is invalid".into());
                    errors.push(format!("{}: {}", field, detail));
                }
            }
        }

        if let Some(image) = &self.image {
            if !is_image_type_allowed(&image.content_type) {
                errors.push(format!(
                    "image: type '{}' is not allowed. Allowed types: {}",
                    image.content_type,
                    ALLOWED_IMAGE_TYPES.join(", ")
                ));
            }
            if image.data.len() > MAX_IMAGE_SIZE {
                errors.push(format!(
                    "image: must not exceed {} KB",
                    MAX_IMAGE_SIZE / 1024
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Chirp form fields for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handlers use axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ChirpFormDto {
    /// The chirp text (required, max 255 characters)
    #[schema(example = "hello world")]
    pub message: String,
    /// Optional image attachment (jpeg/png/jpg/gif, max 2048 KB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Response DTO for a chirp
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChirpResponseDto {
    pub id: Uuid,
    /// Owning user id
    pub user_id: Uuid,
    /// Author display name, when the author row is known
    pub author_name: Option<String>,
    pub message: String,
    /// Relative key of the attached image in the content store
    pub image_path: Option<String>,
    /// Browser-facing URL for the attached image
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteChirpResponseDto {
    /// Confirmation that the chirp was deleted
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(message: &str, image: Option<NewImage>) -> ChirpPayload {
        ChirpPayload {
            message: message.to_string(),
            image,
        }
    }

    fn png(size: usize) -> NewImage {
        NewImage {
            data: vec![0u8; size],
            content_type: "image/png".to_string(),
            filename: "a.png".to_string(),
        }
    }

    #[test]
    fn test_allowed_image_types() {
        assert!(is_image_type_allowed("image/jpeg"));
        assert!(is_image_type_allowed("image/jpg"));
        assert!(is_image_type_allowed("image/png"));
        assert!(is_image_type_allowed("image/gif"));
        assert!(!is_image_type_allowed("image/webp"));
        assert!(!is_image_type_allowed("application/pdf"));
        assert!(!is_image_type_allowed(""));
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/jpeg"), Some("jpg"));
        assert_eq!(image_extension("image/jpg"), Some("jpg"));
        assert_eq!(image_extension("image/png"), Some("png"));
        assert_eq!(image_extension("image/gif"), Some("gif"));
        assert_eq!(image_extension("application/pdf"), None);
    }

    #[test]
    fn test_valid_payload() {
        assert!(payload("hello", None).validate_fields().is_ok());
        assert!(payload("hello", Some(png(1024))).validate_fields().is_ok());
        // Exactly at the caps
        assert!(payload(&"a".repeat(255), Some(png(MAX_IMAGE_SIZE)))
            .validate_fields()
            .is_ok());
    }

    #[test]
    fn test_message_constraints() {
        let err = payload("", None).validate_fields().unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.starts_with("message:")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let err = payload(&"a".repeat(256), None).validate_fields().unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.starts_with("message:")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_image_constraints() {
        let oversized = payload("hello", Some(png(MAX_IMAGE_SIZE + 1)));
        match oversized.validate_fields().unwrap_err() {
            AppError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.starts_with("image:")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let pdf = NewImage {
            data: vec![0u8; 16],
            content_type: "application/pdf".to_string(),
            filename: "doc.pdf".to_string(),
        };
        match payload("hello", Some(pdf)).validate_fields().unwrap_err() {
            AppError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("not allowed")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_violations_reported_together() {
        let err = payload(&"a".repeat(300), Some(png(MAX_IMAGE_SIZE + 1)))
            .validate_fields()
            .unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
