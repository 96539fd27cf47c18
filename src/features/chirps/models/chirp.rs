use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for chirps
#[derive(Debug, Clone, FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    /// Relative key of the attached image in the content store, if any
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Chirp row joined with its author's display name
#[derive(Debug, Clone, FromRow)]
pub struct ChirpWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// None when the author row has not been mirrored yet
    pub author_name: Option<String>,
}
