use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::chirps::models::{Chirp, ChirpWithAuthor};

/// Persistence seam for chirps.
///
/// `save` is an upsert keyed on the chirp id; the persistence layer owns the
/// timestamps (`created_at` on first insert, `updated_at` on every save).
#[async_trait]
pub trait ChirpRepository: Send + Sync {
    /// All chirps, newest first, with author display names joined in.
    async fn list_with_authors(&self) -> Result<Vec<ChirpWithAuthor>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chirp>>;

    /// Insert or update the chirp, returning the persisted row.
    async fn save(&self, chirp: &Chirp) -> Result<Chirp>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Mirror the author's display name from the identity collaborator so
    /// the list join can resolve it.
    async fn upsert_author(&self, id: Uuid, display_name: &str) -> Result<()>;
}

/// Postgres-backed chirp repository
pub struct PgChirpRepository {
    pool: PgPool,
}

impl PgChirpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChirpRepository for PgChirpRepository {
    async fn list_with_authors(&self) -> Result<Vec<ChirpWithAuthor>> {
        sqlx::query_as::<_, ChirpWithAuthor>(
            r#"
            SELECT c.id, c.user_id, c.message, c.image_path, c.created_at, c.updated_at,
                   u.display_name AS author_name
            FROM chirps c
            LEFT JOIN users u ON u.id = c.user_id
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list chirps: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chirp>> {
        sqlx::query_as::<_, Chirp>(
            r#"
            SELECT id, user_id, message, image_path, created_at, updated_at
            FROM chirps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find chirp by id: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn save(&self, chirp: &Chirp) -> Result<Chirp> {
        sqlx::query_as::<_, Chirp>(
            r#"
            INSERT INTO chirps (id, user_id, message, image_path)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET message = EXCLUDED.message,
                image_path = EXCLUDED.image_path,
                updated_at = now()
            RETURNING id, user_id, message, image_path, created_at, updated_at
            "#,
        )
        .bind(chirp.id)
        .bind(chirp.user_id)
        .bind(&chirp.message)
        .bind(&chirp.image_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save chirp: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete chirp: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn upsert_author(&self, id: Uuid, display_name: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                updated_at = now()
            "#,
        )
        .bind(id)
        .bind(display_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert author: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }
}
