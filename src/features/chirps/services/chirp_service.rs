use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::chirps::dtos::{image_extension, ChirpPayload, ChirpResponseDto, NewImage};
use crate::features::chirps::models::{Chirp, ChirpWithAuthor};
use crate::features::chirps::repositories::ChirpRepository;
use crate::modules::storage::ContentStore;

/// Content store namespace for chirp images
const IMAGE_NAMESPACE: &str = "chirps";

/// Decides whether `actor` may mutate `chirp`.
pub type ModifyPolicy = fn(&AuthenticatedUser, &Chirp) -> bool;

/// Default policy: only the chirp's author may mutate it.
pub fn owner_only(actor: &AuthenticatedUser, chirp: &Chirp) -> bool {
    actor.id == chirp.user_id
}

/// Service for chirp operations
pub struct ChirpService {
    repository: Arc<dyn ChirpRepository>,
    store: Arc<dyn ContentStore>,
    can_modify: ModifyPolicy,
}

impl ChirpService {
    pub fn new(
        repository: Arc<dyn ChirpRepository>,
        store: Arc<dyn ContentStore>,
        can_modify: ModifyPolicy,
    ) -> Self {
        Self {
            repository,
            store,
            can_modify,
        }
    }

    /// List all chirps, newest first, with author display names attached
    pub async fn list(&self) -> Result<Vec<ChirpResponseDto>> {
        let chirps = self.repository.list_with_authors().await?;
        Ok(chirps.into_iter().map(|c| self.joined_response(c)).collect())
    }

    /// Create a new chirp owned by `actor`
    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        payload: ChirpPayload,
    ) -> Result<ChirpResponseDto> {
        payload.validate_fields()?;

        // Mirror the author row so the list join can resolve the display name
        self.repository
            .upsert_author(actor.id, &actor.display_name)
            .await?;

        let image_path = match payload.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            user_id: actor.id,
            message: payload.message,
            image_path,
            created_at: now,
            updated_at: now,
        };

        let saved = self.repository.save(&chirp).await?;

        info!("Chirp created: id={}, user_id={}", saved.id, saved.user_id);

        Ok(self.owned_response(saved, Some(actor.display_name.clone())))
    }

    /// Update an existing chirp; owner-only
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        chirp_id: Uuid,
        payload: ChirpPayload,
    ) -> Result<ChirpResponseDto> {
        let mut chirp = self
            .repository
            .find_by_id(chirp_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chirp not found".to_string()))?;

        if !(self.can_modify)(actor, &chirp) {
            return Err(AppError::Forbidden(
                "You are not allowed to modify this chirp".to_string(),
            ));
        }

        payload.validate_fields()?;

        if let Some(image) = payload.image {
            // Replacing the image discards the old object first. The discard
            // is best-effort: a failed delete never blocks the update.
            if let Some(old_path) = chirp.image_path.take() {
                self.discard_image(&old_path).await;
            }
            chirp.image_path = Some(self.store_image(image).await?);
        }
        chirp.message = payload.message;

        let saved = self.repository.save(&chirp).await?;

        info!("Chirp updated: id={}, user_id={}", saved.id, saved.user_id);

        Ok(self.owned_response(saved, Some(actor.display_name.clone())))
    }

    /// Delete a chirp and its stored image; owner-only
    ///
    /// Image first, then the record; a failed image delete never blocks
    /// record deletion.
    pub async fn delete(&self, actor: &AuthenticatedUser, chirp_id: Uuid) -> Result<()> {
        let chirp = self
            .repository
            .find_by_id(chirp_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chirp not found".to_string()))?;

        if !(self.can_modify)(actor, &chirp) {
            return Err(AppError::Forbidden(
                "You are not allowed to modify this chirp".to_string(),
            ));
        }

        if let Some(path) = &chirp.image_path {
            self.discard_image(path).await;
        }

        self.repository.delete(chirp.id).await?;

        info!("Chirp deleted: id={}, user_id={}", chirp.id, chirp.user_id);

        Ok(())
    }

    /// Store a validated image under the chirps namespace
    async fn store_image(&self, image: NewImage) -> Result<String> {
        // Validation guarantees an allowed type, but fall back defensively
        let extension = image_extension(&image.content_type).unwrap_or("bin");
        let key = format!("{}/{}.{}", IMAGE_NAMESPACE, Uuid::new_v4(), extension);
        self.store.put(&key, image.data, &image.content_type).await
    }

    /// Best-effort image removal; failure is logged and swallowed
    async fn discard_image(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            warn!("Failed to delete stored image '{}': {}", key, e);
        }
    }

    fn owned_response(&self, chirp: Chirp, author_name: Option<String>) -> ChirpResponseDto {
        ChirpResponseDto {
            image_url: chirp.image_path.as_deref().map(|k| self.store.public_url(k)),
            id: chirp.id,
            user_id: chirp.user_id,
            author_name,
            message: chirp.message,
            image_path: chirp.image_path,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
        }
    }

    fn joined_response(&self, chirp: ChirpWithAuthor) -> ChirpResponseDto {
        ChirpResponseDto {
            image_url: chirp.image_path.as_deref().map(|k| self.store.public_url(k)),
            id: chirp.id,
            user_id: chirp.user_id,
            author_name: chirp.author_name,
            message: chirp.message,
            image_path: chirp.image_path,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
        }
    }
}
