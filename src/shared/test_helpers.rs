//! In-memory doubles and identity plumbing for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::chirps::models::{Chirp, ChirpWithAuthor};
use crate::features::chirps::repositories::ChirpRepository;
use crate::modules::storage::ContentStore;

pub fn test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap(),
        display_name: "Jane Tester".to_string(),
    }
}

pub fn other_test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::parse_str("22222222-2222-2222-2222-222222222222").unwrap(),
        display_name: "Sam Rival".to_string(),
    }
}

/// Wrap a router with a layer that injects `user` as the caller identity,
/// standing in for the gateway-facing identity middleware.
pub fn with_identity(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

/// In-memory [`ChirpRepository`] with DB-like timestamp handling
pub struct InMemoryChirpRepository {
    chirps: Mutex<Vec<Chirp>>,
    authors: Mutex<HashMap<Uuid, String>>,
}

impl InMemoryChirpRepository {
    pub fn new() -> Self {
        Self {
            chirps: Mutex::new(Vec::new()),
            authors: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Chirp> {
        self.chirps.lock().unwrap().iter().find(|c| c.id == id).cloned()
    }

    pub fn chirp_count(&self) -> usize {
        self.chirps.lock().unwrap().len()
    }
}

#[async_trait]
impl ChirpRepository for InMemoryChirpRepository {
    async fn list_with_authors(&self) -> Result<Vec<ChirpWithAuthor>> {
        let authors = self.authors.lock().unwrap();
        let mut chirps: Vec<ChirpWithAuthor> = self
            .chirps
            .lock()
            .unwrap()
            .iter()
            .map(|c| ChirpWithAuthor {
                id: c.id,
                user_id: c.user_id,
                message: c.message.clone(),
                image_path: c.image_path.clone(),
                created_at: c.created_at,
                updated_at: c.updated_at,
                author_name: authors.get(&c.user_id).cloned(),
            })
            .collect();
        chirps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(chirps)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chirp>> {
        Ok(self.get(id))
    }

    async fn save(&self, chirp: &Chirp) -> Result<Chirp> {
        let mut chirps = self.chirps.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = chirps.iter_mut().find(|c| c.id == chirp.id) {
            existing.message = chirp.message.clone();
            existing.image_path = chirp.image_path.clone();
            existing.updated_at = now;
            Ok(existing.clone())
        } else {
            // The database owns the timestamps on insert
            let mut stored = chirp.clone();
            stored.created_at = now;
            stored.updated_at = now;
            chirps.push(stored.clone());
            Ok(stored)
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.chirps.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn upsert_author(&self, id: Uuid, display_name: &str) -> Result<()> {
        self.authors
            .lock()
            .unwrap()
            .insert(id, display_name.to_string());
        Ok(())
    }
}

/// In-memory [`ContentStore`] that can be told to fail deletes
pub struct InMemoryContentStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_deletes: AtomicBool,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Make subsequent deletes fail, to exercise best-effort cleanup paths
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Internal(format!(
                "store unavailable, cannot delete '{}'",
                key
            )));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("mem://{}", key)
    }
}
