use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::features::chirps::dtos::MAX_IMAGE_SIZE;
use crate::features::chirps::handlers::{create_chirp, delete_chirp, list_chirps, update_chirp};
use crate::features::chirps::services::ChirpService;

/// Create routes for the chirps feature
pub fn routes(chirp_service: Arc<ChirpService>) -> Router {
    Router::new()
        .route("/api/chirps", get(list_chirps).post(create_chirp))
        .route(
            "/api/chirps/{id}",
            delete(delete_chirp).put(update_chirp).patch(update_chirp),
        )
        // Allow body size up to the image cap plus multipart overhead
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024))
        .with_state(chirp_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::identity_middleware;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::chirps::repositories::ChirpRepository;
    use crate::features::chirps::services::owner_only;
    use crate::modules::storage::ContentStore;
    use crate::shared::test_helpers::{
        other_test_user, test_user, with_identity, InMemoryChirpRepository, InMemoryContentStore,
    };
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;

    fn shared_service() -> Arc<ChirpService> {
        let repository = Arc::new(InMemoryChirpRepository::new());
        let store = Arc::new(InMemoryContentStore::new());
        Arc::new(ChirpService::new(
            repository as Arc<dyn ChirpRepository>,
            store as Arc<dyn ContentStore>,
            owner_only,
        ))
    }

    fn server_as(service: Arc<ChirpService>, user: AuthenticatedUser) -> TestServer {
        TestServer::new(with_identity(routes(service), user)).unwrap()
    }

    fn text_form(message: &str) -> MultipartForm {
        MultipartForm::new().add_text("message", message)
    }

    fn image_form(message: &str) -> MultipartForm {
        MultipartForm::new().add_text("message", message).add_part(
            "image",
            Part::bytes(vec![0u8; 64])
                .file_name("a.png")
                .mime_type("image/png"),
        )
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let server = server_as(shared_service(), test_user());

        let response = server.post("/api/chirps").multipart(text_form("hello")).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Chirp created successfully.");
        assert_eq!(body["data"]["message"], "hello");
        assert_eq!(body["data"]["image_path"], Value::Null);

        let list = server.get("/api/chirps").await;
        list.assert_status_ok();
        let body: Value = list.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["author_name"], "Jane Tester");
    }

    #[tokio::test]
    async fn test_create_with_image() {
        let server = server_as(shared_service(), test_user());

        let response = server.post("/api/chirps").multipart(image_form("pic!")).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        let path = body["data"]["image_path"].as_str().unwrap();
        assert!(path.starts_with("chirps/"));
        assert_eq!(
            body["data"]["image_url"].as_str().unwrap(),
            format!("mem://{}", path)
        );
    }

    #[tokio::test]
    async fn test_create_rejects_long_message() {
        let server = server_as(shared_service(), test_user());

        let response = server
            .post("/api/chirps")
            .multipart(text_form(&"a".repeat(256)))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["errors"][0].as_str().unwrap().starts_with("message:"));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_rejected() {
        let service = shared_service();
        let owner = server_as(Arc::clone(&service), test_user());
        let intruder = server_as(service, other_test_user());

        let created: Value = owner
            .post("/api/chirps")
            .multipart(text_form("hello"))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = intruder
            .put(&format!("/api/chirps/{}", id))
            .multipart(text_form("hijacked"))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        // Record unchanged
        let list: Value = owner.get("/api/chirps").await.json();
        assert_eq!(list["data"][0]["message"], "hello");
    }

    #[tokio::test]
    async fn test_update_via_patch() {
        let server = server_as(shared_service(), test_user());

        let created: Value = server
            .post("/api/chirps")
            .multipart(text_form("hello"))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = server
            .patch(&format!("/api/chirps/{}", id))
            .multipart(text_form("hi again"))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["message"], "Chirp updated successfully.");
        assert_eq!(body["data"]["message"], "hi again");
    }

    #[tokio::test]
    async fn test_delete() {
        let server = server_as(shared_service(), test_user());

        let created: Value = server
            .post("/api/chirps")
            .multipart(image_form("pic"))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = server.delete(&format!("/api/chirps/{}", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["deleted"], true);

        let list: Value = server.get("/api/chirps").await.json();
        assert_eq!(list["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_requires_identity_headers() {
        // Use the real identity middleware rather than the test injector
        let app = routes(shared_service())
            .route_layer(axum::middleware::from_fn(identity_middleware));
        let server = TestServer::new(app).unwrap();

        let user_id = HeaderName::from_static("x-user-id");
        let user_name = HeaderName::from_static("x-user-name");

        let response = server.get("/api/chirps").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .get("/api/chirps")
            .add_header(user_id.clone(), HeaderValue::from_static("not-a-uuid"))
            .add_header(user_name.clone(), HeaderValue::from_static("Jane"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .get("/api/chirps")
            .add_header(
                user_id,
                HeaderValue::from_static("11111111-1111-1111-1111-111111111111"),
            )
            .add_header(user_name, HeaderValue::from_static("Jane"))
            .await;
        response.assert_status_ok();
    }
}
