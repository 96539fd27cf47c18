use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::chirps::{dtos as chirps_dtos, handlers as chirps_handlers};
use crate::shared::types::Meta;

#[derive(OpenApi)]
#[openapi(
    paths(
        chirps_handlers::chirp_handler::list_chirps,
        chirps_handlers::chirp_handler::create_chirp,
        chirps_handlers::chirp_handler::update_chirp,
        chirps_handlers::chirp_handler::delete_chirp,
    ),
    components(schemas(
        chirps_dtos::ChirpFormDto,
        chirps_dtos::ChirpResponseDto,
        chirps_dtos::DeleteChirpResponseDto,
        Meta,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "chirps", description = "Create, list, update and delete chirps")
    )
)]
pub struct ApiDoc;

/// Documents the gateway-provided identity headers as an API key scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "identity_headers",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-user-id"))),
            );
        }
    }
}

/// Applies runtime swagger configuration (title, version, description)
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
