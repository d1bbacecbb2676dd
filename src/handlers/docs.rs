use axum::{response::Html, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::adoption_requests::{
    AdoptionRequestResponse, CreateAdoptionRequestRequest, ReviewRequest, UpdateAdoptionRequestRequest,
};
use crate::api::auth::{JwtAuthenticationResponse, LoginRequest, MessageResponse};
use crate::api::contact_messages::{ContactMessageResponse, CreateContactMessageRequest, UpdateContactMessageRequest};
use crate::api::foundations::{CreateFoundationRequest, FoundationResponse, UpdateFoundationRequest};
use crate::api::pet_images::{CreatePetImageRequest, PetImageResponse, UpdatePetImageRequest};
use crate::api::pets::{CreatePetRequest, PetResponse, UpdatePetRequest, UpdatePetStatusRequest};
use crate::api::users::{
    ChangePasswordRequest, CreateUserRequest, ExistsResponse, RegisterRequest, UpdateProfileRequest,
    UpdateUserRequest, UserResponse,
};
use crate::database::models::{AdoptionRequestStatus, PetGender, PetSize, PetSpecies, PetStatus, Role};
use crate::handlers::{adoption_requests, auth, contact_messages};
use crate::repositories::{
    AdoptionStatistics, ContactMessageStatistics, FoundationOverview, FoundationStatistics, PetImageStatistics,
    PetStatistics, UserStatistics,
};

pub const BEARER_SCHEME: &str = "bearerAuth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PetFriendly API",
        description = "Pet adoption platform: foundations, pets, images, adoption requests and contact messages"
    ),
    paths(
        auth::login,
        auth::register,
        auth::register_foundation,
        adoption_requests::create,
        adoption_requests::get_by_id,
        adoption_requests::update_status,
        adoption_requests::approve,
        adoption_requests::reject,
        adoption_requests::cancel,
        contact_messages::create,
    ),
    components(schemas(
        LoginRequest,
        JwtAuthenticationResponse,
        MessageResponse,
        RegisterRequest,
        CreateUserRequest,
        UpdateUserRequest,
        UpdateProfileRequest,
        ChangePasswordRequest,
        UserResponse,
        ExistsResponse,
        UserStatistics,
        CreateFoundationRequest,
        UpdateFoundationRequest,
        FoundationResponse,
        FoundationStatistics,
        FoundationOverview,
        CreatePetRequest,
        UpdatePetRequest,
        UpdatePetStatusRequest,
        PetResponse,
        PetStatistics,
        CreatePetImageRequest,
        UpdatePetImageRequest,
        PetImageResponse,
        PetImageStatistics,
        CreateAdoptionRequestRequest,
        UpdateAdoptionRequestRequest,
        ReviewRequest,
        AdoptionRequestResponse,
        AdoptionStatistics,
        CreateContactMessageRequest,
        UpdateContactMessageRequest,
        ContactMessageResponse,
        ContactMessageStatistics,
        Role,
        PetSpecies,
        PetGender,
        PetSize,
        PetStatus,
        AdoptionRequestStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and registration"),
        (name = "adoption-requests", description = "Adoption request lifecycle"),
        (name = "contact-messages", description = "Messages sent to foundations")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                BEARER_SCHEME,
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// GET /v3/api-docs
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

const SWAGGER_UI: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>PetFriendly API - Swagger UI</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: '/v3/api-docs', dom_id: '#swagger-ui', persistAuthorization: true });
    };
  </script>
</body>
</html>
"#;

/// GET /swagger-ui
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_declares_bearer_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(doc["components"]["securitySchemes"][BEARER_SCHEME]["scheme"], "bearer");
        assert!(doc["paths"]["/api/v1/adoption-requests/{id}/approve"]["put"].is_object());
        assert!(doc["paths"]["/api/v1/auth/login"]["post"].is_object());
    }
}
