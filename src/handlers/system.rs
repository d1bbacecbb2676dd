use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use tracing::error;

use crate::database::manager::DatabaseManager;
use crate::state::AppState;

const SERVICE_NAME: &str = "PetFriendly API";

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Pet adoption platform backend: foundations, pets, adoption requests",
            "endpoints": {
                "auth": "/api/v1/auth/* (public)",
                "users": "/api/v1/users/*",
                "foundations": "/api/v1/foundations/*",
                "pets": "/api/v1/pets/*",
                "pet_images": "/api/v1/pet-images/*",
                "adoption_requests": "/api/v1/adoption-requests/*",
                "contact_messages": "/api/v1/contact-messages/*",
                "health": "/actuator/health (public)",
                "docs": "/swagger-ui, /v3/api-docs (public)",
            }
        }
    }))
}

/// GET /actuator/health - 503 when the database does not answer
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match DatabaseManager::health_check(state.pool()).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "UP", "database": "UP" }))),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "DOWN", "database": "DOWN" })),
            )
        }
    }
}

/// GET /actuator/info
pub async fn info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config().environment.as_str(),
    }))
}
