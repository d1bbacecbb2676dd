use axum::extract::State;

use crate::api::auth::{JwtAuthenticationResponse, LoginRequest, MessageResponse};
use crate::api::users::RegisterRequest;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::handlers::extract::ApiJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const REGISTERED: &str = "User registered successfully!";

/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed access token", body = JwtAuthenticationResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<JwtAuthenticationResponse> {
    let issued = state.auth().login(request).await?;
    Ok(ApiResponse::success(JwtAuthenticationResponse::bearer(issued.token, issued.expires_in)))
}

/// POST /api/v1/auth/register - also served at /api/v1/users/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created with role USER", body = MessageResponse),
        (status = 400, description = "Validation failed or email already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<MessageResponse> {
    register_as(&state, request, Role::User).await
}

/// POST /api/v1/auth/register/foundation
#[utoipa::path(
    post,
    path = "/api/v1/auth/register/foundation",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created with role FOUNDATION_ADMIN", body = MessageResponse),
        (status = 400, description = "Validation failed or email already taken")
    )
)]
pub async fn register_foundation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<MessageResponse> {
    register_as(&state, request, Role::FoundationAdmin).await
}

async fn register_as(state: &AppState, request: RegisterRequest, role: Role) -> Result<ApiResponse<MessageResponse>, ApiError> {
    state.auth().register(request, role).await?;
    Ok(ApiResponse::success(MessageResponse::new(REGISTERED)))
}
