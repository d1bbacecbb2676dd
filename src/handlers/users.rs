use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::api::auth::MessageResponse;
use crate::api::users::{
    ChangePasswordRequest, CreateUserRequest, ExistsResponse, UpdateProfileRequest, UpdateUserRequest,
    UserResponse,
};
use crate::auth::AuthUser;
use crate::database::models::{Role, User};
use crate::database::{Page, PageParams};
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{exists_status, ApiResponse, ApiResult};
use crate::repositories::{UserFilter, UserStatistics};
use crate::state::AppState;

async fn list(state: &AppState, filter: UserFilter) -> ApiResult<Vec<UserResponse>> {
    let users = state.users().list(&filter).await?;
    Ok(ApiResponse::success(users.into_iter().map(UserResponse::from).collect()))
}

async fn page(state: &AppState, filter: UserFilter, params: &PageParams) -> ApiResult<Page<UserResponse>> {
    let request = state.page_request::<User>(params)?;
    let page = state.users().page(&filter, &request).await?;
    Ok(ApiResponse::success(page.map(UserResponse::from)))
}

fn by_role(role: Role) -> UserFilter {
    UserFilter {
        role: Some(role),
        ..Default::default()
    }
}

fn active_only() -> UserFilter {
    UserFilter {
        active: Some(true),
        ..Default::default()
    }
}

fn by_name(name: String) -> UserFilter {
    UserFilter {
        name: Some(name),
        ..Default::default()
    }
}

/// POST /api/v1/users - administrator creates an account
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    let user = state.users().create(request, Role::User).await?;
    Ok(ApiResponse::created(user.into()))
}

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    list(&state, UserFilter::default()).await
}

pub async fn get_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<UserResponse>> {
    page(&state, UserFilter::default(), &params).await
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<UserResponse> {
    let user = state.users().get(id).await?;
    Ok(ApiResponse::success(user.into()))
}

pub async fn head_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    Ok(exists_status(state.users().exists_by_id(id).await?))
}

pub async fn get_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<UserResponse> {
    let user = state.users().get_by_email(&email).await?;
    Ok(ApiResponse::success(user.into()))
}

pub async fn head_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    Ok(exists_status(state.users().exists_by_email(&email).await?))
}

/// GET /api/v1/users/exists/email/:email
pub async fn exists_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<ExistsResponse> {
    let exists = state.users().exists_by_email(&email).await?;
    Ok(ApiResponse::success(ExistsResponse { exists }))
}

pub async fn get_by_role(State(state): State<AppState>, ApiPath(role): ApiPath<Role>) -> ApiResult<Vec<UserResponse>> {
    list(&state, by_role(role)).await
}

pub async fn get_by_role_page(
    State(state): State<AppState>,
    ApiPath(role): ApiPath<Role>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<UserResponse>> {
    page(&state, by_role(role), &params).await
}

pub async fn get_active(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    list(&state, active_only()).await
}

pub async fn get_active_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<UserResponse>> {
    page(&state, active_only(), &params).await
}

/// GET /api/v1/users/search/:name - substring match on the full name
pub async fn search(State(state): State<AppState>, ApiPath(name): ApiPath<String>) -> ApiResult<Vec<UserResponse>> {
    list(&state, by_name(name)).await
}

pub async fn search_page(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<UserResponse>> {
    page(&state, by_name(name), &params).await
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let user = state.users().update(id, request).await?;
    Ok(ApiResponse::success(user.into()))
}

pub async fn activate(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<UserResponse> {
    let user = state.users().set_active(id, true).await?;
    Ok(ApiResponse::success(user.into()))
}

pub async fn deactivate(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<UserResponse> {
    let user = state.users().set_active(id, false).await?;
    Ok(ApiResponse::success(user.into()))
}

pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<()> {
    state.users().delete(id).await?;
    Ok(ApiResponse::no_content())
}

pub async fn count(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.users().count(&UserFilter::default()).await?))
}

pub async fn count_active(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.users().count(&active_only()).await?))
}

pub async fn count_by_role(State(state): State<AppState>, ApiPath(role): ApiPath<Role>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.users().count(&by_role(role)).await?))
}

pub async fn statistics(State(state): State<AppState>) -> ApiResult<UserStatistics> {
    Ok(ApiResponse::success(state.users().statistics().await?))
}

/// GET /api/v1/users/profile - the caller's own account
pub async fn profile(State(state): State<AppState>, caller: AuthUser) -> ApiResult<UserResponse> {
    let user = state.users().get(caller.id).await?;
    Ok(ApiResponse::success(user.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> ApiResult<UserResponse> {
    let user = state.users().update_profile(caller.id, request).await?;
    Ok(ApiResponse::success(user.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> ApiResult<MessageResponse> {
    state.users().change_password(caller.id, request).await?;
    Ok(ApiResponse::success(MessageResponse::new("Password changed successfully")))
}

/// DELETE /api/v1/users/profile - deactivates rather than deletes
pub async fn deactivate_profile(State(state): State<AppState>, caller: AuthUser) -> ApiResult<MessageResponse> {
    state.users().set_active(caller.id, false).await?;
    Ok(ApiResponse::success(MessageResponse::new("Account deactivated successfully")))
}
