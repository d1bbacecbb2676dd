use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::api::foundations::{CreateFoundationRequest, FoundationResponse, NameQuery, UpdateFoundationRequest};
use crate::api::validation::normalize_email;
use crate::database::models::Foundation;
use crate::database::{Page, PageParams};
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{exists_status, ApiResponse, ApiResult};
use crate::repositories::{FoundationFilter, FoundationOverview, FoundationStatistics};
use crate::state::AppState;

async fn list(state: &AppState, filter: FoundationFilter) -> ApiResult<Vec<FoundationResponse>> {
    let foundations = state.foundations().list(&filter).await?;
    Ok(ApiResponse::success(foundations.into_iter().map(FoundationResponse::from).collect()))
}

async fn page(state: &AppState, filter: FoundationFilter, params: &PageParams) -> ApiResult<Page<FoundationResponse>> {
    let request = state.page_request::<Foundation>(params)?;
    let page = state.foundations().page(&filter, &request).await?;
    Ok(ApiResponse::success(page.map(FoundationResponse::from)))
}

fn in_city(city: String) -> FoundationFilter {
    FoundationFilter {
        city: Some(city),
        ..Default::default()
    }
}

fn in_state(state: String) -> FoundationFilter {
    FoundationFilter {
        state: Some(state),
        ..Default::default()
    }
}

fn verified() -> FoundationFilter {
    FoundationFilter {
        verified: Some(true),
        ..Default::default()
    }
}

fn name_like(query: NameQuery) -> FoundationFilter {
    FoundationFilter {
        name_contains: query.name,
        ..Default::default()
    }
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateFoundationRequest>,
) -> ApiResult<FoundationResponse> {
    let foundation = state.foundations().create(request).await?;
    Ok(ApiResponse::created(foundation.into()))
}

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<FoundationResponse>> {
    list(&state, FoundationFilter::default()).await
}

pub async fn get_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<FoundationResponse>> {
    page(&state, FoundationFilter::default(), &params).await
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<FoundationResponse> {
    let foundation = state.foundations().get(id).await?;
    Ok(ApiResponse::success(foundation.into()))
}

pub async fn head_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    Ok(exists_status(state.foundations().exists_by_id(id).await?))
}

pub async fn get_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<FoundationResponse> {
    let foundation = state.foundations().get_by_name(&name).await?;
    Ok(ApiResponse::success(foundation.into()))
}

pub async fn head_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    let filter = FoundationFilter {
        name: Some(name),
        ..Default::default()
    };
    Ok(exists_status(state.foundations().exists(&filter).await?))
}

pub async fn get_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<FoundationResponse> {
    let foundation = state.foundations().get_by_email(&email).await?;
    Ok(ApiResponse::success(foundation.into()))
}

pub async fn head_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    let filter = FoundationFilter {
        contact_email: Some(normalize_email(&email)),
        ..Default::default()
    };
    Ok(exists_status(state.foundations().exists(&filter).await?))
}

pub async fn get_by_city(
    State(state): State<AppState>,
    ApiPath(city): ApiPath<String>,
) -> ApiResult<Vec<FoundationResponse>> {
    list(&state, in_city(city)).await
}

pub async fn get_by_city_page(
    State(state): State<AppState>,
    ApiPath(city): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<FoundationResponse>> {
    page(&state, in_city(city), &params).await
}

pub async fn get_by_state(
    State(state): State<AppState>,
    ApiPath(region): ApiPath<String>,
) -> ApiResult<Vec<FoundationResponse>> {
    list(&state, in_state(region)).await
}

pub async fn get_by_state_page(
    State(state): State<AppState>,
    ApiPath(region): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<FoundationResponse>> {
    page(&state, in_state(region), &params).await
}

/// GET /api/v1/foundations/active - verified foundations
pub async fn get_active(State(state): State<AppState>) -> ApiResult<Vec<FoundationResponse>> {
    list(&state, verified()).await
}

pub async fn get_active_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<FoundationResponse>> {
    page(&state, verified(), &params).await
}

/// GET /api/v1/foundations/search?name=
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> ApiResult<Vec<FoundationResponse>> {
    list(&state, name_like(query)).await
}

pub async fn search_page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<FoundationResponse>> {
    page(&state, name_like(query), &params).await
}

pub async fn get_with_available_pets(State(state): State<AppState>) -> ApiResult<Vec<FoundationResponse>> {
    let filter = FoundationFilter {
        with_available_pets: true,
        ..Default::default()
    };
    list(&state, filter).await
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateFoundationRequest>,
) -> ApiResult<FoundationResponse> {
    let foundation = state.foundations().update(id, request).await?;
    Ok(ApiResponse::success(foundation.into()))
}

/// PUT /api/v1/foundations/:id/activate - marks the foundation verified
pub async fn activate(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<FoundationResponse> {
    let foundation = state.foundations().set_verified(id, true).await?;
    Ok(ApiResponse::success(foundation.into()))
}

pub async fn deactivate(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<FoundationResponse> {
    let foundation = state.foundations().set_verified(id, false).await?;
    Ok(ApiResponse::success(foundation.into()))
}

pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<()> {
    state.foundations().delete(id).await?;
    Ok(ApiResponse::no_content())
}

pub async fn count(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.foundations().count(&FoundationFilter::default()).await?))
}

pub async fn count_active(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.foundations().count(&verified()).await?))
}

pub async fn count_by_city(State(state): State<AppState>, ApiPath(city): ApiPath<String>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.foundations().count(&in_city(city)).await?))
}

pub async fn count_by_state(State(state): State<AppState>, ApiPath(region): ApiPath<String>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.foundations().count(&in_state(region)).await?))
}

pub async fn overview(State(state): State<AppState>) -> ApiResult<FoundationOverview> {
    Ok(ApiResponse::success(state.foundations().overview().await?))
}

/// GET /api/v1/foundations/:id/statistics
pub async fn statistics(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<FoundationStatistics> {
    Ok(ApiResponse::success(state.foundations().statistics(id).await?))
}
