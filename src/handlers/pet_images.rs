use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::api::pet_images::{CreatePetImageRequest, PetImageResponse, UpdatePetImageRequest, UrlQuery};
use crate::database::models::PetImage;
use crate::database::{Page, PageParams};
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{exists_status, ApiResponse, ApiResult};
use crate::repositories::{PetImageFilter, PetImageStatistics};
use crate::state::AppState;

async fn list(state: &AppState, filter: PetImageFilter) -> ApiResult<Vec<PetImageResponse>> {
    let images = state.pet_images().list(&filter).await?;
    Ok(ApiResponse::success(images.into_iter().map(PetImageResponse::from).collect()))
}

async fn page(state: &AppState, filter: PetImageFilter, params: &PageParams) -> ApiResult<Page<PetImageResponse>> {
    let request = state.page_request::<PetImage>(params)?;
    let page = state.pet_images().page(&filter, &request).await?;
    Ok(ApiResponse::success(page.map(PetImageResponse::from)))
}

fn secondary(pet_id: Uuid) -> PetImageFilter {
    PetImageFilter {
        is_primary: Some(false),
        ..PetImageFilter::for_pet(pet_id)
    }
}

fn url_like(query: UrlQuery) -> PetImageFilter {
    PetImageFilter {
        url: query.url,
        ..Default::default()
    }
}

/// POST /api/v1/pet-images - a primary image demotes the pet's current one
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePetImageRequest>,
) -> ApiResult<PetImageResponse> {
    let image = state.pet_images().create(request).await?;
    Ok(ApiResponse::created(image.into()))
}

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<PetImageResponse>> {
    list(&state, PetImageFilter::default()).await
}

pub async fn get_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetImageResponse>> {
    page(&state, PetImageFilter::default(), &params).await
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<PetImageResponse> {
    let image = state.pet_images().get(id).await?;
    Ok(ApiResponse::success(image.into()))
}

pub async fn head_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    Ok(exists_status(state.pet_images().exists_by_id(id).await?))
}

pub async fn get_by_pet(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
) -> ApiResult<Vec<PetImageResponse>> {
    state.pet_images().ensure_pet(pet_id).await?;
    list(&state, PetImageFilter::for_pet(pet_id)).await
}

pub async fn get_by_pet_page(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetImageResponse>> {
    state.pet_images().ensure_pet(pet_id).await?;
    page(&state, PetImageFilter::for_pet(pet_id), &params).await
}

/// GET /api/v1/pet-images/pet/:pet_id/primary - 404 when the pet has none
pub async fn get_primary(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
) -> ApiResult<PetImageResponse> {
    state.pet_images().ensure_pet(pet_id).await?;
    let image = state.pet_images().primary_for(pet_id).await?;
    Ok(ApiResponse::success(image.into()))
}

pub async fn head_has_primary(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    Ok(exists_status(state.pet_images().has_primary(pet_id).await?))
}

pub async fn get_secondary(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
) -> ApiResult<Vec<PetImageResponse>> {
    state.pet_images().ensure_pet(pet_id).await?;
    list(&state, secondary(pet_id)).await
}

pub async fn get_secondary_page(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetImageResponse>> {
    state.pet_images().ensure_pet(pet_id).await?;
    page(&state, secondary(pet_id), &params).await
}

pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UrlQuery>,
) -> ApiResult<Vec<PetImageResponse>> {
    list(&state, url_like(query)).await
}

pub async fn search_page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UrlQuery>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetImageResponse>> {
    page(&state, url_like(query), &params).await
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdatePetImageRequest>,
) -> ApiResult<PetImageResponse> {
    let image = state.pet_images().update(id, request).await?;
    Ok(ApiResponse::success(image.into()))
}

pub async fn set_primary(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<PetImageResponse> {
    let image = state.pet_images().set_primary(id).await?;
    Ok(ApiResponse::success(image.into()))
}

pub async fn remove_primary(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<PetImageResponse> {
    let image = state.pet_images().remove_primary(id).await?;
    Ok(ApiResponse::success(image.into()))
}

pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<()> {
    state.pet_images().delete(id).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /api/v1/pet-images/pet/:pet_id - removes every image of the pet
pub async fn delete_by_pet(State(state): State<AppState>, ApiPath(pet_id): ApiPath<Uuid>) -> ApiResult<()> {
    state.pet_images().delete_for_pet(pet_id).await?;
    Ok(ApiResponse::no_content())
}

pub async fn count(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.pet_images().count(&PetImageFilter::default()).await?))
}

pub async fn count_by_pet(State(state): State<AppState>, ApiPath(pet_id): ApiPath<Uuid>) -> ApiResult<i64> {
    state.pet_images().ensure_pet(pet_id).await?;
    Ok(ApiResponse::success(state.pet_images().count(&PetImageFilter::for_pet(pet_id)).await?))
}

pub async fn statistics(State(state): State<AppState>) -> ApiResult<PetImageStatistics> {
    Ok(ApiResponse::success(state.pet_images().statistics(&PetImageFilter::default()).await?))
}

pub async fn statistics_by_pet(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
) -> ApiResult<PetImageStatistics> {
    state.pet_images().ensure_pet(pet_id).await?;
    let filter = PetImageFilter::for_pet(pet_id);
    Ok(ApiResponse::success(state.pet_images().statistics(&filter).await?))
}
