use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::api::foundations::NameQuery;
use crate::api::pets::{
    AgeRangeQuery, AvailableFilterQuery, CreatePetRequest, PetResponse, UpdatePetRequest, UpdatePetStatusRequest,
};
use crate::database::models::{Pet, PetSpecies, PetStatus};
use crate::database::{Page, PageParams};
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{exists_status, ApiResponse, ApiResult};
use crate::repositories::{PetFilter, PetStatistics};
use crate::state::AppState;

async fn list(state: &AppState, filter: PetFilter) -> ApiResult<Vec<PetResponse>> {
    let pets = state.pets().list(&filter).await?;
    Ok(ApiResponse::success(pets.into_iter().map(PetResponse::from).collect()))
}

async fn page(state: &AppState, filter: PetFilter, params: &PageParams) -> ApiResult<Page<PetResponse>> {
    let request = state.page_request::<Pet>(params)?;
    let page = state.pets().page(&filter, &request).await?;
    Ok(ApiResponse::success(page.map(PetResponse::from)))
}

fn of_foundation(foundation_id: Uuid) -> PetFilter {
    PetFilter {
        foundation_id: Some(foundation_id),
        ..Default::default()
    }
}

fn with_status(status: PetStatus) -> PetFilter {
    PetFilter {
        status: Some(status),
        ..Default::default()
    }
}

fn of_species(species: PetSpecies) -> PetFilter {
    PetFilter {
        species: Some(species),
        ..Default::default()
    }
}

fn of_breed(breed: String) -> PetFilter {
    PetFilter {
        breed: Some(breed),
        ..Default::default()
    }
}

fn aged(query: AgeRangeQuery) -> PetFilter {
    PetFilter {
        min_age: query.min_age,
        max_age: query.max_age,
        ..Default::default()
    }
}

fn named(query: NameQuery) -> PetFilter {
    PetFilter {
        name: query.name,
        ..Default::default()
    }
}

fn available(query: AvailableFilterQuery) -> PetFilter {
    PetFilter {
        status: Some(PetStatus::Available),
        species: query.species,
        size: query.size,
        gender: query.gender,
        city: query.city,
        ..Default::default()
    }
}

fn of_foundation_with_status(foundation_id: Uuid, status: PetStatus) -> PetFilter {
    PetFilter {
        foundation_id: Some(foundation_id),
        status: Some(status),
        ..Default::default()
    }
}

pub async fn create(State(state): State<AppState>, ApiJson(request): ApiJson<CreatePetRequest>) -> ApiResult<PetResponse> {
    let pet = state.pets().create(request).await?;
    Ok(ApiResponse::created(pet.into()))
}

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<PetResponse>> {
    list(&state, PetFilter::default()).await
}

pub async fn get_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    page(&state, PetFilter::default(), &params).await
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<PetResponse> {
    let pet = state.pets().get(id).await?;
    Ok(ApiResponse::success(pet.into()))
}

pub async fn head_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    Ok(exists_status(state.pets().exists_by_id(id).await?))
}

/// GET /api/v1/pets/foundation/:foundation_id
pub async fn get_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<Vec<PetResponse>> {
    state.pets().ensure_foundation(foundation_id).await?;
    list(&state, of_foundation(foundation_id)).await
}

pub async fn get_by_foundation_page(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    state.pets().ensure_foundation(foundation_id).await?;
    page(&state, of_foundation(foundation_id), &params).await
}

pub async fn get_by_status(
    State(state): State<AppState>,
    ApiPath(status): ApiPath<PetStatus>,
) -> ApiResult<Vec<PetResponse>> {
    list(&state, with_status(status)).await
}

pub async fn get_by_status_page(
    State(state): State<AppState>,
    ApiPath(status): ApiPath<PetStatus>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    page(&state, with_status(status), &params).await
}

pub async fn get_by_species(
    State(state): State<AppState>,
    ApiPath(species): ApiPath<PetSpecies>,
) -> ApiResult<Vec<PetResponse>> {
    list(&state, of_species(species)).await
}

pub async fn get_by_species_page(
    State(state): State<AppState>,
    ApiPath(species): ApiPath<PetSpecies>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    page(&state, of_species(species), &params).await
}

pub async fn get_by_breed(
    State(state): State<AppState>,
    ApiPath(breed): ApiPath<String>,
) -> ApiResult<Vec<PetResponse>> {
    list(&state, of_breed(breed)).await
}

pub async fn get_by_breed_page(
    State(state): State<AppState>,
    ApiPath(breed): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    page(&state, of_breed(breed), &params).await
}

/// GET /api/v1/pets/age?minAge=&maxAge= - either bound may be omitted
pub async fn get_by_age(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AgeRangeQuery>,
) -> ApiResult<Vec<PetResponse>> {
    list(&state, aged(query)).await
}

pub async fn get_by_age_page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AgeRangeQuery>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    page(&state, aged(query), &params).await
}

pub async fn get_available(State(state): State<AppState>) -> ApiResult<Vec<PetResponse>> {
    list(&state, with_status(PetStatus::Available)).await
}

pub async fn get_available_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    page(&state, with_status(PetStatus::Available), &params).await
}

/// GET /api/v1/pets/available/filter?species=&size=&gender=&city=
pub async fn filter_available(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AvailableFilterQuery>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    page(&state, available(query), &params).await
}

pub async fn search(State(state): State<AppState>, ApiQuery(query): ApiQuery<NameQuery>) -> ApiResult<Vec<PetResponse>> {
    list(&state, named(query)).await
}

pub async fn search_page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    page(&state, named(query), &params).await
}

pub async fn get_by_foundation_and_status(
    State(state): State<AppState>,
    ApiPath((foundation_id, status)): ApiPath<(Uuid, PetStatus)>,
) -> ApiResult<Vec<PetResponse>> {
    state.pets().ensure_foundation(foundation_id).await?;
    list(&state, of_foundation_with_status(foundation_id, status)).await
}

pub async fn get_by_foundation_and_status_page(
    State(state): State<AppState>,
    ApiPath((foundation_id, status)): ApiPath<(Uuid, PetStatus)>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<PetResponse>> {
    state.pets().ensure_foundation(foundation_id).await?;
    page(&state, of_foundation_with_status(foundation_id, status), &params).await
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdatePetRequest>,
) -> ApiResult<PetResponse> {
    let pet = state.pets().update(id, request).await?;
    Ok(ApiResponse::success(pet.into()))
}

pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdatePetStatusRequest>,
) -> ApiResult<PetResponse> {
    let pet = state.pets().set_status(id, request.status).await?;
    Ok(ApiResponse::success(pet.into()))
}

pub async fn mark_adopted(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<PetResponse> {
    let pet = state.pets().set_status(id, PetStatus::Adopted).await?;
    Ok(ApiResponse::success(pet.into()))
}

pub async fn mark_available(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<PetResponse> {
    let pet = state.pets().set_status(id, PetStatus::Available).await?;
    Ok(ApiResponse::success(pet.into()))
}

pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<()> {
    state.pets().delete(id).await?;
    Ok(ApiResponse::no_content())
}

pub async fn count(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.pets().count(&PetFilter::default()).await?))
}

pub async fn count_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<i64> {
    state.pets().ensure_foundation(foundation_id).await?;
    Ok(ApiResponse::success(state.pets().count(&of_foundation(foundation_id)).await?))
}

pub async fn count_by_status(State(state): State<AppState>, ApiPath(status): ApiPath<PetStatus>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.pets().count(&with_status(status)).await?))
}

pub async fn count_by_foundation_and_status(
    State(state): State<AppState>,
    ApiPath((foundation_id, status)): ApiPath<(Uuid, PetStatus)>,
) -> ApiResult<i64> {
    state.pets().ensure_foundation(foundation_id).await?;
    let filter = of_foundation_with_status(foundation_id, status);
    Ok(ApiResponse::success(state.pets().count(&filter).await?))
}

pub async fn count_by_species(
    State(state): State<AppState>,
    ApiPath(species): ApiPath<PetSpecies>,
) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.pets().count(&of_species(species)).await?))
}

pub async fn statistics(State(state): State<AppState>) -> ApiResult<PetStatistics> {
    Ok(ApiResponse::success(state.pets().statistics(&PetFilter::default()).await?))
}

pub async fn statistics_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<PetStatistics> {
    state.pets().ensure_foundation(foundation_id).await?;
    Ok(ApiResponse::success(state.pets().statistics(&of_foundation(foundation_id)).await?))
}
