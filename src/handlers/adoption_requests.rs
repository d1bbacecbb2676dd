use axum::{body::Bytes, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::api::adoption_requests::{
    AdoptionRequestResponse, CreateAdoptionRequestRequest, ReviewRequest, StatusQuery, UpdateAdoptionRequestRequest,
};
use crate::auth::AuthUser;
use crate::database::models::{AdoptionRequest, AdoptionRequestStatus};
use crate::database::{Page, PageParams};
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{exists_status, ApiResponse, ApiResult};
use crate::repositories::{AdoptionRequestFilter, AdoptionStatistics};
use crate::state::AppState;

async fn list(state: &AppState, filter: AdoptionRequestFilter) -> ApiResult<Vec<AdoptionRequestResponse>> {
    let requests = state.adoption_requests().list(&filter).await?;
    Ok(ApiResponse::success(requests.into_iter().map(AdoptionRequestResponse::from).collect()))
}

async fn page(
    state: &AppState,
    filter: AdoptionRequestFilter,
    params: &PageParams,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    let request = state.page_request::<AdoptionRequest>(params)?;
    let page = state.adoption_requests().page(&filter, &request).await?;
    Ok(ApiResponse::success(page.map(AdoptionRequestResponse::from)))
}

/// Users may only look at their own requests; staff see everyone's.
fn ensure_owner_or_staff(caller: &AuthUser, user_id: Uuid) -> Result<(), ApiError> {
    if caller.can_act_for(user_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("You can only access your own adoption requests"))
    }
}

fn filter(
    user_id: Option<Uuid>,
    pet_id: Option<Uuid>,
    status: Option<AdoptionRequestStatus>,
) -> AdoptionRequestFilter {
    AdoptionRequestFilter {
        user_id,
        pet_id,
        status,
        ..Default::default()
    }
}

/// Optional `{notes}` body for approve and reject. An empty body means no notes.
fn review_notes(body: &Bytes) -> Result<Option<String>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<ReviewRequest>(body)
        .map(|review| review.notes)
        .map_err(|e| ApiError::bad_request(format!("Invalid review body: {}", e)))
}

/// POST /api/v1/adoption-requests
#[utoipa::path(
    post,
    path = "/api/v1/adoption-requests",
    tag = "adoption-requests",
    request_body = CreateAdoptionRequestRequest,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Request created in PENDING", body = AdoptionRequestResponse),
        (status = 404, description = "Pet not found"),
        (status = 409, description = "The caller already has a request for this pet")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(request): ApiJson<CreateAdoptionRequestRequest>,
) -> ApiResult<AdoptionRequestResponse> {
    let created = state.adoption_requests().create(caller.id, request).await?;
    Ok(ApiResponse::created(created.into()))
}

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<AdoptionRequestResponse>> {
    list(&state, AdoptionRequestFilter::default()).await
}

pub async fn get_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    page(&state, AdoptionRequestFilter::default(), &params).await
}

#[utoipa::path(
    get,
    path = "/api/v1/adoption-requests/{id}",
    tag = "adoption-requests",
    params(("id" = Uuid, Path, description = "Adoption request id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, body = AdoptionRequestResponse),
        (status = 404, description = "Adoption request not found")
    )
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<AdoptionRequestResponse> {
    let request = state.adoption_requests().get(id).await?;
    Ok(ApiResponse::success(request.into()))
}

pub async fn head_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    Ok(exists_status(state.adoption_requests().exists_by_id(id).await?))
}

/// HEAD /api/v1/adoption-requests/user/:user_id/pet/:pet_id
pub async fn head_user_pet(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath((user_id, pet_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ensure_owner_or_staff(&caller, user_id)?;
    Ok(exists_status(state.adoption_requests().exists_for(user_id, pet_id).await?))
}

pub async fn get_by_user(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> ApiResult<Vec<AdoptionRequestResponse>> {
    ensure_owner_or_staff(&caller, user_id)?;
    list(&state, filter(Some(user_id), None, None)).await
}

pub async fn get_by_user_page(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    ensure_owner_or_staff(&caller, user_id)?;
    page(&state, filter(Some(user_id), None, None), &params).await
}

pub async fn get_by_pet(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
) -> ApiResult<Vec<AdoptionRequestResponse>> {
    state.adoption_requests().ensure_pet(pet_id).await?;
    list(&state, filter(None, Some(pet_id), None)).await
}

pub async fn get_by_pet_page(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    state.adoption_requests().ensure_pet(pet_id).await?;
    page(&state, filter(None, Some(pet_id), None), &params).await
}

pub async fn get_by_status(
    State(state): State<AppState>,
    ApiPath(status): ApiPath<AdoptionRequestStatus>,
) -> ApiResult<Vec<AdoptionRequestResponse>> {
    list(&state, filter(None, None, Some(status))).await
}

pub async fn get_by_status_page(
    State(state): State<AppState>,
    ApiPath(status): ApiPath<AdoptionRequestStatus>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    page(&state, filter(None, None, Some(status)), &params).await
}

pub async fn get_by_user_and_status(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath((user_id, status)): ApiPath<(Uuid, AdoptionRequestStatus)>,
) -> ApiResult<Vec<AdoptionRequestResponse>> {
    ensure_owner_or_staff(&caller, user_id)?;
    list(&state, filter(Some(user_id), None, Some(status))).await
}

pub async fn get_by_user_and_status_page(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath((user_id, status)): ApiPath<(Uuid, AdoptionRequestStatus)>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    ensure_owner_or_staff(&caller, user_id)?;
    page(&state, filter(Some(user_id), None, Some(status)), &params).await
}

pub async fn get_by_pet_and_status(
    State(state): State<AppState>,
    ApiPath((pet_id, status)): ApiPath<(Uuid, AdoptionRequestStatus)>,
) -> ApiResult<Vec<AdoptionRequestResponse>> {
    state.adoption_requests().ensure_pet(pet_id).await?;
    list(&state, filter(None, Some(pet_id), Some(status))).await
}

pub async fn get_by_pet_and_status_page(
    State(state): State<AppState>,
    ApiPath((pet_id, status)): ApiPath<(Uuid, AdoptionRequestStatus)>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    state.adoption_requests().ensure_pet(pet_id).await?;
    page(&state, filter(None, Some(pet_id), Some(status)), &params).await
}

/// GET /api/v1/adoption-requests/foundation/:foundation_id/pending - requests
/// awaiting review for any pet of the foundation
pub async fn get_pending_for_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    let filter = AdoptionRequestFilter {
        status: Some(AdoptionRequestStatus::Pending),
        foundation_id: Some(foundation_id),
        ..Default::default()
    };
    page(&state, filter, &params).await
}

/// GET /api/v1/adoption-requests/recent - always newest first
pub async fn get_recent(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<AdoptionRequestResponse>> {
    let params = PageParams { sort: None, ..params };
    page(&state, AdoptionRequestFilter::default(), &params).await
}

/// PUT /api/v1/adoption-requests/:id - applicant edits message fields
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateAdoptionRequestRequest>,
) -> ApiResult<AdoptionRequestResponse> {
    let updated = state.adoption_requests().update(id, request, caller).await?;
    Ok(ApiResponse::success(updated.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/adoption-requests/{id}/status",
    tag = "adoption-requests",
    params(
        ("id" = Uuid, Path, description = "Adoption request id"),
        ("status" = AdoptionRequestStatus, Query, description = "Target status")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, body = AdoptionRequestResponse),
        (status = 404, description = "Adoption request not found"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<AdoptionRequestResponse> {
    let updated = state.adoption_requests().update_status(id, query.status).await?;
    Ok(ApiResponse::success(updated.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/adoption-requests/{id}/approve",
    tag = "adoption-requests",
    params(("id" = Uuid, Path, description = "Adoption request id")),
    request_body(content = ReviewRequest, description = "Optional review notes"),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "APPROVED with reviewedAt set", body = AdoptionRequestResponse),
        (status = 409, description = "Request is no longer PENDING")
    )
)]
pub async fn approve(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> ApiResult<AdoptionRequestResponse> {
    let notes = review_notes(&body)?;
    let updated = state.adoption_requests().approve(id, notes).await?;
    Ok(ApiResponse::success(updated.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/adoption-requests/{id}/reject",
    tag = "adoption-requests",
    params(("id" = Uuid, Path, description = "Adoption request id")),
    request_body(content = ReviewRequest, description = "Optional review notes"),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "REJECTED with reviewedAt set", body = AdoptionRequestResponse),
        (status = 409, description = "Request is no longer PENDING")
    )
)]
pub async fn reject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> ApiResult<AdoptionRequestResponse> {
    let notes = review_notes(&body)?;
    let updated = state.adoption_requests().reject(id, notes).await?;
    Ok(ApiResponse::success(updated.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/adoption-requests/{id}/cancel",
    tag = "adoption-requests",
    params(("id" = Uuid, Path, description = "Adoption request id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "CANCELLED with the note \"Cancelled by user\"", body = AdoptionRequestResponse),
        (status = 403, description = "Caller does not own the request"),
        (status = 409, description = "Request is no longer PENDING")
    )
)]
pub async fn cancel(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<AdoptionRequestResponse> {
    let updated = state.adoption_requests().cancel(id, caller).await?;
    Ok(ApiResponse::success(updated.into()))
}

pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<()> {
    state.adoption_requests().delete(id).await?;
    Ok(ApiResponse::no_content())
}

pub async fn count(State(state): State<AppState>) -> ApiResult<i64> {
    let total = state.adoption_requests().count(&AdoptionRequestFilter::default()).await?;
    Ok(ApiResponse::success(total))
}

pub async fn count_by_status(
    State(state): State<AppState>,
    ApiPath(status): ApiPath<AdoptionRequestStatus>,
) -> ApiResult<i64> {
    let total = state.adoption_requests().count(&filter(None, None, Some(status))).await?;
    Ok(ApiResponse::success(total))
}

pub async fn count_by_user(State(state): State<AppState>, ApiPath(user_id): ApiPath<Uuid>) -> ApiResult<i64> {
    let total = state.adoption_requests().count(&filter(Some(user_id), None, None)).await?;
    Ok(ApiResponse::success(total))
}

pub async fn count_by_pet(State(state): State<AppState>, ApiPath(pet_id): ApiPath<Uuid>) -> ApiResult<i64> {
    let total = state.adoption_requests().count(&filter(None, Some(pet_id), None)).await?;
    Ok(ApiResponse::success(total))
}

pub async fn statistics(State(state): State<AppState>) -> ApiResult<AdoptionStatistics> {
    let stats = state.adoption_requests().statistics(&AdoptionRequestFilter::default()).await?;
    Ok(ApiResponse::success(stats))
}

pub async fn statistics_by_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> ApiResult<AdoptionStatistics> {
    let stats = state.adoption_requests().statistics(&filter(Some(user_id), None, None)).await?;
    Ok(ApiResponse::success(stats))
}

pub async fn statistics_by_pet(
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
) -> ApiResult<AdoptionStatistics> {
    let stats = state.adoption_requests().statistics(&filter(None, Some(pet_id), None)).await?;
    Ok(ApiResponse::success(stats))
}

pub async fn statistics_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<AdoptionStatistics> {
    let filter = AdoptionRequestFilter {
        foundation_id: Some(foundation_id),
        ..Default::default()
    };
    Ok(ApiResponse::success(state.adoption_requests().statistics(&filter).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;

    #[test]
    fn empty_review_body_means_no_notes() {
        assert_eq!(review_notes(&Bytes::new()).unwrap(), None);
        assert_eq!(review_notes(&Bytes::from_static(b"  \n")).unwrap(), None);
        assert_eq!(
            review_notes(&Bytes::from_static(br#"{"notes":"Great fit"}"#)).unwrap(),
            Some("Great fit".to_string())
        );
        assert!(review_notes(&Bytes::from_static(b"not json")).is_err());
    }

    #[test]
    fn only_owner_or_staff_reads_a_users_requests() {
        let owner = Uuid::new_v4();
        let user = AuthUser { id: owner, role: Role::User };
        let stranger = AuthUser { id: Uuid::new_v4(), role: Role::User };
        let staff = AuthUser { id: Uuid::new_v4(), role: Role::FoundationAdmin };

        assert!(ensure_owner_or_staff(&user, owner).is_ok());
        assert!(ensure_owner_or_staff(&staff, owner).is_ok());
        assert!(ensure_owner_or_staff(&stranger, owner).is_err());
    }
}
