use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::api::contact_messages::{
    ContactMessageResponse, ContactSearchQuery, CreateContactMessageRequest, UpdateContactMessageRequest,
};
use crate::api::validation::normalize_email;
use crate::database::models::ContactMessage;
use crate::database::{Page, PageParams};
use crate::error::ApiError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{exists_status, ApiResponse, ApiResult};
use crate::repositories::{ContactMessageFilter, ContactMessageStatistics};
use crate::state::AppState;

async fn list(state: &AppState, filter: ContactMessageFilter) -> ApiResult<Vec<ContactMessageResponse>> {
    let messages = state.contact_messages().list(&filter).await?;
    Ok(ApiResponse::success(messages.into_iter().map(ContactMessageResponse::from).collect()))
}

async fn page(
    state: &AppState,
    filter: ContactMessageFilter,
    params: &PageParams,
) -> ApiResult<Page<ContactMessageResponse>> {
    let request = state.page_request::<ContactMessage>(params)?;
    let page = state.contact_messages().page(&filter, &request).await?;
    Ok(ApiResponse::success(page.map(ContactMessageResponse::from)))
}

fn of_foundation(foundation_id: Uuid, is_read: Option<bool>) -> ContactMessageFilter {
    ContactMessageFilter {
        foundation_id: Some(foundation_id),
        is_read,
        ..Default::default()
    }
}

fn read_state(is_read: bool) -> ContactMessageFilter {
    ContactMessageFilter {
        is_read: Some(is_read),
        ..Default::default()
    }
}

fn from_sender(email: &str) -> ContactMessageFilter {
    ContactMessageFilter {
        sender_email: Some(normalize_email(email)),
        ..Default::default()
    }
}

fn by_sender_name(query: ContactSearchQuery) -> ContactMessageFilter {
    ContactMessageFilter {
        sender_name: query.name,
        ..Default::default()
    }
}

fn by_subject(query: ContactSearchQuery) -> ContactMessageFilter {
    ContactMessageFilter {
        subject: query.subject,
        ..Default::default()
    }
}

fn by_body(query: ContactSearchQuery) -> ContactMessageFilter {
    ContactMessageFilter {
        message: query.message,
        ..Default::default()
    }
}

/// POST /api/v1/contact-messages - public contact form
#[utoipa::path(
    post,
    path = "/api/v1/contact-messages",
    tag = "contact-messages",
    request_body = CreateContactMessageRequest,
    responses(
        (status = 201, description = "Message stored unread", body = ContactMessageResponse),
        (status = 400, description = "Validation failed or unknown foundation")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateContactMessageRequest>,
) -> ApiResult<ContactMessageResponse> {
    let message = state.contact_messages().create(request).await?;
    Ok(ApiResponse::created(message.into()))
}

pub async fn get_all(State(state): State<AppState>) -> ApiResult<Vec<ContactMessageResponse>> {
    list(&state, ContactMessageFilter::default()).await
}

pub async fn get_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    page(&state, ContactMessageFilter::default(), &params).await
}

pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<ContactMessageResponse> {
    let message = state.contact_messages().get(id).await?;
    Ok(ApiResponse::success(message.into()))
}

pub async fn head_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, ApiError> {
    Ok(exists_status(state.contact_messages().exists_by_id(id).await?))
}

pub async fn get_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<Vec<ContactMessageResponse>> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    list(&state, of_foundation(foundation_id, None)).await
}

pub async fn get_by_foundation_page(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    page(&state, of_foundation(foundation_id, None), &params).await
}

pub async fn get_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Vec<ContactMessageResponse>> {
    list(&state, from_sender(&email)).await
}

pub async fn get_by_email_page(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    page(&state, from_sender(&email), &params).await
}

/// GET /api/v1/contact-messages/search/name?name=
pub async fn search_by_name(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ContactSearchQuery>,
) -> ApiResult<Vec<ContactMessageResponse>> {
    list(&state, by_sender_name(query)).await
}

pub async fn search_by_name_page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ContactSearchQuery>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    page(&state, by_sender_name(query), &params).await
}

pub async fn search_by_subject(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ContactSearchQuery>,
) -> ApiResult<Vec<ContactMessageResponse>> {
    list(&state, by_subject(query)).await
}

pub async fn search_by_subject_page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ContactSearchQuery>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    page(&state, by_subject(query), &params).await
}

pub async fn search_by_message(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ContactSearchQuery>,
) -> ApiResult<Vec<ContactMessageResponse>> {
    list(&state, by_body(query)).await
}

pub async fn search_by_message_page(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ContactSearchQuery>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    page(&state, by_body(query), &params).await
}

pub async fn get_read(State(state): State<AppState>) -> ApiResult<Vec<ContactMessageResponse>> {
    list(&state, read_state(true)).await
}

pub async fn get_read_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    page(&state, read_state(true), &params).await
}

pub async fn get_unread(State(state): State<AppState>) -> ApiResult<Vec<ContactMessageResponse>> {
    list(&state, read_state(false)).await
}

pub async fn get_unread_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    page(&state, read_state(false), &params).await
}

pub async fn get_read_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<Vec<ContactMessageResponse>> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    list(&state, of_foundation(foundation_id, Some(true))).await
}

pub async fn get_read_by_foundation_page(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    page(&state, of_foundation(foundation_id, Some(true)), &params).await
}

pub async fn get_unread_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<Vec<ContactMessageResponse>> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    list(&state, of_foundation(foundation_id, Some(false))).await
}

pub async fn get_unread_by_foundation_page(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Page<ContactMessageResponse>> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    page(&state, of_foundation(foundation_id, Some(false)), &params).await
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateContactMessageRequest>,
) -> ApiResult<ContactMessageResponse> {
    let message = state.contact_messages().update(id, request).await?;
    Ok(ApiResponse::success(message.into()))
}

/// PUT /api/v1/contact-messages/:id/mark-read - stamps readAt
pub async fn mark_read(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<ContactMessageResponse> {
    let message = state.contact_messages().set_read(id, true).await?;
    Ok(ApiResponse::success(message.into()))
}

pub async fn mark_unread(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<ContactMessageResponse> {
    let message = state.contact_messages().set_read(id, false).await?;
    Ok(ApiResponse::success(message.into()))
}

pub async fn delete(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<()> {
    state.contact_messages().delete(id).await?;
    Ok(ApiResponse::no_content())
}

pub async fn count(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.contact_messages().count(&ContactMessageFilter::default()).await?))
}

pub async fn count_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<i64> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    Ok(ApiResponse::success(state.contact_messages().count(&of_foundation(foundation_id, None)).await?))
}

pub async fn count_read(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.contact_messages().count(&read_state(true)).await?))
}

pub async fn count_unread(State(state): State<AppState>) -> ApiResult<i64> {
    Ok(ApiResponse::success(state.contact_messages().count(&read_state(false)).await?))
}

pub async fn count_read_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<i64> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    let filter = of_foundation(foundation_id, Some(true));
    Ok(ApiResponse::success(state.contact_messages().count(&filter).await?))
}

pub async fn count_unread_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<i64> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    let filter = of_foundation(foundation_id, Some(false));
    Ok(ApiResponse::success(state.contact_messages().count(&filter).await?))
}

pub async fn statistics(State(state): State<AppState>) -> ApiResult<ContactMessageStatistics> {
    let stats = state.contact_messages().statistics(&ContactMessageFilter::default()).await?;
    Ok(ApiResponse::success(stats))
}

pub async fn statistics_by_foundation(
    State(state): State<AppState>,
    ApiPath(foundation_id): ApiPath<Uuid>,
) -> ApiResult<ContactMessageStatistics> {
    state.contact_messages().ensure_foundation(foundation_id).await?;
    let stats = state.contact_messages().statistics(&of_foundation(foundation_id, None)).await?;
    Ok(ApiResponse::success(stats))
}
