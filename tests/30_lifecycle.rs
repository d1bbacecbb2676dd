//! Service-level checks against a real Postgres. Each test returns early
//! when `DATABASE_URL` is not set or the database is unreachable.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use petfriendly_api::api::adoption_requests::CreateAdoptionRequestRequest;
use petfriendly_api::api::foundations::CreateFoundationRequest;
use petfriendly_api::api::pet_images::CreatePetImageRequest;
use petfriendly_api::api::pets::CreatePetRequest;
use petfriendly_api::api::users::CreateUserRequest;
use petfriendly_api::auth::AuthUser;
use petfriendly_api::config::AppConfig;
use petfriendly_api::database::models::{AdoptionRequestStatus, PetSpecies, Role, User};
use petfriendly_api::repositories::PetImageFilter;
use petfriendly_api::services::{
    AdoptionRequestService, FoundationService, PetImageService, PetService, ServiceError, UserService,
};
use petfriendly_api::state::AppState;

async fn user(pool: &PgPool, role: Role) -> User {
    let request = CreateUserRequest {
        first_name: "Test".to_string(),
        last_name: "Adopter".to_string(),
        email: common::unique_email("adopter"),
        password: "Secret123".to_string(),
        phone: None,
        city: Some("Medellin".to_string()),
        role: Some(role),
        active: None,
    };
    UserService::new(pool.clone()).create(request, Role::User).await.unwrap()
}

async fn pet(pool: &PgPool) -> Uuid {
    let foundation = FoundationService::new(pool.clone())
        .create(CreateFoundationRequest {
            name: format!("Huellitas {}", Uuid::new_v4().simple()),
            city: "Bogota".to_string(),
            state: Some("Cundinamarca".to_string()),
            description: None,
            contact_email: common::unique_email("foundation"),
            website: None,
            address: None,
            phone_number: None,
            verified: Some(true),
        })
        .await
        .unwrap();

    PetService::new(pool.clone())
        .create(CreatePetRequest {
            name: "Luna".to_string(),
            species: PetSpecies::Dog,
            breed: Some("Criollo".to_string()),
            age: Some(3),
            gender: None,
            size: None,
            description: None,
            status: None,
            foundation_id: foundation.id,
        })
        .await
        .unwrap()
        .id
}

fn application(pet_id: Uuid) -> CreateAdoptionRequestRequest {
    CreateAdoptionRequestRequest {
        pet_id,
        message: "We have a big garden".to_string(),
        experience: Some("Two dogs before".to_string()),
        living_situation: None,
    }
}

#[tokio::test]
async fn second_request_for_same_pet_conflicts() {
    let Some(pool) = common::test_pool().await else { return };
    let adopter = user(&pool, Role::User).await;
    let pet_id = pet(&pool).await;
    let service = AdoptionRequestService::new(pool.clone(), true);

    let created = service.create(adopter.id, application(pet_id)).await.unwrap();
    assert_eq!(created.status, AdoptionRequestStatus::Pending);
    assert!(created.reviewed_at.is_none());

    let approved = service.approve(created.id, Some("Great home".to_string())).await.unwrap();
    assert_eq!(approved.status, AdoptionRequestStatus::Approved);
    assert!(approved.reviewed_at.is_some());
    assert_eq!(approved.review_notes.as_deref(), Some("Great home"));

    let again = service.create(adopter.id, application(pet_id)).await;
    assert!(matches!(again, Err(ServiceError::Conflict(_))), "got {:?}", again);
}

#[tokio::test]
async fn concurrent_submissions_yield_one_request() {
    let Some(pool) = common::test_pool().await else { return };
    let adopter = user(&pool, Role::User).await;
    let pet_id = pet(&pool).await;
    let service = AdoptionRequestService::new(pool.clone(), true);

    let (first, second) = tokio::join!(
        service.create(adopter.id, application(pet_id)),
        service.create(adopter.id, application(pet_id)),
    );

    let ok = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1, "first: {:?}, second: {:?}", first, second);
    assert!([first, second]
        .into_iter()
        .any(|r| matches!(r, Err(ServiceError::Conflict(_)))));
    assert!(service.exists_for(adopter.id, pet_id).await.unwrap());
}

#[tokio::test]
async fn reject_stamps_review_time() {
    let Some(pool) = common::test_pool().await else { return };
    let adopter = user(&pool, Role::User).await;
    let pet_id = pet(&pool).await;
    let service = AdoptionRequestService::new(pool.clone(), true);

    let created = service.create(adopter.id, application(pet_id)).await.unwrap();
    let rejected = service.reject(created.id, None).await.unwrap();
    assert_eq!(rejected.status, AdoptionRequestStatus::Rejected);
    assert!(rejected.reviewed_at.is_some());
}

#[tokio::test]
async fn cancel_sets_fixed_note_and_respects_strictness() {
    let Some(pool) = common::test_pool().await else { return };
    let adopter = user(&pool, Role::User).await;
    let caller = AuthUser { id: adopter.id, role: Role::User };
    let pet_id = pet(&pool).await;

    let strict = AdoptionRequestService::new(pool.clone(), true);
    let created = strict.create(adopter.id, application(pet_id)).await.unwrap();

    let stranger = AuthUser { id: Uuid::new_v4(), role: Role::User };
    assert!(matches!(strict.cancel(created.id, stranger).await, Err(ServiceError::Forbidden(_))));

    let cancelled = strict.cancel(created.id, caller).await.unwrap();
    assert_eq!(cancelled.status, AdoptionRequestStatus::Cancelled);
    assert_eq!(cancelled.review_notes.as_deref(), Some("Cancelled by user"));

    let approve = strict.approve(created.id, None).await;
    assert!(matches!(approve, Err(ServiceError::InvalidTransition { .. })), "got {:?}", approve);

    let lenient = AdoptionRequestService::new(pool.clone(), false);
    let approved = lenient.approve(created.id, None).await.unwrap();
    assert_eq!(approved.status, AdoptionRequestStatus::Approved);
}

#[tokio::test]
async fn permissive_transition_without_notes_clears_them() {
    let Some(pool) = common::test_pool().await else { return };
    let adopter = user(&pool, Role::User).await;
    let caller = AuthUser { id: adopter.id, role: Role::User };
    let pet_id = pet(&pool).await;
    let service = AdoptionRequestService::new(pool.clone(), false);

    let created = service.create(adopter.id, application(pet_id)).await.unwrap();
    let cancelled = service.cancel(created.id, caller).await.unwrap();
    assert_eq!(cancelled.review_notes.as_deref(), Some("Cancelled by user"));

    let approved = service.approve(created.id, None).await.unwrap();
    assert_eq!(approved.status, AdoptionRequestStatus::Approved);
    assert_eq!(approved.review_notes, None);
}

#[tokio::test]
async fn user_scoped_routes_are_owner_only() {
    let Some(pool) = common::test_pool().await else { return };
    let owner = user(&pool, Role::User).await;
    let stranger = user(&pool, Role::User).await;
    let staff = user(&pool, Role::FoundationAdmin).await;
    let pet_id = pet(&pool).await;
    AdoptionRequestService::new(pool.clone(), true)
        .create(owner.id, application(pet_id))
        .await
        .unwrap();

    let state = AppState::new(AppConfig::for_tests(), pool.clone()).unwrap();
    let token = |u: &User| state.jwt().issue(u).unwrap().token;
    let app = petfriendly_api::app(state.clone());

    let send = |method: Method, uri: String, token: String| {
        let app = app.clone();
        async move {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap();
            app.oneshot(request).await.unwrap().status()
        }
    };

    let base = format!("/api/v1/adoption-requests/user/{}", owner.id);
    let scoped = [
        (Method::GET, base.clone()),
        (Method::GET, format!("{}/page", base)),
        (Method::HEAD, format!("{}/pet/{}", base, pet_id)),
    ];

    for (method, uri) in scoped {
        assert_eq!(send(method.clone(), uri.clone(), token(&stranger)).await, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(send(method.clone(), uri.clone(), token(&owner)).await, StatusCode::OK, "{}", uri);
        assert_eq!(send(method, uri.clone(), token(&staff)).await, StatusCode::OK, "{}", uri);
    }
}

#[tokio::test]
async fn only_one_primary_image_per_pet() {
    let Some(pool) = common::test_pool().await else { return };
    let pet_id = pet(&pool).await;
    let images = PetImageService::new(pool.clone());

    let image = |url: &str, primary: bool| CreatePetImageRequest {
        image_url: url.to_string(),
        is_primary: primary,
        alt_text: None,
        pet_id,
    };

    let first = images.create(image("https://img.test/1.jpg", true)).await.unwrap();
    let second = images.create(image("https://img.test/2.jpg", true)).await.unwrap();
    let third = images.create(image("https://img.test/3.jpg", false)).await.unwrap();

    let primaries = |list: Vec<petfriendly_api::database::models::PetImage>| {
        list.into_iter().filter(|i| i.is_primary).map(|i| i.id).collect::<Vec<_>>()
    };

    let all = images.list(&PetImageFilter::for_pet(pet_id)).await.unwrap();
    assert_eq!(primaries(all), vec![second.id]);

    images.set_primary(third.id).await.unwrap();
    let all = images.list(&PetImageFilter::for_pet(pet_id)).await.unwrap();
    assert_eq!(primaries(all), vec![third.id]);
    assert_eq!(images.primary_for(pet_id).await.unwrap().id, third.id);
    assert!(!images.get(first.id).await.unwrap().is_primary);
}
