pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, head, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    adoption_requests, auth as auth_handlers, contact_messages, docs, foundations, pet_images, pets, system, users,
};
use crate::state::AppState;

/// Full application router with policy, CORS and request tracing applied.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .merge(ops_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(foundation_routes())
        .merge(pet_routes())
        .merge(pet_image_routes())
        .merge(adoption_request_routes())
        .merge(contact_message_routes())
        .layer(from_fn_with_state(state.clone(), middleware::authorize))
        .layer(cors_layer(&state.config().security.cors_origins));

    let router = if state.config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// An empty list or `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse::<HeaderValue>().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

fn ops_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(system::root))
        .route("/actuator/health", get(system::health))
        .route("/actuator/info", get(system::info))
        .route("/v3/api-docs", get(docs::openapi_json))
        .route("/swagger-ui", get(docs::swagger_ui))
        .route("/swagger-ui.html", get(docs::swagger_ui))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/login", post(auth_handlers::login))
        .route("/api/v1/auth/register", post(auth_handlers::register))
        .route("/api/v1/auth/register/foundation", post(auth_handlers::register_foundation))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(users::get_all).post(users::create))
        .route("/api/v1/users/register", post(auth_handlers::register))
        .route("/api/v1/users/page", get(users::get_page))
        .route(
            "/api/v1/users/profile",
            get(users::profile).put(users::update_profile).delete(users::deactivate_profile),
        )
        .route("/api/v1/users/profile/password", put(users::change_password))
        .route(
            "/api/v1/users/:id",
            get(users::get_by_id)
                .head(users::head_by_id)
                .put(users::update)
                .delete(users::delete),
        )
        .route("/api/v1/users/:id/activate", put(users::activate))
        .route("/api/v1/users/:id/deactivate", put(users::deactivate))
        .route("/api/v1/users/email/:email", get(users::get_by_email).head(users::head_by_email))
        .route("/api/v1/users/exists/email/:email", get(users::exists_by_email))
        .route("/api/v1/users/role/:role", get(users::get_by_role))
        .route("/api/v1/users/role/:role/page", get(users::get_by_role_page))
        .route("/api/v1/users/active", get(users::get_active))
        .route("/api/v1/users/active/page", get(users::get_active_page))
        .route("/api/v1/users/search/:name", get(users::search))
        .route("/api/v1/users/search/:name/page", get(users::search_page))
        .route("/api/v1/users/count", get(users::count))
        .route("/api/v1/users/count/active", get(users::count_active))
        .route("/api/v1/users/count/role/:role", get(users::count_by_role))
        .route("/api/v1/users/statistics", get(users::statistics))
}

fn foundation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/foundations", get(foundations::get_all).post(foundations::create))
        .route("/api/v1/foundations/page", get(foundations::get_page))
        .route(
            "/api/v1/foundations/:id",
            get(foundations::get_by_id)
                .head(foundations::head_by_id)
                .put(foundations::update)
                .delete(foundations::delete),
        )
        .route("/api/v1/foundations/:id/activate", put(foundations::activate))
        .route("/api/v1/foundations/:id/deactivate", put(foundations::deactivate))
        .route("/api/v1/foundations/:id/statistics", get(foundations::statistics))
        .route(
            "/api/v1/foundations/name/:name",
            get(foundations::get_by_name).head(foundations::head_by_name),
        )
        .route(
            "/api/v1/foundations/email/:email",
            get(foundations::get_by_email).head(foundations::head_by_email),
        )
        .route("/api/v1/foundations/city/:city", get(foundations::get_by_city))
        .route("/api/v1/foundations/city/:city/page", get(foundations::get_by_city_page))
        .route("/api/v1/foundations/state/:state", get(foundations::get_by_state))
        .route("/api/v1/foundations/state/:state/page", get(foundations::get_by_state_page))
        .route("/api/v1/foundations/active", get(foundations::get_active))
        .route("/api/v1/foundations/active/page", get(foundations::get_active_page))
        .route("/api/v1/foundations/search", get(foundations::search))
        .route("/api/v1/foundations/search/page", get(foundations::search_page))
        .route("/api/v1/foundations/with-available-pets", get(foundations::get_with_available_pets))
        .route("/api/v1/foundations/count", get(foundations::count))
        .route("/api/v1/foundations/count/active", get(foundations::count_active))
        .route("/api/v1/foundations/count/city/:city", get(foundations::count_by_city))
        .route("/api/v1/foundations/count/state/:state", get(foundations::count_by_state))
        .route("/api/v1/foundations/statistics", get(foundations::overview))
}

fn pet_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/pets", get(pets::get_all).post(pets::create))
        .route("/api/v1/pets/page", get(pets::get_page))
        .route(
            "/api/v1/pets/:id",
            get(pets::get_by_id)
                .head(pets::head_by_id)
                .put(pets::update)
                .delete(pets::delete),
        )
        .route("/api/v1/pets/:id/status", put(pets::update_status))
        .route("/api/v1/pets/:id/adopt", put(pets::mark_adopted))
        .route("/api/v1/pets/:id/available", put(pets::mark_available))
        .route("/api/v1/pets/foundation/:foundation_id", get(pets::get_by_foundation))
        .route("/api/v1/pets/foundation/:foundation_id/page", get(pets::get_by_foundation_page))
        .route(
            "/api/v1/pets/foundation/:foundation_id/status/:status",
            get(pets::get_by_foundation_and_status),
        )
        .route(
            "/api/v1/pets/foundation/:foundation_id/status/:status/page",
            get(pets::get_by_foundation_and_status_page),
        )
        .route("/api/v1/pets/status/:status", get(pets::get_by_status))
        .route("/api/v1/pets/status/:status/page", get(pets::get_by_status_page))
        .route("/api/v1/pets/species/:species", get(pets::get_by_species))
        .route("/api/v1/pets/species/:species/page", get(pets::get_by_species_page))
        .route("/api/v1/pets/breed/:breed", get(pets::get_by_breed))
        .route("/api/v1/pets/breed/:breed/page", get(pets::get_by_breed_page))
        .route("/api/v1/pets/age", get(pets::get_by_age))
        .route("/api/v1/pets/age/page", get(pets::get_by_age_page))
        .route("/api/v1/pets/available", get(pets::get_available))
        .route("/api/v1/pets/available/page", get(pets::get_available_page))
        .route("/api/v1/pets/available/filter", get(pets::filter_available))
        .route("/api/v1/pets/search", get(pets::search))
        .route("/api/v1/pets/search/page", get(pets::search_page))
        .route("/api/v1/pets/count", get(pets::count))
        .route("/api/v1/pets/count/foundation/:foundation_id", get(pets::count_by_foundation))
        .route(
            "/api/v1/pets/count/foundation/:foundation_id/status/:status",
            get(pets::count_by_foundation_and_status),
        )
        .route("/api/v1/pets/count/status/:status", get(pets::count_by_status))
        .route("/api/v1/pets/count/species/:species", get(pets::count_by_species))
        .route("/api/v1/pets/statistics", get(pets::statistics))
        .route("/api/v1/pets/statistics/foundation/:foundation_id", get(pets::statistics_by_foundation))
}

fn pet_image_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/pet-images", get(pet_images::get_all).post(pet_images::create))
        .route("/api/v1/pet-images/page", get(pet_images::get_page))
        .route(
            "/api/v1/pet-images/:id",
            get(pet_images::get_by_id)
                .head(pet_images::head_by_id)
                .put(pet_images::update)
                .delete(pet_images::delete),
        )
        .route("/api/v1/pet-images/:id/set-primary", put(pet_images::set_primary))
        .route("/api/v1/pet-images/:id/remove-primary", put(pet_images::remove_primary))
        .route(
            "/api/v1/pet-images/pet/:pet_id",
            get(pet_images::get_by_pet).delete(pet_images::delete_by_pet),
        )
        .route("/api/v1/pet-images/pet/:pet_id/page", get(pet_images::get_by_pet_page))
        .route("/api/v1/pet-images/pet/:pet_id/primary", get(pet_images::get_primary))
        .route("/api/v1/pet-images/pet/:pet_id/has-primary", head(pet_images::head_has_primary))
        .route("/api/v1/pet-images/pet/:pet_id/secondary", get(pet_images::get_secondary))
        .route("/api/v1/pet-images/pet/:pet_id/secondary/page", get(pet_images::get_secondary_page))
        .route("/api/v1/pet-images/search", get(pet_images::search))
        .route("/api/v1/pet-images/search/page", get(pet_images::search_page))
        .route("/api/v1/pet-images/count", get(pet_images::count))
        .route("/api/v1/pet-images/count/pet/:pet_id", get(pet_images::count_by_pet))
        .route("/api/v1/pet-images/statistics", get(pet_images::statistics))
        .route("/api/v1/pet-images/statistics/pet/:pet_id", get(pet_images::statistics_by_pet))
}

fn adoption_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/adoption-requests",
            get(adoption_requests::get_all).post(adoption_requests::create),
        )
        .route("/api/v1/adoption-requests/page", get(adoption_requests::get_page))
        .route("/api/v1/adoption-requests/recent", get(adoption_requests::get_recent))
        .route(
            "/api/v1/adoption-requests/:id",
            get(adoption_requests::get_by_id)
                .head(adoption_requests::head_by_id)
                .put(adoption_requests::update)
                .delete(adoption_requests::delete),
        )
        .route("/api/v1/adoption-requests/:id/status", put(adoption_requests::update_status))
        .route("/api/v1/adoption-requests/:id/approve", put(adoption_requests::approve))
        .route("/api/v1/adoption-requests/:id/reject", put(adoption_requests::reject))
        .route("/api/v1/adoption-requests/:id/cancel", put(adoption_requests::cancel))
        .route("/api/v1/adoption-requests/user/:user_id", get(adoption_requests::get_by_user))
        .route("/api/v1/adoption-requests/user/:user_id/page", get(adoption_requests::get_by_user_page))
        .route(
            "/api/v1/adoption-requests/user/:user_id/status/:status",
            get(adoption_requests::get_by_user_and_status),
        )
        .route(
            "/api/v1/adoption-requests/user/:user_id/status/:status/page",
            get(adoption_requests::get_by_user_and_status_page),
        )
        .route(
            "/api/v1/adoption-requests/user/:user_id/pet/:pet_id",
            head(adoption_requests::head_user_pet),
        )
        .route("/api/v1/adoption-requests/pet/:pet_id", get(adoption_requests::get_by_pet))
        .route("/api/v1/adoption-requests/pet/:pet_id/page", get(adoption_requests::get_by_pet_page))
        .route(
            "/api/v1/adoption-requests/pet/:pet_id/status/:status",
            get(adoption_requests::get_by_pet_and_status),
        )
        .route(
            "/api/v1/adoption-requests/pet/:pet_id/status/:status/page",
            get(adoption_requests::get_by_pet_and_status_page),
        )
        .route("/api/v1/adoption-requests/status/:status", get(adoption_requests::get_by_status))
        .route(
            "/api/v1/adoption-requests/status/:status/page",
            get(adoption_requests::get_by_status_page),
        )
        .route(
            "/api/v1/adoption-requests/foundation/:foundation_id/pending",
            get(adoption_requests::get_pending_for_foundation),
        )
        .route("/api/v1/adoption-requests/count", get(adoption_requests::count))
        .route("/api/v1/adoption-requests/count/status/:status", get(adoption_requests::count_by_status))
        .route("/api/v1/adoption-requests/count/user/:user_id", get(adoption_requests::count_by_user))
        .route("/api/v1/adoption-requests/count/pet/:pet_id", get(adoption_requests::count_by_pet))
        .route("/api/v1/adoption-requests/statistics", get(adoption_requests::statistics))
        .route(
            "/api/v1/adoption-requests/statistics/user/:user_id",
            get(adoption_requests::statistics_by_user),
        )
        .route(
            "/api/v1/adoption-requests/statistics/pet/:pet_id",
            get(adoption_requests::statistics_by_pet),
        )
        .route(
            "/api/v1/adoption-requests/statistics/foundation/:foundation_id",
            get(adoption_requests::statistics_by_foundation),
        )
}

fn contact_message_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/contact-messages",
            get(contact_messages::get_all).post(contact_messages::create),
        )
        .route("/api/v1/contact-messages/page", get(contact_messages::get_page))
        .route(
            "/api/v1/contact-messages/:id",
            get(contact_messages::get_by_id)
                .head(contact_messages::head_by_id)
                .put(contact_messages::update)
                .delete(contact_messages::delete),
        )
        .route("/api/v1/contact-messages/:id/mark-read", put(contact_messages::mark_read))
        .route("/api/v1/contact-messages/:id/mark-unread", put(contact_messages::mark_unread))
        .route(
            "/api/v1/contact-messages/foundation/:foundation_id",
            get(contact_messages::get_by_foundation),
        )
        .route(
            "/api/v1/contact-messages/foundation/:foundation_id/page",
            get(contact_messages::get_by_foundation_page),
        )
        .route(
            "/api/v1/contact-messages/foundation/:foundation_id/read",
            get(contact_messages::get_read_by_foundation),
        )
        .route(
            "/api/v1/contact-messages/foundation/:foundation_id/read/page",
            get(contact_messages::get_read_by_foundation_page),
        )
        .route(
            "/api/v1/contact-messages/foundation/:foundation_id/unread",
            get(contact_messages::get_unread_by_foundation),
        )
        .route(
            "/api/v1/contact-messages/foundation/:foundation_id/unread/page",
            get(contact_messages::get_unread_by_foundation_page),
        )
        .route("/api/v1/contact-messages/email/:email", get(contact_messages::get_by_email))
        .route("/api/v1/contact-messages/email/:email/page", get(contact_messages::get_by_email_page))
        .route("/api/v1/contact-messages/search/name", get(contact_messages::search_by_name))
        .route("/api/v1/contact-messages/search/name/page", get(contact_messages::search_by_name_page))
        .route("/api/v1/contact-messages/search/subject", get(contact_messages::search_by_subject))
        .route(
            "/api/v1/contact-messages/search/subject/page",
            get(contact_messages::search_by_subject_page),
        )
        .route("/api/v1/contact-messages/search/message", get(contact_messages::search_by_message))
        .route(
            "/api/v1/contact-messages/search/message/page",
            get(contact_messages::search_by_message_page),
        )
        .route("/api/v1/contact-messages/read", get(contact_messages::get_read))
        .route("/api/v1/contact-messages/read/page", get(contact_messages::get_read_page))
        .route("/api/v1/contact-messages/unread", get(contact_messages::get_unread))
        .route("/api/v1/contact-messages/unread/page", get(contact_messages::get_unread_page))
        .route("/api/v1/contact-messages/count", get(contact_messages::count))
        .route(
            "/api/v1/contact-messages/count/foundation/:foundation_id",
            get(contact_messages::count_by_foundation),
        )
        .route(
            "/api/v1/contact-messages/count/foundation/:foundation_id/read",
            get(contact_messages::count_read_by_foundation),
        )
        .route(
            "/api/v1/contact-messages/count/foundation/:foundation_id/unread",
            get(contact_messages::count_unread_by_foundation),
        )
        .route("/api/v1/contact-messages/count/read", get(contact_messages::count_read))
        .route("/api/v1/contact-messages/count/unread", get(contact_messages::count_unread))
        .route("/api/v1/contact-messages/statistics", get(contact_messages::statistics))
        .route(
            "/api/v1/contact-messages/statistics/foundation/:foundation_id",
            get(contact_messages::statistics_by_foundation),
        )
}
