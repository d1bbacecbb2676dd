//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{JwtError, JwtService};
use crate::config::AppConfig;
use crate::database::repository::Entity;
use crate::database::{DatabaseError, PageParams, PageRequest};
use crate::services::{
    AdoptionRequestService, AuthService, ContactMessageService, FoundationService, PetImageService, PetService,
    UserService,
};

/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    jwt: JwtService,
    auth: AuthService,
    users: UserService,
    foundations: FoundationService,
    pets: PetService,
    pet_images: PetImageService,
    adoption_requests: AdoptionRequestService,
    contact_messages: ContactMessageService,
}

impl AppState {
    /// # Errors
    ///
    /// Fails when no JWT secret is configured.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, JwtError> {
        let jwt = JwtService::from_config(&config.security)?;
        let users = UserService::new(pool.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                auth: AuthService::new(users.clone(), jwt.clone()),
                foundations: FoundationService::new(pool.clone()),
                pets: PetService::new(pool.clone()),
                pet_images: PetImageService::new(pool.clone()),
                adoption_requests: AdoptionRequestService::new(pool.clone(), config.adoption.strict_transitions),
                contact_messages: ContactMessageService::new(pool.clone()),
                users,
                jwt,
                config,
                pool,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn jwt(&self) -> &JwtService {
        &self.inner.jwt
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn users(&self) -> &UserService {
        &self.inner.users
    }

    #[must_use]
    pub fn foundations(&self) -> &FoundationService {
        &self.inner.foundations
    }

    #[must_use]
    pub fn pets(&self) -> &PetService {
        &self.inner.pets
    }

    #[must_use]
    pub fn pet_images(&self) -> &PetImageService {
        &self.inner.pet_images
    }

    #[must_use]
    pub fn adoption_requests(&self) -> &AdoptionRequestService {
        &self.inner.adoption_requests
    }

    #[must_use]
    pub fn contact_messages(&self) -> &ContactMessageService {
        &self.inner.contact_messages
    }

    /// Resolve paging query parameters against `T`'s sortable fields and the
    /// configured page sizes.
    pub fn page_request<T: Entity>(&self, params: &PageParams) -> Result<PageRequest, DatabaseError> {
        let api = &self.inner.config.api;
        PageRequest::resolve(params, T::SORTABLE, api.default_page_size, api.max_page_size)
    }
}
