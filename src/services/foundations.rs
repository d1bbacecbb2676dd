use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{not_found, ServiceError};
use crate::api::foundations::{CreateFoundationRequest, UpdateFoundationRequest};
use crate::api::validation::{clean, normalize_email};
use crate::database::models::Foundation;
use crate::database::{DatabaseError, Page, PageRequest};
use crate::repositories::{FoundationFilter, FoundationOverview, FoundationRepository, FoundationStatistics};

#[derive(Clone)]
pub struct FoundationService {
    foundations: FoundationRepository,
}

impl FoundationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            foundations: FoundationRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateFoundationRequest) -> Result<Foundation, ServiceError> {
        request.validate()?;

        let contact_email = normalize_email(&request.contact_email);
        self.ensure_email_free(&contact_email).await?;

        let now = Utc::now();
        let foundation = Foundation {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            city: request.city.trim().to_string(),
            state: clean(request.state.as_deref()),
            description: clean(request.description.as_deref()),
            contact_email,
            website: clean(request.website.as_deref()),
            address: clean(request.address.as_deref()),
            phone_number: clean(request.phone_number.as_deref()),
            verified: request.verified.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        let foundation = self.foundations.insert(&foundation).await.map_err(email_taken)?;
        info!(foundation_id = %foundation.id, name = %foundation.name, "Created foundation");
        Ok(foundation)
    }

    pub async fn get(&self, id: Uuid) -> Result<Foundation, ServiceError> {
        Ok(self.foundations.get(id).await?)
    }

    /// Fails with 404 unless the foundation exists.
    pub async fn ensure_exists(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.foundations.exists_by_id(id).await? {
            Ok(())
        } else {
            Err(not_found("Foundation", "id", id))
        }
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.foundations.exists_by_id(id).await?)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Foundation, ServiceError> {
        let filter = FoundationFilter {
            name: Some(name.to_string()),
            ..Default::default()
        };
        self.foundations
            .find_one(&filter)
            .await?
            .ok_or_else(|| not_found("Foundation", "name", name))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Foundation, ServiceError> {
        let filter = FoundationFilter {
            contact_email: Some(normalize_email(email)),
            ..Default::default()
        };
        self.foundations
            .find_one(&filter)
            .await?
            .ok_or_else(|| not_found("Foundation", "email", email))
    }

    pub async fn exists(&self, filter: &FoundationFilter) -> Result<bool, ServiceError> {
        Ok(self.foundations.exists(filter).await?)
    }

    pub async fn list(&self, filter: &FoundationFilter) -> Result<Vec<Foundation>, ServiceError> {
        Ok(self.foundations.find(filter).await?)
    }

    pub async fn page(&self, filter: &FoundationFilter, page: &PageRequest) -> Result<Page<Foundation>, ServiceError> {
        Ok(self.foundations.find_page(filter, page).await?)
    }

    pub async fn count(&self, filter: &FoundationFilter) -> Result<i64, ServiceError> {
        Ok(self.foundations.count(filter).await?)
    }

    pub async fn update(&self, id: Uuid, request: UpdateFoundationRequest) -> Result<Foundation, ServiceError> {
        request.validate()?;
        let mut foundation = self.foundations.get(id).await?;

        if let Some(email) = request.contact_email.as_deref().map(normalize_email) {
            if email != foundation.contact_email {
                self.ensure_email_free(&email).await?;
            }
            foundation.contact_email = email;
        }
        if let Some(name) = clean(request.name.as_deref()) {
            foundation.name = name;
        }
        if let Some(city) = clean(request.city.as_deref()) {
            foundation.city = city;
        }
        if request.state.is_some() {
            foundation.state = clean(request.state.as_deref());
        }
        if request.description.is_some() {
            foundation.description = clean(request.description.as_deref());
        }
        if request.website.is_some() {
            foundation.website = clean(request.website.as_deref());
        }
        if request.address.is_some() {
            foundation.address = clean(request.address.as_deref());
        }
        if request.phone_number.is_some() {
            foundation.phone_number = clean(request.phone_number.as_deref());
        }
        if let Some(verified) = request.verified {
            foundation.verified = verified;
        }

        let foundation = self.foundations.update(&foundation).await.map_err(email_taken)?;
        info!(foundation_id = %foundation.id, "Updated foundation");
        Ok(foundation)
    }

    pub async fn set_verified(&self, id: Uuid, verified: bool) -> Result<Foundation, ServiceError> {
        let mut foundation = self.foundations.get(id).await?;
        foundation.verified = verified;
        let foundation = self.foundations.update(&foundation).await?;
        info!(foundation_id = %id, verified, "Changed foundation verification");
        Ok(foundation)
    }

    /// Removes the foundation with its pets and messages.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.foundations.delete(id).await? {
            return Err(not_found("Foundation", "id", id));
        }
        info!(foundation_id = %id, "Deleted foundation");
        Ok(())
    }

    pub async fn statistics(&self, id: Uuid) -> Result<FoundationStatistics, ServiceError> {
        self.ensure_exists(id).await?;
        Ok(self.foundations.statistics(id).await?)
    }

    pub async fn overview(&self) -> Result<FoundationOverview, ServiceError> {
        Ok(self.foundations.overview().await?)
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), ServiceError> {
        let filter = FoundationFilter {
            contact_email: Some(email.to_string()),
            ..Default::default()
        };
        if self.foundations.exists(&filter).await? {
            return Err(ServiceError::bad_request(format!(
                "Foundation with email {} already exists",
                email
            )));
        }
        Ok(())
    }
}

fn email_taken(err: DatabaseError) -> ServiceError {
    if err.is_unique_violation() {
        ServiceError::bad_request("Foundation contact email already exists")
    } else {
        err.into()
    }
}
