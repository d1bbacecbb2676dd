use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{not_found, ServiceError};
use crate::api::adoption_requests::{CreateAdoptionRequestRequest, UpdateAdoptionRequestRequest};
use crate::api::validation::clean;
use crate::auth::AuthUser;
use crate::database::models::{AdoptionRequest, AdoptionRequestStatus, Role};
use crate::database::{DatabaseError, Page, PageRequest};
use crate::repositories::{AdoptionRequestFilter, AdoptionRequestRepository, AdoptionStatistics, PetRepository};

pub const CANCELLED_NOTE: &str = "Cancelled by user";
const DUPLICATE_REQUEST: &str = "User has already submitted an adoption request for this pet";

/// Attempts at a compare-and-set before giving up on a contended row.
const TRANSITION_ATTEMPTS: usize = 3;

/// Adoption request lifecycle: PENDING, then APPROVED, REJECTED or CANCELLED.
#[derive(Clone)]
pub struct AdoptionRequestService {
    requests: AdoptionRequestRepository,
    pets: PetRepository,
    strict_transitions: bool,
}

impl AdoptionRequestService {
    pub fn new(pool: PgPool, strict_transitions: bool) -> Self {
        Self {
            requests: AdoptionRequestRepository::new(pool.clone()),
            pets: PetRepository::new(pool),
            strict_transitions,
        }
    }

    /// Submit a request from `user_id`. A user holds at most one request per
    /// pet, whatever its status.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateAdoptionRequestRequest,
    ) -> Result<AdoptionRequest, ServiceError> {
        request.validate()?;
        self.ensure_pet(request.pet_id).await?;

        if self.requests.exists_for(user_id, request.pet_id).await? {
            return Err(ServiceError::Conflict(DUPLICATE_REQUEST.to_string()));
        }

        let now = Utc::now();
        let adoption = AdoptionRequest {
            id: Uuid::new_v4(),
            user_id,
            pet_id: request.pet_id,
            message: request.message.trim().to_string(),
            experience: clean(request.experience.as_deref()),
            living_situation: clean(request.living_situation.as_deref()),
            status: AdoptionRequestStatus::Pending,
            review_notes: None,
            created_at: now,
            updated_at: now,
            reviewed_at: None,
        };

        let adoption = self.requests.insert(&adoption).await.map_err(|e| match e {
            DatabaseError::UniqueViolation(_) => ServiceError::Conflict(DUPLICATE_REQUEST.to_string()),
            other => other.into(),
        })?;
        info!(request_id = %adoption.id, user_id = %user_id, pet_id = %adoption.pet_id, "Created adoption request");
        Ok(adoption)
    }

    pub async fn get(&self, id: Uuid) -> Result<AdoptionRequest, ServiceError> {
        Ok(self.requests.get(id).await?)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.requests.exists_by_id(id).await?)
    }

    pub async fn exists_for(&self, user_id: Uuid, pet_id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.requests.exists_for(user_id, pet_id).await?)
    }

    pub async fn ensure_pet(&self, pet_id: Uuid) -> Result<(), ServiceError> {
        if self.pets.exists_by_id(pet_id).await? {
            Ok(())
        } else {
            Err(not_found("Pet", "id", pet_id))
        }
    }

    pub async fn list(&self, filter: &AdoptionRequestFilter) -> Result<Vec<AdoptionRequest>, ServiceError> {
        Ok(self.requests.find(filter).await?)
    }

    pub async fn page(
        &self,
        filter: &AdoptionRequestFilter,
        page: &PageRequest,
    ) -> Result<Page<AdoptionRequest>, ServiceError> {
        Ok(self.requests.find_page(filter, page).await?)
    }

    pub async fn count(&self, filter: &AdoptionRequestFilter) -> Result<i64, ServiceError> {
        Ok(self.requests.count(filter).await?)
    }

    pub async fn statistics(&self, filter: &AdoptionRequestFilter) -> Result<AdoptionStatistics, ServiceError> {
        Ok(self.requests.statistics(filter).await?)
    }

    /// Edit the applicant's free text. Only the applicant or staff may do so.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAdoptionRequestRequest,
        caller: AuthUser,
    ) -> Result<AdoptionRequest, ServiceError> {
        request.validate()?;
        let mut adoption = self.requests.get(id).await?;
        if !caller.can_act_for(adoption.user_id) {
            return Err(ServiceError::Forbidden("You can only edit your own adoption requests".to_string()));
        }

        if let Some(message) = clean(request.message.as_deref()) {
            adoption.message = message;
        }
        if request.experience.is_some() {
            adoption.experience = clean(request.experience.as_deref());
        }
        if request.living_situation.is_some() {
            adoption.living_situation = clean(request.living_situation.as_deref());
        }

        let adoption = self.requests.update_details(&adoption).await?;
        info!(request_id = %id, "Updated adoption request");
        Ok(adoption)
    }

    pub async fn approve(&self, id: Uuid, notes: Option<String>) -> Result<AdoptionRequest, ServiceError> {
        self.transition(id, AdoptionRequestStatus::Approved, clean(notes.as_deref())).await
    }

    pub async fn reject(&self, id: Uuid, notes: Option<String>) -> Result<AdoptionRequest, ServiceError> {
        self.transition(id, AdoptionRequestStatus::Rejected, clean(notes.as_deref())).await
    }

    /// Withdraw a request. Allowed for the applicant and for super admins.
    pub async fn cancel(&self, id: Uuid, caller: AuthUser) -> Result<AdoptionRequest, ServiceError> {
        let adoption = self.requests.get(id).await?;
        if adoption.user_id != caller.id && caller.role != Role::SuperAdmin {
            warn!(request_id = %id, caller = %caller.id, "Refused cancel of another user's request");
            return Err(ServiceError::Forbidden("You can only cancel your own adoption requests".to_string()));
        }
        self.transition(id, AdoptionRequestStatus::Cancelled, Some(CANCELLED_NOTE.to_string()))
            .await
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: AdoptionRequestStatus,
    ) -> Result<AdoptionRequest, ServiceError> {
        self.transition(id, status, None).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.requests.delete(id).await? {
            return Err(not_found("Adoption request", "id", id));
        }
        info!(request_id = %id, "Deleted adoption request");
        Ok(())
    }

    /// Move `id` to `next`, writing `notes` as the review notes (absent clears them).
    ///
    /// The write is a compare-and-set on the status that was read, so two
    /// reviewers racing on the same request cannot both succeed.
    async fn transition(
        &self,
        id: Uuid,
        next: AdoptionRequestStatus,
        notes: Option<String>,
    ) -> Result<AdoptionRequest, ServiceError> {
        for _ in 0..TRANSITION_ATTEMPTS {
            let current = self.requests.get(id).await?;
            if !current.status.can_transition_to(next, self.strict_transitions) {
                return Err(ServiceError::InvalidTransition {
                    from: current.status,
                    to: next,
                });
            }

            let updated = self
                .requests
                .transition(id, current.status, next, notes.as_deref(), Utc::now())
                .await?;

            if let Some(updated) = updated {
                info!(request_id = %id, from = %current.status, to = %next, "Adoption request status changed");
                return Ok(updated);
            }
        }

        warn!(request_id = %id, to = %next, "Adoption request kept changing underneath the update");
        Err(ServiceError::Conflict(format!(
            "Adoption request {} was modified concurrently, please retry",
            id
        )))
    }
}
