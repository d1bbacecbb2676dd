use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{not_found, ServiceError};
use crate::api::contact_messages::{CreateContactMessageRequest, UpdateContactMessageRequest};
use crate::api::validation::{clean, normalize_email};
use crate::database::models::ContactMessage;
use crate::database::{Page, PageRequest};
use crate::repositories::{
    ContactMessageFilter, ContactMessageRepository, ContactMessageStatistics, FoundationRepository,
};

#[derive(Clone)]
pub struct ContactMessageService {
    messages: ContactMessageRepository,
    foundations: FoundationRepository,
}

impl ContactMessageService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            messages: ContactMessageRepository::new(pool.clone()),
            foundations: FoundationRepository::new(pool),
        }
    }

    /// Store a message from a visitor. New messages always start unread.
    pub async fn create(&self, request: CreateContactMessageRequest) -> Result<ContactMessage, ServiceError> {
        request.validate()?;
        if !self.foundations.exists_by_id(request.foundation_id).await? {
            return Err(ServiceError::bad_request(format!(
                "Foundation not found with id: {}",
                request.foundation_id
            )));
        }

        let message = ContactMessage {
            id: Uuid::new_v4(),
            sender_name: request.sender_name.trim().to_string(),
            sender_email: normalize_email(&request.sender_email),
            subject: clean(request.subject.as_deref()),
            message: request.message.trim().to_string(),
            foundation_id: request.foundation_id,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };

        let message = self.messages.insert(&message).await?;
        info!(message_id = %message.id, foundation_id = %message.foundation_id, "Received contact message");
        Ok(message)
    }

    pub async fn get(&self, id: Uuid) -> Result<ContactMessage, ServiceError> {
        Ok(self.messages.get(id).await?)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.messages.exists_by_id(id).await?)
    }

    pub async fn ensure_foundation(&self, foundation_id: Uuid) -> Result<(), ServiceError> {
        if self.foundations.exists_by_id(foundation_id).await? {
            Ok(())
        } else {
            Err(not_found("Foundation", "id", foundation_id))
        }
    }

    pub async fn list(&self, filter: &ContactMessageFilter) -> Result<Vec<ContactMessage>, ServiceError> {
        Ok(self.messages.find(filter).await?)
    }

    pub async fn page(
        &self,
        filter: &ContactMessageFilter,
        page: &PageRequest,
    ) -> Result<Page<ContactMessage>, ServiceError> {
        Ok(self.messages.find_page(filter, page).await?)
    }

    pub async fn count(&self, filter: &ContactMessageFilter) -> Result<i64, ServiceError> {
        Ok(self.messages.count(filter).await?)
    }

    pub async fn statistics(&self, filter: &ContactMessageFilter) -> Result<ContactMessageStatistics, ServiceError> {
        Ok(self.messages.statistics(filter).await?)
    }

    pub async fn update(&self, id: Uuid, request: UpdateContactMessageRequest) -> Result<ContactMessage, ServiceError> {
        request.validate()?;
        let mut message = self.messages.get(id).await?;

        if let Some(name) = clean(request.sender_name.as_deref()) {
            message.sender_name = name;
        }
        if let Some(email) = request.sender_email.as_deref().map(normalize_email) {
            message.sender_email = email;
        }
        if request.subject.is_some() {
            message.subject = clean(request.subject.as_deref());
        }
        if let Some(body) = clean(request.message.as_deref()) {
            message.message = body;
        }

        let message = self.messages.update(&message).await?;
        info!(message_id = %id, "Updated contact message");
        Ok(message)
    }

    pub async fn set_read(&self, id: Uuid, read: bool) -> Result<ContactMessage, ServiceError> {
        let message = self.messages.set_read(id, read).await?;
        info!(message_id = %id, read, "Changed contact message read state");
        Ok(message)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.messages.delete(id).await? {
            return Err(not_found("Contact message", "id", id));
        }
        info!(message_id = %id, "Deleted contact message");
        Ok(())
    }
}
