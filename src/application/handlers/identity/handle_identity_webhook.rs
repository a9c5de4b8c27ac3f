//! HandleIdentityWebhookHandler - Command handler for identity-provider webhooks.
//!
//! Keeps the local user directory in sync with the identity provider. All
//! three operations are idempotent in intent: the provider redelivers on
//! non-2xx responses.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::enrollment::User;
use crate::domain::foundation::UserId;
use crate::domain::identity::{
    IdentityDeletedData, IdentityError, IdentityEvent, IdentityEventType, IdentityUserData,
    IdentityWebhookHeaders, IdentityWebhookVerifier,
};
use crate::ports::UserRepository;

/// Command to handle an identity webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleIdentityWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// Delivery headers carrying the signature material.
    pub headers: IdentityWebhookHeaders,
}

/// Result of identity webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleIdentityWebhookResult {
    /// User record created or refreshed.
    UserSynced { user_id: String },
    /// User record removed.
    UserRemoved { user_id: String },
    /// Event acknowledged without action.
    Ignored,
}

/// Handler for identity-provider webhooks.
pub struct HandleIdentityWebhookHandler {
    users: Arc<dyn UserRepository>,
    verifier: Arc<IdentityWebhookVerifier>,
}

impl HandleIdentityWebhookHandler {
    pub fn new(users: Arc<dyn UserRepository>, verifier: Arc<IdentityWebhookVerifier>) -> Self {
        Self { users, verifier }
    }

    pub async fn handle(
        &self,
        cmd: HandleIdentityWebhookCommand,
    ) -> Result<HandleIdentityWebhookResult, IdentityError> {
        let event = self.verifier.verify_and_parse(&cmd.payload, &cmd.headers)?;

        match event.parsed_type() {
            IdentityEventType::UserCreated => self.sync_user(&event, true).await,
            IdentityEventType::UserUpdated => self.sync_user(&event, false).await,
            IdentityEventType::UserDeleted => self.remove_user(&event).await,
            IdentityEventType::Unknown(event_type) => {
                tracing::debug!(%event_type, "ignoring unhandled identity event");
                Ok(HandleIdentityWebhookResult::Ignored)
            }
        }
    }

    async fn sync_user(
        &self,
        event: &IdentityEvent,
        created: bool,
    ) -> Result<HandleIdentityWebhookResult, IdentityError> {
        let data: IdentityUserData = event
            .deserialize_data()
            .map_err(|e| IdentityError::ParseError(format!("invalid user data: {}", e)))?;

        let user_id =
            UserId::new(data.id.as_str()).map_err(|_| IdentityError::MissingField("id"))?;

        let email = data
            .primary_email()
            .ok_or(IdentityError::MissingField("email_addresses"))?
            .to_string();

        if created {
            let now = Utc::now();
            let user = User {
                id: user_id.clone(),
                email,
                name: data.full_name(),
                image_url: data.image_url.clone(),
                enrolled_courses: Vec::new(),
                created_at: now,
                updated_at: now,
            };
            self.users.upsert(&user).await?;
        } else {
            // Profile delta: the enrollment list is owned by the payment
            // flow and must survive profile updates.
            let existing = self.users.find_by_id(&user_id).await?;
            let mut user = match existing {
                Some(user) => user,
                None => {
                    // Update for a user we never saw; treat as create.
                    let now = Utc::now();
                    User {
                        id: user_id.clone(),
                        email: String::new(),
                        name: String::new(),
                        image_url: None,
                        enrolled_courses: Vec::new(),
                        created_at: now,
                        updated_at: now,
                    }
                }
            };
            user.email = email;
            user.name = data.full_name();
            user.image_url = data.image_url.clone();
            user.updated_at = Utc::now();
            self.users.update_profile(&user).await?;
        }

        tracing::info!(user_id = %user_id, created, "user profile synced");

        Ok(HandleIdentityWebhookResult::UserSynced {
            user_id: user_id.to_string(),
        })
    }

    async fn remove_user(
        &self,
        event: &IdentityEvent,
    ) -> Result<HandleIdentityWebhookResult, IdentityError> {
        let data: IdentityDeletedData = event
            .deserialize_data()
            .map_err(|e| IdentityError::ParseError(format!("invalid deletion data: {}", e)))?;

        let user_id =
            UserId::new(data.id.as_str()).map_err(|_| IdentityError::MissingField("id"))?;

        self.users.delete(&user_id).await?;
        tracing::info!(user_id = %user_id, "user profile removed");

        Ok(HandleIdentityWebhookResult::UserRemoved {
            user_id: user_id.to_string(),
        })
    }
}
