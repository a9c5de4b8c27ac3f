//! Identity-provider webhook event types.
//!
//! The identity provider pushes `user.*` lifecycle events whose `data` object
//! mirrors its own user schema; only the fields the sync needs are captured.

use serde::{Deserialize, Serialize};

/// Identity webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityEvent {
    /// Type of event (e.g., "user.created").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event payload; shape depends on the event type.
    pub data: serde_json::Value,
}

impl IdentityEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> IdentityEventType {
        IdentityEventType::from_str(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_data<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}

/// Identity event types the sync recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEventType {
    UserCreated,
    UserUpdated,
    UserDeleted,
    Unknown(String),
}

impl IdentityEventType {
    pub fn from_str(s: &str) -> Self {
        match s {
            "user.created" => Self::UserCreated,
            "user.updated" => Self::UserUpdated,
            "user.deleted" => Self::UserDeleted,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// User object as it arrives in `user.created` / `user.updated` events.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityUserData {
    /// Identity-provider user id.
    pub id: String,

    /// Registered email addresses, primary first.
    #[serde(default)]
    pub email_addresses: Vec<IdentityEmailAddress>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,
}

/// One registered email address.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityEmailAddress {
    pub email_address: String,
}

impl IdentityUserData {
    /// The primary email address, if any is registered.
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .map(|e| e.email_address.as_str())
    }

    /// Display name assembled from first and last name.
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Payload of a `user.deleted` event.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityDeletedData {
    pub id: String,
}
