//! User data model.
//!
//! The user record is owned by the session once authenticated. It is only
//! replaced wholesale with what the server returns; nothing here recomputes
//! subscription state locally.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContentId;

/// Validation errors returned by user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier was not a UUID.
    InvalidId,
    /// A profile update carried no fields.
    EmptyProfileUpdate,
    /// A profile field was provided but blank.
    BlankProfileField { field: &'static str },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyProfileUpdate => {
                write!(f, "profile update must change at least one field")
            }
            Self::BlankProfileField { field } => write!(f, "{field} must not be blank"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Subscription tier as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    /// Initial trial period granted at signup.
    FreeTrial,
    /// Free tier with advertising, entered once the trial ends.
    #[serde(alias = "free_with_ads")]
    AdSupported,
    /// Paid tier.
    Premium,
}

/// Subscription snapshot. `days_remaining` is server truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Current tier.
    pub kind: SubscriptionKind,
    /// Days left in the current period, never negative.
    pub days_remaining: u32,
    /// Start of the current period, when reported.
    pub started_at: Option<DateTime<Utc>>,
    /// End of the current period, when reported.
    pub ends_at: Option<DateTime<Utc>>,
}

/// Locale preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Interface language code, e.g. `es`.
    pub language: String,
    /// Country code, e.g. `ES`.
    pub country: String,
}

/// Authenticated account.
///
/// ## Invariants
/// - `watchlist_ids` holds each content id at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Avatar image URL.
    pub avatar: Option<String>,
    /// Subscription snapshot.
    pub subscription: Subscription,
    /// Locale preferences.
    pub profile: Profile,
    /// Saved content ids.
    pub watchlist_ids: BTreeSet<ContentId>,
}

/// Partial profile update. Only provided fields are sent.
///
/// # Examples
/// ```
/// use client::domain::ProfileUpdate;
///
/// let update = ProfileUpdate::default().language("en").country("GB");
/// assert!(update.validate().is_ok());
/// assert!(ProfileUpdate::default().validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
}

impl ProfileUpdate {
    /// Set the display name.
    #[must_use]
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    /// Set the avatar URL.
    #[must_use]
    pub fn avatar(mut self, value: impl Into<String>) -> Self {
        self.avatar = Some(value.into());
        self
    }

    /// Set the interface language.
    #[must_use]
    pub fn language(mut self, value: impl Into<String>) -> Self {
        self.language = Some(value.into());
        self
    }

    /// Set the country.
    #[must_use]
    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.country = Some(value.into());
        self
    }

    /// Reject empty updates and blank fields.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        let fields = [
            ("name", &self.name),
            ("avatar", &self.avatar),
            ("language", &self.language),
            ("country", &self.country),
        ];
        if fields.iter().all(|(_, value)| value.is_none()) {
            return Err(UserValidationError::EmptyProfileUpdate);
        }
        for (field, value) in fields {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(UserValidationError::BlankProfileField { field });
            }
        }
        Ok(())
    }
}
