//! Identity types handed to the domain by the identity provider.
//!
//! The provider owns credentials; the domain only ever sees an opaque,
//! stable [`UserId`] and the verified [`Email`] attached to it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum accepted length for a provider user identifier.
pub const USER_ID_MAX: usize = 128;
/// Maximum accepted length for an email address.
pub const EMAIL_MAX: usize = 254;

/// Validation errors for identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must not contain whitespace")]
    IdContainsWhitespace,
    #[error("user id must be at most {max} characters")]
    IdTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must look like local@domain")]
    MalformedEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
}

/// Stable user identifier issued by the identity provider (e.g. `user_2abc`).
///
/// # Examples
/// ```
/// use backend::domain::UserId;
///
/// let id = UserId::new("user_2abc").expect("valid id");
/// assert_eq!(id.as_ref(), "user_2abc");
/// assert!(UserId::new("user 2abc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(UserValidationError::IdContainsWhitespace);
        }
        if id.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address verified by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    ///
    /// Only the shape is checked; deliverability is the provider's concern.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(UserValidationError::MalformedEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Result of verifying a session token with the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    pub user_id: UserId,
    pub email: Email,
}

impl VerifiedIdentity {
    pub fn new(user_id: UserId, email: Email) -> Self {
        Self { user_id, email }
    }
}
