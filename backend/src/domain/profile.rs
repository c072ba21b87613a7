//! Seller profile model and its validation rules.
//!
//! A profile is keyed by the identity provider's [`UserId`]. Contact text is
//! validated by [`ContactDetails::parse`]; location is stored as ids and
//! resolved to display names at read time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Email, Error, UserId};

/// Maximum accepted length for a first or last name.
pub const NAME_MAX: usize = 64;
/// Digit bounds for a phone number once spaces and dashes are stripped.
pub const PHONE_DIGITS_MIN: usize = 9;
pub const PHONE_DIGITS_MAX: usize = 15;
/// Maximum stored length of a phone number including separators.
pub const PHONE_MAX_LEN: usize = 20;

/// Profile fields a validation failure can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    FirstName,
    LastName,
    Phone,
    PhoneSecondary,
    WhatsappPrimary,
    WhatsappSecondary,
    District,
    Town,
}

impl ProfileField {
    /// Wire name used in error details.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Phone => "phone",
            Self::PhoneSecondary => "phoneSecondary",
            Self::WhatsappPrimary => "whatsappPrimary",
            Self::WhatsappSecondary => "whatsappSecondary",
            Self::District => "districtId",
            Self::Town => "townId",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a profile submission is rejected before any write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("{field} is required")]
    Missing { field: ProfileField },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: ProfileField, max: usize },
    #[error("{field} must be a phone number")]
    InvalidPhone { field: ProfileField },
    #[error("town {town_id} does not exist")]
    UnknownTown { town_id: i32 },
    #[error("town {town_id} is not in the selected district")]
    TownOutsideDistrict { town_id: i32 },
    #[error("town name does not match town {town_id}")]
    TownNameMismatch { town_id: i32 },
}

impl ProfileValidationError {
    /// Field the failure refers to.
    #[must_use]
    pub fn field(&self) -> ProfileField {
        match self {
            Self::Missing { field } | Self::TooLong { field, .. } | Self::InvalidPhone { field } => {
                *field
            }
            Self::TownOutsideDistrict { .. } => ProfileField::District,
            Self::UnknownTown { .. } | Self::TownNameMismatch { .. } => ProfileField::Town,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing",
            Self::TooLong { .. } => "too_long",
            Self::InvalidPhone { .. } => "invalid_phone",
            Self::UnknownTown { .. } => "unknown_town",
            Self::TownOutsideDistrict { .. } => "town_outside_district",
            Self::TownNameMismatch { .. } => "town_name_mismatch",
        }
    }

    fn details(&self) -> Value {
        json!({ "field": self.field().as_str(), "code": self.code() })
    }
}

impl From<ProfileValidationError> for Error {
    fn from(value: ProfileValidationError) -> Self {
        let details = value.details();
        Self::invalid_request(value.to_string()).with_details(details)
    }
}

/// Phone number as entered, checked to contain 9 to 15 digits and fit the
/// stored column.
///
/// # Examples
/// ```
/// use backend::domain::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+94 77-123 4567").expect("valid phone");
/// assert_eq!(phone.digits(), "94771234567");
/// assert!(PhoneNumber::parse("12-34").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a phone number; `None` when the shape is wrong.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > PHONE_MAX_LEN {
            return None;
        }
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let mut digits = 0_usize;
        for ch in body.chars() {
            match ch {
                '0'..='9' => digits += 1,
                ' ' | '-' => {}
                _ => return None,
            }
        }
        (PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX)
            .contains(&digits)
            .then(|| Self(trimmed.to_owned()))
    }

    /// Only the digits, without separators or a leading `+`.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated contact text of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone: PhoneNumber,
    pub phone_secondary: Option<PhoneNumber>,
    pub whatsapp_primary: bool,
    pub whatsapp_secondary: bool,
}

impl ContactDetails {
    /// Validate the free-text profile fields.
    ///
    /// A blank secondary phone counts as absent, and its WhatsApp flag is
    /// dropped with it.
    pub fn parse(
        first_name: &str,
        last_name: &str,
        phone: &str,
        phone_secondary: Option<&str>,
        whatsapp_primary: bool,
        whatsapp_secondary: bool,
    ) -> Result<Self, ProfileValidationError> {
        let first_name = required_name(first_name, ProfileField::FirstName)?;
        let last_name = required_name(last_name, ProfileField::LastName)?;
        if phone.trim().is_empty() {
            return Err(ProfileValidationError::Missing {
                field: ProfileField::Phone,
            });
        }
        let phone = PhoneNumber::parse(phone).ok_or(ProfileValidationError::InvalidPhone {
            field: ProfileField::Phone,
        })?;
        let phone_secondary = match phone_secondary.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(PhoneNumber::parse(raw).ok_or(
                ProfileValidationError::InvalidPhone {
                    field: ProfileField::PhoneSecondary,
                },
            )?),
            None => None,
        };
        let whatsapp_secondary = whatsapp_secondary && phone_secondary.is_some();
        Ok(Self {
            first_name,
            last_name,
            phone,
            phone_secondary,
            whatsapp_primary,
            whatsapp_secondary,
        })
    }
}

fn required_name(raw: &str, field: ProfileField) -> Result<String, ProfileValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProfileValidationError::Missing { field });
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(ProfileValidationError::TooLong {
            field,
            max: NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Persisted profile row.
///
/// ## Invariants
/// - `town_id` belongs to `district_id`.
/// - `email` comes from the verified identity, never from a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: UserId,
    pub email: Email,
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub district_id: i32,
    pub town_id: i32,
    pub updated_at: DateTime<Utc>,
}

/// Profile with its location ids resolved to display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub district_name: String,
    pub town_name: String,
}

/// How a save request names the district the town must belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistrictSelector {
    /// District id chosen from the lookup list.
    Id(i32),
    /// District display name, matched case-insensitively.
    Name(String),
    /// Take the district from the selected town.
    FromTown,
}

/// Write payload for a profile upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub phone_secondary: Option<String>,
    pub whatsapp_primary: bool,
    pub whatsapp_secondary: bool,
    pub district: Option<DistrictSelector>,
    pub town_id: Option<i32>,
    /// Town display name that must agree with `town_id` when present.
    pub town_name: Option<String>,
}

impl SaveProfileRequest {
    /// Validate the text fields of the request.
    pub fn contact_details(&self) -> Result<ContactDetails, ProfileValidationError> {
        ContactDetails::parse(
            &self.first_name,
            &self.last_name,
            &self.phone,
            self.phone_secondary.as_deref(),
            self.whatsapp_primary,
            self.whatsapp_secondary,
        )
    }
}
