//! Book listings: drafts typed by a seller and the rows they become.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Error, UserId};

pub const TITLE_MAX: usize = 160;
pub const AUTHOR_MAX: usize = 120;
pub const SUBJECT_MAX: usize = 80;
pub const DESCRIPTION_MAX: usize = 2000;
pub const EXTRA_DETAILS_MAX: usize = 1000;
/// Upper bound on an asking price, in rupees.
pub const PRICE_MAX: i64 = 10_000_000;

/// Physical condition of the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookCondition {
    New,
    #[default]
    Used,
}

impl BookCondition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Used => "used",
        }
    }
}

impl fmt::Display for BookCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookCondition {
    type Err = ListingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "used" => Ok(Self::Used),
            _ => Err(ListingValidationError::UnknownCondition),
        }
    }
}

/// Book fields a validation failure can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    Price,
    Subject,
    Description,
    ExtraDetails,
    Condition,
}

impl BookField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Price => "price",
            Self::Subject => "subject",
            Self::Description => "description",
            Self::ExtraDetails => "extraDetails",
            Self::Condition => "condition",
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a single draft cannot become a listing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("{field} is required")]
    Missing { field: BookField },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: BookField, max: usize },
    #[error("price must be a whole number of rupees")]
    InvalidPrice,
    #[error("price must be at most {max} rupees")]
    PriceTooHigh { max: i64 },
    #[error("condition must be new or used")]
    UnknownCondition,
}

impl ListingValidationError {
    #[must_use]
    pub fn field(&self) -> BookField {
        match self {
            Self::Missing { field } | Self::TooLong { field, .. } => *field,
            Self::InvalidPrice | Self::PriceTooHigh { .. } => BookField::Price,
            Self::UnknownCondition => BookField::Condition,
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing",
            Self::TooLong { .. } => "too_long",
            Self::InvalidPrice => "invalid_price",
            Self::PriceTooHigh { .. } => "price_too_high",
            Self::UnknownCondition => "unknown_condition",
        }
    }

    /// Convert into a domain error naming the offending batch row.
    #[must_use]
    pub fn at_index(&self, index: usize) -> Error {
        Error::invalid_request(format!("book {}: {self}", index + 1)).with_details(json!({
            "field": self.field().as_str(),
            "code": self.code(),
            "index": index,
        }))
    }
}

/// Parse a free-text price such as `2500` or `2,500` into whole rupees.
///
/// # Examples
/// ```
/// use backend::domain::parse_price;
///
/// assert_eq!(parse_price("2,500"), Ok(2500));
/// assert!(parse_price("12.50").is_err());
/// ```
pub fn parse_price(raw: &str) -> Result<i64, ListingValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ListingValidationError::Missing {
            field: BookField::Price,
        });
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit() || c == ',') {
        return Err(ListingValidationError::InvalidPrice);
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ListingValidationError::InvalidPrice);
    }
    // Anything that overflows is far past the cap anyway.
    let price = digits
        .parse::<i64>()
        .map_err(|_| ListingValidationError::PriceTooHigh { max: PRICE_MAX })?;
    if price > PRICE_MAX {
        return Err(ListingValidationError::PriceTooHigh { max: PRICE_MAX });
    }
    Ok(price)
}

/// In-progress listing exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BookDraft {
    #[schema(example = "Physics Past Paper Book (2010-2023)")]
    pub title: String,
    pub author: String,
    /// Free text; must parse as whole rupees.
    #[schema(example = "2,500")]
    pub price: String,
    pub condition: BookCondition,
    #[schema(example = "Physics")]
    pub subject: String,
    pub description: String,
    pub extra_details: String,
}

impl BookDraft {
    /// Title, price and description are all non-blank.
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        self.missing_required_field().is_none()
    }

    /// Title and price are non-blank, so the draft counts towards a publish
    /// even if it was never explicitly staged.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !self.title.trim().is_empty() && !self.price.trim().is_empty()
    }

    /// First required field left blank, in form order.
    #[must_use]
    pub fn missing_required_field(&self) -> Option<BookField> {
        [
            (BookField::Title, &self.title),
            (BookField::Price, &self.price),
            (BookField::Description, &self.description),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    /// Full validation performed before a publish is accepted.
    pub fn validate(&self) -> Result<NewBook, ListingValidationError> {
        if let Some(field) = self.missing_required_field() {
            return Err(ListingValidationError::Missing { field });
        }
        Ok(NewBook {
            title: bounded(&self.title, BookField::Title, TITLE_MAX)?,
            author: bounded(&self.author, BookField::Author, AUTHOR_MAX)?,
            price: parse_price(&self.price)?,
            condition: self.condition,
            subject: bounded(&self.subject, BookField::Subject, SUBJECT_MAX)?,
            description: bounded(&self.description, BookField::Description, DESCRIPTION_MAX)?,
            extra_details: bounded(&self.extra_details, BookField::ExtraDetails, EXTRA_DETAILS_MAX)?,
        })
    }
}

fn bounded(raw: &str, field: BookField, max: usize) -> Result<String, ListingValidationError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > max {
        return Err(ListingValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Validated listing content, not yet attributed to a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: i64,
    pub condition: BookCondition,
    pub subject: String,
    pub description: String,
    pub extra_details: String,
}

/// Row written by a publish: content plus server-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: Uuid,
    pub seller_id: UserId,
    pub book: NewBook,
    pub created_at: DateTime<Utc>,
}

/// Seller contact and location resolved through the seller's current
/// profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerContact {
    #[schema(value_type = String, example = "user_2abc")]
    pub seller_id: UserId,
    #[schema(example = "Nimal Perera")]
    pub name: String,
    #[schema(example = "0771234567")]
    pub phone: String,
    pub phone_secondary: Option<String>,
    pub whatsapp_primary: bool,
    pub whatsapp_secondary: bool,
    #[schema(example = "Colombo")]
    pub district_name: String,
    #[schema(example = "Nugegoda")]
    pub town_name: String,
}

/// Listing as shown to browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Whole rupees.
    #[schema(example = 2500)]
    pub price: i64,
    pub condition: BookCondition,
    pub subject: String,
    pub description: String,
    pub extra_details: String,
    pub created_at: DateTime<Utc>,
    pub seller: SellerContact,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> BookDraft {
        BookDraft {
            title: "Combined Maths Tute Set".into(),
            author: "K. Silva".into(),
            price: "4000".into(),
            condition: BookCondition::Used,
            subject: "Combined Maths".into(),
            description: "Pure and applied, lightly annotated.".into(),
            extra_details: String::new(),
        }
    }

    #[rstest]
    #[case("2500", Ok(2500))]
    #[case(" 2,500 ", Ok(2500))]
    #[case("0", Ok(0))]
    #[case("", Err(ListingValidationError::Missing { field: BookField::Price }))]
    #[case("-5", Err(ListingValidationError::InvalidPrice))]
    #[case("12.50", Err(ListingValidationError::InvalidPrice))]
    #[case(",", Err(ListingValidationError::InvalidPrice))]
    #[case("LKR 100", Err(ListingValidationError::InvalidPrice))]
    #[case("10000001", Err(ListingValidationError::PriceTooHigh { max: PRICE_MAX }))]
    #[case("99999999999999999999999", Err(ListingValidationError::PriceTooHigh { max: PRICE_MAX }))]
    fn price_parsing(#[case] raw: &str, #[case] expected: Result<i64, ListingValidationError>) {
        assert_eq!(parse_price(raw), expected);
    }

    #[rstest]
    #[case("new", BookCondition::New)]
    #[case(" USED ", BookCondition::Used)]
    fn condition_parses_case_insensitively(#[case] raw: &str, #[case] expected: BookCondition) {
        assert_eq!(raw.parse::<BookCondition>(), Ok(expected));
    }

    #[rstest]
    fn condition_defaults_to_used() {
        assert_eq!(BookDraft::default().condition, BookCondition::Used);
    }

    #[rstest]
    fn validate_trims_and_parses(draft: BookDraft) {
        let mut draft = draft;
        draft.title = "  Combined Maths Tute Set ".into();
        let book = draft.validate().expect("valid draft");
        assert_eq!(book.title, "Combined Maths Tute Set");
        assert_eq!(book.price, 4000);
    }

    #[rstest]
    fn missing_description_is_reported(draft: BookDraft) {
        let mut draft = draft;
        draft.description = " ".into();
        assert_eq!(draft.missing_required_field(), Some(BookField::Description));
        assert!(!draft.has_required_fields());
        assert!(draft.is_filled());
    }

    #[rstest]
    fn overlong_title_is_rejected(draft: BookDraft) {
        let mut draft = draft;
        draft.title = "t".repeat(TITLE_MAX + 1);
        assert_eq!(
            draft.validate(),
            Err(ListingValidationError::TooLong {
                field: BookField::Title,
                max: TITLE_MAX
            })
        );
    }

    #[rstest]
    fn index_is_carried_into_error_details() {
        let error = ListingValidationError::InvalidPrice.at_index(2);
        let details = error.details().expect("details");
        assert_eq!(details["index"], 2);
        assert_eq!(details["field"], "price");
        assert_eq!(error.message(), "book 3: price must be a whole number of rupees");
    }

    #[rstest]
    fn condition_serialises_lowercase() {
        let value = serde_json::to_value(BookCondition::New).expect("serialise");
        assert_eq!(value, "new");
    }
}
