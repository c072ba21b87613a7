//! Domain primitives, workflows and services.
//!
//! Purpose: define the marketplace's types (profiles, locations, book
//! listings), the pure editing workflows that precede a write, and the
//! services that implement the driving ports. Nothing here depends on HTTP
//! or Diesel; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic use-case failure.
//! - [`ProfileForm`] / [`ListingBatch`]: pure client-side workflows.
//! - [`LocationService`], [`ProfileService`], [`ListingService`],
//!   [`IdentityLoginService`]: driving port implementations.

pub mod auth;
pub mod book;
pub mod error;
pub mod identity_login_service;
pub mod listing_batch;
pub mod listing_service;
pub mod location;
pub mod location_service;
pub mod ports;
pub mod profile;
pub mod profile_form;
pub mod profile_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{SessionToken, SessionTokenError};
pub use self::book::{
    BookCondition, BookDraft, BookField, BookRecord, Listing, ListingValidationError, NewBook,
    SellerContact, parse_price,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_login_service::IdentityLoginService;
pub use self::listing_batch::{BatchError, ListingBatch};
pub use self::listing_service::{BROWSE_LIMIT, ListingService, MAX_BATCH_SIZE};
pub use self::location::{District, Town, TownWithDistrict};
pub use self::location_service::LocationService;
pub use self::profile::{
    ContactDetails, DistrictSelector, PhoneNumber, Profile, ProfileField, ProfileValidationError,
    ProfileView, SaveProfileRequest,
};
pub use self::profile_form::{
    Banner, FormState, ProfileChanges, ProfileDraft, ProfileForm, ProfileFormError, TownsRequest,
};
pub use self::profile_service::ProfileService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, UserId, UserValidationError, VerifiedIdentity};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
