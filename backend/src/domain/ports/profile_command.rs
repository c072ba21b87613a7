//! Driving port for saving the caller's profile.
//!
//! Inbound adapters translate their payload (the full profile form, or the
//! legacy `save-profile` body) into a [`SaveProfileRequest`] and let the
//! domain resolve the location and perform the upsert.

use async_trait::async_trait;

use crate::domain::{Error, ProfileView, SaveProfileRequest, VerifiedIdentity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Validate and upsert the profile of `identity`.
    ///
    /// # Errors
    /// - `invalid_request` with `details.field` when a field fails
    ///   validation or the town does not belong to the submitted district.
    /// - `service_unavailable` or `internal_error` when persistence fails.
    async fn save_profile(
        &self,
        identity: &VerifiedIdentity,
        request: SaveProfileRequest,
    ) -> Result<ProfileView, Error>;
}
