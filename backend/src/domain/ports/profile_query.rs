//! Driving port for reading the caller's profile.

use async_trait::async_trait;

use crate::domain::{Error, ProfileView, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// The stored profile, or `None` before the first save.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<ProfileView>, Error>;
}
