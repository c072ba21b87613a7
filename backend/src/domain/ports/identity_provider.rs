//! Port for the hosted identity provider.

use async_trait::async_trait;

use crate::domain::{Email, SessionToken, UserId, VerifiedIdentity};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider refused the token (expired, revoked, forged).
        Rejected { message: String } => "session token rejected: {message}",
        /// The provider could not be reached or answered with a server error.
        Unavailable { message: String } => "identity provider unavailable: {message}",
        /// The provider answered with a body we could not interpret.
        InvalidResponse { message: String } =>
            "identity provider returned an invalid response: {message}",
    }
}

/// Exchange a session token for the identity it was issued to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_session(
        &self,
        token: &SessionToken,
    ) -> Result<VerifiedIdentity, IdentityProviderError>;
}

/// Development token accepted by [`FixtureIdentityProvider`].
pub const FIXTURE_SESSION_TOKEN: &str = "dev-session-token";
/// Identity returned for [`FIXTURE_SESSION_TOKEN`].
pub const FIXTURE_USER_ID: &str = "user_dev_seller";
pub const FIXTURE_EMAIL: &str = "dev.seller@booklink.lk";

/// Offline provider accepting a single well-known token.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn verify_session(
        &self,
        token: &SessionToken,
    ) -> Result<VerifiedIdentity, IdentityProviderError> {
        if token.expose() != FIXTURE_SESSION_TOKEN {
            return Err(IdentityProviderError::rejected("unknown fixture token"));
        }
        let user_id = UserId::new(FIXTURE_USER_ID)
            .map_err(|err| IdentityProviderError::invalid_response(err.to_string()))?;
        let email = Email::new(FIXTURE_EMAIL)
            .map_err(|err| IdentityProviderError::invalid_response(err.to_string()))?;
        Ok(VerifiedIdentity::new(user_id, email))
    }
}
