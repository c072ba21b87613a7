//! Driving port for sign-in.
//!
//! Inbound adapters call this port to turn a provider session token into a
//! verified identity without knowing which identity provider sits behind it.

use async_trait::async_trait;

use crate::domain::{Error, SessionToken, VerifiedIdentity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify `token` and return who it belongs to.
    async fn authenticate(&self, token: &SessionToken) -> Result<VerifiedIdentity, Error>;
}
