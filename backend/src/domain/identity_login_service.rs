//! Sign-in backed by the hosted identity provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{IdentityProvider, IdentityProviderError, LoginService};
use crate::domain::{Error, SessionToken, VerifiedIdentity};

/// Implements [`LoginService`] by asking an [`IdentityProvider`].
#[derive(Clone)]
pub struct IdentityLoginService<P: ?Sized> {
    provider: Arc<P>,
}

impl<P: ?Sized> IdentityLoginService<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

fn map_provider_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Rejected { .. } => Error::unauthorized("invalid session token"),
        IdentityProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::InvalidResponse { message } => {
            Error::internal(format!("identity provider response invalid: {message}"))
        }
    }
}

#[async_trait]
impl<P> LoginService for IdentityLoginService<P>
where
    P: IdentityProvider + ?Sized,
{
    async fn authenticate(&self, token: &SessionToken) -> Result<VerifiedIdentity, Error> {
        self.provider.verify_session(token).await.map_err(|err| {
            warn!(error = %err, "session verification failed");
            map_provider_error(err)
        })
    }
}
