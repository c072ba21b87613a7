//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The signed-in identity lives in the private session cookie as the
//! provider's user id plus the verified email. Anything unreadable in the
//! cookie is treated as "not signed in".

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Email, Error, UserId, VerifiedIdentity};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const EMAIL_KEY: &str = "email";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the verified identity in the session cookie.
    pub fn persist_identity(&self, identity: &VerifiedIdentity) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, identity.user_id.as_ref())
            .and_then(|()| self.0.insert(EMAIL_KEY, identity.email.as_ref()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the signed-in identity, if any.
    pub fn identity(&self) -> Result<Option<VerifiedIdentity>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_email)) = (read(USER_ID_KEY)?, read(EMAIL_KEY)?) else {
            return Ok(None);
        };
        match (UserId::new(raw_id), Email::new(raw_email)) {
            (Ok(user_id), Ok(email)) => Ok(Some(VerifiedIdentity::new(user_id, email))),
            (Err(error), _) | (_, Err(error)) => {
                warn!(%error, "invalid identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a signed-in identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<VerifiedIdentity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("sign in required"))
    }

    /// Forget the signed-in identity.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
