//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    FixtureBookRepository, FixtureIdentityProvider, FixtureLocationRepository,
    FixtureProfileRepository,
};
use crate::domain::{
    Email, IdentityLoginService, ListingService, LocationService, ProfileService, UserId,
    VerifiedIdentity,
};
use crate::inbound::http::state::HttpState;

/// Session middleware with a fresh key, cookie name `session` and no
/// `Secure` flag so plain-HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

pub fn sample_identity() -> VerifiedIdentity {
    VerifiedIdentity::new(
        UserId::new("user_2abc").expect("fixture user id"),
        Email::new("nimal@example.com").expect("fixture email"),
    )
}

/// The session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// State backed by the real services over fixture repositories.
pub fn test_state() -> HttpState {
    let locations = Arc::new(FixtureLocationRepository);
    let profiles = Arc::new(FixtureProfileRepository::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let profile = Arc::new(ProfileService::new(
        profiles.clone(),
        locations.clone(),
        clock.clone(),
    ));
    let listings = Arc::new(ListingService::new(
        Arc::new(FixtureBookRepository),
        profiles,
        clock,
    ));
    HttpState::new(
        Arc::new(IdentityLoginService::new(Arc::new(FixtureIdentityProvider))),
        Arc::new(LocationService::new(locations)),
        profile.clone(),
        profile,
        listings.clone(),
        listings,
    )
}
