//! Builders for the HTTP state bundle.
//!
//! With a database pool the services run over the Diesel repositories;
//! without one they run over the in-process fixtures.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use backend::domain::ports::{
    BookRepository, FixtureBookRepository, FixtureIdentityProvider, FixtureLocationRepository,
    FixtureProfileRepository, IdentityProvider, LocationRepository, ProfileRepository,
};
use backend::domain::{IdentityLoginService, ListingService, LocationService, ProfileService};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DieselBookRepository, DieselLocationRepository, DieselProfileRepository,
};

use super::ServerConfig;

struct Repositories {
    locations: Arc<dyn LocationRepository>,
    profiles: Arc<dyn ProfileRepository>,
    books: Arc<dyn BookRepository>,
}

fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => Repositories {
            locations: Arc::new(DieselLocationRepository::new(pool.clone())),
            profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
            books: Arc::new(DieselBookRepository::new(pool.clone())),
        },
        None => {
            warn!("no database configured; serving fixture listings and keeping profiles in memory");
            Repositories {
                locations: Arc::new(FixtureLocationRepository),
                profiles: Arc::new(FixtureProfileRepository::new()),
                books: Arc::new(FixtureBookRepository),
            }
        }
    }
}

fn build_identity_provider(config: &ServerConfig) -> Arc<dyn IdentityProvider> {
    match &config.identity_provider {
        Some(provider) => provider.clone(),
        None => {
            warn!("no identity provider configured; accepting the fixture session token only");
            Arc::new(FixtureIdentityProvider)
        }
    }
}

/// Wire every driving port for the configured adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let Repositories {
        locations,
        profiles,
        books,
    } = build_repositories(config);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let profile = Arc::new(ProfileService::new(
        profiles.clone(),
        locations.clone(),
        clock.clone(),
    ));
    let listings = Arc::new(ListingService::new(books, profiles, clock));

    web::Data::new(HttpState::new(
        Arc::new(IdentityLoginService::new(build_identity_provider(config))),
        Arc::new(LocationService::new(locations)),
        profile.clone(),
        profile,
        listings.clone(),
        listings,
    ))
}
