//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle through `web::Data` so they depend only on
//! driving ports and stay testable with mocks.

use std::sync::Arc;

use crate::domain::ports::{
    ListingCommand, ListingQuery, LocationQuery, LoginService, ProfileCommand, ProfileQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub locations: Arc<dyn LocationQuery>,
    pub profile: Arc<dyn ProfileQuery>,
    pub profile_command: Arc<dyn ProfileCommand>,
    pub listings: Arc<dyn ListingQuery>,
    pub listings_command: Arc<dyn ListingCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureBookRepository, FixtureIdentityProvider, FixtureLocationRepository,
    ///     FixtureProfileRepository,
    /// };
    /// use backend::domain::{IdentityLoginService, ListingService, LocationService, ProfileService};
    /// use backend::inbound::http::state::HttpState;
    /// use mockable::DefaultClock;
    ///
    /// let locations = Arc::new(FixtureLocationRepository);
    /// let profiles = Arc::new(FixtureProfileRepository::new());
    /// let profile = Arc::new(ProfileService::new(
    ///     profiles.clone(),
    ///     locations.clone(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let listings = Arc::new(ListingService::new(
    ///     Arc::new(FixtureBookRepository),
    ///     profiles,
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     Arc::new(IdentityLoginService::new(Arc::new(FixtureIdentityProvider))),
    ///     Arc::new(LocationService::new(locations)),
    ///     profile.clone(),
    ///     profile,
    ///     listings.clone(),
    ///     listings,
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        locations: Arc<dyn LocationQuery>,
        profile: Arc<dyn ProfileQuery>,
        profile_command: Arc<dyn ProfileCommand>,
        listings: Arc<dyn ListingQuery>,
        listings_command: Arc<dyn ListingCommand>,
    ) -> Self {
        Self {
            login,
            locations,
            profile,
            profile_command,
            listings,
            listings_command,
        }
    }
}
