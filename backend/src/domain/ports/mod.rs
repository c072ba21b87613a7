//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`IdentityProvider`]) describe what the
//! domain needs from infrastructure and return typed error enums built with
//! `define_port_error!`. Driving ports (`*Query`, `*Command`,
//! [`LoginService`]) are what inbound adapters call and return the domain
//! [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod book_repository;
mod identity_provider;
mod listing_command;
mod listing_query;
mod location_query;
mod location_repository;
mod login_service;
mod profile_command;
mod profile_query;
mod profile_repository;

#[cfg(test)]
pub use book_repository::MockBookRepository;
pub use book_repository::{BookRepository, BookRepositoryError, FixtureBookRepository};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FIXTURE_EMAIL, FIXTURE_SESSION_TOKEN, FIXTURE_USER_ID, FixtureIdentityProvider,
    IdentityProvider, IdentityProviderError,
};
#[cfg(test)]
pub use listing_command::MockListingCommand;
pub use listing_command::{ListingCommand, PublishOutcome};
#[cfg(test)]
pub use listing_query::MockListingQuery;
pub use listing_query::{ListingFilters, ListingQuery};
#[cfg(test)]
pub use location_query::MockLocationQuery;
pub use location_query::LocationQuery;
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::{
    FixtureLocationRepository, LocationRepository, LocationRepositoryError,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{FixtureProfileRepository, ProfileRepository, ProfileRepositoryError};
