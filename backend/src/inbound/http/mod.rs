//! HTTP inbound adapter exposing REST endpoints.
//!
//! Session-gated JSON endpoints live under `/api`; sign-in, sign-up and the
//! health probes sit at the root.

pub mod auth;
pub mod error;
pub mod health;
pub mod listings;
pub mod locations;
pub mod profile;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Register every handler on `cfg`.
///
/// Expects [`state::HttpState`] and [`health::HealthState`] as app data and
/// the session middleware around the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::banner)
        .service(auth::sign_in)
        .service(auth::sign_up)
        .service(auth::sign_out)
        .service(health::ready)
        .service(health::live)
        .service(
            web::scope("/api")
                .service(locations::list_locations)
                .service(locations::list_districts)
                .service(locations::list_towns)
                .service(profile::get_profile)
                .service(profile::put_profile)
                .service(profile::save_profile_legacy)
                .service(listings::publish_listings)
                .service(listings::browse_listings)
                .service(listings::my_listings),
        );
}
