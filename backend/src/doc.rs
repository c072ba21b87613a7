//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer together
//! with the error schema and the session cookie security scheme. Swagger UI
//! serves it in debug builds and `cargo run --bin openapi-dump` exports it.

use crate::inbound::http::auth::{Banner, SignInRequest, SignUpInfo, SignedInResponse};
use crate::inbound::http::listings::{BrowseResponse, MyListingsResponse, PublishRequest};
use crate::inbound::http::profile::{
    LegacyErrorResponse, LegacySaveProfileRequest, LegacySaveProfileResponse, ProfileRequest,
    ProfileResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /sign-in.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "BookLink backend API",
        description = "Profiles, Sri Lankan locations and A/L book listings behind a session gate."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::banner,
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::locations::list_locations,
        crate::inbound::http::locations::list_districts,
        crate::inbound::http::locations::list_towns,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::put_profile,
        crate::inbound::http::profile::save_profile_legacy,
        crate::inbound::http::listings::publish_listings,
        crate::inbound::http::listings::browse_listings,
        crate::inbound::http::listings::my_listings,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        Banner,
        SignInRequest,
        SignedInResponse,
        SignUpInfo,
        ProfileRequest,
        ProfileResponse,
        LegacySaveProfileRequest,
        LegacySaveProfileResponse,
        LegacyErrorResponse,
        PublishRequest,
        BrowseResponse,
        MyListingsResponse,
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-up and sign-out"),
        (name = "locations", description = "Districts and towns"),
        (name = "profile", description = "Seller contact profile"),
        (name = "listings", description = "Book listings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
