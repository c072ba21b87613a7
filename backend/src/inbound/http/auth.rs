//! Sign-in, sign-up and sign-out handlers.
//!
//! ```text
//! GET  /
//! POST /sign-in {"sessionToken":"<token issued by the identity provider>"}
//! GET  /sign-up
//! POST /sign-out
//! ```
//!
//! Credentials never reach this service: the client signs in with the hosted
//! identity provider and hands over the resulting session token, which is
//! verified once and exchanged for a private session cookie.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, SessionToken, SessionTokenError, VerifiedIdentity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Service banner returned by `GET /`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[schema(example = "A/L BookLink")]
    pub service: String,
    pub signed_in: bool,
}

/// Request body for `POST /sign-in`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// Session token issued by the identity provider.
    pub session_token: String,
}

/// Identity established by a successful sign-in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedInResponse {
    #[schema(example = "user_2abc")]
    pub user_id: String,
    #[schema(example = "nimal@example.com")]
    pub email: String,
}

impl From<&VerifiedIdentity> for SignedInResponse {
    fn from(identity: &VerifiedIdentity) -> Self {
        Self {
            user_id: identity.user_id.as_ref().to_owned(),
            email: identity.email.as_ref().to_owned(),
        }
    }
}

/// Where an anonymous visitor goes next.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpInfo {
    #[schema(example = "/sign-in")]
    pub sign_in: String,
    #[schema(example = "/complete-profile")]
    pub complete_profile: String,
}

fn map_token_error(err: SessionTokenError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "sessionToken", "code": "invalid_session_token" }))
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = Banner)),
    tags = ["auth"],
    operation_id = "banner",
    security([])
)]
#[get("/")]
pub async fn banner(session: SessionContext) -> ApiResult<web::Json<Banner>> {
    Ok(web::Json(Banner {
        service: "A/L BookLink".to_owned(),
        signed_in: session.identity()?.is_some(),
    }))
}

/// Exchange an identity provider session token for a session cookie.
#[utoipa::path(
    post,
    path = "/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignedInResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed token", body = ErrorSchema),
        (status = 401, description = "Token rejected", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInRequest>,
) -> ApiResult<web::Json<SignedInResponse>> {
    let token = SessionToken::parse(&payload.session_token).map_err(map_token_error)?;
    let identity = state.login.authenticate(&token).await?;
    session.persist_identity(&identity)?;
    info!(user_id = %identity.user_id, "signed in");
    Ok(web::Json(SignedInResponse::from(&identity)))
}

/// Sign-up itself happens at the identity provider; the gateway redirects
/// completed sign-ups to profile completion.
#[utoipa::path(
    get,
    path = "/sign-up",
    responses(
        (status = 200, description = "Next steps", body = SignUpInfo),
        (status = 303, description = "Redirect to profile completion or home")
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[get("/sign-up")]
pub async fn sign_up() -> web::Json<SignUpInfo> {
    web::Json(SignUpInfo {
        sign_in: "/sign-in".to_owned(),
        complete_profile: "/complete-profile".to_owned(),
    })
}

#[utoipa::path(
    post,
    path = "/sign-out",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signOut"
)]
#[post("/sign-out")]
pub async fn sign_out(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
