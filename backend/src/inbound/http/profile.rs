//! Profile handlers.
//!
//! ```text
//! GET  /api/profile
//! PUT  /api/profile
//! POST /api/save-profile   (legacy profile-completion form)
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{
    DistrictSelector, Error, ErrorCode, ProfileView, SaveProfileRequest, TRACE_ID_HEADER,
    VerifiedIdentity,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile as returned to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(example = "user_2abc")]
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "077 123 4567")]
    pub phone: String,
    pub phone_secondary: Option<String>,
    pub whatsapp_primary: bool,
    pub whatsapp_secondary: bool,
    pub district_id: i32,
    #[schema(example = "Kegalle")]
    pub district_name: String,
    pub town_id: i32,
    #[schema(example = "Mawanella")]
    pub town_name: String,
    /// RFC 3339 timestamp of the last save.
    pub updated_at: String,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        let ProfileView {
            profile,
            district_name,
            town_name,
        } = view;
        Self {
            user_id: profile.user_id.as_ref().to_owned(),
            email: profile.email.as_ref().to_owned(),
            first_name: profile.contact.first_name,
            last_name: profile.contact.last_name,
            phone: profile.contact.phone.as_ref().to_owned(),
            phone_secondary: profile
                .contact
                .phone_secondary
                .map(|phone| phone.as_ref().to_owned()),
            whatsapp_primary: profile.contact.whatsapp_primary,
            whatsapp_secondary: profile.contact.whatsapp_secondary,
            district_id: profile.district_id,
            district_name,
            town_id: profile.town_id,
            town_name,
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for `PUT /api/profile`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub phone_secondary: Option<String>,
    pub whatsapp_primary: bool,
    pub whatsapp_secondary: bool,
    pub district_id: Option<i32>,
    pub town_id: Option<i32>,
}

impl From<ProfileRequest> for SaveProfileRequest {
    fn from(value: ProfileRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            phone_secondary: value.phone_secondary,
            whatsapp_primary: value.whatsapp_primary,
            whatsapp_secondary: value.whatsapp_secondary,
            district: value.district_id.map(DistrictSelector::Id),
            town_id: value.town_id,
            town_name: None,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Profile not completed yet", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let view = state
        .profile
        .fetch_profile(&identity.user_id)
        .await?
        .ok_or_else(|| Error::not_found("profile not completed yet"))?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache"))
        .json(ProfileResponse::from(view)))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Saved profile", body = ProfileResponse),
        (status = 400, description = "Invalid profile", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "saveProfile"
)]
#[put("/profile")]
pub async fn put_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let identity = session.require_identity()?;
    let view = state
        .profile_command
        .save_profile(&identity, payload.into_inner().into())
        .await?;
    Ok(web::Json(ProfileResponse::from(view)))
}

/// Request body of the legacy profile-completion form.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacySaveProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Must equal the signed-in user when present.
    pub user_id: Option<String>,
    /// District display name; must own `townId` when present.
    #[schema(example = "Kegalle")]
    pub district: Option<String>,
    /// Town display name; must match `townId` when present.
    pub town_name: Option<String>,
    pub town_id: Option<i32>,
}

/// Success body of the legacy form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacySaveProfileResponse {
    pub success: bool,
    pub user_id: String,
    pub district: String,
    pub town_name: String,
    pub town_id: i32,
}

/// Failure body of the legacy form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LegacyErrorResponse {
    pub error: String,
}

fn legacy_request(
    identity: &VerifiedIdentity,
    payload: LegacySaveProfileRequest,
) -> Result<SaveProfileRequest, Error> {
    if let Some(claimed) = payload.user_id.as_deref() {
        if claimed != identity.user_id.as_ref() {
            return Err(Error::forbidden("userId does not match the signed-in user"));
        }
    }
    let district = match payload.district.map(|name| name.trim().to_owned()) {
        Some(name) if !name.is_empty() => DistrictSelector::Name(name),
        _ => DistrictSelector::FromTown,
    };
    Ok(SaveProfileRequest {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        phone_secondary: None,
        whatsapp_primary: false,
        whatsapp_secondary: false,
        district: Some(district),
        town_id: payload.town_id,
        town_name: payload.town_name,
    })
}

fn legacy_error_response(error: &Error) -> HttpResponse {
    let (mut builder, message) = match error.code() {
        ErrorCode::Unauthorized => (HttpResponse::Unauthorized(), error.message()),
        ErrorCode::ServiceUnavailable => (
            HttpResponse::ServiceUnavailable(),
            "Service temporarily unavailable",
        ),
        ErrorCode::InternalError => (
            HttpResponse::InternalServerError(),
            "Internal server error",
        ),
        _ => (HttpResponse::BadRequest(), error.message()),
    };
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    builder.json(LegacyErrorResponse {
        error: message.to_owned(),
    })
}

async fn save_legacy(
    state: &HttpState,
    session: &SessionContext,
    body: &[u8],
) -> Result<LegacySaveProfileResponse, Error> {
    let identity = session.require_identity()?;
    let payload: LegacySaveProfileRequest = serde_json::from_slice(body)
        .map_err(|err| Error::invalid_request(format!("invalid request body: {err}")))?;
    let mut request = legacy_request(&identity, payload)?;
    // The form has no secondary-phone fields; keep what is stored.
    if let Some(current) = state.profile.fetch_profile(&identity.user_id).await? {
        let contact = current.profile.contact;
        request.phone_secondary = contact.phone_secondary.map(|phone| phone.as_ref().to_owned());
        request.whatsapp_primary = contact.whatsapp_primary;
        request.whatsapp_secondary = contact.whatsapp_secondary;
    }
    let view = state.profile_command.save_profile(&identity, request).await?;
    Ok(LegacySaveProfileResponse {
        success: true,
        user_id: view.profile.user_id.as_ref().to_owned(),
        district: view.district_name,
        town_name: view.town_name,
        town_id: view.profile.town_id,
    })
}

/// Legacy profile save used by the profile-completion page.
///
/// `townId` is authoritative; `district` and `townName` are checked against
/// it. Failures, malformed bodies included, answer `{"error": "..."}`.
#[utoipa::path(
    post,
    path = "/api/save-profile",
    request_body = LegacySaveProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = LegacySaveProfileResponse),
        (status = 400, description = "Rejected", body = LegacyErrorResponse),
        (status = 401, description = "Unauthorised", body = LegacyErrorResponse),
        (status = 503, description = "Store unavailable", body = LegacyErrorResponse)
    ),
    tags = ["profile"],
    operation_id = "saveProfileLegacy"
)]
#[post("/save-profile")]
pub async fn save_profile_legacy(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> HttpResponse {
    match save_legacy(&state, &session, &body).await {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(error) => {
            warn!(code = ?error.code(), message = error.message(), "legacy profile save failed");
            legacy_error_response(&error)
        }
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
