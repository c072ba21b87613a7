//! Listing publish and browse handlers.
//!
//! ```text
//! POST /api/listings {"books":[{"title":"...","price":"2,500",...}]}
//! GET  /api/listings?stream=&subject=&district=&medium=
//! GET  /api/my-ads
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ListingFilters, PublishOutcome};
use crate::domain::{BookDraft, Listing};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const STREAMS: &[&str] = &["Physical Science", "Biological Science", "Commerce", "Arts"];
const SUBJECTS: &[&str] = &["Physics", "Chemistry", "Combined Maths"];
const DISTRICTS: &[&str] = &["Colombo", "Kandy", "Galle"];
const MEDIUMS: &[&str] = &["Sinhala", "English", "Tamil"];

/// Request body for `POST /api/listings`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PublishRequest {
    /// Every book of the batch, staged drafts first.
    pub books: Vec<BookDraft>,
}

/// Choices offered by the search bar.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FilterOptions {
    pub streams: Vec<String>,
    pub subjects: Vec<String>,
    pub districts: Vec<String>,
    pub mediums: Vec<String>,
}

impl FilterOptions {
    fn search_bar() -> Self {
        let owned = |values: &[&str]| values.iter().map(|v| (*v).to_owned()).collect();
        Self {
            streams: owned(STREAMS),
            subjects: owned(SUBJECTS),
            districts: owned(DISTRICTS),
            mediums: owned(MEDIUMS),
        }
    }
}

/// Listing grid with the search bar state.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BrowseResponse {
    pub listings: Vec<Listing>,
    /// Selections echoed back; they do not narrow `listings`.
    pub filters: ListingFilters,
    pub options: FilterOptions,
}

/// The caller's own listings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyListingsResponse {
    pub listings: Vec<Listing>,
}

/// Publish a batch of books in one insert.
///
/// Any invalid book rejects the whole batch; `details.index` names it.
#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = PublishRequest,
    responses(
        (status = 201, description = "Batch published", body = PublishOutcome),
        (status = 400, description = "Empty batch or invalid book", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Profile not completed", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "publishListings"
)]
#[post("/listings")]
pub async fn publish_listings(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PublishRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let outcome = state
        .listings_command
        .publish(&identity.user_id, payload.into_inner().books)
        .await?;
    Ok(HttpResponse::Created().json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/listings",
    params(ListingFilters),
    responses(
        (status = 200, description = "Recent listings", body = BrowseResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "browseListings"
)]
#[get("/listings")]
pub async fn browse_listings(
    state: web::Data<HttpState>,
    filters: web::Query<ListingFilters>,
) -> ApiResult<web::Json<BrowseResponse>> {
    let filters = filters.into_inner();
    let listings = state.listings.browse(&filters).await?;
    Ok(web::Json(BrowseResponse {
        listings,
        filters,
        options: FilterOptions::search_bar(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/my-ads",
    responses(
        (status = 200, description = "Caller's listings", body = MyListingsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "myListings"
)]
#[get("/my-ads")]
pub async fn my_listings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MyListingsResponse>> {
    let identity = session.require_identity()?;
    let listings = state.listings.listings_for_seller(&identity.user_id).await?;
    Ok(web::Json(MyListingsResponse { listings }))
}
