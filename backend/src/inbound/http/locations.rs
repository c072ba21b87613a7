//! District and town lookup handlers.
//!
//! ```text
//! GET /api/locations
//! GET /api/districts
//! GET /api/districts/{district_id}/towns
//! ```
//!
//! Lookup failures are logged by the service and surface here as empty
//! lists, so these handlers always answer `200`.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{District, Town, TownWithDistrict};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Every town with its district, ordered by district then town name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TownDirectory {
    pub towns: Vec<TownWithDistrict>,
}

#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "Town directory", body = TownDirectory),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listLocations"
)]
#[get("/locations")]
pub async fn list_locations(state: web::Data<HttpState>) -> web::Json<TownDirectory> {
    web::Json(TownDirectory {
        towns: state.locations.town_directory().await,
    })
}

#[utoipa::path(
    get,
    path = "/api/districts",
    responses(
        (status = 200, description = "Districts ordered by name", body = [District]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listDistricts"
)]
#[get("/districts")]
pub async fn list_districts(state: web::Data<HttpState>) -> web::Json<Vec<District>> {
    web::Json(state.locations.districts().await)
}

#[utoipa::path(
    get,
    path = "/api/districts/{district_id}/towns",
    params(("district_id" = i32, Path, description = "District identifier")),
    responses(
        (status = 200, description = "Towns of the district ordered by name", body = [Town]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listTownsInDistrict"
)]
#[get("/districts/{district_id}/towns")]
pub async fn list_towns(
    state: web::Data<HttpState>,
    district_id: web::Path<i32>,
) -> web::Json<Vec<Town>> {
    web::Json(state.locations.towns_in_district(district_id.into_inner()).await)
}
