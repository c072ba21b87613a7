//! Lookup loader for districts and towns.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::ports::{LocationQuery, LocationRepository, LocationRepositoryError};
use crate::domain::{District, Error, Town, TownWithDistrict};

/// Implements [`LocationQuery`] on top of a [`LocationRepository`].
///
/// List failures are logged and reported as empty lists.
#[derive(Clone)]
pub struct LocationService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ?Sized> LocationService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

pub(crate) fn map_location_error(error: LocationRepositoryError) -> Error {
    match error {
        LocationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("location repository unavailable: {message}"))
        }
        LocationRepositoryError::Query { message } => {
            Error::internal(format!("location repository error: {message}"))
        }
    }
}

fn or_empty<T>(result: Result<Vec<T>, LocationRepositoryError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|err| {
        error!(error = %err, lookup = what, "location lookup failed; serving empty list");
        Vec::new()
    })
}

#[async_trait]
impl<R> LocationQuery for LocationService<R>
where
    R: LocationRepository + ?Sized,
{
    async fn districts(&self) -> Vec<District> {
        or_empty(self.repo.list_districts().await, "districts")
    }

    async fn towns_in_district(&self, district_id: i32) -> Vec<Town> {
        let towns = or_empty(self.repo.list_towns(district_id).await, "towns");
        towns
            .into_iter()
            .filter(|town| town.belongs_to(district_id))
            .collect()
    }

    async fn town_directory(&self) -> Vec<TownWithDistrict> {
        or_empty(self.repo.list_town_directory().await, "town_directory")
    }

    async fn find_town(&self, town_id: i32) -> Result<Option<TownWithDistrict>, Error> {
        self.repo
            .find_town(town_id)
            .await
            .map_err(map_location_error)
    }
}
