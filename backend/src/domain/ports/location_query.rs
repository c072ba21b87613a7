//! Driving port for the district and town pickers.

use async_trait::async_trait;

use crate::domain::{District, Error, Town, TownWithDistrict};

/// Lookup use-cases backing the location pickers.
///
/// The list operations never fail: an unreachable store yields an empty
/// list, exactly like a store with no rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationQuery: Send + Sync {
    /// All districts ordered by name.
    async fn districts(&self) -> Vec<District>;

    /// Towns of `district_id` ordered by name.
    async fn towns_in_district(&self, district_id: i32) -> Vec<Town>;

    /// Every town joined with its district name.
    async fn town_directory(&self) -> Vec<TownWithDistrict>;

    /// Resolve a single town. Unlike the list operations this surfaces
    /// repository failures, because writes depend on the answer.
    async fn find_town(&self, town_id: i32) -> Result<Option<TownWithDistrict>, Error>;
}
