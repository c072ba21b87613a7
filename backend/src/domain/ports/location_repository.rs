//! Port for district and town reference data.

use async_trait::async_trait;

use crate::domain::{District, Town, TownWithDistrict};

use super::define_port_error;

define_port_error! {
    /// Errors raised by location repository adapters.
    pub enum LocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "location repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "location repository query failed: {message}",
    }
}

/// Read-only access to the seeded location tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// All districts ordered by name.
    async fn list_districts(&self) -> Result<Vec<District>, LocationRepositoryError>;

    /// Towns of one district ordered by name.
    async fn list_towns(&self, district_id: i32) -> Result<Vec<Town>, LocationRepositoryError>;

    /// Every town with its district name, ordered by district then town.
    async fn list_town_directory(&self) -> Result<Vec<TownWithDistrict>, LocationRepositoryError>;

    /// A single town with its district.
    async fn find_town(
        &self,
        town_id: i32,
    ) -> Result<Option<TownWithDistrict>, LocationRepositoryError>;
}

/// Small built-in gazetteer used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLocationRepository;

const FIXTURE_DISTRICTS: &[(i32, &str)] = &[(5, "Colombo"), (6, "Galle"), (11, "Kandy"), (12, "Kegalle")];

const FIXTURE_TOWNS: &[(i32, &str, i32)] = &[
    (501, "Colombo", 5),
    (502, "Dehiwala", 5),
    (503, "Maharagama", 5),
    (504, "Nugegoda", 5),
    (601, "Galle", 6),
    (603, "Hikkaduwa", 6),
    (1101, "Kandy", 11),
    (1102, "Peradeniya", 11),
    (1201, "Kegalle", 12),
    (1202, "Mawanella", 12),
    (1203, "Warakapola", 12),
];

impl FixtureLocationRepository {
    fn district_name(district_id: i32) -> Option<&'static str> {
        FIXTURE_DISTRICTS
            .iter()
            .find(|(id, _)| *id == district_id)
            .map(|(_, name)| *name)
    }

    fn directory() -> Vec<TownWithDistrict> {
        let mut towns: Vec<_> = FIXTURE_TOWNS
            .iter()
            .filter_map(|&(town_id, town_name, district_id)| {
                Self::district_name(district_id).map(|district_name| TownWithDistrict {
                    town_id,
                    town_name: town_name.to_owned(),
                    district_id,
                    district_name: district_name.to_owned(),
                })
            })
            .collect();
        towns.sort_by(|a, b| {
            a.district_name
                .cmp(&b.district_name)
                .then_with(|| a.town_name.cmp(&b.town_name))
        });
        towns
    }
}

#[async_trait]
impl LocationRepository for FixtureLocationRepository {
    async fn list_districts(&self) -> Result<Vec<District>, LocationRepositoryError> {
        let mut districts: Vec<_> = FIXTURE_DISTRICTS
            .iter()
            .map(|&(id, name)| District::new(id, name))
            .collect();
        districts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(districts)
    }

    async fn list_towns(&self, district_id: i32) -> Result<Vec<Town>, LocationRepositoryError> {
        Ok(Self::directory()
            .iter()
            .filter(|entry| entry.district_id == district_id)
            .map(TownWithDistrict::town)
            .collect())
    }

    async fn list_town_directory(&self) -> Result<Vec<TownWithDistrict>, LocationRepositoryError> {
        Ok(Self::directory())
    }

    async fn find_town(
        &self,
        town_id: i32,
    ) -> Result<Option<TownWithDistrict>, LocationRepositoryError> {
        Ok(Self::directory()
            .into_iter()
            .find(|entry| entry.town_id == town_id))
    }
}
