//! PostgreSQL-backed `LocationRepository` reading the seeded district and
//! town tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LocationRepository, LocationRepositoryError};
use crate::domain::{District, Town, TownWithDistrict};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DistrictRow, TownRow};
use super::pool::{DbPool, PoolError};
use super::schema::{districts, towns};

/// Diesel-backed implementation of the `LocationRepository` port.
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> LocationRepositoryError {
    map_pool_error(error, LocationRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> LocationRepositoryError {
    map_diesel_error(
        error,
        LocationRepositoryError::query,
        LocationRepositoryError::connection,
    )
}

fn directory_entry((town, district): (TownRow, DistrictRow)) -> TownWithDistrict {
    TownWithDistrict {
        town_id: town.id,
        town_name: town.name,
        district_id: district.id,
        district_name: district.name,
    }
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn list_districts(&self) -> Result<Vec<District>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<DistrictRow> = districts::table
            .select(DistrictRow::as_select())
            .order(districts::name.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| District::new(row.id, row.name))
            .collect())
    }

    async fn list_towns(&self, district_id: i32) -> Result<Vec<Town>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<TownRow> = towns::table
            .filter(towns::district_id.eq(district_id))
            .select(TownRow::as_select())
            .order(towns::name.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| Town::new(row.id, row.name, row.district_id))
            .collect())
    }

    async fn list_town_directory(&self) -> Result<Vec<TownWithDistrict>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<(TownRow, DistrictRow)> = towns::table
            .inner_join(districts::table)
            .select((TownRow::as_select(), DistrictRow::as_select()))
            .order((districts::name.asc(), towns::name.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(directory_entry).collect())
    }

    async fn find_town(
        &self,
        town_id: i32,
    ) -> Result<Option<TownWithDistrict>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<(TownRow, DistrictRow)> = towns::table
            .inner_join(districts::table)
            .filter(towns::id.eq(town_id))
            .select((TownRow::as_select(), DistrictRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(directory_entry))
    }
}
