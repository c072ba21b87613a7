//! PostgreSQL-backed `ProfileRepository`.
//!
//! Profiles are upserted on the identity provider's user id and read back
//! joined with their town and district names.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{ContactDetails, Email, PhoneNumber, Profile, ProfileView, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ProfileRow, ProfileUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::{districts, profiles, towns};

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ProfileRepositoryError {
    map_pool_error(error, ProfileRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_diesel_error(
        error,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

fn corrupt_row(id: &str, column: &str) -> ProfileRepositoryError {
    warn!(profile_id = id, column, "stored profile failed validation");
    ProfileRepositoryError::query(format!("stored profile has invalid {column}"))
}

/// Rebuild the domain profile from a stored row.
pub(crate) fn row_to_profile(row: ProfileRow) -> Result<Profile, ProfileRepositoryError> {
    let user_id = UserId::new(row.id.as_str()).map_err(|_| corrupt_row(&row.id, "id"))?;
    let email = Email::new(row.email.as_str()).map_err(|_| corrupt_row(&row.id, "email"))?;
    let phone = PhoneNumber::parse(&row.phone_number)
        .ok_or_else(|| corrupt_row(&row.id, "phone_number"))?;
    let phone_secondary = match row.phone_number_2.as_deref() {
        Some(raw) => {
            Some(PhoneNumber::parse(raw).ok_or_else(|| corrupt_row(&row.id, "phone_number_2"))?)
        }
        None => None,
    };
    Ok(Profile {
        user_id,
        email,
        contact: ContactDetails {
            first_name: row.first_name,
            last_name: row.last_name,
            phone,
            phone_secondary,
            whatsapp_primary: row.is_whatsapp_primary,
            whatsapp_secondary: row.is_whatsapp_secondary,
        },
        district_id: row.district_id,
        town_id: row.town_id,
        updated_at: row.updated_at,
    })
}

fn upsert_row(profile: &Profile) -> ProfileUpsert<'_> {
    ProfileUpsert {
        id: profile.user_id.as_ref(),
        first_name: &profile.contact.first_name,
        last_name: &profile.contact.last_name,
        email: profile.email.as_ref(),
        phone_number: profile.contact.phone.as_ref(),
        phone_number_2: profile.contact.phone_secondary.as_ref().map(AsRef::as_ref),
        is_whatsapp_primary: profile.contact.whatsapp_primary,
        is_whatsapp_secondary: profile.contact.whatsapp_secondary,
        district_id: profile.district_id,
        town_id: profile.town_id,
        updated_at: profile.updated_at,
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProfileView>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<(ProfileRow, String, String)> = profiles::table
            .inner_join(towns::table.inner_join(districts::table))
            .filter(profiles::id.eq(user_id.as_ref()))
            .select((ProfileRow::as_select(), districts::name, towns::name))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|(row, district_name, town_name)| {
            Ok(ProfileView {
                profile: row_to_profile(row)?,
                district_name,
                town_name,
            })
        })
        .transpose()
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = upsert_row(profile);
        diesel::insert_into(profiles::table)
            .values(&row)
            .on_conflict(profiles::id)
            .do_update()
            .set((
                profiles::first_name.eq(excluded(profiles::first_name)),
                profiles::last_name.eq(excluded(profiles::last_name)),
                profiles::email.eq(excluded(profiles::email)),
                profiles::phone_number.eq(excluded(profiles::phone_number)),
                profiles::phone_number_2.eq(excluded(profiles::phone_number_2)),
                profiles::is_whatsapp_primary.eq(excluded(profiles::is_whatsapp_primary)),
                profiles::is_whatsapp_secondary.eq(excluded(profiles::is_whatsapp_secondary)),
                profiles::district_id.eq(excluded(profiles::district_id)),
                profiles::town_id.eq(excluded(profiles::town_id)),
                profiles::updated_at.eq(excluded(profiles::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }
}
