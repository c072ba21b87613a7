//! Profile reconciliation: resolve the submitted location, then upsert.
//!
//! The submitted town id is authoritative. Whatever else names the location
//! (a district id, a district display name, a town display name) must agree
//! with it, otherwise the write is refused before it reaches the store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, instrument};

use crate::domain::location_service::map_location_error;
use crate::domain::ports::{
    LocationRepository, ProfileCommand, ProfileQuery, ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{
    DistrictSelector, Error, Profile, ProfileField, ProfileValidationError, ProfileView,
    SaveProfileRequest, TownWithDistrict, UserId, VerifiedIdentity,
};

/// Profile service implementing [`ProfileQuery`] and [`ProfileCommand`].
#[derive(Clone)]
pub struct ProfileService<P: ?Sized, L: ?Sized> {
    profiles: Arc<P>,
    locations: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<P: ?Sized, L: ?Sized> ProfileService<P, L> {
    /// Build the service; `clock` stamps `updated_at` on every save.
    pub fn new(profiles: Arc<P>, locations: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            profiles,
            locations,
            clock,
        }
    }
}

fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
    }
}

/// Check every location claim in `request` against the resolved town.
fn reconcile_location(
    request: &SaveProfileRequest,
    town: &TownWithDistrict,
) -> Result<(), ProfileValidationError> {
    let town_id = town.town_id;
    match &request.district {
        Some(DistrictSelector::Id(district_id)) if *district_id != town.district_id => {
            return Err(ProfileValidationError::TownOutsideDistrict { town_id });
        }
        Some(DistrictSelector::Name(name)) if !town.district_named(name) => {
            return Err(ProfileValidationError::TownOutsideDistrict { town_id });
        }
        Some(_) => {}
        None => {
            return Err(ProfileValidationError::Missing {
                field: ProfileField::District,
            });
        }
    }
    match &request.town_name {
        Some(name) if !name.trim().is_empty() && !town.town_named(name) => {
            Err(ProfileValidationError::TownNameMismatch { town_id })
        }
        _ => Ok(()),
    }
}

impl<P, L> ProfileService<P, L>
where
    P: ProfileRepository + ?Sized,
    L: LocationRepository + ?Sized,
{
    async fn resolve_town(&self, request: &SaveProfileRequest) -> Result<TownWithDistrict, Error> {
        let town_id = request.town_id.ok_or(ProfileValidationError::Missing {
            field: ProfileField::Town,
        })?;
        let town = self
            .locations
            .find_town(town_id)
            .await
            .map_err(map_location_error)?
            .ok_or(ProfileValidationError::UnknownTown { town_id })?;
        reconcile_location(request, &town)?;
        Ok(town)
    }
}

#[async_trait]
impl<P, L> ProfileQuery for ProfileService<P, L>
where
    P: ProfileRepository + ?Sized,
    L: LocationRepository + ?Sized,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<ProfileView>, Error> {
        self.profiles
            .find_by_user(user_id)
            .await
            .map_err(map_profile_error)
    }
}

#[async_trait]
impl<P, L> ProfileCommand for ProfileService<P, L>
where
    P: ProfileRepository + ?Sized,
    L: LocationRepository + ?Sized,
{
    #[instrument(skip(self, identity, request), fields(user_id = %identity.user_id))]
    async fn save_profile(
        &self,
        identity: &VerifiedIdentity,
        request: SaveProfileRequest,
    ) -> Result<ProfileView, Error> {
        let contact = request.contact_details()?;
        let town = self.resolve_town(&request).await?;

        let profile = Profile {
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            contact,
            district_id: town.district_id,
            town_id: town.town_id,
            updated_at: self.clock.utc(),
        };
        self.profiles
            .upsert(&profile)
            .await
            .map_err(map_profile_error)?;
        info!(town_id = town.town_id, "profile saved");

        Ok(ProfileView {
            profile,
            district_name: town.district_name,
            town_name: town.town_name,
        })
    }
}

#[cfg(test)]
#[path = "profile_service_tests.rs"]
mod tests;
