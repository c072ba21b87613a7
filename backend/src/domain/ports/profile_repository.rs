//! Port for seller profile persistence.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{Profile, ProfileView, UserId};

use super::{FixtureLocationRepository, LocationRepository, define_port_error};

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
    }
}

/// Profile storage keyed by the identity provider's user id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Load a profile with its district and town names.
    async fn find_by_user(&self, user_id: &UserId)
    -> Result<Option<ProfileView>, ProfileRepositoryError>;

    /// Insert the profile, or overwrite the existing row for the same user.
    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;
}

/// Profiles kept in process memory when no database is configured.
///
/// Clones share one map. Names resolve through the fixture gazetteer.
#[derive(Debug, Default, Clone)]
pub struct FixtureProfileRepository {
    profiles: Arc<Mutex<HashMap<String, Profile>>>,
    locations: FixtureLocationRepository,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FixtureProfileRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.profiles).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ProfileView>, ProfileRepositoryError> {
        let stored = lock(&self.profiles).get(user_id.as_ref()).cloned();
        let Some(profile) = stored else {
            return Ok(None);
        };
        let town = self
            .locations
            .find_town(profile.town_id)
            .await
            .map_err(|error| ProfileRepositoryError::query(error.to_string()))?
            .ok_or_else(|| ProfileRepositoryError::query("stored profile has unknown town"))?;
        Ok(Some(ProfileView {
            profile,
            district_name: town.district_name,
            town_name: town.town_name,
        }))
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        lock(&self.profiles).insert(profile.user_id.as_ref().to_owned(), profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::{ContactDetails, Email};
    use chrono::{TimeZone, Utc};

    fn profile(first_name: &str) -> Profile {
        Profile {
            user_id: UserId::new("user_2abc").expect("user id"),
            email: Email::new("nimal@example.com").expect("email"),
            contact: ContactDetails::parse(first_name, "Perera", "0771234567", None, true, false)
                .expect("contact"),
            district_id: 12,
            town_id: 1202,
            updated_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[tokio::test]
    async fn fixture_starts_empty() {
        let repo = FixtureProfileRepository::new();
        let user = UserId::new("user_2abc").expect("user id");
        let found = repo.find_by_user(&user).await.expect("fixture lookup");
        assert!(found.is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn fixture_reads_back_saved_profiles_across_clones() {
        let repo = FixtureProfileRepository::new();
        let shared = repo.clone();
        repo.upsert(&profile("Nimal")).await.expect("first save");
        repo.upsert(&profile("Kamal")).await.expect("overwrite");

        let view = shared
            .find_by_user(&UserId::new("user_2abc").expect("user id"))
            .await
            .expect("fixture lookup")
            .expect("saved profile");
        assert_eq!(shared.len(), 1);
        assert_eq!(view.profile.contact.first_name, "Kamal");
        assert_eq!(view.district_name, "Kegalle");
        assert_eq!(view.town_name, "Mawanella");
    }

    #[test]
    fn connection_error_formats_message() {
        let err = ProfileRepositoryError::connection("pool timed out");
        assert_eq!(
            err.to_string(),
            "profile repository connection failed: pool timed out"
        );
    }
}
