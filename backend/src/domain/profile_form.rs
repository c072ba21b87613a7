//! Profile editing workflow as a pure state machine.
//!
//! The form keeps a committed/draft pair. Inputs mutate only the draft; a
//! submit diffs the draft against the committed copy and hands back the write
//! payload. Network calls stay with the caller: transitions that need data
//! return a request ([`TownsRequest`]) instead of fetching it.

use std::collections::BTreeSet;

use super::{
    ContactDetails, District, DistrictSelector, Profile, ProfileField, ProfileValidationError,
    SaveProfileRequest, Town,
};

/// User-visible phase of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    LoadingReferenceData,
    Editing,
    Saving,
}

/// Ask the caller to fetch the towns of `district_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TownsRequest {
    pub district_id: i32,
}

/// Message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Saved,
    Failed(String),
}

/// Transition rejected by the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileFormError {
    #[error("form is {actual:?}, expected {expected:?}")]
    WrongState {
        expected: FormState,
        actual: FormState,
    },
    #[error("district {0} is not in the district list")]
    UnknownDistrict(i32),
    #[error("town {0} is not in the loaded town list")]
    UnknownTown(i32),
    #[error(transparent)]
    Invalid(#[from] ProfileValidationError),
}

/// Editable copy of the profile fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub phone_secondary: String,
    pub whatsapp_primary: bool,
    pub whatsapp_secondary: bool,
    pub district_id: Option<i32>,
    pub town_id: Option<i32>,
}

impl ProfileDraft {
    /// Mirror a stored profile, location by id.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        let contact = &profile.contact;
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            phone: contact.phone.as_ref().to_owned(),
            phone_secondary: contact
                .phone_secondary
                .as_ref()
                .map(|p| p.as_ref().to_owned())
                .unwrap_or_default(),
            whatsapp_primary: contact.whatsapp_primary,
            whatsapp_secondary: contact.whatsapp_secondary,
            district_id: Some(profile.district_id),
            town_id: Some(profile.town_id),
        }
    }

    /// Fields that differ from `committed`, together with the full upsert
    /// payload for this draft.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{ProfileDraft, ProfileField};
    ///
    /// let committed = ProfileDraft::default();
    /// let draft = ProfileDraft { first_name: "Nimal".into(), ..committed.clone() };
    /// let changes = draft.diff(&committed);
    /// assert!(changes.changed.contains(&ProfileField::FirstName));
    /// assert_eq!(changes.changed.len(), 1);
    /// ```
    #[must_use]
    pub fn diff(&self, committed: &Self) -> ProfileChanges {
        let pairs = [
            (ProfileField::FirstName, self.first_name != committed.first_name),
            (ProfileField::LastName, self.last_name != committed.last_name),
            (ProfileField::Phone, self.phone != committed.phone),
            (
                ProfileField::PhoneSecondary,
                self.phone_secondary != committed.phone_secondary,
            ),
            (
                ProfileField::WhatsappPrimary,
                self.whatsapp_primary != committed.whatsapp_primary,
            ),
            (
                ProfileField::WhatsappSecondary,
                self.whatsapp_secondary != committed.whatsapp_secondary,
            ),
            (ProfileField::District, self.district_id != committed.district_id),
            (ProfileField::Town, self.town_id != committed.town_id),
        ];
        ProfileChanges {
            changed: pairs
                .into_iter()
                .filter_map(|(field, differs)| differs.then_some(field))
                .collect(),
            request: self.to_request(),
        }
    }

    fn to_request(&self) -> SaveProfileRequest {
        let secondary = self.phone_secondary.trim();
        SaveProfileRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            phone_secondary: (!secondary.is_empty()).then(|| secondary.to_owned()),
            whatsapp_primary: self.whatsapp_primary,
            whatsapp_secondary: self.whatsapp_secondary,
            district: self.district_id.map(DistrictSelector::Id),
            town_id: self.town_id,
            town_name: None,
        }
    }

    fn validate(&self) -> Result<(), ProfileValidationError> {
        ContactDetails::parse(
            &self.first_name,
            &self.last_name,
            &self.phone,
            Some(&self.phone_secondary),
            self.whatsapp_primary,
            self.whatsapp_secondary,
        )?;
        if self.district_id.is_none() {
            return Err(ProfileValidationError::Missing {
                field: ProfileField::District,
            });
        }
        if self.town_id.is_none() {
            return Err(ProfileValidationError::Missing {
                field: ProfileField::Town,
            });
        }
        Ok(())
    }
}

/// Output of [`ProfileDraft::diff`].
///
/// The request always carries every field; `changed` records which ones the
/// user actually touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub changed: BTreeSet<ProfileField>,
    pub request: SaveProfileRequest,
}

impl ProfileChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Towns loaded for one district.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadedTowns {
    district_id: i32,
    towns: Vec<Town>,
}

/// Profile editing state machine.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    state: FormState,
    districts: Vec<District>,
    towns: Option<LoadedTowns>,
    committed: ProfileDraft,
    draft: ProfileDraft,
    banner: Option<Banner>,
}

impl ProfileForm {
    /// Fresh form waiting for districts and the stored profile.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            state: FormState::LoadingReferenceData,
            districts: Vec::new(),
            towns: None,
            committed: ProfileDraft::default(),
            draft: ProfileDraft::default(),
            banner: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    #[must_use]
    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    #[must_use]
    pub fn committed(&self) -> &ProfileDraft {
        &self.committed
    }

    #[must_use]
    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// Towns offered for the selected district; empty until loaded.
    #[must_use]
    pub fn towns(&self) -> &[Town] {
        self.towns.as_ref().map_or(&[], |loaded| loaded.towns.as_slice())
    }

    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Reference data arrived. Returns the towns to fetch when the stored
    /// profile already names a district.
    pub fn reference_data_loaded(
        &mut self,
        districts: Vec<District>,
        committed: Option<&Profile>,
    ) -> Result<Option<TownsRequest>, ProfileFormError> {
        self.expect_state(FormState::LoadingReferenceData)?;
        self.districts = districts;
        self.committed = committed.map(ProfileDraft::from_profile).unwrap_or_default();
        self.draft = self.committed.clone();
        self.state = FormState::Editing;
        Ok(self
            .draft
            .district_id
            .map(|district_id| TownsRequest { district_id }))
    }

    /// Pick a district. Clears the town and asks for the district's towns;
    /// re-selecting the current district changes nothing.
    pub fn select_district(
        &mut self,
        district_id: i32,
    ) -> Result<Option<TownsRequest>, ProfileFormError> {
        self.expect_state(FormState::Editing)?;
        if self.draft.district_id == Some(district_id) {
            return Ok(None);
        }
        if !self.districts.iter().any(|d| d.id == district_id) {
            return Err(ProfileFormError::UnknownDistrict(district_id));
        }
        self.draft.district_id = Some(district_id);
        self.draft.town_id = None;
        self.towns = None;
        Ok(Some(TownsRequest { district_id }))
    }

    /// Install a town list. Returns `false` and ignores the list when it
    /// belongs to a district that is no longer selected.
    pub fn towns_loaded(&mut self, district_id: i32, towns: Vec<Town>) -> bool {
        if self.draft.district_id != Some(district_id) {
            return false;
        }
        self.towns = Some(LoadedTowns { district_id, towns });
        true
    }

    /// Pick a town from the loaded list.
    pub fn select_town(&mut self, town_id: i32) -> Result<(), ProfileFormError> {
        self.expect_state(FormState::Editing)?;
        if !self.towns().iter().any(|t| t.id == town_id) {
            return Err(ProfileFormError::UnknownTown(town_id));
        }
        self.draft.town_id = Some(town_id);
        Ok(())
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.draft.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.draft.last_name = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.draft.phone = value.into();
    }

    pub fn set_phone_secondary(&mut self, value: impl Into<String>) {
        self.draft.phone_secondary = value.into();
    }

    pub fn set_whatsapp_primary(&mut self, value: bool) {
        self.draft.whatsapp_primary = value;
    }

    pub fn set_whatsapp_secondary(&mut self, value: bool) {
        self.draft.whatsapp_secondary = value;
    }

    /// Validate locally and enter `Saving`. On failure the form stays in
    /// `Editing` and nothing is returned for the write.
    pub fn submit(&mut self) -> Result<ProfileChanges, ProfileFormError> {
        self.expect_state(FormState::Editing)?;
        self.draft.validate()?;
        if let (Some(loaded), Some(town_id)) = (&self.towns, self.draft.town_id) {
            let in_list = loaded.towns.iter().any(|t| t.id == town_id);
            if Some(loaded.district_id) == self.draft.district_id && !in_list {
                return Err(ProfileValidationError::TownOutsideDistrict { town_id }.into());
            }
        }
        self.banner = None;
        self.state = FormState::Saving;
        Ok(self.draft.diff(&self.committed))
    }

    /// The write went through; `saved` becomes the committed copy.
    pub fn save_succeeded(&mut self, saved: &Profile) -> Result<(), ProfileFormError> {
        self.expect_state(FormState::Saving)?;
        self.committed = ProfileDraft::from_profile(saved);
        self.draft = self.committed.clone();
        self.banner = Some(Banner::Saved);
        self.state = FormState::Editing;
        Ok(())
    }

    /// The write failed; the draft is kept for another attempt.
    pub fn save_failed(&mut self, message: impl Into<String>) -> Result<(), ProfileFormError> {
        self.expect_state(FormState::Saving)?;
        self.banner = Some(Banner::Failed(message.into()));
        self.state = FormState::Editing;
        Ok(())
    }

    fn expect_state(&self, expected: FormState) -> Result<(), ProfileFormError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ProfileFormError::WrongState {
                expected,
                actual: self.state,
            })
        }
    }
}

#[cfg(test)]
#[path = "profile_form_tests.rs"]
mod tests;
