//! Tests for the profile editing state machine.

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{ContactDetails, Email, PhoneNumber, UserId};

fn districts() -> Vec<District> {
    vec![District::new(5, "Colombo"), District::new(11, "Kandy")]
}

fn colombo_towns() -> Vec<Town> {
    vec![Town::new(501, "Colombo", 5), Town::new(504, "Nugegoda", 5)]
}

fn kandy_towns() -> Vec<Town> {
    vec![Town::new(1101, "Kandy", 11), Town::new(1102, "Peradeniya", 11)]
}

fn stored_profile() -> Profile {
    Profile {
        user_id: UserId::new("user_2abc").expect("user id"),
        email: Email::new("nimal@example.com").expect("email"),
        contact: ContactDetails {
            first_name: "Nimal".into(),
            last_name: "Perera".into(),
            phone: PhoneNumber::parse("0771234567").expect("phone"),
            phone_secondary: None,
            whatsapp_primary: true,
            whatsapp_secondary: false,
        },
        district_id: 5,
        town_id: 504,
        updated_at: Utc.with_ymd_and_hms(2025, 11, 1, 8, 0, 0).single().expect("time"),
    }
}

#[fixture]
fn editing_new() -> ProfileForm {
    let mut form = ProfileForm::loading();
    let request = form
        .reference_data_loaded(districts(), None)
        .expect("loaded");
    assert!(request.is_none());
    form
}

#[fixture]
fn editing_existing() -> ProfileForm {
    let mut form = ProfileForm::loading();
    let request = form
        .reference_data_loaded(districts(), Some(&stored_profile()))
        .expect("loaded");
    assert_eq!(request, Some(TownsRequest { district_id: 5 }));
    assert!(form.towns_loaded(5, colombo_towns()));
    form
}

fn fill_contact(form: &mut ProfileForm) {
    form.set_first_name("Nimal");
    form.set_last_name("Perera");
    form.set_phone("0771234567");
}

#[rstest]
fn starts_loading_and_rejects_edits() {
    let mut form = ProfileForm::loading();
    assert_eq!(form.state(), FormState::LoadingReferenceData);
    let err = form.select_district(5).expect_err("not editing yet");
    assert!(matches!(err, ProfileFormError::WrongState { .. }));
}

#[rstest]
fn existing_profile_is_mirrored_by_id(editing_existing: ProfileForm) {
    assert_eq!(editing_existing.state(), FormState::Editing);
    assert_eq!(editing_existing.draft().district_id, Some(5));
    assert_eq!(editing_existing.draft().town_id, Some(504));
    assert_eq!(editing_existing.draft(), editing_existing.committed());
}

#[rstest]
fn changing_district_clears_town_and_requests_towns(mut editing_existing: ProfileForm) {
    let request = editing_existing.select_district(11).expect("select");
    assert_eq!(request, Some(TownsRequest { district_id: 11 }));
    assert_eq!(editing_existing.draft().town_id, None);
    assert!(editing_existing.towns().is_empty());
}

#[rstest]
fn reselecting_current_district_is_a_no_op(mut editing_existing: ProfileForm) {
    let request = editing_existing.select_district(5).expect("select");
    assert!(request.is_none());
    assert_eq!(editing_existing.draft().town_id, Some(504));
    assert_eq!(editing_existing.towns().len(), 2);
}

#[rstest]
fn unknown_district_is_rejected(mut editing_new: ProfileForm) {
    assert_eq!(
        editing_new.select_district(99),
        Err(ProfileFormError::UnknownDistrict(99))
    );
}

#[rstest]
fn stale_town_responses_are_ignored(mut editing_existing: ProfileForm) {
    editing_existing.select_district(11).expect("select");
    assert!(!editing_existing.towns_loaded(5, colombo_towns()));
    assert!(editing_existing.towns().is_empty());
    assert!(editing_existing.towns_loaded(11, kandy_towns()));
    assert_eq!(editing_existing.towns().len(), 2);
}

#[rstest]
fn only_loaded_towns_can_be_selected(mut editing_existing: ProfileForm) {
    assert_eq!(
        editing_existing.select_town(1101),
        Err(ProfileFormError::UnknownTown(1101))
    );
    editing_existing.select_town(501).expect("town in list");
    assert_eq!(editing_existing.draft().town_id, Some(501));
}

#[rstest]
fn submit_sends_ids_not_labels(mut editing_new: ProfileForm) {
    fill_contact(&mut editing_new);
    editing_new.select_district(11).expect("district");
    editing_new.towns_loaded(11, kandy_towns());
    editing_new.select_town(1102).expect("town");

    let changes = editing_new.submit().expect("valid");
    assert_eq!(editing_new.state(), FormState::Saving);
    assert_eq!(changes.request.district, Some(DistrictSelector::Id(11)));
    assert_eq!(changes.request.town_id, Some(1102));
    assert!(changes.request.town_name.is_none());
}

#[rstest]
fn district_change_clears_town_before_next_submit(mut editing_existing: ProfileForm) {
    editing_existing.select_district(11).expect("district");
    let err = editing_existing.submit().expect_err("town missing");
    assert_eq!(
        err,
        ProfileFormError::Invalid(ProfileValidationError::Missing {
            field: ProfileField::Town
        })
    );
    assert_eq!(editing_existing.state(), FormState::Editing);
}

#[rstest]
#[case::no_district(None, ProfileField::District)]
#[case::no_town(Some(5), ProfileField::Town)]
fn location_is_mandatory(
    mut editing_new: ProfileForm,
    #[case] district: Option<i32>,
    #[case] missing: ProfileField,
) {
    fill_contact(&mut editing_new);
    if let Some(district_id) = district {
        editing_new.select_district(district_id).expect("district");
    }
    let err = editing_new.submit().expect_err("location missing");
    assert_eq!(
        err,
        ProfileFormError::Invalid(ProfileValidationError::Missing { field: missing })
    );
    assert_eq!(editing_new.state(), FormState::Editing);
}

#[rstest]
fn invalid_phone_keeps_form_editing(mut editing_existing: ProfileForm) {
    editing_existing.set_phone("not a phone");
    let err = editing_existing.submit().expect_err("invalid");
    assert!(matches!(
        err,
        ProfileFormError::Invalid(ProfileValidationError::InvalidPhone { .. })
    ));
    assert_eq!(editing_existing.state(), FormState::Editing);
}

#[rstest]
fn diff_reports_only_touched_fields(mut editing_existing: ProfileForm) {
    editing_existing.set_last_name("Fernando");
    editing_existing.set_whatsapp_primary(false);
    let changes = editing_existing.submit().expect("valid");
    let changed: Vec<_> = changes.changed.iter().copied().collect();
    assert_eq!(
        changed,
        vec![ProfileField::LastName, ProfileField::WhatsappPrimary]
    );
    assert_eq!(changes.request.first_name, "Nimal");
    assert_eq!(changes.request.last_name, "Fernando");
}

#[rstest]
fn untouched_form_diffs_empty(mut editing_existing: ProfileForm) {
    let changes = editing_existing.submit().expect("valid");
    assert!(changes.is_empty());
}

#[rstest]
fn save_success_commits_and_returns_to_editing(mut editing_existing: ProfileForm) {
    editing_existing.set_first_name("Kamal");
    editing_existing.submit().expect("valid");

    let mut saved = stored_profile();
    saved.contact.first_name = "Kamal".into();
    editing_existing.save_succeeded(&saved).expect("saving");

    assert_eq!(editing_existing.state(), FormState::Editing);
    assert_eq!(editing_existing.committed().first_name, "Kamal");
    assert_eq!(editing_existing.banner(), Some(&Banner::Saved));
}

#[rstest]
fn save_failure_keeps_draft_and_shows_banner(mut editing_existing: ProfileForm) {
    editing_existing.set_first_name("Kamal");
    editing_existing.submit().expect("valid");
    editing_existing
        .save_failed("Failed to update profile")
        .expect("saving");

    assert_eq!(editing_existing.state(), FormState::Editing);
    assert_eq!(editing_existing.draft().first_name, "Kamal");
    assert_eq!(editing_existing.committed().first_name, "Nimal");
    assert_eq!(
        editing_existing.banner(),
        Some(&Banner::Failed("Failed to update profile".into()))
    );
}

#[rstest]
fn save_outcome_requires_saving_state(mut editing_existing: ProfileForm) {
    let err = editing_existing
        .save_failed("late")
        .expect_err("not saving");
    assert_eq!(
        err,
        ProfileFormError::WrongState {
            expected: FormState::Saving,
            actual: FormState::Editing
        }
    );
}
