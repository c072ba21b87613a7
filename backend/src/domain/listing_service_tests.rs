//! Tests for batch publish and browse.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{FixtureBookRepository, MockBookRepository, MockProfileRepository};
use crate::domain::{
    ContactDetails, Email, ErrorCode, ListingBatch, PhoneNumber, Profile, ProfileView,
};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn published_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn seller() -> UserId {
    UserId::new("user_2abc").expect("user id")
}

fn seller_profile(seller: &UserId) -> ProfileView {
    ProfileView {
        profile: Profile {
            user_id: seller.clone(),
            email: Email::new("nimal@example.com").expect("email"),
            contact: ContactDetails {
                first_name: "Nimal".into(),
                last_name: "Perera".into(),
                phone: PhoneNumber::parse("0771234567").expect("phone"),
                phone_secondary: None,
                whatsapp_primary: true,
                whatsapp_secondary: false,
            },
            district_id: 12,
            town_id: 1202,
            updated_at: published_at(),
        },
        district_name: "Kegalle".into(),
        town_name: "Mawanella".into(),
    }
}

fn draft(title: &str) -> BookDraft {
    BookDraft {
        title: title.into(),
        price: "1,500".into(),
        description: "Clean copy".into(),
        ..BookDraft::default()
    }
}

fn profiles_with(seller: &UserId) -> MockProfileRepository {
    let view = seller_profile(seller);
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_user()
        .returning(move |_| Ok(Some(view.clone())));
    profiles
}

fn make_service(
    books: MockBookRepository,
    profiles: MockProfileRepository,
) -> ListingService<MockBookRepository, MockProfileRepository> {
    ListingService::new(
        Arc::new(books),
        Arc::new(profiles),
        Arc::new(FixedClock(published_at())),
    )
}

#[rstest]
#[tokio::test]
async fn staged_plus_filled_draft_inserts_n_plus_one_rows(seller: UserId) {
    let mut batch = ListingBatch::default();
    for title in ["Physics", "Chemistry", "Biology"] {
        batch.set_title(title);
        batch.set_price("2000");
        batch.set_description("Good condition");
        batch.add_to_batch().expect("staged");
    }
    batch.set_title("Combined Maths");
    batch.set_price("4000");
    batch.set_description("Pure and applied");
    let drafts = batch.prepare_publish().expect("publishable");

    let inserted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&inserted);
    let mut books = MockBookRepository::new();
    books.expect_insert_batch().times(1).returning(move |records| {
        sink.lock().expect("sink").extend_from_slice(records);
        Ok(records.len())
    });

    let outcome = make_service(books, profiles_with(&seller))
        .publish(&seller, drafts)
        .await
        .expect("published");

    assert_eq!(outcome.published, 4);
    let rows = inserted.lock().expect("rows");
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.seller_id == seller));
    assert!(rows.iter().all(|row| row.created_at == published_at()));
    let ids: Vec<_> = rows.iter().map(|row| row.id).collect();
    assert_eq!(ids, outcome.ids);
}

#[rstest]
#[tokio::test]
async fn one_bad_row_rejects_the_whole_batch(seller: UserId) {
    let mut bad = draft("Chemistry");
    bad.price = "free".into();
    let drafts = vec![draft("Physics"), bad, draft("Biology")];

    let mut books = MockBookRepository::new();
    books.expect_insert_batch().times(0);
    let mut profiles = MockProfileRepository::new();
    profiles.expect_find_by_user().times(0);

    let err = make_service(books, profiles)
        .publish(&seller, drafts)
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("details");
    assert_eq!(details["index"], 1);
    assert_eq!(details["field"], "price");
}

#[rstest]
#[tokio::test]
async fn empty_batch_is_rejected(seller: UserId) {
    let mut books = MockBookRepository::new();
    books.expect_insert_batch().times(0);

    let err = make_service(books, MockProfileRepository::new())
        .publish(&seller, Vec::new())
        .await
        .expect_err("empty");
    assert_eq!(err.details().expect("details")["code"], "empty_batch");
}

#[rstest]
#[tokio::test]
async fn oversized_batch_is_rejected(seller: UserId) {
    let drafts = vec![draft("Physics"); MAX_BATCH_SIZE + 1];
    let mut books = MockBookRepository::new();
    books.expect_insert_batch().times(0);

    let err = make_service(books, MockProfileRepository::new())
        .publish(&seller, drafts)
        .await
        .expect_err("too large");
    assert_eq!(err.details().expect("details")["code"], "batch_too_large");
}

#[rstest]
#[tokio::test]
async fn seller_without_profile_cannot_publish(seller: UserId) {
    let mut profiles = MockProfileRepository::new();
    profiles.expect_find_by_user().returning(|_| Ok(None));
    let mut books = MockBookRepository::new();
    books.expect_insert_batch().times(0);

    let err = make_service(books, profiles)
        .publish(&seller, vec![draft("Physics")])
        .await
        .expect_err("no profile");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn store_failure_surfaces_without_partial_success(seller: UserId) {
    let mut books = MockBookRepository::new();
    books
        .expect_insert_batch()
        .returning(|_| Err(BookRepositoryError::query("constraint violated")));

    let err = make_service(books, profiles_with(&seller))
        .publish(&seller, vec![draft("Physics"), draft("Biology")])
        .await
        .expect_err("store failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn short_insert_count_is_an_error(seller: UserId) {
    let mut books = MockBookRepository::new();
    books.expect_insert_batch().returning(|_| Ok(1));

    let err = make_service(books, profiles_with(&seller))
        .publish(&seller, vec![draft("Physics"), draft("Biology")])
        .await
        .expect_err("count mismatch");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn browse_ignores_filters() {
    let mut books = MockBookRepository::new();
    books
        .expect_recent()
        .withf(|limit| *limit == BROWSE_LIMIT)
        .times(2)
        .returning(|_| Ok(FixtureBookRepository::sample_listings()));
    let service = make_service(books, MockProfileRepository::new());

    let unfiltered = service
        .browse(&ListingFilters::default())
        .await
        .expect("browse");
    let filtered = service
        .browse(&ListingFilters {
            subject: Some("Chemistry".into()),
            district: Some("Galle".into()),
            ..ListingFilters::default()
        })
        .await
        .expect("browse");
    assert_eq!(unfiltered, filtered);
}

#[rstest]
#[tokio::test]
async fn my_ads_are_scoped_to_the_seller(seller: UserId) {
    let expected = seller.clone();
    let mut books = MockBookRepository::new();
    books
        .expect_by_seller()
        .withf(move |id| *id == expected)
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let listings = make_service(books, MockProfileRepository::new())
        .listings_for_seller(&seller)
        .await
        .expect("my ads");
    assert!(listings.is_empty());
}
