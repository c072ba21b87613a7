//! Batch publishing and browsing over the assembled app.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend::domain::ports::FIXTURE_USER_ID;
use backend::test_support::{InMemoryBackend, booklink_app, test_session_settings};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use support::{draft, mawanella_profile, sign_in};

#[fixture]
fn in_memory() -> InMemoryBackend {
    InMemoryBackend::default()
}

macro_rules! complete_profile {
    ($app:expr, $cookie:expr) => {{
        let res = test::call_service(
            $app,
            test::TestRequest::put()
                .uri("/api/profile")
                .cookie($cookie.clone())
                .set_json(mawanella_profile())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }};
}

#[rstest]
#[actix_web::test]
async fn publishing_requires_a_completed_profile(in_memory: InMemoryBackend) {
    let app = test::init_service(booklink_app(
        in_memory.http_state(),
        &test_session_settings(),
    ))
    .await;
    let cookie = sign_in(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/listings")
            .cookie(cookie)
            .set_json(json!({ "books": [draft("Physics Papers", "2500")] }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(in_memory.books.records().is_empty());
}

#[rstest]
#[actix_web::test]
async fn published_batch_shows_up_in_my_ads(in_memory: InMemoryBackend) {
    let app = test::init_service(booklink_app(
        in_memory.http_state(),
        &test_session_settings(),
    ))
    .await;
    let cookie = sign_in(&app).await;
    complete_profile!(&app, cookie);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/listings")
            .cookie(cookie.clone())
            .set_json(json!({
                "books": [draft("Physics Papers", "2500"), draft("Chemistry Tutes", "1,800")]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let outcome: Value = test::read_body_json(res).await;
    assert_eq!(outcome["published"], 2);
    assert_eq!(outcome["ids"].as_array().map(Vec::len), Some(2));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/my-ads")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let listings = body["listings"].as_array().expect("listings array");
    assert_eq!(listings.len(), 2);
    for listing in listings {
        assert_eq!(listing["seller"]["sellerId"], FIXTURE_USER_ID);
        assert_eq!(listing["seller"]["name"], "Nimal Perera");
        assert_eq!(listing["seller"]["townName"], "Mawanella");
    }
}

#[rstest]
#[actix_web::test]
async fn one_bad_book_rejects_the_whole_batch(in_memory: InMemoryBackend) {
    let app = test::init_service(booklink_app(
        in_memory.http_state(),
        &test_session_settings(),
    ))
    .await;
    let cookie = sign_in(&app).await;
    complete_profile!(&app, cookie);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/listings")
            .cookie(cookie)
            .set_json(json!({
                "books": [draft("Physics Papers", "2500"), draft("Bio Notes", "cheap")]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["index"], 1);
    assert!(in_memory.books.records().is_empty());
}

#[rstest]
#[actix_web::test]
async fn browse_echoes_filters_without_narrowing(in_memory: InMemoryBackend) {
    let app = test::init_service(booklink_app(
        in_memory.http_state(),
        &test_session_settings(),
    ))
    .await;
    let cookie = sign_in(&app).await;
    complete_profile!(&app, cookie);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/listings")
            .cookie(cookie.clone())
            .set_json(json!({ "books": [draft("Physics Papers", "2500")] }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/listings?subject=Chemistry&district=Kandy")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["filters"]["subject"], "Chemistry");
    assert_eq!(body["filters"]["district"], "Kandy");
    assert_eq!(body["listings"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["listings"][0]["title"], "Physics Papers");
}
