//! Tests for the profile handlers.

use super::*;
use std::sync::Arc;

use crate::domain::ports::{MockProfileCommand, MockProfileQuery};
use crate::domain::{ContactDetails, Email, PhoneNumber, Profile, UserId};
use crate::inbound::http::test_utils::{
    sample_identity, session_cookie, test_session_middleware, test_state,
};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn saved_view() -> ProfileView {
    ProfileView {
        profile: Profile {
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
            district_id: 12,
            town_id: 1202,
            updated_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
        },
        district_name: "Kegalle".into(),
        town_name: "Mawanella".into(),
    }
}

async fn sign_in_stub(session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist_identity(&sample_identity())?;
    Ok(HttpResponse::Ok().finish())
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route("/test/sign-in", web::post().to(sign_in_stub))
        .service(
            web::scope("/api")
                .service(get_profile)
                .service(put_profile)
                .service(save_profile_legacy),
        )
}

macro_rules! signed_in_cookie {
    ($app:expr) => {{
        let res = test::call_service(
            $app,
            test::TestRequest::post().uri("/test/sign-in").to_request(),
        )
        .await;
        session_cookie(&res)
    }};
}

#[rstest]
#[actix_web::test]
async fn profile_read_requires_a_session() {
    let app = test::init_service(test_app(test_state())).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/profile").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn missing_profile_is_not_found() {
    let app = test::init_service(test_app(test_state())).await;
    let cookie = signed_in_cookie!(&app);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn stored_profile_is_returned_in_camel_case(saved_view: ProfileView) {
    let mut query = MockProfileQuery::new();
    query
        .expect_fetch_profile()
        .withf(|user_id| user_id.as_ref() == "user_2abc")
        .times(1)
        .return_once(move |_| Ok(Some(saved_view)));
    let mut state = test_state();
    state.profile = Arc::new(query);
    let app = test::init_service(test_app(state)).await;
    let cookie = signed_in_cookie!(&app);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["firstName"], "Nimal");
    assert_eq!(body["districtName"], "Kegalle");
    assert_eq!(body["townId"], 1202);
    assert_eq!(body["whatsappPrimary"], true);
    assert!(body["phoneSecondary"].is_null());
}

#[rstest]
#[actix_web::test]
async fn put_forwards_district_id_selector(saved_view: ProfileView) {
    let mut command = MockProfileCommand::new();
    command
        .expect_save_profile()
        .withf(|identity, request| {
            identity.user_id.as_ref() == "user_2abc"
                && request.district == Some(DistrictSelector::Id(12))
                && request.town_id == Some(1202)
                && request.town_name.is_none()
        })
        .times(1)
        .return_once(move |_, _| Ok(saved_view));
    let mut state = test_state();
    state.profile_command = Arc::new(command);
    let app = test::init_service(test_app(state)).await;
    let cookie = signed_in_cookie!(&app);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/profile")
            .cookie(cookie)
            .set_json(json!({
                "firstName": "Nimal",
                "lastName": "Perera",
                "phone": "0771234567",
                "whatsappPrimary": true,
                "districtId": 12,
                "townId": 1202
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: ProfileResponse = test::read_body_json(res).await;
    assert_eq!(body.town_name, "Mawanella");
}

#[rstest]
#[actix_web::test]
async fn put_surfaces_field_validation_errors() {
    let app = test::init_service(test_app(test_state())).await;
    let cookie = signed_in_cookie!(&app);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/profile")
            .cookie(cookie)
            .set_json(json!({
                "firstName": "",
                "lastName": "Perera",
                "phone": "0771234567",
                "districtId": 12,
                "townId": 1202
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "firstName");
}

#[rstest]
#[actix_web::test]
async fn legacy_save_echoes_resolved_location() {
    let app = test::init_service(test_app(test_state())).await;
    let cookie = signed_in_cookie!(&app);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/save-profile")
            .cookie(cookie)
            .set_json(json!({
                "firstName": "Nimal",
                "lastName": "Perera",
                "phone": "0771234567",
                "userId": "user_2abc",
                "district": "Kegalle",
                "townName": "Mawanella",
                "townId": 1202
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: LegacySaveProfileResponse = test::read_body_json(res).await;
    assert!(body.success);
    assert_eq!(body.user_id, "user_2abc");
    assert_eq!(body.district, "Kegalle");
    assert_eq!(body.town_name, "Mawanella");
    assert_eq!(body.town_id, 1202);
}

#[rstest]
#[case(json!({ "userId": "user_other", "townId": 1202 }))]
#[case(json!({ "district": "Colombo", "townId": 1202 }))]
#[case(json!({ "townName": "Kandy", "townId": 1202 }))]
#[case(json!({ "townId": 9999 }))]
#[case(json!({}))]
#[actix_web::test]
async fn legacy_save_rejections_are_bad_requests(#[case] overrides: Value) {
    let app = test::init_service(test_app(test_state())).await;
    let cookie = signed_in_cookie!(&app);

    let mut payload = json!({
        "firstName": "Nimal",
        "lastName": "Perera",
        "phone": "0771234567"
    });
    if let (Some(target), Some(extra)) = (payload.as_object_mut(), overrides.as_object()) {
        target.extend(extra.clone());
    }

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/save-profile")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    assert!(body.get("success").is_none());
}

#[rstest]
#[case(json!({ "firstName": "Nimal", "phone": "0771234567", "townId": "abc" }).to_string())]
#[case(String::from("{\"firstName\": \"Nimal\""))]
#[actix_web::test]
async fn legacy_save_malformed_body_is_a_json_bad_request(#[case] raw: String) {
    let app = test::init_service(test_app(test_state())).await;
    let cookie = signed_in_cookie!(&app);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/save-profile")
            .cookie(cookie)
            .insert_header((actix_web::http::header::CONTENT_TYPE, "application/json"))
            .set_payload(raw)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: LegacyErrorResponse = test::read_body_json(res).await;
    assert!(body.error.starts_with("invalid request body"));
}

#[rstest]
#[actix_web::test]
async fn legacy_save_without_session_is_unauthorised() {
    let app = test::init_service(test_app(test_state())).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/save-profile")
            .set_json(json!({ "townId": 1202 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "sign in required");
}

#[rstest]
#[actix_web::test]
async fn legacy_save_hides_store_failures() {
    let mut command = MockProfileCommand::new();
    command.expect_save_profile().return_once(|_, _| {
        Err(Error::service_unavailable(
            "profile repository unavailable: connection refused",
        ))
    });
    let mut state = test_state();
    state.profile_command = Arc::new(command);
    let app = test::init_service(test_app(state)).await;
    let cookie = signed_in_cookie!(&app);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/save-profile")
            .cookie(cookie)
            .set_json(json!({
                "firstName": "Nimal",
                "lastName": "Perera",
                "phone": "0771234567",
                "townId": 1202
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: LegacyErrorResponse = test::read_body_json(res).await;
    assert_eq!(body.error, "Service temporarily unavailable");
}
