//! Shared helpers for the HTTP integration suites.

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use backend::domain::ports::FIXTURE_SESSION_TOKEN;
use serde_json::{Value, json};

/// Sign in with the fixture provider token and return the session cookie.
pub async fn sign_in<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/sign-in")
            .set_json(json!({ "sessionToken": FIXTURE_SESSION_TOKEN }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "sign-in failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// A complete profile in Mawanella, Kegalle.
pub fn mawanella_profile() -> Value {
    json!({
        "firstName": "Nimal",
        "lastName": "Perera",
        "phone": "0771234567",
        "phoneSecondary": null,
        "whatsappPrimary": true,
        "whatsappSecondary": false,
        "districtId": 12,
        "townId": 1202
    })
}

pub fn draft(title: &str, price: &str) -> Value {
    json!({
        "title": title,
        "author": "",
        "price": price,
        "condition": "used",
        "subject": "Physics",
        "description": "Clean copy, no highlights",
        "extraDetails": ""
    })
}
