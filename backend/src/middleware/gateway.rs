//! Session gate in front of every route.
//!
//! Requests without a signed-in identity may reach only the public
//! allow-list. Everything else is refused: `/api/*` with a `401` JSON error,
//! page routes with a `303` redirect to `/sign-in`. Must be registered
//! inside the session middleware so the cookie has been decoded.

use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::Error as DomainError;
use crate::inbound::http::session::SessionContext;

const SIGN_IN_PATH: &str = "/sign-in";
const SIGN_UP_PATH: &str = "/sign-up";
const HOME_PATH: &str = "/";
const COMPLETE_PROFILE_PATH: &str = "/complete-profile";

/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(&'static str),
    Unauthorized,
}

/// Route allow-list for anonymous visitors.
#[derive(Debug, Clone, Copy)]
pub struct PublicRoutes {
    docs: bool,
}

impl PublicRoutes {
    /// Allow-list for this build; API docs are public in debug builds.
    #[must_use]
    pub fn for_build() -> Self {
        Self {
            docs: cfg!(debug_assertions),
        }
    }

    #[must_use]
    pub fn with_docs(docs: bool) -> Self {
        Self { docs }
    }

    fn allows(self, path: &str) -> bool {
        matches!(path, HOME_PATH | SIGN_IN_PATH | SIGN_UP_PATH)
            || path.starts_with("/health/")
            || (self.docs && (path.starts_with("/docs") || path.starts_with("/api-docs/")))
    }
}

fn is_api(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn redirected_from_sign_up(query: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key == "redirectedFrom" && value == "signup")
}

/// Decide how to treat a request.
///
/// # Examples
/// ```
/// use backend::middleware::gateway::{GateDecision, PublicRoutes, decide};
///
/// let routes = PublicRoutes::with_docs(false);
/// assert_eq!(decide(routes, "/api/my-ads", "", false), GateDecision::Unauthorized);
/// assert_eq!(decide(routes, "/sign-in", "", true), GateDecision::Redirect("/"));
/// ```
#[must_use]
pub fn decide(routes: PublicRoutes, path: &str, query: &str, signed_in: bool) -> GateDecision {
    if path == SIGN_UP_PATH && redirected_from_sign_up(query) {
        return GateDecision::Redirect(COMPLETE_PROFILE_PATH);
    }
    if signed_in && matches!(path, SIGN_IN_PATH | SIGN_UP_PATH) {
        return GateDecision::Redirect(HOME_PATH);
    }
    if signed_in || routes.allows(path) {
        return GateDecision::Pass;
    }
    if is_api(path) {
        GateDecision::Unauthorized
    } else {
        GateDecision::Redirect(SIGN_IN_PATH)
    }
}

/// Middleware factory for the session gate.
#[derive(Clone)]
pub struct Gateway {
    routes: PublicRoutes,
}

impl Gateway {
    #[must_use]
    pub fn new(routes: PublicRoutes) -> Self {
        Self { routes }
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(PublicRoutes::for_build())
    }
}

impl<S, B> Transform<S, ServiceRequest> for Gateway
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = GatewayMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GatewayMiddleware {
            service,
            routes: self.routes,
        }))
    }
}

/// Service wrapper produced by [`Gateway`].
pub struct GatewayMiddleware<S> {
    service: S,
    routes: PublicRoutes,
}

impl<S, B> Service<ServiceRequest> for GatewayMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // An unreadable cookie counts as signed out.
        let signed_in = SessionContext::new(req.get_session())
            .identity()
            .ok()
            .flatten()
            .is_some();
        let decision = decide(self.routes, req.path(), req.query_string(), signed_in);

        let response = match decision {
            GateDecision::Pass => {
                let fut = self.service.call(req);
                return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
            }
            GateDecision::Redirect(location) => {
                debug!(path = %req.path(), location, "gateway redirect");
                HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, location))
                    .finish()
            }
            GateDecision::Unauthorized => {
                debug!(path = %req.path(), "gateway refused anonymous api request");
                DomainError::unauthorized("sign in required").error_response()
            }
        };
        let (request, _) = req.into_parts();
        Box::pin(async move {
            Ok(ServiceResponse::new(request, response).map_into_right_body())
        })
    }
}
