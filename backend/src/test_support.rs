//! Test utilities for the backend crate.
//!
//! An in-memory book adapter and an app builder shared by unit tests and the
//! integration suites under `tests/`. Compiled for tests and behind the
//! `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_web::body::{BoxBody, EitherBody};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::Trace;
use crate::domain::ports::{
    BookRepository, BookRepositoryError, FixtureIdentityProvider, FixtureLocationRepository,
    FixtureProfileRepository, IdentityProvider, ProfileRepository,
};
use crate::domain::{
    BookRecord, IdentityLoginService, Listing, ListingService, LocationService, ProfileService,
    SellerContact, UserId,
};
use crate::inbound::http::configure;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;
use crate::middleware::Gateway;
use crate::middleware::gateway::PublicRoutes;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Books kept in memory and joined to their seller's current profile on
/// read, like the database adapter.
#[derive(Clone)]
pub struct InMemoryBookRepository {
    books: Arc<Mutex<Vec<BookRecord>>>,
    profiles: FixtureProfileRepository,
}

impl InMemoryBookRepository {
    #[must_use]
    pub fn new(profiles: FixtureProfileRepository) -> Self {
        Self {
            books: Arc::new(Mutex::new(Vec::new())),
            profiles,
        }
    }

    /// Every stored record in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<BookRecord> {
        lock(&self.books).clone()
    }

    async fn to_listing(&self, record: BookRecord) -> Result<Listing, BookRepositoryError> {
        let view = self
            .profiles
            .find_by_user(&record.seller_id)
            .await
            .map_err(|error| BookRepositoryError::query(error.to_string()))?
            .ok_or_else(|| BookRepositoryError::query("book seller has no profile"))?;
        let contact = &view.profile.contact;
        Ok(Listing {
            id: record.id,
            title: record.book.title,
            author: record.book.author,
            price: record.book.price,
            condition: record.book.condition,
            subject: record.book.subject,
            description: record.book.description,
            extra_details: record.book.extra_details,
            created_at: record.created_at,
            seller: SellerContact {
                seller_id: record.seller_id,
                name: format!("{} {}", contact.first_name, contact.last_name),
                phone: contact.phone.as_ref().to_owned(),
                phone_secondary: contact
                    .phone_secondary
                    .as_ref()
                    .map(|phone| phone.as_ref().to_owned()),
                whatsapp_primary: contact.whatsapp_primary,
                whatsapp_secondary: contact.whatsapp_secondary,
                district_name: view.district_name,
                town_name: view.town_name,
            },
        })
    }

    async fn to_listings(
        &self,
        mut records: Vec<BookRecord>,
    ) -> Result<Vec<Listing>, BookRepositoryError> {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        let mut listings = Vec::with_capacity(records.len());
        for record in records {
            listings.push(self.to_listing(record).await?);
        }
        Ok(listings)
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn insert_batch(&self, records: &[BookRecord]) -> Result<usize, BookRepositoryError> {
        lock(&self.books).extend_from_slice(records);
        Ok(records.len())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Listing>, BookRepositoryError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut listings = self.to_listings(self.records()).await?;
        listings.truncate(limit);
        Ok(listings)
    }

    async fn by_seller(&self, seller_id: &UserId) -> Result<Vec<Listing>, BookRepositoryError> {
        let records = self
            .records()
            .into_iter()
            .filter(|record| &record.seller_id == seller_id)
            .collect();
        self.to_listings(records).await
    }
}

/// Real services over the in-memory adapters, with handles kept for
/// assertions.
#[derive(Clone)]
pub struct InMemoryBackend {
    pub profiles: FixtureProfileRepository,
    pub books: InMemoryBookRepository,
    pub identity: Arc<dyn IdentityProvider>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::with_identity(Arc::new(FixtureIdentityProvider))
    }
}

impl InMemoryBackend {
    #[must_use]
    pub fn with_identity(identity: Arc<dyn IdentityProvider>) -> Self {
        let profiles = FixtureProfileRepository::new();
        let books = InMemoryBookRepository::new(profiles.clone());
        Self {
            profiles,
            books,
            identity,
        }
    }

    /// The HTTP state bundle wired over these adapters.
    #[must_use]
    pub fn http_state(&self) -> HttpState {
        let locations = Arc::new(FixtureLocationRepository);
        let profiles = Arc::new(self.profiles.clone());
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let profile = Arc::new(ProfileService::new(
            profiles.clone(),
            locations.clone(),
            clock.clone(),
        ));
        let listings = Arc::new(ListingService::new(
            Arc::new(self.books.clone()),
            profiles,
            clock,
        ));
        HttpState::new(
            Arc::new(IdentityLoginService::new(self.identity.clone())),
            Arc::new(LocationService::new(locations)),
            profile.clone(),
            profile,
            listings.clone(),
            listings,
        )
    }
}

/// Session settings for plain-HTTP test requests.
#[must_use]
pub fn test_session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

/// The full middleware stack and routes over `state`, without API docs.
pub fn booklink_app(
    state: HttpState,
    session: &SessionSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    App::new()
        .app_data(health)
        .app_data(web::Data::new(state))
        .wrap(Gateway::new(PublicRoutes::with_docs(false)))
        .wrap(session.middleware())
        .wrap(Trace)
        .configure(configure)
}
