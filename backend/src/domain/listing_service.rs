//! Listing publish and browse use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::ports::{
    BookRepository, BookRepositoryError, ListingCommand, ListingFilters, ListingQuery,
    ProfileRepository, ProfileRepositoryError, PublishOutcome,
};
use crate::domain::{BookDraft, BookRecord, Error, Listing, NewBook, UserId};

/// Largest batch accepted by a single publish.
pub const MAX_BATCH_SIZE: usize = 25;
/// Number of listings returned by a browse.
pub const BROWSE_LIMIT: i64 = 48;

/// Listing service implementing [`ListingCommand`] and [`ListingQuery`].
#[derive(Clone)]
pub struct ListingService<B: ?Sized, P: ?Sized> {
    books: Arc<B>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<B: ?Sized, P: ?Sized> ListingService<B, P> {
    pub fn new(books: Arc<B>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            books,
            profiles,
            clock,
        }
    }
}

fn map_book_error(error: BookRepositoryError) -> Error {
    match error {
        BookRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("book repository unavailable: {message}"))
        }
        BookRepositoryError::Query { message } => {
            Error::internal(format!("book repository error: {message}"))
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

/// Validate the whole batch; the first bad draft rejects all of them.
fn validate_batch(drafts: &[BookDraft]) -> Result<Vec<NewBook>, Error> {
    if drafts.is_empty() {
        return Err(Error::invalid_request("add at least one book before publishing")
            .with_details(json!({ "code": "empty_batch" })));
    }
    if drafts.len() > MAX_BATCH_SIZE {
        return Err(Error::invalid_request(format!(
            "a batch may hold at most {MAX_BATCH_SIZE} books"
        ))
        .with_details(json!({ "code": "batch_too_large", "max": MAX_BATCH_SIZE })));
    }
    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| draft.validate().map_err(|err| err.at_index(index)))
        .collect()
}

#[async_trait]
impl<B, P> ListingCommand for ListingService<B, P>
where
    B: BookRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    #[instrument(skip(self, drafts), fields(seller_id = %seller, batch = drafts.len()))]
    async fn publish(
        &self,
        seller: &UserId,
        drafts: Vec<BookDraft>,
    ) -> Result<PublishOutcome, Error> {
        let books = validate_batch(&drafts)?;

        let profile = self
            .profiles
            .find_by_user(seller)
            .await
            .map_err(map_profile_error)?;
        if profile.is_none() {
            return Err(Error::forbidden("complete your profile before publishing")
                .with_details(json!({ "code": "profile_required" })));
        }

        let created_at = self.clock.utc();
        let records: Vec<_> = books
            .into_iter()
            .map(|book| BookRecord {
                id: Uuid::new_v4(),
                seller_id: seller.clone(),
                book,
                created_at,
            })
            .collect();

        let inserted = self
            .books
            .insert_batch(&records)
            .await
            .map_err(map_book_error)?;
        if inserted != records.len() {
            return Err(Error::internal(format!(
                "expected {} rows inserted, store reported {inserted}",
                records.len()
            )));
        }
        info!(published = inserted, "listings published");

        Ok(PublishOutcome {
            published: inserted,
            ids: records.iter().map(|record| record.id).collect(),
        })
    }
}

#[async_trait]
impl<B, P> ListingQuery for ListingService<B, P>
where
    B: BookRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    async fn browse(&self, filters: &ListingFilters) -> Result<Vec<Listing>, Error> {
        debug!(?filters, "browse filters received but not applied");
        self.books.recent(BROWSE_LIMIT).await.map_err(map_book_error)
    }

    async fn listings_for_seller(&self, seller: &UserId) -> Result<Vec<Listing>, Error> {
        self.books.by_seller(seller).await.map_err(map_book_error)
    }
}

#[cfg(test)]
#[path = "listing_service_tests.rs"]
mod tests;
