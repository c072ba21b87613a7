//! PostgreSQL-backed `BookRepository`.
//!
//! A publish is a single multi-row `INSERT`, so a batch lands whole or not
//! at all. Reads join each book to its seller's profile, town and district.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BookRepository, BookRepositoryError};
use crate::domain::{BookCondition, BookRecord, Listing, SellerContact, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookRow, NewBookRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{books, districts, profiles, towns};

/// Diesel-backed implementation of the `BookRepository` port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> BookRepositoryError {
    map_pool_error(error, BookRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> BookRepositoryError {
    map_diesel_error(
        error,
        BookRepositoryError::query,
        BookRepositoryError::connection,
    )
}

type ListingRow = (BookRow, ProfileRow, String, String);

fn new_row(record: &BookRecord) -> NewBookRow<'_> {
    NewBookRow {
        id: record.id,
        title: &record.book.title,
        author: &record.book.author,
        price: record.book.price,
        condition: record.book.condition.as_str(),
        subject: &record.book.subject,
        description: &record.book.description,
        extra_details: &record.book.extra_details,
        seller_id: record.seller_id.as_ref(),
        created_at: record.created_at,
    }
}

fn row_to_listing(
    (book, seller, town_name, district_name): ListingRow,
) -> Result<Listing, BookRepositoryError> {
    let condition = book.condition.parse::<BookCondition>().map_err(|_| {
        warn!(book_id = %book.id, value = %book.condition, "unrecognised book condition");
        BookRepositoryError::query("stored book has invalid condition")
    })?;
    let seller_id = UserId::new(book.seller_id.as_str()).map_err(|_| {
        warn!(book_id = %book.id, "stored book has invalid seller id");
        BookRepositoryError::query("stored book has invalid seller_id")
    })?;
    Ok(Listing {
        id: book.id,
        title: book.title,
        author: book.author,
        price: book.price,
        condition,
        subject: book.subject,
        description: book.description,
        extra_details: book.extra_details,
        created_at: book.created_at,
        seller: SellerContact {
            seller_id,
            name: format!("{} {}", seller.first_name, seller.last_name),
            phone: seller.phone_number,
            phone_secondary: seller.phone_number_2,
            whatsapp_primary: seller.is_whatsapp_primary,
            whatsapp_secondary: seller.is_whatsapp_secondary,
            district_name,
            town_name,
        },
    })
}

macro_rules! listing_query {
    () => {
        books::table
            .inner_join(profiles::table.inner_join(towns::table.inner_join(districts::table)))
            .select((
                BookRow::as_select(),
                ProfileRow::as_select(),
                towns::name,
                districts::name,
            ))
    };
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn insert_batch(&self, records: &[BookRecord]) -> Result<usize, BookRepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewBookRow<'_>> = records.iter().map(new_row).collect();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(books::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Listing>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ListingRow> = listing_query!()
            .order((books::created_at.desc(), books::id.asc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_listing).collect()
    }

    async fn by_seller(&self, seller_id: &UserId) -> Result<Vec<Listing>, BookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ListingRow> = listing_query!()
            .filter(books::seller_id.eq(seller_id.as_ref()))
            .order((books::created_at.desc(), books::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_listing).collect()
    }
}
