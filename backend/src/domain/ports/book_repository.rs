//! Port for book listing persistence.
//!
//! Listings are written in batches and read back joined with the seller's
//! current profile, so contact details are never copied onto a row.

use async_trait::async_trait;
use chrono::DateTime;
use uuid::Uuid;

use crate::domain::{BookCondition, BookRecord, Listing, SellerContact, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
    }
}

/// Book listing storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert every record in one statement; returns the number of rows
    /// written. Either all rows land or none do.
    async fn insert_batch(&self, records: &[BookRecord]) -> Result<usize, BookRepositoryError>;

    /// Newest listings first, at most `limit`.
    async fn recent(&self, limit: i64) -> Result<Vec<Listing>, BookRepositoryError>;

    /// Listings posted by `seller_id`, newest first.
    async fn by_seller(&self, seller_id: &UserId) -> Result<Vec<Listing>, BookRepositoryError>;
}

/// Fixture serving the sample listing grid and discarding writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookRepository;

struct SampleCard {
    id: u8,
    subject: &'static str,
    title: &'static str,
    price: i64,
    town: &'static str,
    district: &'static str,
}

const SAMPLE_CARDS: &[SampleCard] = &[
    SampleCard {
        id: 1,
        subject: "Physics Papers",
        title: "Physics Past Paper Book (2010-2023)",
        price: 2500,
        town: "Mawanella",
        district: "Kegalle",
    },
    SampleCard {
        id: 2,
        subject: "Maths Tutes",
        title: "Combined Maths Tute Set (Pure & Applied)",
        price: 4000,
        town: "Kandy",
        district: "Kandy",
    },
    SampleCard {
        id: 3,
        subject: "Bio Textbooks",
        title: "Biology New Syllabus Resource Book Set",
        price: 3000,
        town: "Nugegoda",
        district: "Colombo",
    },
    SampleCard {
        id: 4,
        subject: "Chem Tutes",
        title: "Chemistry Tute Set (English Medium)",
        price: 2200,
        town: "Warakapola",
        district: "Kegalle",
    },
];

const SAMPLE_SELLER: &str = "user_sample_seller";
// 2025-11-01T00:00:00Z
const SAMPLE_EPOCH: i64 = 1_761_955_200;

impl FixtureBookRepository {
    /// The sample cards as listings, newest first.
    #[must_use]
    pub fn sample_listings() -> Vec<Listing> {
        let Ok(seller_id) = UserId::new(SAMPLE_SELLER) else {
            return Vec::new();
        };
        SAMPLE_CARDS
            .iter()
            .rev()
            .map(|card| Listing {
                id: Uuid::from_u128(u128::from(card.id)),
                title: card.title.to_owned(),
                author: String::new(),
                price: card.price,
                condition: BookCondition::Used,
                subject: card.subject.to_owned(),
                description: String::new(),
                extra_details: String::new(),
                created_at: DateTime::from_timestamp(SAMPLE_EPOCH + i64::from(card.id), 0)
                    .unwrap_or_default(),
                seller: SellerContact {
                    seller_id: seller_id.clone(),
                    name: "BookLink Sample".to_owned(),
                    phone: "0770000000".to_owned(),
                    phone_secondary: None,
                    whatsapp_primary: false,
                    whatsapp_secondary: false,
                    district_name: card.district.to_owned(),
                    town_name: card.town.to_owned(),
                },
            })
            .collect()
    }
}

#[async_trait]
impl BookRepository for FixtureBookRepository {
    async fn insert_batch(&self, records: &[BookRecord]) -> Result<usize, BookRepositoryError> {
        Ok(records.len())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Listing>, BookRepositoryError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(Self::sample_listings().into_iter().take(limit).collect())
    }

    async fn by_seller(&self, _seller_id: &UserId) -> Result<Vec<Listing>, BookRepositoryError> {
        Ok(Vec::new())
    }
}
