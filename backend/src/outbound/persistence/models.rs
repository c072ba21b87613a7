//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{books, districts, profiles, towns};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = districts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DistrictRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = towns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TownRow {
    pub id: i32,
    pub name: String,
    pub district_id: i32,
}

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub phone_number_2: Option<String>,
    pub is_whatsapp_primary: bool,
    pub is_whatsapp_secondary: bool,
    pub district_id: i32,
    pub town_id: i32,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for profile upserts; conflicts update from `excluded`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct ProfileUpsert<'a> {
    pub id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub phone_number_2: Option<&'a str>,
    pub is_whatsapp_primary: bool,
    pub is_whatsapp_secondary: bool,
    pub district_id: i32,
    pub town_id: i32,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub price: i64,
    pub condition: String,
    pub subject: String,
    pub description: String,
    pub extra_details: String,
    pub seller_id: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new listings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub author: &'a str,
    pub price: i64,
    pub condition: &'static str,
    pub subject: &'a str,
    pub description: &'a str,
    pub extra_details: &'a str,
    pub seller_id: &'a str,
    pub created_at: DateTime<Utc>,
}
