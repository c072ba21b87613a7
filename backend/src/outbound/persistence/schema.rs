//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly; regenerate with `diesel print-schema` after changing them.

diesel::table! {
    /// Sri Lankan administrative districts (seeded reference data).
    districts (id) {
        id -> Int4,
        name -> Varchar,
    }
}

diesel::table! {
    /// Towns, each owned by exactly one district.
    towns (id) {
        id -> Int4,
        name -> Varchar,
        district_id -> Int4,
    }
}

diesel::table! {
    /// Seller profiles keyed by the identity provider's user id.
    profiles (id) {
        id -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Text,
        phone_number -> Varchar,
        phone_number_2 -> Nullable<Varchar>,
        is_whatsapp_primary -> Bool,
        is_whatsapp_secondary -> Bool,
        district_id -> Int4,
        town_id -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Book listings; contact details are joined through `seller_id`.
    books (id) {
        id -> Uuid,
        title -> Varchar,
        author -> Varchar,
        price -> Int8,
        condition -> Varchar,
        subject -> Varchar,
        description -> Text,
        extra_details -> Text,
        seller_id -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(towns -> districts (district_id));
diesel::joinable!(profiles -> towns (town_id));
diesel::joinable!(books -> profiles (seller_id));

diesel::allow_tables_to_appear_in_same_query!(districts, towns, profiles, books);
