//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **identity**: reqwest client for the hosted identity provider
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod identity;
pub mod persistence;
