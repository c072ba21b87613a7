//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: pool and Diesel failures map onto each port's
//!   `Connection` / `Query` variants.
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), backend::outbound::persistence::PoolError> {
//! use backend::outbound::persistence::{DbPool, DieselProfileRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/booklink")).await?;
//! let profiles = DieselProfileRepository::new(pool);
//! # let _ = profiles;
//! # Ok(())
//! # }
//! ```

mod diesel_book_repository;
mod diesel_error_mapping;
mod diesel_location_repository;
mod diesel_profile_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
