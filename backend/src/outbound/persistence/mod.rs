//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - Adapters only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) never
//!   leave this module.
//! - Database errors are mapped onto the port error enums; raw database
//!   messages are logged, not propagated.
//!
//! # Example
//!
//! ```no_run
//! use bookshelf::outbound::persistence::{DbPool, DieselBookRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), bookshelf::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bookshelf")).await?;
//! let books = DieselBookRepository::new(pool);
//! # let _ = books;
//! # Ok(())
//! # }
//! ```

mod diesel_access_token_repository;
mod diesel_account_repository;
mod diesel_book_repository;
mod diesel_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_access_token_repository::DieselAccessTokenRepository;
pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_book_repository::DieselBookRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
