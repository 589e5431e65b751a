//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the transaction, payment and enum ports,
//! backed by `diesel-async` connections from a `bb8` pool.
//!
//! Repositories never open transactions: each statement runs on the
//! connection owned by the [`DieselTransaction`] the service hands them, and
//! every failure leaves through [`storage_error::translate`].
//!
//! # Example
//!
//! ```ignore
//! use payments::outbound::persistence::{DbPool, DieselTransactionProvider, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/payments")).await?;
//! let transactions = DieselTransactionProvider::new(pool);
//! ```

mod diesel_enum_repository;
mod diesel_payment_repository;
mod diesel_transaction;
mod migrations;
mod models;
mod pool;
mod schema;
pub mod storage_error;

pub use diesel_enum_repository::DieselEnumRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_transaction::{DieselTransaction, DieselTransactionProvider};
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
pub use storage_error::{StorageFailure, StorageOperation};
