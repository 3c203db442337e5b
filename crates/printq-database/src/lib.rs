//! # printq-database
//!
//! PostgreSQL connection management, the [`JobStore`] / [`UserStore`]
//! abstractions, and their Postgres and in-memory implementations.

pub mod connection;
pub mod error;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryJobStore, MemoryUserStore};
pub use repositories::{PgJobStore, PgUserStore};
pub use store::{JobStore, UserStore};
