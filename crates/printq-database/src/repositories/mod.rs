//! Postgres-backed store implementations.

pub mod job;
pub mod user;

pub use job::PgJobStore;
pub use user::PgUserStore;
