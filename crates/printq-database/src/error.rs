//! Translation of sqlx errors into [`AppError`].
//!
//! Connection-level trouble and the SQLSTATEs Postgres uses for "try again"
//! become [`ErrorKind::ServiceUnavailable`]; everything else is a permanent
//! [`ErrorKind::Database`] fault.
//!
//! A statement that commits is stricter: once it has reached the server a
//! lost connection leaves its outcome unknown, so only faults that prove
//! nothing was applied stay retryable. See [`map_commit_error`].

use sqlx::error::DatabaseError;

use printq_core::error::{AppError, ErrorKind};

/// serialization_failure
const SERIALIZATION_FAILURE: &str = "40001";
/// deadlock_detected
const DEADLOCK_DETECTED: &str = "40P01";
/// admin_shutdown
const ADMIN_SHUTDOWN: &str = "57P01";
/// unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Classify a sqlx error and wrap it with `context`.
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = classify(&err);
    AppError::with_source(kind, format!("{context}: {err}"), err)
}

/// Classify an error from a statement that commits: an explicit `COMMIT`
/// or an autocommit write.
///
/// Pool faults happen before anything is sent, and a serialization failure
/// or deadlock aborts the transaction, so those stay transient. An I/O
/// error or server shutdown may arrive after the commit landed and is
/// reported as a permanent fault.
pub fn map_commit_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => ErrorKind::ServiceUnavailable,
        sqlx::Error::Database(db)
            if matches!(
                db.code().as_deref(),
                Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
            ) =>
        {
            ErrorKind::ServiceUnavailable
        }
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, format!("{context} (outcome unknown): {err}"), err)
}

fn classify(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::Database(db) => classify_database(db.as_ref()),
        _ => ErrorKind::Database,
    }
}

fn classify_database(db: &dyn DatabaseError) -> ErrorKind {
    match db.code().as_deref() {
        Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED | ADMIN_SHUTDOWN) => {
            ErrorKind::ServiceUnavailable
        }
        Some(UNIQUE_VIOLATION) => ErrorKind::Conflict,
        _ => ErrorKind::Database,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_faults_are_transient() {
        let err = map_sqlx_error("claim", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert!(err.is_transient());

        let err = map_sqlx_error("claim", sqlx::Error::PoolClosed);
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_io_fault_is_transient() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = map_sqlx_error("insert", sqlx::Error::Io(io));
        assert!(err.is_transient());
        assert!(err.message.starts_with("insert: "));
    }

    #[test]
    fn test_other_faults_are_permanent() {
        let err = map_sqlx_error("find", sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_lost_connection_during_commit_is_not_retryable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = map_commit_error("Failed to commit claim", sqlx::Error::Io(io));
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(!err.is_transient());
        assert!(err.message.contains("outcome unknown"));
    }

    #[test]
    fn test_pool_faults_before_commit_stay_transient() {
        let err = map_commit_error("Failed to complete job", sqlx::Error::PoolTimedOut);
        assert!(err.is_transient());

        let err = map_commit_error("Failed to complete job", sqlx::Error::PoolClosed);
        assert!(err.is_transient());
    }
}
