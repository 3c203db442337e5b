//! Typed path parameter helpers.

use printq_core::error::AppError;
use printq_core::types::JobId;

/// Parses a job id from a path segment.
pub fn parse_job_id(s: &str) -> Result<JobId, AppError> {
    s.parse::<JobId>()
        .map_err(|_| AppError::validation(format!("Invalid job id: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_id() {
        assert_eq!(parse_job_id("42").unwrap(), JobId::from(42));
        assert!(parse_job_id("abc").is_err());
        assert!(parse_job_id("4.2").is_err());
        assert!(parse_job_id("").is_err());
    }
}
