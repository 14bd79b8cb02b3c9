//! The single error kind surfaced by every backend operation.

use thiserror::Error;

/// Text shown for every failed backend request.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something bad happened; please try again later.";

/// A backend request failed.
///
/// Transport errors, non-2xx statuses and undecodable bodies all collapse into
/// this value. The cause is written to the `error` log before it is dropped, so
/// callers cannot tell an auth failure from a missing resource or an outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Something bad happened; please try again later.")]
pub struct RequestFailed;

/// Result type returned by backend operations.
pub type ApiResult<T> = std::result::Result<T, RequestFailed>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_fixed_message() {
        // Arrange & Act
        let text = RequestFailed.to_string();

        // Assert
        assert_eq!(text, GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_converts_into_anyhow() {
        // Arrange & Act
        let err: anyhow::Error = RequestFailed.into();

        // Assert
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
        assert!(err.downcast_ref::<RequestFailed>().is_some());
    }
}
