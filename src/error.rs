//! Error types for the reconciliation and pagination core.
//!
//! The core never logs; every failure is returned to the adapter layer, which
//! owns user-facing diagnostics. Nothing here is retried — transient HTTP
//! failures surface as [`CoreError::Upstream`] and retry policy lives with
//! the transport.

use thiserror::Error;

/// A boxed error from the injected SDK/transport layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the reconciliation and pagination core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The server's pagination metadata was unusable: an unparseable `Link`
    /// header, or a `rel="next"` URL carrying no cursor parameter.
    #[error("Pagination protocol error: {0}")]
    Pagination(String),

    /// An error returned by the injected page fetch. Propagated verbatim;
    /// pages already fetched are discarded.
    #[error("Upstream API error: {0}")]
    Upstream(#[source] BoxError),

    /// Desired and authoritative records disagree on field set or field
    /// kind. This indicates generated-code drift and is not recoverable.
    #[error("Record shape mismatch at field '{field}': {detail}")]
    ShapeMismatch {
        /// The field where the shapes diverged.
        field: String,
        /// What diverged.
        detail: String,
    },

    /// A JSON value at the SDK boundary could not be projected.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Wrap an error from the injected fetch function.
    pub fn upstream(err: impl Into<BoxError>) -> Self {
        Self::Upstream(err.into())
    }

    /// Build a pagination protocol error.
    pub fn pagination(msg: impl Into<String>) -> Self {
        Self::Pagination(msg.into())
    }

    pub(crate) fn shape_mismatch(field: &str, detail: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::pagination("Link header had no usable cursor");
        assert_eq!(
            format!("{}", err),
            "Pagination protocol error: Link header had no usable cursor"
        );

        let err = CoreError::shape_mismatch("vlan", "kind int vs string");
        assert_eq!(
            format!("{}", err),
            "Record shape mismatch at field 'vlan': kind int vs string"
        );
    }

    #[test]
    fn test_upstream_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out");
        let err = CoreError::upstream(io);
        assert!(matches!(err, CoreError::Upstream(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(format!("{}", err).contains("connect timed out"));
    }
}
