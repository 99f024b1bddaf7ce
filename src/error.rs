//! Error types for the drawing layer.
//!
//! Two levels exist: [`crate::engine::EngineError`] covers failures raised
//! by the writer engine itself, while [`Error`] is the surface the drawing
//! API exposes. The annotation entry points wrap engine failures with
//! call-site context; everything else passes through untouched.

use crate::engine::EngineError;

/// Result type alias for drawing-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fill-mode representation did not name one of the three
    /// recognized modes (stroke, fill, fill and stroke).
    #[error("invalid fill mode \"{0}\"")]
    InvalidFillMode(String),

    /// A color specification could not be parsed.
    #[error("invalid color \"{0}\"")]
    InvalidColor(String),

    /// Image data was rejected during construction.
    #[error("image error: {0}")]
    Image(String),

    /// The engine rejected a URI link annotation.
    #[error("failed to add URI action for \"{uri}\"")]
    UriAction {
        /// The offending URI
        uri: String,
        /// The engine-level cause
        #[source]
        source: EngineError,
    },

    /// The engine rejected an in-document go-to annotation.
    #[error("failed to add go-to action")]
    GoToAction(#[source] EngineError),

    /// The engine rejected a bookmark entry.
    #[error("failed to add bookmark \"{title}\"")]
    Bookmark {
        /// Title of the rejected bookmark
        title: String,
        /// The engine-level cause
        #[source]
        source: EngineError,
    },

    /// Any other engine failure, propagated unmodified.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fill_mode_message() {
        let err = Error::InvalidFillMode("hatch".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("invalid fill mode"));
        assert!(msg.contains("hatch"));
    }

    #[test]
    fn test_uri_action_carries_cause() {
        let err = Error::UriAction {
            uri: "not a uri".to_string(),
            source: EngineError::MalformedUri("not a uri".to_string()),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("not a uri"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
