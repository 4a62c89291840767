//! Error types shared by every demo.
//!
//! Nothing here is fatal to the host page: each variant is scoped to the demo
//! that produced it.

use thiserror::Error;

/// Errors surfaced by demo operations.
#[derive(Debug, Error)]
pub enum DemoError {
    /// An update targeted a record id that is not in the dataset.
    #[error("Data point with id \"{id}\" not found")]
    NotFound { id: String },

    /// A control value could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The drawing surface or its container is not mounted yet.
    #[error("Drawing surface unavailable")]
    SurfaceUnavailable,

    /// A browser API call was rejected.
    #[error("Browser call failed: {0}")]
    Dom(String),

    /// A conflicting request is still in flight.
    #[error("Another request is still pending")]
    RequestPending,

    /// Host-supplied configuration failed to parse.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, DemoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_id() {
        let err = DemoError::NotFound {
            id: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Data point with id \"missing\" not found");
    }

    #[test]
    fn test_config_error_from_serde() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: DemoError = parse.into();
        assert!(matches!(err, DemoError::Config(_)));
    }

    #[test]
    fn test_dom_error_keeps_context() {
        let err = DemoError::Dom("add pointermove listener: JsValue(TypeError)".into());
        assert_eq!(
            err.to_string(),
            "Browser call failed: add pointermove listener: JsValue(TypeError)"
        );
    }
}
