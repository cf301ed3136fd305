//! Error types for ytm-state
//!
//! Missing nodes are never errors: reads yield `None`, commands do nothing
//! and watchers stay dormant. Errors only come from configuration and
//! lifecycle misuse.

use page_tree::SelectorError;

/// Result type for ytm-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while configuring or running the mirror
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// A selector in the selector map failed to compile
    #[error("Invalid selector for {name}: {source}")]
    Selector {
        name: &'static str,
        #[source]
        source: SelectorError,
    },

    /// The selector map could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// `start()` was called while watchers are attached
    #[error("Watchers are already running")]
    AlreadyRunning,

    /// A subscription key is neither a field name nor the wildcard
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Config(err.to_string())
    }
}
