//! Error types for page-tree

/// Errors raised while compiling a selector
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector text was empty or only whitespace
    #[error("empty selector")]
    Empty,

    /// The CSS parser rejected the selector
    #[error("invalid selector {selector:?}: {reason}")]
    Invalid { selector: String, reason: String },
}
