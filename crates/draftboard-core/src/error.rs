//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors surfaced to callers of the editor.
///
/// Per-frame faults during a drag or resize never show up here: they are
/// logged and degrade to "no snap" or "no commit" instead.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A widget was requested with a type the factory does not know.
    #[error("Unsupported widget type: {0}")]
    InvalidWidgetType(String),

    /// Configuration JSON could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration parsed but holds values the engine cannot work with.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
