//! Structured error types for sheetgrid.

/// All errors that can occur in the grid core.
#[derive(Debug, thiserror::Error)]
pub enum SheetGridError {
    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// A bulk update is in flight; input is blocked until it settles.
    #[error("Grid is busy with a bulk update")]
    Busy,

    /// An external collaborator (cell store, host callback) failed.
    #[error("Collaborator failed: {0}")]
    Collaborator(String),

    /// Invalid grid configuration.
    #[error("Invalid config: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("Serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetGridError>;

impl From<String> for SheetGridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SheetGridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SheetGridError> for wasm_bindgen::JsValue {
    fn from(e: SheetGridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
