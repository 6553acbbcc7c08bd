use thiserror::Error;

/// Unified error type for the entire finance-charts-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Dirty input records are never errors: the normalizer drops them.
/// Errors are reserved for misconfiguration by the calling code.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid granularity '{0}': expected daily, weekly, monthly or none")]
    InvalidGranularity(String),

    #[error("Invalid value selector '{0}': expected income, expenses or net")]
    InvalidValueSelector(String),

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Input decoding ──────────────────────────────────────────────
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
