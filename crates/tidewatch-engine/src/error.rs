//! Error types for the Tidewatch engine binary.
//!
//! [`EngineError`] wraps every failure that can abort startup, so `main`
//! can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: tidewatch_core::config::ConfigError,
    },

    /// The history document exists but could not be loaded.
    #[error("history error: {source}")]
    History {
        /// The underlying history error.
        #[from]
        source: tidewatch_history::HistoryError,
    },

    /// The advisory HTTP client could not be built.
    #[error("advisory client error: {source}")]
    Advisory {
        /// The underlying reqwest error.
        #[from]
        source: reqwest::Error,
    },
}
