//! Error types for the `tidewatch-history` crate.
//!
//! All fallible operations in this crate return [`HistoryError`] through the
//! standard [`Result`] type alias.

/// Errors that can occur while loading or querying recorded history.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The history document is malformed or violates an invariant.
    #[error("malformed history data: {reason}")]
    DataFormat {
        /// What is wrong with the document.
        reason: String,
    },

    /// A snapshot lookup was attempted on an empty timeline.
    #[error("environment timeline is empty")]
    EmptyTimeline,

    /// The history file could not be read.
    #[error("failed to read history file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl HistoryError {
    /// Shorthand for a [`HistoryError::DataFormat`] with the given reason.
    pub fn data_format(reason: impl Into<String>) -> Self {
        Self::DataFormat {
            reason: reason.into(),
        }
    }
}
