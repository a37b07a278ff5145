//! Error types for port operations.

/// Failures of a random face-value source.
#[derive(Debug, thiserror::Error)]
pub enum RollSourceError {
    /// The source cannot roll right now (e.g., a dice box that is not ready).
    #[error("Roll source unavailable: {0}")]
    Unavailable(String),

    /// A scripted source ran out of faces for a die size.
    #[error("No faces left for d{sides}: wanted {wanted}, had {available}")]
    Exhausted {
        sides: u32,
        wanted: usize,
        available: usize,
    },
}

impl RollSourceError {
    pub fn unavailable(message: impl ToString) -> Self {
        Self::Unavailable(message.to_string())
    }
}

/// Failures loading or reading a spell catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Reading the catalog file failed - includes the path for actionable messages.
    #[error("Failed to read spell catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog document is not a JSON array of spell records.
    #[error("Invalid spell catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
