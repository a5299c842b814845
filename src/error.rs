//! Error types for breeding and litter generation.

/// Result type alias using [`BreedError`].
pub type Result<T> = std::result::Result<T, BreedError>;

/// Errors that can occur while validating parents, loading genetic data,
/// or generating offspring.
#[derive(Debug, thiserror::Error)]
pub enum BreedError {
    /// One of the two parents was not supplied.
    #[error("Cannot breed asexually: no {0} was provided")]
    MissingParent(&'static str),

    /// The father is not Male or the mother is not Female.
    #[error("Parent genders do not match reality for breeding (father: {father}, mother: {mother})")]
    GenderMismatch {
        father: String,
        mother: String,
    },

    /// An identifier outside its category's closed set.
    #[error("Unknown {category} '{value}'")]
    UnknownAspect {
        category: &'static str,
        value: String,
    },

    /// The two builds have no declared inheritance relationship.
    #[error("Incompatible builds: {father} and {mother} cannot produce offspring")]
    IncompatibleBuilds {
        father: String,
        mother: String,
    },

    /// A lookup into the genetic table found nothing.
    #[error("Missing {category} configuration for '{key}'")]
    MissingConfig {
        category: &'static str,
        key: String,
    },

    /// Malformed genetic or addon data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors while reading override data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BreedError {
    pub fn missing_config(category: &'static str, key: impl Into<String>) -> Self {
        BreedError::MissingConfig { category, key: key.into() }
    }

    pub fn unknown(category: &'static str, value: impl Into<String>) -> Self {
        BreedError::UnknownAspect { category, value: value.into() }
    }
}
