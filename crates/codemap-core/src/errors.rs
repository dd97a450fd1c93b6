//! Error types for the codemap core library.

/// Top-level error enum for the codemap core library.
///
/// The analysis passes themselves never fail; these variants cover the
/// surfaces around them (source enumeration, the layout boundary, and
/// untrusted class names).
#[derive(Debug, thiserror::Error)]
pub enum CodemapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid class name: {0:?}")]
    InvalidClassName(String),

    #[error("Source error: {0}")]
    Source(String),
}

pub type CodemapResult<T> = Result<T, CodemapError>;
