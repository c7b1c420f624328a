use thiserror::Error;

/// Top-level error type for the Lamina mesh engine.
#[derive(Debug, Error)]
pub enum LaminaError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

/// Misuse of a [`MeshBuilder`](crate::mesh::MeshBuilder).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("vertex index {index} out of range (builder holds {count} vertices)")]
    VertexOutOfRange { index: u32, count: usize },
}

/// Errors raised by surface generators before they touch the builder.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid generator parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`LaminaError`].
pub type Result<T> = std::result::Result<T, LaminaError>;
