use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbundanceError {
    #[error("shape error: {0}")]
    Shape(String),

    #[error("invalid feature at vector {vector}, feature {feature}: {value}")]
    InvalidFeature {
        vector: usize,
        feature: usize,
        value: f64,
    },

    #[error("degenerate input: {0}")]
    Degenerate(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("subject must be either a vector or an index to a vector, got: {0}")]
    InvalidSubject(String),
}

pub type Result<T> = std::result::Result<T, AbundanceError>;
