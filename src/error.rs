use thiserror::Error;

/// Errors produced by the conversion formulas.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An input fell outside its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
