use thiserror::Error;

/// Parse and conversion failures for the core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("Wrong address prefix: expected '{expected}', got '{got}'")]
    WrongAddressPrefix { expected: &'static str, got: String },

    #[error("Address must be 20 bytes, got {0}")]
    InvalidAddressLength(usize),

    #[error("Invalid token amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Malformed Bech32m string: {0}")]
    Bech32Error(String),
}

impl From<hex::FromHexError> for TypesError {
    fn from(e: hex::FromHexError) -> Self {
        TypesError::InvalidHex(e.to_string())
    }
}

impl From<std::num::ParseIntError> for TypesError {
    fn from(e: std::num::ParseIntError) -> Self {
        TypesError::InvalidAmount(e.to_string())
    }
}
