//! Errors raised while decoding raw chain values into the shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("unknown conviction tag {0}")]
    UnknownConviction(u8),

    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
}
