use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body returned by the game service alongside a non-success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A response that decoded but violates the snapshot contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("masked word slot {0:?} is not a single glyph")]
    InvalidSlot(String),
    #[error("guessed letter {0:?} is not a single glyph")]
    InvalidGuessedLetter(String),
    #[error("breach level {level} exceeds maximum {max}")]
    BreachLevelOutOfRange { level: u8, max: u8 },
    #[error("word length {declared} disagrees with {actual} masked slots")]
    WordLengthMismatch { declared: usize, actual: usize },
}
