use std::fmt;
use std::io;

#[derive(Debug)]
pub enum SubtextError {
    Io(io::Error),
    Json(serde_json::Error),
    Enigo(String),
    RuleNotFound(String),
    InvalidTrigger(String),
    Other(String),
}

impl fmt::Display for SubtextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtextError::Io(err) => write!(f, "I/O error: {}", err),
            SubtextError::Json(err) => write!(f, "JSON error: {}", err),
            SubtextError::Enigo(err) => write!(f, "Keyboard controller error: {}", err),
            SubtextError::RuleNotFound(trigger) => {
                write!(f, "No replacement found for '{}'", trigger)
            }
            SubtextError::InvalidTrigger(msg) => write!(f, "Invalid trigger: {}", msg),
            SubtextError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for SubtextError {}

impl From<io::Error> for SubtextError {
    fn from(err: io::Error) -> Self {
        SubtextError::Io(err)
    }
}

impl From<serde_json::Error> for SubtextError {
    fn from(err: serde_json::Error) -> Self {
        SubtextError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, SubtextError>;
