use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    CatalogUnavailable,
    NotEnoughCountries,
    NoActiveRound,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("not enough countries to start a round: need {required}, have {available}")]
    NotEnoughCountries { required: usize, available: usize },
    #[error("no round is in progress")]
    NoActiveRound,
    #[error("'{name}' is not one of this round's options")]
    UnknownOption { name: String },
}

impl QuizError {
    pub fn code(&self) -> ErrorCode {
        match self {
            QuizError::NotEnoughCountries { .. } => ErrorCode::NotEnoughCountries,
            QuizError::NoActiveRound => ErrorCode::NoActiveRound,
            QuizError::UnknownOption { .. } => ErrorCode::Validation,
        }
    }
}

/// Serializable error form sent to front ends alongside updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameError {
    pub code: ErrorCode,
    pub message: String,
}

impl GameError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<QuizError> for GameError {
    fn from(value: QuizError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
