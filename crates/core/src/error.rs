//! Error types for chess-trainer-core

use thiserror::Error;

use crate::book::BookError;
use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum Error {
    /// The engine process could not be started. Fatal for the session.
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(#[source] EngineError),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Engine returned no candidate lines")]
    EmptyResult,

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("An analysis is already running for this engine")]
    ConcurrentDispatchRejected,

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("ELO {0} is outside 800..=2500")]
    InvalidElo(i32),

    #[error("Opening book error: {0}")]
    Book(#[from] BookError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EngineError> for Error {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::EmptyResult => Error::EmptyResult,
            other => Error::AnalysisFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
