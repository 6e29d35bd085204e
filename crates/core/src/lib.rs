//! Chess Trainer Core Library
//!
//! Analyzes positions with a UCI engine, labels each candidate move and picks
//! the move a player of a given rating would plausibly make.

pub mod book;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod scheduler;
pub mod selection;
pub mod session;

pub use book::{OpeningBook, OpeningEntry};
pub use config::TrainerConfig;
pub use engine::{CandidateLine, EngineGateway, EngineOptions, Evaluation, StockfishEngine};
pub use error::{Error, Result};
pub use evaluator::{evaluate_position, GamePhase, PositionEvaluation, TacticalMotif};
pub use game::{parse_fen, play_move, TrainingGame};
pub use scheduler::{AnalysisScheduler, SchedulerState};
pub use selection::{ClassifiedMove, EloRating, MoveQuality, PersonalityProfile, PersonalityUpdate};
pub use session::{AnalysisResult, MoveSource, TrainingSession};
