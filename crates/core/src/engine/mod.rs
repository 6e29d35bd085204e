//! Chess engine integration
//!
//! Provides the [`EngineGateway`] contract and a UCI implementation for
//! Stockfish-compatible engines.

pub mod analysis;
pub mod gateway;
pub mod stockfish;

// Re-export main types for convenience
pub use analysis::{format_evaluation, CandidateLine, Evaluation};
pub use gateway::{EngineError, EngineGateway, EngineOptions};
pub use stockfish::StockfishEngine;
