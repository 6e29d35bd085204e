//! The contract the trainer needs from an analysis engine.

use serde::{Deserialize, Serialize};
use shakmaty::Chess;
use std::time::Duration;
use thiserror::Error;

use super::analysis::CandidateLine;

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Executable was not found at the given path
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// Failed to start the engine process
    #[error("Failed to start engine: {0}")]
    Spawn(String),
    /// Failed to communicate with engine
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Engine returned unexpected response
    #[error("Protocol error: {0}")]
    Protocol(String),
    /// The search finished without a single usable line
    #[error("Engine returned no candidate lines")]
    EmptyResult,
    /// The engine has already been shut down
    #[error("Engine is closed")]
    Closed,
}

/// Options sent to the engine once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Hash table size in MB
    pub hash_mb: u32,
    pub threads: u32,
    /// Number of ranked lines ("MultiPV")
    pub multi_pv: u32,
    pub skill_level: u32,
    pub move_overhead_ms: u32,
    pub minimum_thinking_time_ms: u32,
    pub slow_mover: u32,
    pub contempt: i32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hash_mb: 256,
            threads: 4,
            multi_pv: 5,
            skill_level: 20,
            move_overhead_ms: 30,
            minimum_thinking_time_ms: 20,
            slow_mover: 100,
            contempt: 0,
        }
    }
}

impl EngineOptions {
    /// UCI option names paired with their values, in the order they are sent.
    pub fn as_uci_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Hash", self.hash_mb.to_string()),
            ("Threads", self.threads.to_string()),
            ("MultiPV", self.multi_pv.to_string()),
            ("Contempt", self.contempt.to_string()),
            ("Skill Level", self.skill_level.to_string()),
            ("Move Overhead", self.move_overhead_ms.to_string()),
            ("Minimum Thinking Time", self.minimum_thinking_time_ms.to_string()),
            ("Slow Mover", self.slow_mover.to_string()),
        ]
    }
}

/// A long-lived analysis engine.
///
/// Implementations are stateful and must not be driven by more than one
/// caller at a time; [`crate::scheduler::AnalysisScheduler`] enforces that.
pub trait EngineGateway: Send {
    /// Applies startup options. Called once before the first analysis.
    fn configure(&mut self, options: &EngineOptions) -> Result<(), EngineError>;

    /// Searches `position` for `time_limit` and returns between 1 and `lines`
    /// candidates ordered by rank (1, 2, ...), scores from white's point of view.
    fn analyze(
        &mut self,
        position: &Chess,
        time_limit: Duration,
        lines: usize,
    ) -> Result<Vec<CandidateLine>, EngineError>;

    /// Stops the engine. Further calls fail with [`EngineError::Closed`].
    fn shutdown(&mut self) -> Result<(), EngineError>;
}
