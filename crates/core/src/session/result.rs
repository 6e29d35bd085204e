use serde::{Deserialize, Serialize};

use crate::engine::Evaluation;
use crate::evaluator::PositionEvaluation;
use crate::selection::{ClassifiedMove, SelectionDiagnostics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    Book,
    Engine,
}

/// Output of one selection cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Move the trainer plays, in UCI
    pub suggested_move: Option<String>,
    /// Engine's rank-1 move (or the book move)
    pub best_move: Option<String>,
    pub evaluation: Option<Evaluation>,
    pub eval_text: String,
    /// Every classified candidate, rank order
    pub moves: Vec<ClassifiedMove>,
    /// `None` for the random fallback
    pub source: Option<MoveSource>,
    pub position_evaluation: Option<PositionEvaluation>,
    pub diagnostics: Option<SelectionDiagnostics>,
    pub message: Option<String>,
    /// Per-call failure captured instead of propagated
    pub error: Option<String>,
}

impl AnalysisResult {
    fn empty(eval_text: &str) -> Self {
        Self {
            suggested_move: None,
            best_move: None,
            evaluation: None,
            eval_text: eval_text.to_string(),
            moves: Vec::new(),
            source: None,
            position_evaluation: None,
            diagnostics: None,
            message: None,
            error: None,
        }
    }

    pub fn game_over() -> Self {
        Self {
            message: Some("Game is over".to_string()),
            ..Self::empty("Game over")
        }
    }

    /// A per-call failure with no suggestion at all.
    pub fn failed(error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::empty("No evaluation")
        }
    }

    pub fn is_book(&self) -> bool {
        self.source == Some(MoveSource::Book)
    }

    pub fn is_fallback(&self) -> bool {
        self.source.is_none() && self.suggested_move.is_some()
    }
}
