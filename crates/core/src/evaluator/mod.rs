//! Static position evaluation for training hints
//!
//! Everything here is a pure function of the position. It feeds the hints
//! shown to the player, never the move selection.

mod hints;
mod phase;
mod structure;
mod tactics;

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Position};

pub use hints::training_hints;
pub use phase::{detect_game_phase, GamePhase};
pub use structure::{
    analyze_pawn_structure, evaluate_king_safety, material_balance, piece_value, KingSafety,
    MaterialBalance, PawnStructure,
};
pub use tactics::{detect_motifs, TacticalMotif};

/// Complete static evaluation of a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEvaluation {
    pub phase: GamePhase,
    pub tactical_motifs: Vec<TacticalMotif>,
    pub strategic_themes: Vec<String>,
    pub king_safety: KingSafety,
    pub material: MaterialBalance,
    pub pawn_structure: PawnStructure,
}

pub fn evaluate_position(position: &Chess) -> PositionEvaluation {
    let board = position.board();
    let phase = detect_game_phase(position);

    PositionEvaluation {
        phase,
        tactical_motifs: detect_motifs(position),
        strategic_themes: phase.strategic_themes().iter().map(|t| t.to_string()).collect(),
        king_safety: evaluate_king_safety(board),
        material: material_balance(board),
        pawn_structure: analyze_pawn_structure(board),
    }
}

/// Evaluates `position` and returns the training hints for it.
pub fn hints_for(position: &Chess) -> Vec<String> {
    training_hints(&evaluate_position(position))
}
