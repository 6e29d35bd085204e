//! Types for representing engine analysis results

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::fmt;

/// A position evaluation, always from white's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    /// Centipawn score (positive = white advantage)
    Centipawns(i32),
    /// Forced mate (positive = white mates, negative = black mates)
    Mate(i32),
}

impl Evaluation {
    /// Converts a score reported relative to the side to move into
    /// white's point of view.
    pub fn from_side_to_move(score: Evaluation, turn: Color) -> Self {
        match turn {
            Color::White => score,
            Color::Black => score.flip(),
        }
    }

    /// Negates the score.
    pub fn flip(self) -> Self {
        match self {
            Evaluation::Centipawns(cp) => Evaluation::Centipawns(-cp),
            Evaluation::Mate(moves) => Evaluation::Mate(-moves),
        }
    }

    /// The centipawn value, or `None` for mate scores.
    pub fn centipawns(&self) -> Option<i32> {
        match self {
            Evaluation::Centipawns(cp) => Some(*cp),
            Evaluation::Mate(_) => None,
        }
    }

    pub fn is_mate(&self) -> bool {
        matches!(self, Evaluation::Mate(_))
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Centipawns(cp) => {
                let score = *cp as f32 / 100.0;
                if score >= 0.0 {
                    write!(f, "+{:.2}", score)
                } else {
                    write!(f, "{:.2}", score)
                }
            }
            Evaluation::Mate(moves) => write!(f, "M{}", moves),
        }
    }
}

/// Human-readable evaluation text shown next to a suggestion.
pub fn format_evaluation(evaluation: Option<Evaluation>) -> String {
    match evaluation {
        None => "No evaluation".to_string(),
        Some(Evaluation::Mate(moves)) if moves > 0 => format!("Mate in {}", moves),
        Some(Evaluation::Mate(moves)) => format!("Mate in {} (for Black)", moves.abs()),
        Some(Evaluation::Centipawns(cp)) => {
            let pawns = cp as f64 / 100.0;
            if pawns.abs() < 0.1 {
                "Equal (0.00)".to_string()
            } else if pawns > 0.0 {
                format!("White +{:.2}", pawns)
            } else {
                format!("Black +{:.2}", pawns.abs())
            }
        }
    }
}

/// One ranked line returned by a multi-PV search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLine {
    /// The move in UCI notation (e.g., "e2e4")
    pub mv: String,
    /// Score after this move, white's point of view
    pub score: Evaluation,
    /// Depth of analysis
    pub depth: u32,
    /// Nodes searched, when the engine reported it
    pub nodes: Option<u64>,
    /// Time spent (milliseconds), when the engine reported it
    pub time_ms: Option<u64>,
    /// Principal variation, starting with `mv`
    pub pv: Vec<String>,
    /// 1-based rank as reported by the engine
    pub rank: usize,
}

impl CandidateLine {
    /// Returns a brief summary of the line
    pub fn summary(&self) -> String {
        format!(
            "#{} {} | Eval: {} | Depth: {} | PV: {}",
            self.rank,
            self.mv,
            self.score,
            self.depth,
            self.pv.iter().take(5).cloned().collect::<Vec<_>>().join(" ")
        )
    }
}
