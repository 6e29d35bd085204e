//! Cheap tactical motif detection
//!
//! These are geometric presence checks, not verified tactics: the engine
//! remains the source of truth for what actually works.

use serde::{Deserialize, Serialize};
use shakmaty::{Bitboard, Board, Chess, Color, Position, Role, Square};

/// Type of tactical motif present in a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticalMotif {
    Check,
    HangingPiece,
    PotentialPinOrSkewer,
    KnightForkOpportunity,
}

impl TacticalMotif {
    pub fn as_str(&self) -> &'static str {
        match self {
            TacticalMotif::Check => "check",
            TacticalMotif::HangingPiece => "hanging_piece",
            TacticalMotif::PotentialPinOrSkewer => "potential_pin_skewer",
            TacticalMotif::KnightForkOpportunity => "knight_fork_opportunity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TacticalMotif::Check => "Check",
            TacticalMotif::HangingPiece => "Hanging Piece",
            TacticalMotif::PotentialPinOrSkewer => "Potential Pin/Skewer",
            TacticalMotif::KnightForkOpportunity => "Knight Fork Opportunity",
        }
    }
}

/// Runs every motif check and returns the deduplicated tags in a stable order.
pub fn detect_motifs(position: &Chess) -> Vec<TacticalMotif> {
    let board = position.board();
    let mut motifs = Vec::new();

    if position.is_check() {
        motifs.push(TacticalMotif::Check);
    }
    if has_hanging_piece(board) {
        motifs.push(TacticalMotif::HangingPiece);
    }
    if has_line_attack(board) {
        motifs.push(TacticalMotif::PotentialPinOrSkewer);
    }
    if has_knight_fork(board, position.turn()) {
        motifs.push(TacticalMotif::KnightForkOpportunity);
    }

    motifs
}

/// True if some piece has strictly more enemy attackers than friendly defenders.
pub fn has_hanging_piece(board: &Board) -> bool {
    let occupied = board.occupied();
    occupied.into_iter().any(|square| {
        board.piece_at(square).is_some_and(|piece| {
            let attackers = board.attacks_to(square, !piece.color, occupied).count();
            let defenders = board.attacks_to(square, piece.color, occupied).count();
            attackers > defenders
        })
    })
}

/// True if a bishop, rook or queen attacks an enemy piece along one of its own
/// movement axes.
pub fn has_line_attack(board: &Board) -> bool {
    let sliders = board.by_role(Role::Bishop) | board.by_role(Role::Rook) | board.by_role(Role::Queen);

    sliders.into_iter().any(|from| {
        let Some(piece) = board.piece_at(from) else {
            return false;
        };
        let enemies = board.attacks_from(from) & board.by_color(!piece.color);
        enemies.into_iter().any(|target| match piece.role {
            Role::Bishop => on_diagonal(from, target),
            Role::Rook => on_rank_or_file(from, target),
            Role::Queen => on_diagonal(from, target) || on_rank_or_file(from, target),
            _ => false,
        })
    })
}

/// True if a knight of `turn` attacks two or more of the enemy king, queens and rooks.
pub fn has_knight_fork(board: &Board, turn: Color) -> bool {
    let knights = board.by_role(Role::Knight) & board.by_color(turn);
    let valuable: Bitboard = (board.by_role(Role::King) | board.by_role(Role::Queen) | board.by_role(Role::Rook))
        & board.by_color(!turn);

    knights
        .into_iter()
        .any(|knight| (board.attacks_from(knight) & valuable).count() >= 2)
}

fn on_diagonal(a: Square, b: Square) -> bool {
    let file_delta = (i32::from(a.file()) - i32::from(b.file())).abs();
    let rank_delta = (i32::from(a.rank()) - i32::from(b.rank())).abs();
    file_delta == rank_delta
}

fn on_rank_or_file(a: Square, b: Square) -> bool {
    a.file() == b.file() || a.rank() == b.rank()
}
