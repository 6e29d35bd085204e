//! Game phase detection from material and move number

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Position, Role};

/// Chess game phases, each with its own selection and hint policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Opening => "opening",
            GamePhase::Middlegame => "middlegame",
            GamePhase::Endgame => "endgame",
        }
    }

    /// Themes a player should be thinking about in this phase.
    pub fn strategic_themes(&self) -> &'static [&'static str] {
        match self {
            GamePhase::Opening => &["Development", "Center Control", "King Safety"],
            GamePhase::Middlegame => &["Piece Activity", "Pawn Structure", "King Attack"],
            GamePhase::Endgame => &["King Activity", "Pawn Promotion", "Opposition"],
        }
    }
}

/// Material weight used for phase detection (kings excluded).
pub(crate) fn phase_weight(role: Role) -> u32 {
    match role {
        Role::Queen => 9,
        Role::Rook => 5,
        Role::Bishop | Role::Knight => 3,
        Role::Pawn => 1,
        Role::King => 0,
    }
}

/// Detects the game phase.
///
/// Opening while the fullmove number is at most 12 and at least 60 points of
/// material remain; endgame once material drops to 20 or fewer points or 12
/// or fewer pieces (kings included) are left; middlegame otherwise.
pub fn detect_game_phase(position: &Chess) -> GamePhase {
    let board = position.board();
    let mut material = 0u32;
    let mut pieces = 0u32;

    for square in board.occupied() {
        if let Some(piece) = board.piece_at(square) {
            pieces += 1;
            material += phase_weight(piece.role);
        }
    }

    if position.fullmoves().get() <= 12 && material >= 60 {
        return GamePhase::Opening;
    }

    if material <= 20 || pieces <= 12 {
        return GamePhase::Endgame;
    }

    GamePhase::Middlegame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::parse_fen;

    #[test]
    fn test_starting_position_is_opening() {
        assert_eq!(detect_game_phase(&Chess::default()), GamePhase::Opening);
    }

    #[test]
    fn test_opening_boundary_at_move_twelve() {
        // 39 (white) + 21 (black) = 60 points of material
        let exactly_sixty = parse_fen("r2qk2r/pp6/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 12").unwrap();
        assert_eq!(detect_game_phase(&exactly_sixty), GamePhase::Opening);

        let fifty_nine = parse_fen("r2qk2r/p7/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 12").unwrap();
        assert_ne!(detect_game_phase(&fifty_nine), GamePhase::Opening);
        assert_eq!(detect_game_phase(&fifty_nine), GamePhase::Middlegame);

        let move_thirteen = parse_fen("r2qk2r/pp6/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 13").unwrap();
        assert_eq!(detect_game_phase(&move_thirteen), GamePhase::Middlegame);
    }

    #[test]
    fn test_endgame_by_material_and_piece_count() {
        // Rook endgame: 5 + 5 + 6 pawns = 16 points
        let rook_ending = parse_fen("6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 40").unwrap();
        assert_eq!(detect_game_phase(&rook_ending), GamePhase::Endgame);

        // Early move number but very little material still counts as endgame
        let bare = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 3").unwrap();
        assert_eq!(detect_game_phase(&bare), GamePhase::Endgame);
    }

    #[test]
    fn test_endgame_by_piece_count_alone() {
        // Queens, rooks and two pawns each: 10 pieces but 32 points of material
        let heavy = parse_fen("r2qk3/pp6/8/8/8/8/PP6/R2QK3 w - - 0 30").unwrap();
        assert_eq!(detect_game_phase(&heavy), GamePhase::Endgame);

        // One more pawn pair keeps it at 12 pieces
        let twelve = parse_fen("r2qk3/ppp5/8/8/8/8/PPP5/R2QK3 w - - 0 30").unwrap();
        assert_eq!(detect_game_phase(&twelve), GamePhase::Endgame);

        let fourteen = parse_fen("r2qk3/pppp4/8/8/8/8/PPPP4/R2QK3 w - - 0 30").unwrap();
        assert_eq!(detect_game_phase(&fourteen), GamePhase::Middlegame);
    }

    #[test]
    fn test_strategic_themes_per_phase() {
        assert!(GamePhase::Opening.strategic_themes().contains(&"Development"));
        assert!(GamePhase::Middlegame.strategic_themes().contains(&"King Attack"));
        assert!(GamePhase::Endgame.strategic_themes().contains(&"Opposition"));
    }
}
