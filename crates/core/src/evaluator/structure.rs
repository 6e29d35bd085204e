//! King safety, pawn structure and material balance

use serde::{Deserialize, Serialize};
use shakmaty::{Board, Color, Role, Square};

/// King safety score per color. Higher is safer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KingSafety {
    pub white: f64,
    pub black: f64,
}

/// Pawn structure accumulators per color
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PawnStructure {
    pub white_weaknesses: f64,
    pub black_weaknesses: f64,
    pub white_strengths: f64,
    pub black_strengths: f64,
}

/// Material per color in pawn units (king counts as 0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialBalance {
    pub white: u32,
    pub black: u32,
}

impl MaterialBalance {
    /// White minus black
    pub fn difference(&self) -> i32 {
        self.white as i32 - self.black as i32
    }
}

const CASTLED_BONUS: f64 = 2.0;
const ATTACKED_ZONE_PENALTY: f64 = 0.5;
const SHIELD_PAWN_BONUS: f64 = 0.3;

const DOUBLED_PAWN_PENALTY: f64 = 0.5;
const ISOLATED_PAWN_PENALTY: f64 = 0.5;
const PASSED_PAWN_BONUS: f64 = 0.8;

pub fn piece_value(role: Role) -> u32 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}

fn square_at(file: i32, rank: i32) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::new((rank * 8 + file) as u32))
    } else {
        None
    }
}

fn file_of(square: Square) -> i32 {
    i32::from(square.file())
}

fn rank_of(square: Square) -> i32 {
    i32::from(square.rank())
}

pub fn evaluate_king_safety(board: &Board) -> KingSafety {
    KingSafety {
        white: king_safety_for(board, Color::White),
        black: king_safety_for(board, Color::Black),
    }
}

fn king_safety_for(board: &Board, color: Color) -> f64 {
    let Some(king) = board.king_of(color) else {
        return 0.0;
    };
    let mut safety = 0.0;

    let castled = match color {
        Color::White => [Square::G1, Square::C1],
        Color::Black => [Square::G8, Square::C8],
    };
    if castled.contains(&king) {
        safety += CASTLED_BONUS;
    }

    let (king_file, king_rank) = (file_of(king), rank_of(king));
    let occupied = board.occupied();

    let mut attacked = 0;
    for file_offset in -1..=1 {
        for rank_offset in -1..=1 {
            if let Some(square) = square_at(king_file + file_offset, king_rank + rank_offset) {
                if board.attacks_to(square, !color, occupied).any() {
                    attacked += 1;
                }
            }
        }
    }
    safety -= attacked as f64 * ATTACKED_ZONE_PENALTY;

    // Pawn shield only counts while the king sits on its back three ranks.
    let shield_rank = match color {
        Color::White if king_rank < 3 => Some(king_rank + 1),
        Color::Black if king_rank > 4 => Some(king_rank - 1),
        _ => None,
    };
    if let Some(rank) = shield_rank {
        let own_pawns = board.by_role(Role::Pawn) & board.by_color(color);
        let shield = (-1..=1)
            .filter_map(|offset| square_at(king_file + offset, rank))
            .filter(|square| own_pawns.contains(*square))
            .count();
        safety += shield as f64 * SHIELD_PAWN_BONUS;
    }

    safety
}

pub fn analyze_pawn_structure(board: &Board) -> PawnStructure {
    let white_pawns: Vec<Square> = (board.by_role(Role::Pawn) & board.by_color(Color::White)).into_iter().collect();
    let black_pawns: Vec<Square> = (board.by_role(Role::Pawn) & board.by_color(Color::Black)).into_iter().collect();

    let (white_weaknesses, white_strengths) = pawn_scores(Color::White, &white_pawns, &black_pawns);
    let (black_weaknesses, black_strengths) = pawn_scores(Color::Black, &black_pawns, &white_pawns);

    PawnStructure {
        white_weaknesses,
        black_weaknesses,
        white_strengths,
        black_strengths,
    }
}

/// Returns (weaknesses, strengths) for one side's pawns.
fn pawn_scores(color: Color, pawns: &[Square], enemy_pawns: &[Square]) -> (f64, f64) {
    let mut per_file = [0u32; 8];
    for pawn in pawns {
        per_file[file_of(*pawn) as usize] += 1;
    }

    let mut weaknesses = 0.0;
    let mut strengths = 0.0;

    for count in per_file {
        if count > 1 {
            weaknesses += (count - 1) as f64 * DOUBLED_PAWN_PENALTY;
        }
    }

    for pawn in pawns {
        let file = file_of(*pawn);
        let isolated = [file - 1, file + 1]
            .into_iter()
            .all(|f| !(0..8).contains(&f) || per_file[f as usize] == 0);
        if isolated {
            weaknesses += ISOLATED_PAWN_PENALTY;
        }

        let rank = rank_of(*pawn);
        let blocked = enemy_pawns.iter().any(|enemy| {
            (file_of(*enemy) - file).abs() <= 1
                && match color {
                    Color::White => rank_of(*enemy) > rank,
                    Color::Black => rank_of(*enemy) < rank,
                }
        });
        if !blocked {
            strengths += PASSED_PAWN_BONUS;
        }
    }

    (weaknesses, strengths)
}

pub fn material_balance(board: &Board) -> MaterialBalance {
    let mut balance = MaterialBalance::default();
    for square in board.occupied() {
        if let Some(piece) = board.piece_at(square) {
            let value = piece_value(piece.role);
            match piece.color {
                Color::White => balance.white += value,
                Color::Black => balance.black += value,
            }
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::parse_fen;
    use shakmaty::{Chess, Position};

    fn board(fen: &str) -> Board {
        parse_fen(fen).unwrap().board().clone()
    }

    #[test]
    fn test_castled_king_with_full_shield() {
        let safety = evaluate_king_safety(&board("4k3/8/8/8/8/8/5PPP/6K1 w - - 0 1"));
        assert!((safety.white - 2.9).abs() < 1e-9, "got {}", safety.white);
    }

    #[test]
    fn test_attacked_zone_squares_reduce_safety() {
        // Black rook on f1 checks the white king and covers f2
        let safety = evaluate_king_safety(&board("4k3/8/8/8/8/8/6PP/5rK1 w - - 0 1"));
        // castled +2.0, g1 and f2 attacked (-1.0), shield g2 + h2 (+0.6)
        assert!((safety.white - 1.6).abs() < 1e-9, "got {}", safety.white);
    }

    #[test]
    fn test_advanced_king_gets_no_shield() {
        let safety = evaluate_king_safety(&board("4k3/8/8/3PPP2/4K3/8/8/8 w - - 0 1"));
        assert!(safety.white <= 0.0);
    }

    #[test]
    fn test_black_king_mirrors_white() {
        let safety = evaluate_king_safety(&board("6k1/5ppp/8/8/8/8/8/4K3 w - - 0 1"));
        assert!((safety.black - 2.9).abs() < 1e-9, "got {}", safety.black);
    }

    #[test]
    fn test_starting_position_is_balanced() {
        let start = Chess::default();
        let structure = analyze_pawn_structure(start.board());
        assert_eq!(structure.white_weaknesses, 0.0);
        assert_eq!(structure.black_weaknesses, 0.0);
        assert_eq!(structure.white_strengths, 0.0);
        assert_eq!(structure.black_strengths, 0.0);

        let material = material_balance(start.board());
        assert_eq!(material.white, 39);
        assert_eq!(material.black, 39);
        assert_eq!(material.difference(), 0);
    }

    #[test]
    fn test_doubled_isolated_and_passed_pawns() {
        // White: doubled isolated pawns on c2/c3, passed pawn on h5.
        // Black: single pawn on a7.
        let structure = analyze_pawn_structure(&board("4k3/p7/8/7P/8/2P5/2P5/4K3 w - - 0 1"));
        // doubled (+0.5) and both c-pawns isolated (+1.0), h5 isolated (+0.5)
        assert!((structure.white_weaknesses - 2.0).abs() < 1e-9);
        // c-pawns are passed too: the a7 pawn is two files away
        assert!((structure.white_strengths - 2.4).abs() < 1e-9);
        // a7: isolated, and passed since no white pawn on a/b files
        assert!((structure.black_weaknesses - 0.5).abs() < 1e-9);
        assert!((structure.black_strengths - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_blocked_pawn_is_not_passed() {
        let structure = analyze_pawn_structure(&board("4k3/8/3p4/8/4P3/8/8/4K3 w - - 0 1"));
        assert_eq!(structure.white_strengths, 0.0);
        assert_eq!(structure.black_strengths, 0.0);
    }

    #[test]
    fn test_material_counts_without_king() {
        let material = material_balance(&board("4k3/8/8/8/8/8/8/R3K3 w - - 0 1"));
        assert_eq!(material.white, 5);
        assert_eq!(material.black, 0);
        assert_eq!(material.difference(), 5);
    }
}
