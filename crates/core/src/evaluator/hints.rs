//! Human-readable training hints

use super::phase::GamePhase;
use super::PositionEvaluation;

/// King safety below this is reported as unsafe.
const UNSAFE_KING_THRESHOLD: f64 = -1.0;
/// Material difference (in pawns) worth mentioning.
const MATERIAL_HINT_THRESHOLD: i32 = 3;

/// Turns a static evaluation into training hints.
pub fn training_hints(evaluation: &PositionEvaluation) -> Vec<String> {
    let mut hints = Vec::new();

    if !evaluation.tactical_motifs.is_empty() {
        let names: Vec<&str> = evaluation
            .tactical_motifs
            .iter()
            .map(|m| m.display_name())
            .collect();
        hints.push(format!("Tactical motifs present: {}", names.join(", ")));
    }

    if evaluation.king_safety.white < UNSAFE_KING_THRESHOLD {
        hints.push("White king looks unsafe - consider defensive moves".to_string());
    }
    if evaluation.king_safety.black < UNSAFE_KING_THRESHOLD {
        hints.push("Black king looks unsafe - look for attacking chances".to_string());
    }

    let material_diff = evaluation.material.difference();
    if material_diff >= MATERIAL_HINT_THRESHOLD {
        hints.push("White has material advantage - simplify to endgame".to_string());
    } else if material_diff <= -MATERIAL_HINT_THRESHOLD {
        hints.push("Black has material advantage - avoid trades".to_string());
    }

    hints.push(
        match evaluation.phase {
            GamePhase::Opening => "Opening phase: Focus on development and center control",
            GamePhase::Middlegame => {
                "Middlegame: Look for tactical opportunities and improve piece positions"
            }
            GamePhase::Endgame => "Endgame: Activate your king and create passed pawns",
        }
        .to_string(),
    );

    hints
}

#[cfg(test)]
mod tests {
    use crate::evaluator::{evaluate_position, hints_for};
    use crate::game::parse_fen;
    use shakmaty::Chess;

    #[test]
    fn test_starting_position_hint() {
        let hints = hints_for(&Chess::default());
        assert_eq!(hints, vec!["Opening phase: Focus on development and center control"]);
    }

    #[test]
    fn test_material_and_motif_hints() {
        // White is a rook up and the black king is in check from it
        let pos = parse_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 40").unwrap();
        let hints = hints_for(&pos);

        assert!(hints[0].starts_with("Tactical motifs present: Check"));
        assert!(hints.contains(&"White has material advantage - simplify to endgame".to_string()));
        assert_eq!(
            hints.last().map(String::as_str),
            Some("Endgame: Activate your king and create passed pawns")
        );
    }

    #[test]
    fn test_unsafe_king_hint() {
        // Black queen and rook cover five squares around the white king
        let pos = parse_fen("4k3/8/8/8/8/3q4/r7/4K3 w - - 0 30").unwrap();
        let evaluation = evaluate_position(&pos);
        assert!(evaluation.king_safety.white < -1.0);
        assert!(hints_for(&pos)
            .contains(&"White king looks unsafe - consider defensive moves".to_string()));
        assert!(hints_for(&pos)
            .contains(&"Black has material advantage - avoid trades".to_string()));
    }
}
