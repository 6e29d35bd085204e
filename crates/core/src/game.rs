//! Position helpers and the game being played against the trainer

use rand::seq::IndexedRandom;
use rand::Rng;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};
use tracing::debug;

use crate::error::{Error, Result};

pub fn parse_fen(fen: &str) -> Result<Chess> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|e| Error::InvalidFen(format!("{fen}: {e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| Error::InvalidFen(format!("{fen}: {e}")))
}

pub fn to_fen(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

/// Standard UCI notation; castling is king-two-squares (`e1g1`).
pub fn move_to_uci(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

pub fn find_legal_move(position: &Chess, uci: &str) -> Option<Move> {
    let uci = uci.trim().to_ascii_lowercase();
    position
        .legal_moves()
        .into_iter()
        .find(|mv| move_to_uci(mv) == uci)
}

/// Returns the position after `uci`. `position` is never modified.
pub fn play_move(position: &Chess, uci: &str) -> Result<Chess> {
    let mv = find_legal_move(position, uci).ok_or_else(|| Error::IllegalMove(uci.to_string()))?;
    position
        .clone()
        .play(mv)
        .map_err(|e| Error::IllegalMove(format!("{uci}: {e}")))
}

pub fn random_legal_move<R: Rng + ?Sized>(position: &Chess, rng: &mut R) -> Option<Move> {
    position.legal_moves().choose(rng).cloned()
}

/// `None` while the game is still running.
pub fn winner(position: &Chess) -> Option<Option<Color>> {
    if position.is_checkmate() {
        Some(Some(!position.turn()))
    } else if position.is_stalemate() || position.is_insufficient_material() {
        Some(None)
    } else {
        None
    }
}

pub fn result_text(position: &Chess) -> &'static str {
    match winner(position) {
        Some(Some(Color::White)) => "White wins",
        Some(Some(Color::Black)) => "Black wins",
        Some(None) => "Draw",
        None => "Game in progress",
    }
}

/// Current position plus the moves that led to it
#[derive(Debug, Clone, Default)]
pub struct TrainingGame {
    position: Chess,
    history: Vec<String>,
}

impl TrainingGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self {
            position: parse_fen(fen)?,
            history: Vec::new(),
        })
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn fen(&self) -> String {
        to_fen(&self.position)
    }

    /// Applies `uci`; on error the game is unchanged.
    pub fn make_move(&mut self, uci: &str) -> Result<()> {
        let next = play_move(&self.position, uci)?;
        self.position = next;
        self.history.push(uci.trim().to_ascii_lowercase());
        debug!(uci, ply = self.history.len(), "move played");
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position = Chess::default();
        self.history.clear();
    }

    /// Replaces the position and clears the history.
    pub fn set_position(&mut self, fen: &str) -> Result<()> {
        self.position = parse_fen(fen)?;
        self.history.clear();
        Ok(())
    }

    pub fn legal_moves(&self) -> Vec<String> {
        self.position.legal_moves().iter().map(move_to_uci).collect()
    }

    pub fn is_game_over(&self) -> bool {
        self.position.is_game_over()
    }

    pub fn result_text(&self) -> &'static str {
        result_text(&self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_fen_round_trip() {
        let pos = parse_fen(START_FEN).unwrap();
        assert_eq!(to_fen(&pos), START_FEN);
    }

    #[test]
    fn test_invalid_fen() {
        assert!(matches!(parse_fen("not a fen"), Err(Error::InvalidFen(_))));
        // Two white kings
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/K3K3 w - - 0 1"),
            Err(Error::InvalidFen(_))
        ));
    }

    #[test]
    fn test_play_move_leaves_input_untouched() {
        let start = Chess::default();
        let next = play_move(&start, "e2e4").unwrap();
        assert_eq!(
            to_fen(&next),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(to_fen(&start), START_FEN);
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let start = Chess::default();
        assert!(matches!(play_move(&start, "e2e5"), Err(Error::IllegalMove(_))));
        assert!(matches!(play_move(&start, "garbage"), Err(Error::IllegalMove(_))));
    }

    #[test]
    fn test_castling_uses_standard_notation() {
        let pos = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castled = play_move(&pos, "e1g1").unwrap();
        assert_eq!(castled.board().king_of(Color::White), Some(shakmaty::Square::G1));
        assert!(find_legal_move(&pos, "e1c1").is_some());
    }

    #[test]
    fn test_random_legal_move_is_legal_and_seeded() {
        let start = Chess::default();
        let a = random_legal_move(&start, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = random_legal_move(&start, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert!(start.is_legal(a));
    }

    #[test]
    fn test_training_game_flow() {
        let mut game = TrainingGame::new();
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.result_text(), "Game in progress");

        // Fool's mate
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.make_move(uci).unwrap();
        }
        assert!(game.is_game_over());
        assert_eq!(game.result_text(), "Black wins");
        assert_eq!(game.history().len(), 4);

        assert!(game.make_move("e2e4").is_err());
        assert_eq!(game.history().len(), 4);

        game.reset();
        assert_eq!(game.fen(), START_FEN);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_draw_results() {
        let mut game = TrainingGame::new();
        // Stalemate: black to move, no legal moves
        game.set_position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.result_text(), "Draw");

        game.set_position("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.result_text(), "Draw");
    }
}
