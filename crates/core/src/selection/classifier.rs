//! Move quality classification from engine candidate lines

use serde::{Deserialize, Serialize};

use crate::engine::CandidateLine;

/// Quality label of a candidate move, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    /// < 50 centipawn loss
    Good,
    /// >= 50 centipawn loss
    Inaccuracy,
    /// >= 150 centipawn loss
    Mistake,
    /// >= 300 centipawn loss
    Blunder,
}

impl MoveQuality {
    /// Most severe matching threshold wins.
    pub fn from_cp_loss(cp_loss: i32) -> Self {
        match cp_loss {
            l if l >= 300 => MoveQuality::Blunder,
            l if l >= 150 => MoveQuality::Mistake,
            l if l >= 50 => MoveQuality::Inaccuracy,
            _ => MoveQuality::Good,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveQuality::Good => "none",
            MoveQuality::Inaccuracy => "inaccuracy",
            MoveQuality::Mistake => "mistake",
            MoveQuality::Blunder => "blunder",
        }
    }
}

/// A candidate line with its accuracy and quality label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedMove {
    #[serde(flatten)]
    pub line: CandidateLine,
    /// 0..=100
    pub accuracy: f64,
    pub quality: MoveQuality,
    /// Loss against the top line; `None` when either side of the comparison
    /// is not a centipawn score.
    pub cp_loss: Option<i32>,
}

impl ClassifiedMove {
    pub fn mv(&self) -> &str {
        &self.line.mv
    }

    pub fn rank(&self) -> usize {
        self.line.rank
    }
}

/// Accuracy for a raw centipawn delta.
pub fn accuracy_for_loss(cp_loss: i32) -> f64 {
    (100.0 - cp_loss.unsigned_abs() as f64 / 10.0).max(0.0)
}

/// Classifies engine lines against the rank-1 line.
///
/// Losses are raw white-perspective deltas (`best - move`) and are not
/// adjusted for the side to move. A mate score at rank 1 counts as a best of
/// 0 cp; mate-scored candidates themselves get accuracy 0 and no label.
pub fn classify_moves(lines: Vec<CandidateLine>) -> Vec<ClassifiedMove> {
    let best_cp = lines
        .first()
        .and_then(|best| best.score.centipawns())
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|line| match line.score.centipawns() {
            Some(move_cp) => {
                let cp_loss = best_cp - move_cp;
                ClassifiedMove {
                    line,
                    accuracy: accuracy_for_loss(cp_loss),
                    quality: MoveQuality::from_cp_loss(cp_loss),
                    cp_loss: Some(cp_loss),
                }
            }
            None => ClassifiedMove {
                line,
                accuracy: 0.0,
                quality: MoveQuality::Good,
                cp_loss: None,
            },
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::Evaluation;

    pub(crate) fn line(rank: usize, mv: &str, score: Evaluation) -> CandidateLine {
        CandidateLine {
            mv: mv.to_string(),
            score,
            depth: 18,
            nodes: Some(100_000),
            time_ms: Some(1000),
            pv: vec![mv.to_string()],
            rank,
        }
    }

    pub(crate) fn cp_lines(scores: &[i32]) -> Vec<CandidateLine> {
        const MOVES: [&str; 8] = ["e2e4", "d2d4", "g1f3", "c2c4", "b1c3", "g2g3", "f2f4", "b2b3"];
        scores
            .iter()
            .enumerate()
            .map(|(i, cp)| line(i + 1, MOVES[i], Evaluation::Centipawns(*cp)))
            .collect()
    }

    #[test]
    fn test_threshold_cascade() {
        assert_eq!(MoveQuality::from_cp_loss(0), MoveQuality::Good);
        assert_eq!(MoveQuality::from_cp_loss(49), MoveQuality::Good);
        assert_eq!(MoveQuality::from_cp_loss(50), MoveQuality::Inaccuracy);
        assert_eq!(MoveQuality::from_cp_loss(149), MoveQuality::Inaccuracy);
        assert_eq!(MoveQuality::from_cp_loss(150), MoveQuality::Mistake);
        assert_eq!(MoveQuality::from_cp_loss(299), MoveQuality::Mistake);
        assert_eq!(MoveQuality::from_cp_loss(300), MoveQuality::Blunder);
        assert_eq!(MoveQuality::from_cp_loss(-500), MoveQuality::Good);
    }

    #[test]
    fn test_severity_is_monotone_in_loss() {
        let mut previous = MoveQuality::Good;
        for loss in -100..1000 {
            let quality = MoveQuality::from_cp_loss(loss);
            assert!(quality >= previous, "loss {loss} dropped severity");
            previous = quality;
        }
    }

    #[test]
    fn test_accuracy_bounds_and_monotonicity() {
        assert_eq!(accuracy_for_loss(0), 100.0);
        assert_eq!(accuracy_for_loss(40), 96.0);
        assert_eq!(accuracy_for_loss(170), 83.0);
        assert_eq!(accuracy_for_loss(1000), 0.0);
        assert_eq!(accuracy_for_loss(5000), 0.0);
        // Uses the absolute delta
        assert_eq!(accuracy_for_loss(-40), 96.0);

        let mut previous = 100.0;
        for loss in 0..1200 {
            let accuracy = accuracy_for_loss(loss);
            assert!((0.0..=100.0).contains(&accuracy));
            assert!(accuracy <= previous);
            previous = accuracy;
        }
    }

    #[test]
    fn test_classify_starting_position_lines() {
        let classified = classify_moves(cp_lines(&[50, 10, -120]));

        let losses: Vec<_> = classified.iter().map(|m| m.cp_loss).collect();
        assert_eq!(losses, vec![Some(0), Some(40), Some(170)]);

        let labels: Vec<_> = classified.iter().map(|m| m.quality).collect();
        assert_eq!(labels, vec![MoveQuality::Good, MoveQuality::Good, MoveQuality::Mistake]);

        let ranks: Vec<_> = classified.iter().map(|m| m.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_loss_is_not_perspective_adjusted() {
        // Black to move: lower white-perspective scores are better for black,
        // but the classifier still compares raw values.
        let classified = classify_moves(cp_lines(&[-80, -20]));
        assert_eq!(classified[1].cp_loss, Some(-60));
        assert_eq!(classified[1].quality, MoveQuality::Good);
        assert_eq!(classified[1].accuracy, 94.0);
    }

    #[test]
    fn test_mate_scores_are_not_compared() {
        let lines = vec![
            line(1, "d1h5", Evaluation::Mate(2)),
            line(2, "e2e4", Evaluation::Centipawns(120)),
            line(3, "a2a3", Evaluation::Mate(-3)),
        ];
        let classified = classify_moves(lines);

        // Mate at rank 1 is treated as a 0 cp baseline
        assert_eq!(classified[0].cp_loss, None);
        assert_eq!(classified[0].accuracy, 0.0);
        assert_eq!(classified[0].quality, MoveQuality::Good);
        assert_eq!(classified[1].cp_loss, Some(-120));
        assert_eq!(classified[1].accuracy, 88.0);
        assert_eq!(classified[2].cp_loss, None);
    }

    #[test]
    fn test_empty_input() {
        assert!(classify_moves(Vec::new()).is_empty());
    }
}
