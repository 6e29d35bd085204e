//! Skill-calibrated move selection
//!
//! Picks a move from the classified candidates so that a lower rating plays
//! weaker moves more often. Randomness is always injected by the caller.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifier::ClassifiedMove;
use super::elo::EloRating;
use super::personality::PersonalityProfile;
use crate::evaluator::GamePhase;

/// Roll needed before the excellent bucket is considered at all.
const EXCELLENT_ROLL_THRESHOLD: f64 = 0.3;

/// Accuracy bucket a candidate falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// >= 95
    Excellent,
    /// [80, 95)
    Good,
    /// [60, 80)
    Okay,
    /// < 60
    Poor,
}

impl Bucket {
    pub fn for_accuracy(accuracy: f64) -> Self {
        if accuracy >= 95.0 {
            Bucket::Excellent
        } else if accuracy >= 80.0 {
            Bucket::Good
        } else if accuracy >= 60.0 {
            Bucket::Okay
        } else {
            Bucket::Poor
        }
    }

    fn index(self) -> usize {
        match self {
            Bucket::Excellent => 0,
            Bucket::Good => 1,
            Bucket::Okay => 2,
            Bucket::Poor => 3,
        }
    }
}

/// Base chance of a deliberate weaker move before strength scaling.
pub fn base_mistake_probability(phase: GamePhase) -> f64 {
    match phase {
        GamePhase::Opening => 0.10,
        GamePhase::Middlegame => 0.20,
        GamePhase::Endgame => 0.15,
    }
}

/// Why a move was picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDiagnostics {
    pub elo: EloRating,
    pub strength: f64,
    pub mistake_probability: f64,
    pub roll: f64,
    /// `None` when no bucket matched and the rank-1 line was used.
    pub bucket: Option<Bucket>,
    pub phase: GamePhase,
    pub personality: PersonalityProfile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub chosen: &'a ClassifiedMove,
    pub diagnostics: SelectionDiagnostics,
}

#[derive(Debug, Clone, Copy)]
pub struct MoveSelector {
    elo: EloRating,
    phase: GamePhase,
    personality: PersonalityProfile,
}

impl MoveSelector {
    pub fn new(elo: EloRating, phase: GamePhase, personality: PersonalityProfile) -> Self {
        Self {
            elo,
            phase,
            personality,
        }
    }

    pub fn mistake_probability(&self) -> f64 {
        base_mistake_probability(self.phase) * (1.0 - self.elo.strength())
    }

    /// Picks one of `moves`. Returns `None` only for an empty slice.
    ///
    /// Exactly one value is drawn for the roll and at most one more to pick
    /// within a bucket, so a seeded `rng` reproduces the same choice.
    pub fn select<'a, R>(&self, moves: &'a [ClassifiedMove], rng: &mut R) -> Option<Selection<'a>>
    where
        R: Rng + ?Sized,
    {
        let fallback = moves.iter().find(|m| m.rank() == 1).or_else(|| moves.first())?;

        let mut buckets: [Vec<&ClassifiedMove>; 4] = Default::default();
        for mv in moves {
            buckets[Bucket::for_accuracy(mv.accuracy).index()].push(mv);
        }

        let mistake_probability = self.mistake_probability();
        let roll: f64 = rng.random();

        let preference: &[Bucket] = if roll > mistake_probability {
            if roll > EXCELLENT_ROLL_THRESHOLD {
                &[Bucket::Excellent, Bucket::Good, Bucket::Okay]
            } else {
                &[Bucket::Good, Bucket::Okay]
            }
        } else if roll > mistake_probability / 2.0 {
            &[Bucket::Okay, Bucket::Poor]
        } else {
            &[Bucket::Poor]
        };

        let picked = preference.iter().find_map(|bucket| {
            buckets[bucket.index()]
                .choose(&mut *rng)
                .map(|mv| (*bucket, *mv))
        });

        let (bucket, chosen) = match picked {
            Some((bucket, mv)) => (Some(bucket), mv),
            None => (None, fallback),
        };

        debug!(
            elo = self.elo.get(),
            phase = self.phase.as_str(),
            mistake_probability,
            roll,
            ?bucket,
            chosen = chosen.mv(),
            "selected move"
        );

        Some(Selection {
            chosen,
            diagnostics: SelectionDiagnostics {
                elo: self.elo,
                strength: self.elo.strength(),
                mistake_probability,
                roll,
                bucket,
                phase: self.phase,
                personality: self.personality,
            },
        })
    }
}
