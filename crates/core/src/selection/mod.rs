//! Move classification and skill-calibrated selection

mod classifier;
mod elo;
mod personality;
mod selector;

pub use classifier::{accuracy_for_loss, classify_moves, ClassifiedMove, MoveQuality};
pub use elo::EloRating;
pub use personality::{PersonalityProfile, PersonalityUpdate};
pub use selector::{base_mistake_probability, Bucket, MoveSelector, Selection, SelectionDiagnostics};

#[cfg(test)]
pub(crate) use selector::tests::FixedRng;
