//! Opening book lookup and ELO-gated book move choice

mod polyglot;

use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::selection::EloRating;

pub use polyglot::{polyglot_key, OpeningBook};

#[cfg(test)]
pub(crate) use polyglot::tests::record;

/// Locations searched, in order, when no book path is configured.
pub const BOOK_PATHS: [&str; 5] = [
    "books/performance.bin",
    "books/human.bin",
    "books/computer.bin",
    "performance.bin",
    "human.bin",
];

/// Ratings at or above this only play the strongest book moves.
pub const STRONG_BOOK_ELO: i32 = 2000;
const STRONG_BOOK_TOP_N: usize = 3;
/// Strong players skip entries weighted below 1/4 of the top entry.
const STRONG_BOOK_MIN_SHARE: u32 = 4;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Book IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt book: {0}")]
    Corrupt(String),
}

/// A legal book move and its weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningEntry {
    pub uci: String,
    pub weight: u32,
}

/// Loads the configured book, or the first readable default location.
///
/// A missing or unreadable book disables the book branch; it is never fatal.
pub fn load_default(explicit: Option<&Path>) -> Option<OpeningBook> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => BOOK_PATHS.iter().map(PathBuf::from).collect(),
    };

    for path in &candidates {
        if !path.exists() {
            continue;
        }
        match OpeningBook::open(path) {
            Ok(book) => return Some(book),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load opening book"),
        }
    }

    info!("no opening book found, book moves disabled");
    None
}

/// Picks a book move for a player of strength `elo`.
///
/// From 2000 up the three heaviest entries are candidates and the pick is
/// uniform among those weighing at least a quarter of the heaviest one. With
/// weights `[10, 5, 1]` the weight-1 move is never played; with
/// `[100, 20, 10]` only the first entry remains. Below 2000 every entry is
/// equally likely.
pub fn select_book_move<'a, R>(
    entries: &'a [OpeningEntry],
    elo: EloRating,
    rng: &mut R,
) -> Option<&'a OpeningEntry>
where
    R: Rng + ?Sized,
{
    if elo.get() < STRONG_BOOK_ELO {
        return entries.choose(rng);
    }

    let mut ranked: Vec<&OpeningEntry> = entries.iter().collect();
    ranked.sort_by(|a, b| b.weight.cmp(&a.weight));
    ranked.truncate(STRONG_BOOK_TOP_N);

    let top = ranked.first()?.weight;
    ranked.retain(|entry| entry.weight * STRONG_BOOK_MIN_SHARE >= top);
    ranked.choose(rng).copied()
}
