//! Polyglot `.bin` opening book reader

use std::collections::HashMap;
use std::path::Path;

use shakmaty::zobrist::Zobrist64;
use shakmaty::{Chess, EnPassantMode, Position, Role, Square};
use tracing::{debug, info};

use super::{BookError, OpeningEntry};
use crate::game::find_legal_move;

const RECORD_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawEntry {
    mv: u16,
    weight: u16,
}

/// In-memory Polyglot book, read-only after load
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: HashMap<u64, Vec<RawEntry>>,
    positions: usize,
}

/// Polyglot key of a position.
pub fn polyglot_key(position: &Chess) -> u64 {
    position.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
}

impl OpeningBook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let book = Self::from_bytes(&bytes)?;
        info!(path = %path.display(), positions = book.positions, "opening book loaded");
        Ok(book)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BookError> {
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(BookError::Corrupt(format!(
                "size {} is not a multiple of {RECORD_SIZE}",
                bytes.len()
            )));
        }

        let mut entries: HashMap<u64, Vec<RawEntry>> = HashMap::new();
        for record in bytes.chunks_exact(RECORD_SIZE) {
            let key = u64::from_be_bytes([
                record[0], record[1], record[2], record[3], record[4], record[5], record[6], record[7],
            ]);
            let mv = u16::from_be_bytes([record[8], record[9]]);
            let weight = u16::from_be_bytes([record[10], record[11]]);
            // bytes 12..16 hold the learn field, unused
            entries.entry(key).or_default().push(RawEntry { mv, weight });
        }

        let positions = entries.len();
        Ok(Self { entries, positions })
    }

    /// Number of distinct positions in the book.
    pub fn len(&self) -> usize {
        self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions == 0
    }

    /// Legal book moves for `position`, highest weight first. Zero-weight
    /// entries are dropped.
    pub fn lookup(&self, position: &Chess) -> Vec<OpeningEntry> {
        let Some(raw) = self.entries.get(&polyglot_key(position)) else {
            return Vec::new();
        };

        let mut found: Vec<OpeningEntry> = raw
            .iter()
            .filter(|entry| entry.weight > 0)
            .filter_map(|entry| {
                let uci = decode_move(position, entry.mv);
                match find_legal_move(position, &uci) {
                    Some(_) => Some(OpeningEntry {
                        uci,
                        weight: u32::from(entry.weight),
                    }),
                    None => {
                        debug!(uci, "skipping illegal book move");
                        None
                    }
                }
            })
            .collect();

        found.sort_by(|a, b| b.weight.cmp(&a.weight));
        found
    }
}

/// Turns the packed Polyglot move into standard UCI for `position`.
fn decode_move(position: &Chess, raw: u16) -> String {
    let to = Square::new(u32::from(raw & 0x3f));
    let from = Square::new(u32::from((raw >> 6) & 0x3f));
    let promotion = match (raw >> 12) & 0x7 {
        1 => Some(Role::Knight),
        2 => Some(Role::Bishop),
        3 => Some(Role::Rook),
        4 => Some(Role::Queen),
        _ => None,
    };

    // Castling is stored as king takes own rook
    let is_king = position.board().role_at(from) == Some(Role::King);
    let to = match (from, to) {
        (Square::E1, Square::H1) if is_king => Square::G1,
        (Square::E1, Square::A1) if is_king => Square::C1,
        (Square::E8, Square::H8) if is_king => Square::G8,
        (Square::E8, Square::A8) if is_king => Square::C8,
        _ => to,
    };

    match promotion {
        Some(role) => format!("{from}{to}{}", role.char()),
        None => format!("{from}{to}"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::{parse_fen, play_move};

    /// Packs a UCI move the way Polyglot stores it.
    pub(crate) fn encode_move(uci: &str) -> u16 {
        let b = uci.as_bytes();
        let file = |c: u8| u16::from(c - b'a');
        let rank = |c: u8| u16::from(c - b'1');
        let promotion = match b.get(4) {
            Some(b'n') => 1,
            Some(b'b') => 2,
            Some(b'r') => 3,
            Some(b'q') => 4,
            _ => 0,
        };
        file(b[2]) | rank(b[3]) << 3 | file(b[0]) << 6 | rank(b[1]) << 9 | promotion << 12
    }

    pub(crate) fn record(key: u64, uci: &str, weight: u16) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(RECORD_SIZE);
        bytes.extend_from_slice(&key.to_be_bytes());
        bytes.extend_from_slice(&encode_move(uci).to_be_bytes());
        bytes.extend_from_slice(&weight.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes
    }

    #[test]
    fn test_polyglot_keys() {
        assert_eq!(polyglot_key(&Chess::default()), 0x463b96181691fc9c);
        let after_e4 = play_move(&Chess::default(), "e2e4").unwrap();
        assert_eq!(polyglot_key(&after_e4), 0x823c9b50fd114196);
    }

    #[test]
    fn test_move_encoding() {
        assert_eq!(encode_move("e2e4"), 796);
        assert_eq!(encode_move("d2d4"), 731);
        assert_eq!(encode_move("g1f3"), 405);
        assert_eq!(decode_move(&Chess::default(), 796), "e2e4");
    }

    #[test]
    fn test_castling_is_converted() {
        let pos = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(decode_move(&pos, encode_move("e1h1")), "e1g1");
        assert_eq!(decode_move(&pos, encode_move("e1a1")), "e1c1");
        // A rook move along the same squares is left alone
        let rook = parse_fen("k7/8/8/8/8/8/K7/4R3 w - - 0 1").unwrap();
        assert_eq!(decode_move(&rook, encode_move("e1h1")), "e1h1");
        assert!(find_legal_move(&rook, "e1h1").is_some());
    }

    #[test]
    fn test_promotion_decoding() {
        let pos = parse_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        assert_eq!(decode_move(&pos, encode_move("e7e8q")), "e7e8q");
        assert_eq!(decode_move(&pos, encode_move("e7e8n")), "e7e8n");
    }

    #[test]
    fn test_lookup_filters_and_sorts() {
        let key = polyglot_key(&Chess::default());
        let mut bytes = Vec::new();
        bytes.extend(record(key, "d2d4", 5));
        bytes.extend(record(key, "e2e4", 10));
        bytes.extend(record(key, "g1f3", 0));
        bytes.extend(record(key, "e2e5", 7));
        bytes.extend(record(0xdead_beef, "a2a3", 3));

        let book = OpeningBook::from_bytes(&bytes).unwrap();
        assert_eq!(book.len(), 2);

        let entries = book.lookup(&Chess::default());
        let moves: Vec<_> = entries.iter().map(|e| (e.uci.as_str(), e.weight)).collect();
        assert_eq!(moves, vec![("e2e4", 10), ("d2d4", 5)]);
    }

    #[test]
    fn test_unknown_position_is_empty() {
        let book = OpeningBook::from_bytes(&record(1, "e2e4", 1)).unwrap();
        assert!(book.lookup(&Chess::default()).is_empty());
    }

    #[test]
    fn test_truncated_file_is_corrupt() {
        let mut bytes = record(1, "e2e4", 1);
        bytes.pop();
        assert!(matches!(OpeningBook::from_bytes(&bytes), Err(BookError::Corrupt(_))));
    }
}
