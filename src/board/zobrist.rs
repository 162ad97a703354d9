//! Zobrist hash keys for incremental position hashing.
//!
//! Keys are generated once from a fixed seed so hashes are reproducible
//! across runs (and therefore across `cargo test` invocations).

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Color, Piece, Square};

/// Fixed seed so the key table is identical on every build.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

pub(crate) struct ZobristKeys {
    /// `[piece][color][square]`
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) black_to_move_key: u64,
    /// `[color][side]`, side 0 = kingside, 1 = queenside.
    pub(crate) castling_keys: [[u64; 2]; 2],
    /// One key per file, used when an en-passant capture is available on that file.
    pub(crate) en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let black_to_move_key = rng.gen();
        let mut castling_keys = [[0u64; 2]; 2];
        for color in &mut castling_keys {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }
        let mut en_passant_keys = [0u64; 8];
        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }
}

pub(crate) static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::generate);

pub(crate) fn color_to_zobrist_index(color: Color) -> usize {
    color.index()
}

pub(crate) fn piece_to_zobrist_index(piece: Piece) -> usize {
    piece.index()
}

pub(crate) fn square_to_zobrist_index(sq: Square) -> usize {
    sq.index()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_reproducible_across_instances() {
        let a = ZobristKeys::generate();
        let b = ZobristKeys::generate();
        assert_eq!(a.black_to_move_key, b.black_to_move_key);
        assert_eq!(
            a.piece_keys[0][0][0],
            b.piece_keys[0][0][0]
        );
    }

    #[test]
    fn keys_differ_across_squares() {
        let keys = &*ZOBRIST;
        assert_ne!(keys.piece_keys[0][0][0], keys.piece_keys[0][0][1]);
    }
}
