//! Transposition table: a flat, direct-mapped table of previously searched
//! positions, used both for search cutoffs and for move ordering.

use std::cell::RefCell;

use super::types::Move;

/// Bound type recorded for a transposition-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundType {
    /// Exact score (a PV node).
    Exact,
    /// Score is a lower bound (failed high, beta cutoff).
    LowerBound,
    /// Score is an upper bound (failed low, no move raised alpha).
    UpperBound,
}

/// Alias kept for callers that prefer the shorter name.
pub use BoundType as Bound;

const MATE_THRESHOLD: i32 = super::search::MATE_SCORE;

/// A single slot of the transposition table.
///
/// `zobrist == 0` marks an empty slot; real positions collide with zero
/// with probability `2^-64`, which is an acceptable trade for not needing
/// a separate "occupied" bit.
#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    zobrist: u64,
    score: i16,
    depth: u8,
    bound: BoundType,
    best_move: u16,
}

impl TTEntry {
    const EMPTY: TTEntry = TTEntry {
        zobrist: 0,
        score: 0,
        depth: 0,
        bound: BoundType::Exact,
        best_move: 0,
    };

    #[must_use]
    pub fn score(&self) -> i32 {
        i32::from(self.score)
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    #[must_use]
    pub fn bound_type(&self) -> BoundType {
        self.bound
    }

    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        if self.best_move == 0 {
            None
        } else {
            Some(Move::from_u16(self.best_move))
        }
    }
}

/// Adjust a mate score found at `ply` into a ply-independent score for
/// storage, or back out again on probe. Mate scores are stored relative to
/// the root so that a mate found deeper in one search tree still compares
/// correctly when retrieved at a different ply in another.
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Largest prime not exceeding `n`, found by trial division. Only ever
/// called once per resize on a table with at most a few million slots, so
/// trial division is plenty fast.
fn largest_prime_leq(n: usize) -> usize {
    fn is_prime(n: usize) -> bool {
        if n < 2 {
            return false;
        }
        if n % 2 == 0 {
            return n == 2;
        }
        let mut d = 3;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 2;
        }
        true
    }

    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate -= 1;
    }
    candidate
}

/// Flat, direct-mapped transposition table.
///
/// Interior mutability lets `probe`/`store` take `&self`, matching how the
/// single-threaded search shares the table between move-ordering probes
/// and the recursive `alphabeta` calls without needing a `&mut` threaded
/// through every frame.
pub struct TranspositionTable {
    entries: RefCell<Vec<TTEntry>>,
}

impl TranspositionTable {
    /// Build a table sized to (approximately) `mebibytes` MiB.
    #[must_use]
    pub fn new(mebibytes: usize) -> Self {
        let bytes = mebibytes.max(1) * 1024 * 1024;
        let slots = (bytes / std::mem::size_of::<TTEntry>()).max(1);
        let capacity = largest_prime_leq(slots);
        TranspositionTable {
            entries: RefCell::new(vec![TTEntry::EMPTY; capacity]),
        }
    }

    fn slot(&self, hash: u64) -> usize {
        let capacity = self.entries.borrow().len() as u64;
        (hash % capacity) as usize
    }

    /// Raw probe: returns the stored entry without mate-score adjustment.
    /// Used by move-ordering/PV-extraction call sites that only need
    /// `best_move()`.
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        let entries = self.entries.borrow();
        let entry = entries[self.slot(hash) % entries.len()];
        if entry.zobrist == hash {
            Some(entry)
        } else {
            None
        }
    }

    /// Probe with the stored score adjusted for `ply`, for use at cutoff
    /// decisions where the absolute score matters.
    #[must_use]
    pub fn probe_adjusted(&self, hash: u64, ply: usize) -> Option<TTEntry> {
        self.probe(hash).map(|mut entry| {
            entry.score = score_from_tt(i32::from(entry.score), ply)
                .clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
            entry
        })
    }

    /// Prefetch the cache line for `hash`. A no-op on platforms without an
    /// explicit prefetch intrinsic; kept so call sites can hint without
    /// needing `#[cfg]` guards of their own.
    pub fn prefetch(&self, _hash: u64) {}

    /// Store a search result, always replacing whatever was in the slot.
    pub fn store(
        &self,
        hash: u64,
        depth: u32,
        score: i32,
        bound: BoundType,
        best_move: Option<Move>,
        ply: usize,
    ) {
        let adjusted = score_to_tt(score, ply).clamp(i32::from(i16::MIN), i32::from(i16::MAX));
        let entry = TTEntry {
            zobrist: hash,
            score: adjusted as i16,
            depth: depth.min(u32::from(u8::MAX)) as u8,
            bound,
            best_move: best_move.map_or(0, |m| m.as_u16()),
        };
        let mut entries = self.entries.borrow_mut();
        let idx = (hash % entries.len() as u64) as usize;
        entries[idx] = entry;
    }

    /// Clear every slot back to empty.
    pub fn clear(&self) {
        for entry in self.entries.borrow_mut().iter_mut() {
            *entry = TTEntry::EMPTY;
        }
    }

    /// Resize to (approximately) `mebibytes` MiB, clearing the table.
    pub fn resize(&self, mebibytes: usize) {
        let bytes = mebibytes.max(1) * 1024 * 1024;
        let slots = (bytes / std::mem::size_of::<TTEntry>()).max(1);
        let capacity = largest_prime_leq(slots);
        *self.entries.borrow_mut() = vec![TTEntry::EMPTY; capacity];
    }

    /// Permille of occupied slots, sampled from the first 1000 entries
    /// (or the whole table if smaller), matching the UCI `hashfull` stat.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let entries = self.entries.borrow();
        let sample = entries.len().min(1000);
        if sample == 0 {
            return 0;
        }
        let used = entries[..sample].iter().filter(|e| e.zobrist != 0).count();
        ((used * 1000) / sample) as u32
    }
}
