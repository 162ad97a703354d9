//! Core chess engine library: bitboard position representation, magic-bitboard
//! move generation, static evaluation, and an iterative-deepening alpha-beta
//! search with a shared transposition table.
//!
//! The UCI protocol front-end lives in [`uci`] and [`engine`]; the time-to-search
//! policy (deriving soft/hard deadlines from a UCI time control) lives in
//! [`engine::time`]. Neither owns search semantics — they translate the outside
//! world's inputs into the `SearchConfig`/`SearchLimits` the core consumes.

pub mod board;
pub mod engine;
pub mod uci;
