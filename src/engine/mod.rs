//! Engine controller for managing search and game state.
//!
//! This module owns the search worker thread and the shared search state
//! (transposition table, killers, history), and translates UCI time
//! controls into the soft/hard deadlines the core search consumes.

mod controller;
pub mod time;

pub use controller::{EngineController, SearchJob, SearchParams};
pub use time::{build_search_request, compute_time_limits, TimeConfig, TimeControl};
