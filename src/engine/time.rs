//! Time-to-search policy.
//!
//! Translates a UCI time control plus the position's game phase into the
//! soft/hard deadlines the controller hands to the search worker. The two
//! budget formulas below (sudden-death and phase-weighted) are the fixed
//! contract; everything else here (move overhead, the hard-deadline
//! multiplier) is ambient safety margin layered on top, not part of it.

use std::time::Duration;

/// Default moves-to-go estimate used by the phase-weighted branch when the
/// protocol did not send `movestogo`.
pub const DEFAULT_MOVES_TO_GO: u64 = 40;

/// Multiplier applied to the soft budget to obtain the hard stop, absent any
/// spec guidance on the hard limit itself.
const HARD_DEADLINE_MULTIPLIER: u64 = 3;

/// Tunables shared by both budget formulas.
#[derive(Debug, Clone, Copy)]
pub struct TimeConfig {
    /// Time to reserve for move overhead (communication latency, etc.)
    pub move_overhead_ms: u64,
    /// Default maximum nodes (0 = unlimited)
    pub default_max_nodes: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            move_overhead_ms: 50,
            default_max_nodes: 0,
        }
    }
}

/// Time control settings for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// Infinite search - no time limit
    #[default]
    Infinite,
    /// Fixed depth search - no time limit, depth controlled externally
    Depth,
    /// Fixed time per move
    MoveTime { time_ms: u64 },
    /// Standard time control with remaining time and increment
    Incremental {
        time_left_ms: u64,
        inc_ms: u64,
        movestogo: Option<u64>,
    },
}

impl TimeControl {
    /// Create a new incremental time control from Duration values.
    #[must_use]
    pub fn incremental(time_left: Duration, inc: Duration, movestogo: Option<u64>) -> Self {
        TimeControl::Incremental {
            time_left_ms: time_left.as_millis() as u64,
            inc_ms: inc.as_millis() as u64,
            movestogo,
        }
    }

    /// Create a fixed move time control from Duration.
    #[must_use]
    pub fn move_time(time: Duration) -> Self {
        TimeControl::MoveTime {
            time_ms: time.as_millis() as u64,
        }
    }

    /// Create a fixed move time control from milliseconds.
    #[must_use]
    pub fn move_time_ms(time_ms: u64) -> Self {
        TimeControl::MoveTime { time_ms }
    }

    /// Check if this is an unlimited time control (infinite or depth-based).
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite | TimeControl::Depth)
    }

    /// Compute soft and hard time limits for this time control.
    ///
    /// `phase` is the position's game phase on the 0..=256 scale
    /// (`Board::phase256`), used by the phase-weighted branch's divisor.
    /// Returns `(soft_time_ms, hard_time_ms)` or `(u64::MAX, u64::MAX)` for
    /// unlimited controls.
    #[must_use]
    pub fn compute_limits(&self, phase: i32, config: &TimeConfig) -> (u64, u64) {
        match self {
            TimeControl::Infinite | TimeControl::Depth => (u64::MAX, u64::MAX),
            TimeControl::MoveTime { time_ms } => {
                // Explicit movetime is used directly; the caller asked for
                // exactly this much wall clock, no overhead subtracted.
                let capped = (*time_ms).max(1);
                (capped, capped)
            }
            TimeControl::Incremental {
                time_left_ms,
                inc_ms,
                movestogo,
            } => compute_incremental_limits(*time_left_ms, *inc_ms, *movestogo, phase, config),
        }
    }
}

/// Budget for the last move before the clock resets (`movestogo == 1`): a
/// saturating fraction of `time_ms` that approaches `time_ms` as it grows,
/// leaving a safety margin when it's small.
fn sudden_death_budget_ms(time_ms: u64) -> u64 {
    let t = time_ms as f64 / 1000.0;
    let budget = time_ms as f64 * t.powf(1.1) / (t + 1.0).powf(1.1);
    budget.round().max(1.0) as u64
}

/// General-case budget: spend more time per move as the game phase
/// increases (fewer non-pawn pieces left means fewer moves likely remain).
fn phased_budget_ms(time_ms: u64, movestogo: Option<u64>, phase: i32) -> u64 {
    let max_moves = movestogo.map_or(DEFAULT_MOVES_TO_GO, |m| m.min(DEFAULT_MOVES_TO_GO)) as i64;
    let phase = i64::from(phase.clamp(0, 256));
    let divisor = (max_moves * (256 - phase) + 8 * phase) / 256;
    let divisor = divisor.max(1) as u64;
    time_ms / divisor
}

/// Compute soft and hard time limits for incremental time control.
fn compute_incremental_limits(
    time_left_ms: u64,
    inc_ms: u64,
    movestogo: Option<u64>,
    phase: i32,
    config: &TimeConfig,
) -> (u64, u64) {
    let safe_ms = time_left_ms.saturating_sub(config.move_overhead_ms);
    if safe_ms == 0 {
        let fallback = (time_left_ms / 2).max(1);
        return (fallback, fallback);
    }

    let budget = if movestogo == Some(1) {
        sudden_death_budget_ms(safe_ms)
    } else {
        phased_budget_ms(safe_ms, movestogo, phase)
    };

    let soft_ms = (budget.saturating_add(inc_ms)).clamp(1, safe_ms);
    let hard_ms = soft_ms
        .saturating_mul(HARD_DEADLINE_MULTIPLIER)
        .min(safe_ms)
        .max(soft_ms);

    (soft_ms, hard_ms)
}

/// Compute soft and hard time limits for a search (legacy API; pass 128 for
/// `phase` — the midpoint — when the caller doesn't track game phase).
#[must_use]
pub fn compute_time_limits(
    time_left: Duration,
    inc: Duration,
    movetime: Option<Duration>,
    movestogo: Option<u64>,
    phase: i32,
    config: &TimeConfig,
) -> (u64, u64) {
    if let Some(mt) = movetime {
        let tc = TimeControl::move_time(mt);
        return tc.compute_limits(phase, config);
    }

    let tc = TimeControl::incremental(time_left, inc, movestogo);
    tc.compute_limits(phase, config)
}

/// Parameters for executing a search (shared builder for the controller).
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub soft_time_ms: u64,
    pub hard_time_ms: u64,
    pub max_nodes: u64,
    pub depth: Option<u32>,
    pub infinite: bool,
}

/// Build a search request from a time control and constraints.
#[must_use]
pub fn build_search_request(
    time_control: TimeControl,
    depth: Option<u32>,
    nodes: Option<u64>,
    infinite: bool,
    phase: i32,
    config: &TimeConfig,
) -> (SearchRequest, (u64, u64)) {
    let (soft_ms, hard_ms) = if infinite {
        (u64::MAX, u64::MAX)
    } else {
        time_control.compute_limits(phase, config)
    };

    let max_nodes = nodes.unwrap_or(config.default_max_nodes);

    (
        SearchRequest {
            soft_time_ms: if infinite { 0 } else { soft_ms },
            hard_time_ms: if infinite { 0 } else { hard_ms },
            max_nodes,
            depth,
            infinite,
        },
        (soft_ms, hard_ms),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TimeConfig {
        TimeConfig {
            move_overhead_ms: 50,
            default_max_nodes: 0,
        }
    }

    #[test]
    fn time_control_infinite_is_unlimited() {
        assert!(TimeControl::Infinite.is_unlimited());
    }

    #[test]
    fn time_control_depth_is_unlimited() {
        assert!(TimeControl::Depth.is_unlimited());
    }

    #[test]
    fn time_control_movetime_is_not_unlimited() {
        assert!(!TimeControl::MoveTime { time_ms: 5000 }.is_unlimited());
    }

    #[test]
    fn compute_limits_infinite() {
        let (soft, hard) = TimeControl::Infinite.compute_limits(128, &test_config());
        assert_eq!((soft, hard), (u64::MAX, u64::MAX));
    }

    #[test]
    fn compute_limits_movetime_used_directly() {
        let tc = TimeControl::MoveTime { time_ms: 5000 };
        assert_eq!(tc.compute_limits(128, &test_config()), (5000, 5000));
    }

    #[test]
    fn compute_limits_movetime_floor_is_one() {
        let tc = TimeControl::MoveTime { time_ms: 0 };
        assert_eq!(tc.compute_limits(128, &test_config()), (1, 1));
    }

    #[test]
    fn sudden_death_approaches_total_time_for_large_clocks() {
        // movestogo == 1 should use nearly all remaining time for very
        // large T, per the saturating-fraction formula.
        let budget = sudden_death_budget_ms(600_000);
        assert!(budget > 550_000 && budget <= 600_000);
    }

    #[test]
    fn sudden_death_leaves_margin_for_small_clocks() {
        let budget = sudden_death_budget_ms(1000);
        assert!(budget < 1000);
    }

    #[test]
    fn phased_budget_spends_more_in_endgame() {
        let opening = phased_budget_ms(600_000, None, 0);
        let endgame = phased_budget_ms(600_000, None, 256);
        // divisor shrinks from max_moves (40) to 8 as phase -> 256, so the
        // endgame budget per move should be larger.
        assert!(endgame > opening);
    }

    #[test]
    fn phased_budget_honors_movestogo_cap_of_forty() {
        // movestogo above 40 is capped, so the budget should not shrink
        // further than the movestogo=40 case.
        let capped = phased_budget_ms(600_000, Some(100), 0);
        let at_cap = phased_budget_ms(600_000, Some(40), 0);
        assert_eq!(capped, at_cap);
    }

    #[test]
    fn compute_limits_incremental_stays_within_available_time() {
        let tc = TimeControl::Incremental {
            time_left_ms: 300_000,
            inc_ms: 3000,
            movestogo: None,
        };
        let (soft, hard) = tc.compute_limits(128, &test_config());
        assert!(soft > 0 && soft < 300_000);
        assert!(hard >= soft && hard <= 300_000);
    }

    #[test]
    fn compute_limits_incremental_with_movestogo_one_uses_sudden_death() {
        let tc = TimeControl::Incremental {
            time_left_ms: 10_000,
            inc_ms: 0,
            movestogo: Some(1),
        };
        let (soft, _hard) = tc.compute_limits(128, &test_config());
        assert!(soft > 0 && soft < 10_000);
    }

    #[test]
    fn compute_limits_near_zero_time_falls_back_safely() {
        let tc = TimeControl::Incremental {
            time_left_ms: 10,
            inc_ms: 0,
            movestogo: None,
        };
        let (soft, hard) = tc.compute_limits(128, &test_config());
        assert!(soft >= 1 && hard >= soft);
    }

    #[test]
    fn build_search_request_infinite_has_zero_limits() {
        let (req, _) = build_search_request(
            TimeControl::Infinite,
            None,
            None,
            true,
            128,
            &test_config(),
        );
        assert!(req.infinite);
        assert_eq!(req.soft_time_ms, 0);
        assert_eq!(req.hard_time_ms, 0);
    }

    #[test]
    fn build_search_request_depth_only() {
        let (req, _) = build_search_request(
            TimeControl::Depth,
            Some(10),
            None,
            false,
            128,
            &test_config(),
        );
        assert_eq!(req.depth, Some(10));
        assert!(!req.infinite);
    }

    #[test]
    fn build_search_request_node_limit_passthrough() {
        let (req, _) = build_search_request(
            TimeControl::Infinite,
            None,
            Some(50_000),
            false,
            128,
            &test_config(),
        );
        assert_eq!(req.max_nodes, 50_000);
    }
}
