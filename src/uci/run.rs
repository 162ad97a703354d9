//! The UCI stdin/stdout loop.
//!
//! Reads one command per line, dispatches it to the [`EngineController`], and
//! writes UCI responses to stdout. This is the external collaborator the core
//! search talks to through `info_sender`/`best_move_sender`-shaped callbacks;
//! it owns no search state of its own beyond the controller and the options.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::{Board, SearchInfo, SearchIterationInfo, SearchLogger, StdoutLogger, DEFAULT_TT_MB};
use crate::engine::time::{TimeConfig, TimeControl};
use crate::engine::{EngineController, SearchParams as EngineSearchParams};

use super::command::{parse_go_params, parse_uci_command, GoParams, UciCommand};
use super::options::{parse_setoption, UciOptionAction, UciOptions};
use super::print::print_perft_info;
use super::report::{print_bestmove, print_ready};
use super::try_parse_position_command;

/// Translate a parsed `go` command plus the position's game phase into the
/// soft/hard deadlines and depth cap the controller needs. Mirrors the
/// time-to-search policy in `engine::time`; the only UCI-specific work here
/// is picking which side's clock applies.
fn build_search_params(
    go: &GoParams,
    board: &Board,
    config: &TimeConfig,
) -> EngineSearchParams {
    if go.infinite {
        return EngineSearchParams {
            depth: go.depth,
            soft_time_ms: 0,
            hard_time_ms: 0,
            infinite: true,
        };
    }

    let phase = board.phase256();

    if let Some(movetime) = go.movetime {
        let tc = TimeControl::move_time_ms(movetime);
        let (soft, hard) = tc.compute_limits(phase, config);
        return EngineSearchParams {
            depth: go.depth,
            soft_time_ms: soft,
            hard_time_ms: hard,
            infinite: false,
        };
    }

    let is_white = board.white_to_move();
    let time_left = if is_white { go.wtime } else { go.btime };
    let inc = (if is_white { go.winc } else { go.binc }).unwrap_or(0);

    if let Some(time_left_ms) = time_left {
        let tc = TimeControl::incremental(
            Duration::from_millis(time_left_ms),
            Duration::from_millis(inc),
            go.movestogo,
        );
        let (soft, hard) = tc.compute_limits(phase, config);
        return EngineSearchParams {
            depth: go.depth,
            soft_time_ms: soft,
            hard_time_ms: hard,
            infinite: false,
        };
    }

    if go.depth.is_some() {
        return EngineSearchParams {
            depth: go.depth,
            soft_time_ms: 0,
            hard_time_ms: 0,
            infinite: true,
        };
    }

    if let Some(mate) = go.mate {
        return EngineSearchParams {
            depth: Some(mate.saturating_mul(2)),
            soft_time_ms: 0,
            hard_time_ms: 0,
            infinite: true,
        };
    }

    // Bare "go": no clock, no depth, no mate search — run until "stop".
    EngineSearchParams {
        depth: None,
        soft_time_ms: 0,
        hard_time_ms: 0,
        infinite: true,
    }
}

/// Format one `SearchIterationInfo` as a `SearchInfo` the way `StdoutLogger`
/// expects: `score` pre-formatted as `cp <c>` or `mate <m>`, with an optional
/// trailing `lowerbound` marker.
fn to_log_info(info: &SearchIterationInfo, hashfull: u32) -> SearchInfo {
    let score = match info.mate_in {
        Some(mate) => format!("mate {mate}"),
        None => format!("cp {}", info.score),
    };
    let score = if info.lowerbound {
        format!("{score} lowerbound")
    } else {
        score
    };
    SearchInfo {
        depth: info.depth,
        seldepth: info.seldepth,
        score,
        nodes: info.nodes,
        nps: info.nps,
        hashfull,
        time_ms: u128::from(info.time_ms),
        pv: info.pv.clone(),
    }
}

/// Run the UCI loop on stdin/stdout until `quit` or end-of-input.
pub fn run() {
    let mut controller = EngineController::new(DEFAULT_TT_MB);
    let mut options = UciOptions::new(DEFAULT_TT_MB);
    let time_config = TimeConfig::default();

    let search_state_for_info = Arc::clone(controller.search_state());
    controller.set_info_callback(Some(Arc::new(move |info: &SearchIterationInfo| {
        let hashfull = search_state_for_info.lock().hashfull_per_mille();
        StdoutLogger.info(&to_log_info(info, hashfull));
    })));

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(cmd) = parse_uci_command(&line) else {
            continue;
        };

        match cmd {
            UciCommand::Uci => {
                let params = controller
                    .with_search_state_ref(|s| s.params().clone())
                    .unwrap_or_default();
                options.print(&params);
            }
            UciCommand::IsReady => print_ready(),
            UciCommand::UciNewGame => controller.new_game(),
            UciCommand::Position(parts) => {
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                let mut board = controller.board().clone();
                if try_parse_position_command(&mut board, &refs).is_ok() {
                    controller.set_board(board);
                } else {
                    #[cfg(feature = "logging")]
                    log::warn!("malformed position command: {line}");
                    println!("info string invalid position command");
                }
            }
            UciCommand::Go(parts) => {
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                let go_params = parse_go_params(&refs);
                let node_limit = go_params.nodes.unwrap_or(options.default_max_nodes);
                controller.set_max_nodes(node_limit);
                let params = build_search_params(&go_params, controller.board(), &time_config);
                controller.start_search(params, |result| {
                    print_bestmove(result.best_move);
                    let _ = io::stdout().flush();
                });
            }
            UciCommand::Perft(depth) => {
                let mut board = controller.board().clone();
                let start = Instant::now();
                let nodes = board.perft(depth);
                print_perft_info(depth, nodes, start.elapsed());
            }
            UciCommand::SetOption(parts) => {
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                if let Some((name, value)) = parse_setoption(&refs) {
                    let action = controller
                        .with_search_state(|state| {
                            options.apply_setoption(&name, value.as_deref(), state)
                        })
                        .flatten();
                    if let Some(UciOptionAction::ReinitHash(mb)) = action {
                        controller.resize_hash(mb);
                    }
                }
            }
            UciCommand::Debug(mode) => {
                controller.set_trace(mode.as_deref() == Some("on"));
            }
            UciCommand::Stop => controller.signal_stop(),
            UciCommand::PonderHit => {}
            UciCommand::Quit => {
                controller.stop_search();
                break;
            }
            UciCommand::Unknown(cmd) => {
                #[cfg(feature = "logging")]
                log::warn!("unknown UCI command: {cmd}");
                println!("info string unknown command: {cmd}");
            }
        }
        let _ = io::stdout().flush();
    }
}
