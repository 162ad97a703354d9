use super::super::constants::{MATE_THRESHOLD, MAX_QSEARCH_DEPTH, SCORE_INFINITE};
use super::super::picker;
use super::super::tt::BoundType;
use super::SimpleSearchContext;
use crate::board::{ScoredMoveList, EMPTY_MOVE};

impl SimpleSearchContext<'_> {
    /// Quiescence search for tactical stability. Stand-pat is the only
    /// pruning applied here: every legal capture (every legal move if in
    /// check) is searched, per the "no pruning besides stand-pat" contract.
    pub fn quiesce(&mut self, mut alpha: i32, beta: i32, qdepth: i32) -> i32 {
        let stand_pat = self.evaluate_simple();

        // Depth limit
        if qdepth >= MAX_QSEARCH_DEPTH {
            return stand_pat;
        }

        let in_check = self.board.is_in_check(self.board.side_to_move());
        let mut best_score = if in_check { -SCORE_INFINITE } else { stand_pat };
        let mut best_move = EMPTY_MOVE;
        let orig_alpha = alpha;

        // Generate moves: all moves if in check, captures only otherwise
        let moves = if in_check {
            let moves = self.board.generate_moves();
            if moves.is_empty() {
                return -MATE_THRESHOLD; // Checkmate
            }
            moves
        } else {
            // Stand pat
            if stand_pat >= beta {
                return stand_pat;
            }
            if alpha < stand_pat {
                alpha = stand_pat;
            }
            self.board.generate_tactical_moves()
        };

        // Probe TT for move ordering only (not cutoff - depth semantics differ)
        let tt_move = self
            .state
            .tables
            .tt
            .probe(self.board.hash)
            .and_then(|e| e.best_move())
            .unwrap_or(EMPTY_MOVE);

        // Stage moves: TT move, then SEE-split good/bad captures (§4.6).
        // Quiescence searches every move in every stage unconditionally —
        // staging only affects the order they're tried in.
        let mut sorted_moves = ScoredMoveList::new();
        for m in &moves {
            let score = if *m == tt_move {
                picker::STAGE_TT
            } else if m.is_capture() {
                picker::capture_score(self.board, *m)
            } else {
                picker::quiet_score(0)
            };
            sorted_moves.push(*m, score);
        }
        if sorted_moves.len() > 3 {
            sorted_moves.sort_by_score_desc();
        }

        for scored in sorted_moves.iter() {
            let m = scored.mv;

            // Skip non-capture moves in quiescence (shouldn't happen but be safe)
            if !in_check && !m.is_capture() && !m.is_promotion() {
                continue;
            }

            self.nodes += 1;
            let info = self.board.make_move(m);
            // Prefetch TT for child position
            self.state.tables.tt.prefetch(self.board.hash);
            let score = -self.quiesce(-beta, -alpha, qdepth + 1);
            self.board.unmake_move(m, info);

            if score > best_score {
                best_score = score;
                best_move = m;
            }

            if score >= beta {
                self.state.tables.tt.store(
                    self.board.hash,
                    0,
                    score,
                    BoundType::LowerBound,
                    Some(m),
                    qdepth.max(0) as usize,
                );
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }

        if !self.should_stop() {
            let bound = if best_move == EMPTY_MOVE {
                BoundType::UpperBound
            } else if best_score > orig_alpha {
                BoundType::Exact
            } else {
                BoundType::UpperBound
            };
            self.state.tables.tt.store(
                self.board.hash,
                0,
                best_score,
                bound,
                if best_move == EMPTY_MOVE { None } else { Some(best_move) },
                qdepth.max(0) as usize,
            );
        }

        best_score
    }
}
