use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use contrast::{Game, Move, Player, TileColour};
use log::debug;

use crate::{
    config::{DEADLINE_POLL_NODES, MAX_SEARCH_DEPTH, WIN_VALUE},
    evaluator::Evaluator,
};

#[derive(Clone, Copy, Debug)]
pub enum SearchLimit {
    /// Search every depth up to and including this one.
    Depth(u8),
    /// Deepen until the budget runs out. The in-flight depth is abandoned
    /// when the deadline trips; the move from the last completed depth wins.
    Timed(Duration),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoundKind {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug)]
struct TtEntry {
    /// Second, independently mixed fingerprint of the position. The map key
    /// alone cannot tell two positions with colliding hashes apart; a probe
    /// whose fingerprint disagrees is treated as a miss.
    check: u64,
    value: f32,
    depth: u8,
    bound: BoundKind,
    best: Option<Move>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub beta_cutoffs: u64,
    pub depth_reached: u8,
    pub elapsed: Duration,
}

#[derive(Clone, Copy, Debug)]
pub struct SearchResult {
    /// `None` when the position is already decided and there is nothing to
    /// play.
    pub best: Option<Move>,
    pub value: f32,
    pub depth: u8,
}

/// Iterative-deepening negamax over the pattern evaluator, with a
/// transposition table and one-ply move ordering. Owns its evaluator copy and
/// its table; instances are independent and single-threaded.
pub struct AlphaBeta {
    evaluator: Evaluator,
    table: HashMap<u64, TtEntry>,
    table_enabled: bool,
    ordering_enabled: bool,
    deadline: Option<Instant>,
    out_of_time: bool,
    stats: SearchStats,
}

impl AlphaBeta {
    pub fn new(evaluator: Evaluator) -> Self {
        AlphaBeta {
            evaluator,
            table: HashMap::new(),
            table_enabled: true,
            ordering_enabled: true,
            deadline: None,
            out_of_time: false,
            stats: SearchStats::default(),
        }
    }

    /// Both toggles trade work for time only; at a fixed depth they must not
    /// change the value the search returns.
    pub fn set_transposition(&mut self, enabled: bool) {
        self.table_enabled = enabled;
    }

    pub fn set_move_ordering(&mut self, enabled: bool) {
        self.ordering_enabled = enabled;
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn search(&mut self, game: &Game, limit: SearchLimit) -> SearchResult {
        let start = Instant::now();
        self.stats = SearchStats::default();
        let (max_depth, deadline) = match limit {
            SearchLimit::Depth(depth) => (depth, None),
            SearchLimit::Timed(budget) => (MAX_SEARCH_DEPTH, Some(start + budget)),
        };
        self.deadline = deadline;

        let mut result = SearchResult {
            best: None,
            value: -WIN_VALUE,
            depth: 0,
        };
        for depth in 1..=max_depth {
            self.out_of_time = false;
            let (value, best) = self.negamax(game, depth, f32::NEG_INFINITY, f32::INFINITY);
            if self.out_of_time {
                debug!("depth {depth} abandoned at the deadline");
                break;
            }
            result = SearchResult { best, value, depth };
            self.stats.depth_reached = depth;
            debug!(
                "depth {depth}: value {value:.3}, {} nodes, {} tt hits, {} beta cutoffs",
                self.stats.nodes, self.stats.tt_hits, self.stats.beta_cutoffs
            );
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
        }
        self.stats.elapsed = start.elapsed();
        result
    }

    fn negamax(&mut self, game: &Game, depth: u8, mut alpha: f32, beta: f32) -> (f32, Option<Move>) {
        self.stats.nodes += 1;
        if self.stats.nodes % DEADLINE_POLL_NODES == 0
            && self.deadline.is_some_and(|d| Instant::now() >= d)
        {
            self.out_of_time = true;
            return (0.0, None);
        }

        let mover = game.to_move;
        if game.is_win(mover.next()) {
            return (-WIN_VALUE, None);
        }
        if game.is_win(mover) {
            return (WIN_VALUE, None);
        }
        let mut moves = game.possible_moves();
        if moves.is_empty() {
            return (-WIN_VALUE, None);
        }
        if depth == 0 {
            return (self.evaluator.evaluate(game), None);
        }

        let hash = game.hash();
        let check = fingerprint(game);
        if self.table_enabled {
            if let Some(entry) = self.table.get(&hash) {
                if entry.check == check {
                    self.stats.tt_hits += 1;
                    if entry.depth >= depth {
                        let usable = match entry.bound {
                            BoundKind::Exact => true,
                            BoundKind::Lower => entry.value >= beta,
                            BoundKind::Upper => entry.value <= alpha,
                        };
                        if usable {
                            self.stats.tt_cutoffs += 1;
                            return (entry.value, entry.best);
                        }
                    }
                }
            }
        }

        if self.ordering_enabled {
            // Explore the statically best successor first; this is where the
            // early beta cutoffs come from.
            let mut scored: Vec<(f32, Move)> = moves
                .iter()
                .map(|&m| {
                    let mut next = *game;
                    next.play(m).unwrap();
                    (-self.evaluator.evaluate(&next), m)
                })
                .collect();
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));
            moves = scored.into_iter().map(|(_, m)| m).collect();
        }

        let alpha_original = alpha;
        let mut best_value = f32::NEG_INFINITY;
        let mut best_move = moves[0];
        for m in moves {
            let mut next = *game;
            next.play(m).unwrap();
            let (child_value, _) = self.negamax(&next, depth - 1, -beta, -alpha);
            if self.out_of_time {
                return (0.0, None);
            }
            let value = -child_value;
            if value > best_value {
                best_value = value;
                best_move = m;
            }
            alpha = alpha.max(value);
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                break;
            }
        }

        if self.table_enabled {
            let bound = if best_value <= alpha_original {
                BoundKind::Upper
            } else if best_value >= beta {
                BoundKind::Lower
            } else {
                BoundKind::Exact
            };
            self.table.insert(hash, TtEntry {
                check,
                value: best_value,
                depth,
                bound,
                best: Some(best_move),
            });
        }
        (best_value, Some(best_move))
    }
}

/// Position fingerprint unrelated to `Game::hash`, stored in table entries so
/// a key collision between distinct positions reads as a miss instead of a
/// wrong score.
fn fingerprint(game: &Game) -> u64 {
    let mut hash: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut mix = |value: u64| {
        hash = (hash ^ value).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        hash ^= hash >> 27;
    };
    for (_, cell) in game.board.iter() {
        mix(match cell.occupant {
            None => 1,
            Some(Player::Black) => 2,
            Some(Player::White) => 3,
        });
        mix(match cell.tile {
            None => 1,
            Some(TileColour::Black) => 2,
            Some(TileColour::Gray) => 3,
        });
    }
    mix(match game.to_move {
        Player::Black => 1,
        Player::White => 2,
    });
    mix(u64::from(game.black_stock.black) << 8 | u64::from(game.black_stock.gray));
    mix(u64::from(game.white_stock.black) << 8 | u64::from(game.white_stock.gray));
    hash
}
