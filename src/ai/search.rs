//! Move selection: immediate win, immediate block, then depth-limited minimax
//! with alpha-beta pruning.
//!
//! All look-ahead is done by placing a piece on the caller's board and removing
//! it again, so a search never allocates a board and always hands the board
//! back exactly as it found it.

use rand::Rng;
use tracing::{debug, trace};

use super::evaluate::evaluate_board;
use crate::error::SearchError;
use crate::game::{Board, Player};

/// Terminal score for a connection, adjusted by the remaining depth.
pub const WIN_SCORE: i32 = 1000;

/// Plies searched below each candidate move.
pub const DEFAULT_DEPTH: usize = 5;

/// Which side of the minimax a ply belongs to. Assigned per search: the
/// player asking for a move is always the maximizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Maximizer,
    Minimizer,
}

impl Role {
    pub fn flip(self) -> Role {
        match self {
            Role::Maximizer => Role::Minimizer,
            Role::Minimizer => Role::Maximizer,
        }
    }
}

/// The stage of the policy that produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    ImmediateWin,
    ImmediateBlock,
    Opening,
    Minimax,
}

/// Everything a search decided, for logging and the UI hint line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub column: usize,
    pub tier: Tier,
    /// Minimax score of every legal column, ascending. Empty for other tiers.
    pub scores: Vec<(usize, i32)>,
    pub nodes: u64,
}

impl SearchReport {
    pub fn score(&self) -> Option<i32> {
        self.scores
            .iter()
            .find(|&&(col, _)| col == self.column)
            .map(|&(_, score)| score)
    }
}

/// Stateless move selector. Cheap to copy; holds only the search depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEngine {
    depth: usize,
}

impl SearchEngine {
    pub fn new(depth: usize) -> Self {
        SearchEngine { depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Column `player` should play on `board`.
    pub fn select_move<const R: usize, const C: usize>(
        &self,
        board: &mut Board<R, C>,
        player: Player,
    ) -> Result<usize, SearchError> {
        self.select_move_with_rng(board, player, &mut rand::rng())
    }

    /// Like [`select_move`](Self::select_move), drawing the opening move from
    /// `rng`.
    pub fn select_move_with_rng<const R: usize, const C: usize, G: Rng>(
        &self,
        board: &mut Board<R, C>,
        player: Player,
        rng: &mut G,
    ) -> Result<usize, SearchError> {
        self.analyze_with_rng(board, player, rng)
            .map(|report| report.column)
    }

    pub fn analyze<const R: usize, const C: usize>(
        &self,
        board: &mut Board<R, C>,
        player: Player,
    ) -> Result<SearchReport, SearchError> {
        self.analyze_with_rng(board, player, &mut rand::rng())
    }

    pub fn analyze_with_rng<const R: usize, const C: usize, G: Rng>(
        &self,
        board: &mut Board<R, C>,
        player: Player,
        rng: &mut G,
    ) -> Result<SearchReport, SearchError> {
        let snapshot = *board;
        let report = self.decide(board, player, rng);
        debug_assert_eq!(*board, snapshot, "search left a probe on the board");

        if let Ok(report) = &report {
            debug!(
                player = player.name(),
                column = report.column,
                tier = ?report.tier,
                score = report.score(),
                nodes = report.nodes,
                "search complete"
            );
        }
        report
    }

    fn decide<const R: usize, const C: usize, G: Rng>(
        &self,
        board: &mut Board<R, C>,
        player: Player,
        rng: &mut G,
    ) -> Result<SearchReport, SearchError> {
        if board.legal_columns().next().is_none() {
            return Err(SearchError::NoLegalMove);
        }

        let quick = |column, tier| SearchReport {
            column,
            tier,
            scores: Vec::new(),
            nodes: 0,
        };

        if let Some(column) = winning_column(board, player) {
            return Ok(quick(column, Tier::ImmediateWin));
        }
        if let Some(column) = winning_column(board, player.other()) {
            return Ok(quick(column, Tier::ImmediateBlock));
        }
        if board.is_empty() {
            return Ok(quick(rng.random_range(0..C), Tier::Opening));
        }

        let mut minimax = Minimax {
            board,
            maximizer: player,
            nodes: 0,
        };
        let mut scores = Vec::with_capacity(C);
        let mut best: Option<(usize, i32)> = None;

        for col in 0..C {
            if !minimax.board.is_legal(col) {
                continue;
            }
            let row = minimax.board.next_open_row(col);
            minimax.board.place(row, col, player);
            let score = minimax.search(self.depth, Role::Minimizer, i32::MIN, i32::MAX);
            minimax.board.unplace(row, col);

            trace!(column = col, score, "root move scored");
            scores.push((col, score));
            let better = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if better {
                best = Some((col, score));
            }
        }

        let (column, _) = best.ok_or(SearchError::NoLegalMove)?;
        Ok(SearchReport {
            column,
            tier: Tier::Minimax,
            scores,
            nodes: minimax.nodes,
        })
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new(DEFAULT_DEPTH)
    }
}

/// Lowest legal column where a `player` piece completes a connection.
fn winning_column<const R: usize, const C: usize>(
    board: &mut Board<R, C>,
    player: Player,
) -> Option<usize> {
    for col in 0..C {
        if !board.is_legal(col) {
            continue;
        }
        let row = board.next_open_row(col);
        board.place(row, col, player);
        let wins = board.has_connection(player);
        board.unplace(row, col);
        if wins {
            return Some(col);
        }
    }
    None
}

struct Minimax<'a, const R: usize, const C: usize> {
    board: &'a mut Board<R, C>,
    maximizer: Player,
    nodes: u64,
}

impl<const R: usize, const C: usize> Minimax<'_, R, C> {
    fn player_for(&self, role: Role) -> Player {
        match role {
            Role::Maximizer => self.maximizer,
            Role::Minimizer => self.maximizer.other(),
        }
    }

    fn search(&mut self, depth: usize, role: Role, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;

        if self.board.has_connection(self.maximizer) {
            return WIN_SCORE - depth as i32;
        }
        if self.board.has_connection(self.maximizer.other()) {
            return -WIN_SCORE + depth as i32;
        }
        if depth == 0 || self.board.is_full() {
            return evaluate_board(self.board, self.maximizer);
        }

        let player = self.player_for(role);
        let mut best = match role {
            Role::Maximizer => i32::MIN,
            Role::Minimizer => i32::MAX,
        };

        for col in 0..C {
            if !self.board.is_legal(col) {
                continue;
            }
            let row = self.board.next_open_row(col);
            self.board.place(row, col, player);
            let score = self.search(depth - 1, role.flip(), alpha, beta);
            self.board.unplace(row, col);

            match role {
                Role::Maximizer => {
                    best = best.max(score);
                    alpha = alpha.max(score);
                }
                Role::Minimizer => {
                    best = best.min(score);
                    beta = beta.min(score);
                }
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }
}
