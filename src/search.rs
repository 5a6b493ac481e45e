//! Minimax search with alpha-beta pruning for the computer's move.
//!
//! The search works on [`SimState`] snapshots copied from the live board, so
//! the game itself is never touched. Moves inside the search use a
//! simplified sowing rule: no relay, and a single capture chain in the
//! direction of play.
//!
//! Leaves are scored from the computer's point of view:
//!
//! ```text
//! (computer score + computer row + computer capture potential)
//!   - (player score + player row + player capture potential)
//! ```
//!
//! where the capture potential of a side sums, over its pits, the stones
//! that sit just beyond an empty neighbour.

use tracing::{debug, trace};

use crate::board::{next_pit, row_total, Board, Direction, Pit};
use crate::constants::{COMPUTER_PITS, PITS, PLAYER_PITS, SEARCH_DEPTH};
use crate::endgame::is_terminal;
use crate::error::GameError;
use crate::turn::TurnState;

/// Which score a capture inside the search is credited to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SimScoring {
    /// Every capture counts for the player, whoever moved. This is how the
    /// game has always searched, and it makes the computer shy of captures.
    #[default]
    Legacy,
    /// Captures count for the side that owns the sown pit.
    ByMover,
}

/// Board snapshot used during lookahead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimState {
    pub pits: [u32; PITS],
    pub player_score: u32,
    pub computer_score: u32,
    /// Side to move. [`Searcher::minimax`] minimizes when this is set.
    pub is_player_turn: bool,
}

impl SimState {
    /// Deep copy of the live position.
    pub fn snapshot(board: &Board, turn: &TurnState) -> Self {
        Self {
            pits: *board.pits(),
            player_score: turn.player_score,
            computer_score: turn.computer_score,
            is_player_turn: turn.is_player_turn(),
        }
    }
}

/// Sow `pit` on a copy of `state` and resolve a single capture chain.
pub fn simulate_move(
    state: &SimState,
    pit: Pit,
    direction: Direction,
    scoring: SimScoring,
) -> SimState {
    let mut sim = state.clone();
    let mover_is_player = PLAYER_PITS.contains(&pit);
    let mut i = pit;
    let mut count = std::mem::take(&mut sim.pits[i]);

    while count > 0 {
        i = next_pit(i, direction);
        sim.pits[i] += 1;
        count -= 1;
    }

    let mut next = next_pit(i, direction);
    while sim.pits[next] == 0 {
        let target = next_pit(next, direction);
        let stones = std::mem::take(&mut sim.pits[target]);
        if stones == 0 {
            break;
        }
        match scoring {
            SimScoring::ByMover if !mover_is_player => sim.computer_score += stones,
            _ => sim.player_score += stones,
        }
        next = next_pit(target, direction);
    }

    sim.is_player_turn = !mover_is_player;
    sim
}

/// Stones a side could take on its next move: for each of its pits whose
/// neighbour is empty, the count in the pit beyond.
fn capture_potential(
    pits: &[u32; PITS],
    row: std::ops::RangeInclusive<usize>,
    direction: Direction,
) -> u32 {
    row.map(|i| {
        let next = next_pit(i, direction);
        let target = next_pit(next, direction);
        if pits[next] == 0 { pits[target] } else { 0 }
    })
    .sum()
}

/// Heuristic value of `state` for the computer. Positive favours the computer.
pub fn evaluate(state: &SimState, direction: Direction) -> i32 {
    let computer = state.computer_score
        + row_total(&state.pits, COMPUTER_PITS)
        + capture_potential(&state.pits, COMPUTER_PITS, direction);
    let player = state.player_score
        + row_total(&state.pits, PLAYER_PITS)
        + capture_potential(&state.pits, PLAYER_PITS, direction);
    computer as i32 - player as i32
}

/// Result of a root search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_pit: Pit,
    pub value: i32,
    /// Value of every legal root move, in pit order.
    pub candidates: Vec<(Pit, i32)>,
    /// Nodes visited, root moves included.
    pub nodes: u64,
}

/// Depth-limited alpha-beta searcher.
#[derive(Clone, Debug)]
pub struct Searcher {
    depth: u32,
    direction: Direction,
    scoring: SimScoring,
    nodes: u64,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SEARCH_DEPTH, Direction::Forward, SimScoring::Legacy)
    }
}

impl Searcher {
    pub fn new(depth: u32, direction: Direction, scoring: SimScoring) -> Self {
        Self {
            depth,
            direction,
            scoring,
            nodes: 0,
        }
    }

    /// Pick the computer's move for the live position.
    ///
    /// Each computer pit with stones is simulated once and then searched
    /// with the player to reply. The first pit with the strictly highest
    /// value wins. Fails with [`GameError::NoLegalMoves`] when the
    /// computer's row is empty.
    pub fn computer_move(
        &mut self,
        board: &Board,
        turn: &TurnState,
    ) -> Result<SearchResult, GameError> {
        self.nodes = 0;
        let root = SimState {
            is_player_turn: false,
            ..SimState::snapshot(board, turn)
        };

        let mut best: Option<(Pit, i32)> = None;
        let mut candidates = Vec::new();
        for pit in COMPUTER_PITS {
            if root.pits[pit] == 0 {
                continue;
            }
            self.nodes += 1;
            let child = simulate_move(&root, pit, self.direction, self.scoring);
            let value = self.minimax(&child, self.depth, i32::MIN, i32::MAX);
            trace!(pit, value, "root move");
            candidates.push((pit, value));
            if best.is_none_or(|(_, v)| value > v) {
                best = Some((pit, value));
            }
        }

        let (best_pit, value) = best.ok_or(GameError::NoLegalMoves)?;
        debug!(best_pit, value, nodes = self.nodes, "search finished");
        Ok(SearchResult {
            best_pit,
            value,
            candidates,
            nodes: self.nodes,
        })
    }

    /// Alpha-beta minimax for the side to move in `state`. The computer
    /// (pits 7-11) maximizes, the player (pits 1-5) minimizes.
    pub fn minimax(
        &mut self,
        state: &SimState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        if depth == 0 || is_terminal(&state.pits) {
            return evaluate(state, self.direction);
        }

        if !state.is_player_turn {
            let mut max_eval = i32::MIN;
            for pit in COMPUTER_PITS {
                if state.pits[pit] == 0 {
                    continue;
                }
                self.nodes += 1;
                let child = simulate_move(state, pit, self.direction, self.scoring);
                let eval = self.minimax(&child, depth - 1, alpha, beta);
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = i32::MAX;
            for pit in PLAYER_PITS {
                if state.pits[pit] == 0 {
                    continue;
                }
                self.nodes += 1;
                let child = simulate_move(state, pit, self.direction, self.scoring);
                let eval = self.minimax(&child, depth - 1, alpha, beta);
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}
