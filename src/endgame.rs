//! End-of-game detection and final scoring.

use std::fmt;

use tracing::info;

use crate::board::{Board, Pit};
use crate::constants::{COMPUTER_GRANARY, COMPUTER_PITS, PITS, PLAYER_GRANARY, PLAYER_PITS};
use crate::turn::{Side, TurnState};

/// Whether the game is over.
///
/// True when either row is empty, or when both granaries are empty at once.
pub fn is_terminal(pits: &[u32; PITS]) -> bool {
    let player_empty = PLAYER_PITS.map(|i| pits[i]).all(|c| c == 0);
    let computer_empty = COMPUTER_PITS.map(|i| pits[i]).all(|c| c == 0);
    let granaries_empty = pits[PLAYER_GRANARY] == 0 && pits[COMPUTER_GRANARY] == 0;
    player_empty || computer_empty || granaries_empty
}

/// A pit emptied into a score by [`sweep`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SweptPit {
    pub pit: Pit,
    pub stones: u32,
    pub side: Side,
}

/// Move every remaining stone into the scores: pits 0-5 to the player,
/// pits 6-11 to the computer. Every pit is visited, in index order.
pub fn sweep(board: &mut Board, turn: &mut TurnState) -> Vec<SweptPit> {
    let mut swept = Vec::with_capacity(PITS);
    for pit in 0..PITS {
        let side = if pit < COMPUTER_GRANARY {
            Side::Player
        } else {
            Side::Computer
        };
        let stones = board.take(pit);
        turn.credit(side, stones);
        swept.push(SweptPit { pit, stones, side });
    }
    info!(
        player = turn.player_score,
        computer = turn.computer_score,
        "final scores"
    );
    swept
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winner {
    Player,
    Computer,
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player => write!(f, "player wins"),
            Winner::Computer => write!(f, "computer wins"),
            Winner::Draw => write!(f, "draw"),
        }
    }
}

/// Scores at the end of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FinalScore {
    pub player: u32,
    pub computer: u32,
}

impl FinalScore {
    pub fn from_turn(turn: &TurnState) -> Self {
        Self {
            player: turn.player_score,
            computer: turn.computer_score,
        }
    }

    pub fn winner(&self) -> Winner {
        match self.player.cmp(&self.computer) {
            std::cmp::Ordering::Greater => Winner::Player,
            std::cmp::Ordering::Less => Winner::Computer,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board_is_not_terminal() {
        assert!(!is_terminal(Board::new().pits()));
    }

    #[test]
    fn test_empty_player_row_is_terminal() {
        let board = Board::from_pits([3, 0, 0, 0, 0, 0, 9, 1, 2, 3, 4, 5]);
        assert!(is_terminal(board.pits()));
    }

    #[test]
    fn test_empty_computer_row_is_terminal() {
        let board = Board::from_pits([3, 1, 0, 0, 0, 0, 9, 0, 0, 0, 0, 0]);
        assert!(is_terminal(board.pits()));
    }

    #[test]
    fn test_empty_granaries_are_terminal() {
        let board = Board::from_pits([0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1]);
        assert!(is_terminal(board.pits()));
    }

    #[test]
    fn test_sweep_splits_board_by_half() {
        let mut board = Board::from_pits([3, 0, 0, 0, 0, 0, 9, 1, 2, 3, 4, 5]);
        let mut turn = TurnState::new();
        turn.player_score = 10;
        turn.computer_score = 20;

        let swept = sweep(&mut board, &mut turn);
        assert_eq!(swept.len(), PITS);
        assert_eq!(turn.player_score, 13);
        assert_eq!(turn.computer_score, 44);
        assert_eq!(board.total(), 0);
        assert_eq!(
            swept[6],
            SweptPit {
                pit: 6,
                stones: 9,
                side: Side::Computer
            }
        );
    }

    #[test]
    fn test_winner() {
        let score = |player, computer| FinalScore { player, computer };
        assert_eq!(score(40, 30).winner(), Winner::Player);
        assert_eq!(score(30, 40).winner(), Winner::Computer);
        assert_eq!(score(35, 35).winner(), Winner::Draw);
    }
}
