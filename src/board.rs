//! Board state: stone counts for the twelve pits and the direction of play.
//!
//! Pits are addressed by index in `0..PITS`. Every index produced here is
//! taken modulo [`PITS`], so walking the ring never leaves the board.

use std::fmt;
use std::ops::RangeInclusive;

use crate::constants::{
    COMPUTER_GRANARY, COMPUTER_PITS, GRANARIES, GRANARY_SEED, PITS, PIT_SEED, PLAYER_GRANARY,
    PLAYER_PITS,
};

/// A pit, identified by its index on the ring.
pub type Pit = usize;

/// Direction in which stones are sown around the ring.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Increasing pit index.
    #[default]
    Forward,
    /// Decreasing pit index.
    Reverse,
}

impl Direction {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Index `steps` pits away from `pit` in `direction`, wrapping around the ring.
#[inline]
pub fn advance(pit: Pit, direction: Direction, steps: usize) -> Pit {
    let steps = steps % PITS;
    match direction {
        Direction::Forward => (pit + steps) % PITS,
        Direction::Reverse => (pit + PITS - steps) % PITS,
    }
}

/// The pit immediately after `pit`.
#[inline]
pub fn next_pit(pit: Pit, direction: Direction) -> Pit {
    advance(pit, direction, 1)
}

/// The pit two places after `pit`.
#[inline]
pub fn next_next_pit(pit: Pit, direction: Direction) -> Pit {
    advance(pit, direction, 2)
}

/// Whether `pit` is one of the two granaries.
#[inline]
pub fn is_granary(pit: Pit) -> bool {
    GRANARIES.contains(&pit)
}

/// Stones held by the pits of `row`.
pub fn row_total(pits: &[u32; PITS], row: RangeInclusive<Pit>) -> u32 {
    row.map(|i| pits[i]).sum()
}

/// Stone counts for every pit on the ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pits: [u32; PITS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Starting layout: granaries hold 10 stones, every row pit holds 5.
    pub fn new() -> Self {
        let mut pits = [PIT_SEED; PITS];
        pits[PLAYER_GRANARY] = GRANARY_SEED;
        pits[COMPUTER_GRANARY] = GRANARY_SEED;
        Self { pits }
    }

    /// Board with explicit counts, mostly useful for setting up positions.
    pub fn from_pits(pits: [u32; PITS]) -> Self {
        Self { pits }
    }

    /// Put the board back into its starting layout.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn stones(&self, pit: Pit) -> u32 {
        self.pits[pit % PITS]
    }

    /// Drop a single stone into `pit` and return its new count.
    #[inline]
    pub fn drop_stone(&mut self, pit: Pit) -> u32 {
        let slot = &mut self.pits[pit % PITS];
        *slot += 1;
        *slot
    }

    /// Empty `pit`, returning how many stones it held.
    #[inline]
    pub fn take(&mut self, pit: Pit) -> u32 {
        std::mem::take(&mut self.pits[pit % PITS])
    }

    pub fn is_empty(&self, pit: Pit) -> bool {
        self.stones(pit) == 0
    }

    /// Raw counts, in pit order.
    pub fn pits(&self) -> &[u32; PITS] {
        &self.pits
    }

    /// Stones in the player's row (pits 1-5).
    pub fn player_row(&self) -> u32 {
        row_total(&self.pits, PLAYER_PITS)
    }

    /// Stones in the computer's row (pits 7-11).
    pub fn computer_row(&self) -> u32 {
        row_total(&self.pits, COMPUTER_PITS)
    }

    /// Stones anywhere on the board.
    pub fn total(&self) -> u32 {
        self.pits.iter().sum()
    }
}

impl fmt::Display for Board {
    /// Computer's row on top (right to left), player's row below, granaries
    /// at either end.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "     ")?;
        for i in COMPUTER_PITS.rev() {
            write!(f, "{:>3} ", self.pits[i])?;
        }
        writeln!(f)?;
        write!(f, "[{:>2}]", self.pits[PLAYER_GRANARY])?;
        write!(f, "{:>21}", "")?;
        writeln!(f, "[{:>2}]", self.pits[COMPUTER_GRANARY])?;
        write!(f, "     ")?;
        for i in PLAYER_PITS {
            write!(f, "{:>3} ", self.pits[i])?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOTAL_STONES;

    #[test]
    fn test_initial_layout() {
        let board = Board::new();
        assert_eq!(board.stones(0), 10);
        assert_eq!(board.stones(6), 10);
        for i in (1..6).chain(7..12) {
            assert_eq!(board.stones(i), 5, "pit {i}");
        }
        assert_eq!(board.total(), TOTAL_STONES);
        assert_eq!(board.player_row(), 25);
        assert_eq!(board.computer_row(), 25);
    }

    #[test]
    fn test_advance_wraps_both_ways() {
        assert_eq!(next_pit(11, Direction::Forward), 0);
        assert_eq!(next_pit(0, Direction::Reverse), 11);
        assert_eq!(next_next_pit(10, Direction::Forward), 0);
        assert_eq!(next_next_pit(1, Direction::Reverse), 11);
        assert_eq!(advance(3, Direction::Forward, 24), 3);
    }

    #[test]
    fn test_take_and_drop() {
        let mut board = Board::new();
        assert_eq!(board.take(3), 5);
        assert!(board.is_empty(3));
        assert_eq!(board.drop_stone(3), 1);
        assert_eq!(board.total(), TOTAL_STONES - 4);
    }

    #[test]
    fn test_row_totals() {
        let board = Board::from_pits([9, 1, 0, 2, 0, 3, 9, 0, 4, 0, 0, 7]);
        assert_eq!(row_total(board.pits(), PLAYER_PITS), 6);
        assert_eq!(board.player_row(), 6);
        assert_eq!(board.computer_row(), 11);
    }

    #[test]
    fn test_granaries() {
        assert!(is_granary(0));
        assert!(is_granary(6));
        assert!(!is_granary(5));
        assert!(!is_granary(7));
    }

    #[test]
    fn test_display_shows_all_pits() {
        let board = Board::from_pits([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("12"));
        assert!(lines[1].starts_with("[ 1]"));
        assert!(lines[1].ends_with("[ 7]"));
    }
}
