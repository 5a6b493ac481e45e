//! Turn bookkeeping shared by the controller and the card effects.

use crate::board::Direction;
use crate::cards::CardType;
use crate::constants::INITIAL_PLAYER_TURNS;

/// One of the two sides at the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Computer,
}

/// Whose turn it is, which way stones travel, the held card and the scores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnState {
    /// The player is to move while this is above zero.
    pub player_turns_remaining: u32,
    pub direction: Direction,
    pub held_card: Option<CardType>,
    pub player_score: u32,
    pub computer_score: u32,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            player_turns_remaining: INITIAL_PLAYER_TURNS,
            direction: Direction::Forward,
            held_card: None,
            player_score: 0,
            computer_score: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Side currently credited with captures.
    pub fn mover(&self) -> Side {
        if self.player_turns_remaining > 0 {
            Side::Player
        } else {
            Side::Computer
        }
    }

    pub fn is_player_turn(&self) -> bool {
        self.mover() == Side::Player
    }

    pub fn is_reverse_turn(&self) -> bool {
        self.direction == Direction::Reverse
    }

    /// Add `stones` to `side`'s score.
    pub fn credit(&mut self, side: Side, stones: u32) {
        match side {
            Side::Player => self.player_score += stones,
            Side::Computer => self.computer_score += stones,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_score,
            Side::Computer => self.computer_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mover_follows_turn_count() {
        let mut turn = TurnState::new();
        assert_eq!(turn.mover(), Side::Player);
        turn.player_turns_remaining = 0;
        assert_eq!(turn.mover(), Side::Computer);
        assert!(!turn.is_player_turn());
    }

    #[test]
    fn test_credit_and_reset() {
        let mut turn = TurnState::new();
        turn.credit(Side::Player, 4);
        turn.credit(Side::Computer, 7);
        turn.direction = Direction::Reverse;
        turn.held_card = Some(CardType::SkipTurn);
        assert_eq!(turn.score(Side::Player), 4);
        assert_eq!(turn.score(Side::Computer), 7);
        assert!(turn.is_reverse_turn());

        turn.reset();
        assert_eq!(turn, TurnState::new());
    }
}
