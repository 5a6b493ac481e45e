//! Special cards that bend the turn flow.
//!
//! The player may draw a card when the last stone of a lap lands in a
//! granary. At most one card is held at a time; it is played later, before
//! the player's next sowing.

use std::fmt;

use tracing::info;

use crate::board::Direction;
use crate::constants::{CARD_ROLL_MAX, REVERSE_ROLL_MAX, SKIP_ROLL_MAX};
use crate::turn::TurnState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CardType {
    /// Flip the direction of play.
    ReverseTurn,
    /// Hand the move to the computer immediately.
    SkipTurn,
    /// Grant the player one more turn.
    ExtraTurn,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardType::ReverseTurn => "reverse turn",
            CardType::SkipTurn => "skip turn",
            CardType::ExtraTurn => "extra turn",
        };
        f.write_str(name)
    }
}

/// Map a roll in `1..=100` to a card.
///
/// `1..=50` reverse, `51..=76` skip, `77..=100` extra.
pub fn card_for_roll(roll: u32) -> CardType {
    if roll <= REVERSE_ROLL_MAX {
        CardType::ReverseTurn
    } else if roll <= SKIP_ROLL_MAX {
        CardType::SkipTurn
    } else {
        CardType::ExtraTurn
    }
}

/// Draw a card with a uniform roll over `1..=100`.
pub fn draw_card(rng: &mut fastrand::Rng) -> CardType {
    card_for_roll(rng.u32(1..=CARD_ROLL_MAX))
}

/// Decides whether the player takes a card when one is offered.
pub trait CardPolicy {
    /// `true` to draw a card and end the turn, `false` to keep sowing.
    fn request_card_decision(&mut self) -> bool;
}

/// Built-in card policies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DrawPolicy {
    /// Always take the card.
    #[default]
    AlwaysDraw,
    /// Never take the card; sowing carries on.
    NeverDraw,
}

impl CardPolicy for DrawPolicy {
    fn request_card_decision(&mut self) -> bool {
        matches!(self, DrawPolicy::AlwaysDraw)
    }
}

/// What playing a card changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CardEffect {
    /// Sowing now runs in this direction.
    DirectionFlipped(Direction),
    /// The player gave up the remaining turns; the computer moves next.
    TurnSkipped,
    /// The player now holds this many turns.
    TurnGranted(u32),
}

/// Apply `card` to the turn state and clear the held slot.
///
/// Scores are never touched.
pub fn apply_card(card: CardType, turn: &mut TurnState) -> CardEffect {
    let effect = match card {
        CardType::ReverseTurn => {
            turn.direction = turn.direction.flipped();
            CardEffect::DirectionFlipped(turn.direction)
        }
        CardType::SkipTurn => {
            turn.player_turns_remaining = 0;
            CardEffect::TurnSkipped
        }
        CardType::ExtraTurn => {
            turn.player_turns_remaining += 1;
            CardEffect::TurnGranted(turn.player_turns_remaining)
        }
    };
    turn.held_card = None;
    info!(%card, ?effect, "card played");
    effect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_boundaries() {
        assert_eq!(card_for_roll(1), CardType::ReverseTurn);
        assert_eq!(card_for_roll(50), CardType::ReverseTurn);
        assert_eq!(card_for_roll(51), CardType::SkipTurn);
        assert_eq!(card_for_roll(76), CardType::SkipTurn);
        assert_eq!(card_for_roll(77), CardType::ExtraTurn);
        assert_eq!(card_for_roll(100), CardType::ExtraTurn);
    }

    #[test]
    fn test_draw_distribution() {
        let mut rng = fastrand::Rng::with_seed(42);
        let n = 100_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            let idx = match draw_card(&mut rng) {
                CardType::ReverseTurn => 0,
                CardType::SkipTurn => 1,
                CardType::ExtraTurn => 2,
            };
            counts[idx] += 1;
        }
        let share = |c: usize| c as f64 / n as f64;
        assert!((share(counts[0]) - 0.50).abs() < 0.01, "{counts:?}");
        assert!((share(counts[1]) - 0.26).abs() < 0.01, "{counts:?}");
        assert!((share(counts[2]) - 0.24).abs() < 0.01, "{counts:?}");
    }

    #[test]
    fn test_apply_reverse_flips_direction_only() {
        let mut turn = TurnState::new();
        turn.held_card = Some(CardType::ReverseTurn);
        let effect = apply_card(CardType::ReverseTurn, &mut turn);
        assert_eq!(effect, CardEffect::DirectionFlipped(Direction::Reverse));
        assert_eq!(turn.direction, Direction::Reverse);
        assert_eq!(turn.player_turns_remaining, 1);
        assert_eq!(turn.held_card, None);

        apply_card(CardType::ReverseTurn, &mut turn);
        assert_eq!(turn.direction, Direction::Forward);
    }

    #[test]
    fn test_apply_skip_and_extra() {
        let mut turn = TurnState::new();
        turn.held_card = Some(CardType::ExtraTurn);
        assert_eq!(
            apply_card(CardType::ExtraTurn, &mut turn),
            CardEffect::TurnGranted(2)
        );
        assert_eq!(turn.held_card, None);

        turn.held_card = Some(CardType::SkipTurn);
        assert_eq!(apply_card(CardType::SkipTurn, &mut turn), CardEffect::TurnSkipped);
        assert_eq!(turn.player_turns_remaining, 0);
        assert_eq!(turn.held_card, None);
    }

    #[test]
    fn test_draw_policies() {
        assert!(DrawPolicy::AlwaysDraw.request_card_decision());
        assert!(!DrawPolicy::NeverDraw.request_card_decision());
    }
}
