//! Sowing engine: executes a move on the live board.
//!
//! A move picks up every stone in the chosen pit and drops them one by one
//! around the ring. When the last stone lands, the pit after it decides what
//! happens next:
//! - a granary ends the move,
//! - a non-empty pit is picked up and sown in turn (relay),
//! - an empty pit starts a capture chain: the pit beyond it is taken, and the
//!   check repeats two pits further on until it fails.
//!
//! Before the next pit is inspected, a last stone that lands *in* a granary
//! is reported to a [`LandingHook`], which may end the move on the spot. The
//! turn controller uses this to offer the player a card.
//!
//! Execution is eager. Every pickup, drop and capture is recorded as a
//! [`SowStep`] so a front end can replay the move at its own pace.

use tracing::{debug, warn};

use crate::board::{is_granary, next_next_pit, next_pit, Board, Direction, Pit};
use crate::constants::MAX_RELAYS;
use crate::error::GameError;

/// One discrete event of a move, in the order it happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SowStep {
    /// All stones were lifted from `pit`.
    Pickup { pit: Pit, stones: u32 },
    /// A stone was dropped into `pit`, which now holds `count`.
    Drop { pit: Pit, count: u32 },
    /// The last stone of a lap fell into a granary.
    GranaryLanding { pit: Pit },
    /// `stones` were taken from `pit` and scored for the mover.
    Capture { pit: Pit, stones: u32 },
}

/// Answer of a [`LandingHook`] when the last stone lands in a granary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Landing {
    /// Stop the move here.
    EndTurn,
    /// Carry on with the usual next-pit rules.
    Continue,
}

/// Called whenever the last stone of a lap lands in a granary.
pub trait LandingHook {
    fn on_granary_landing(&mut self, pit: Pit) -> Landing;
}

impl<F: FnMut(Pit) -> Landing> LandingHook for F {
    fn on_granary_landing(&mut self, pit: Pit) -> Landing {
        self(pit)
    }
}

/// Hook that never interrupts a move.
pub struct NoHook;

impl LandingHook for NoHook {
    fn on_granary_landing(&mut self, _pit: Pit) -> Landing {
        Landing::Continue
    }
}

/// Why a move stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveEnd {
    /// The pit after the last stone is a granary.
    GranaryAhead(Pit),
    /// The last stone landed in this granary and the hook ended the move.
    LandedInGranary(Pit),
    /// The pit after the last stone was empty; `captures` pits were taken.
    CaptureChain { captures: usize },
    /// Relay sowing hit [`MAX_RELAYS`].
    RelayLimit,
}

/// Outcome of [`execute_move`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SowResult {
    /// Stones captured during the move, to be credited to the mover.
    pub captured: u32,
    /// Pit that received the final stone.
    pub last_pit: Pit,
    pub end: MoveEnd,
    pub steps: Vec<SowStep>,
}

impl SowResult {
    /// Whether the move ended with the last stone resting in a granary.
    pub fn ended_in_granary(&self) -> bool {
        matches!(self.end, MoveEnd::LandedInGranary(_))
    }

    /// Pits that were picked up after the first one, in order.
    pub fn relays(&self) -> impl Iterator<Item = Pit> + '_ {
        self.steps
            .iter()
            .filter_map(|s| match s {
                SowStep::Pickup { pit, .. } => Some(*pit),
                _ => None,
            })
            .skip(1)
    }
}

/// Sow from `start` in `direction`, mutating `board`.
///
/// Fails with [`GameError::InvalidMove`] and leaves the board untouched when
/// `start` is empty. Row ownership is checked by the caller.
pub fn execute_move<H: LandingHook + ?Sized>(
    board: &mut Board,
    start: Pit,
    direction: Direction,
    hook: &mut H,
) -> Result<SowResult, GameError> {
    if board.is_empty(start) {
        return Err(GameError::InvalidMove {
            pit: start,
            reason: "pit is empty",
        });
    }

    let mut steps = Vec::new();
    let mut captured = 0;
    let mut pickup = start;
    let mut i = start;

    for _ in 0..MAX_RELAYS {
        let mut stones = board.take(pickup);
        debug!(pit = pickup, stones, "pick up");
        steps.push(SowStep::Pickup {
            pit: pickup,
            stones,
        });

        while stones > 0 {
            i = next_pit(i, direction);
            let count = board.drop_stone(i);
            steps.push(SowStep::Drop { pit: i, count });
            stones -= 1;
        }

        if is_granary(i) {
            steps.push(SowStep::GranaryLanding { pit: i });
            if hook.on_granary_landing(i) == Landing::EndTurn {
                return Ok(SowResult {
                    captured,
                    last_pit: i,
                    end: MoveEnd::LandedInGranary(i),
                    steps,
                });
            }
        }

        let mut next = next_pit(i, direction);
        let mut target = next_next_pit(i, direction);

        if is_granary(next) {
            return Ok(SowResult {
                captured,
                last_pit: i,
                end: MoveEnd::GranaryAhead(next),
                steps,
            });
        }

        if !board.is_empty(next) {
            pickup = next;
            i = next;
            continue;
        }

        let mut captures = 0;
        while board.is_empty(next) && !board.is_empty(target) {
            let stones = board.take(target);
            debug!(pit = target, stones, "capture");
            steps.push(SowStep::Capture { pit: target, stones });
            captured += stones;
            captures += 1;
            next = next_pit(target, direction);
            target = next_next_pit(target, direction);
        }
        return Ok(SowResult {
            captured,
            last_pit: i,
            end: MoveEnd::CaptureChain { captures },
            steps,
        });
    }

    warn!(start, "relay limit reached, ending move");
    Ok(SowResult {
        captured,
        last_pit: i,
        end: MoveEnd::RelayLimit,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOTAL_STONES;

    #[test]
    fn test_empty_pit_is_rejected_without_change() {
        let mut board = Board::from_pits([10, 0, 5, 5, 5, 5, 10, 5, 5, 5, 5, 5]);
        let before = board.clone();
        let err = execute_move(&mut board, 1, Direction::Forward, &mut NoHook).unwrap_err();
        assert!(matches!(err, GameError::InvalidMove { pit: 1, .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_stops_before_granary() {
        let mut board = Board::from_pits([0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 0]);
        let result = execute_move(&mut board, 3, Direction::Forward, &mut NoHook).unwrap();
        assert_eq!(result.end, MoveEnd::GranaryAhead(6));
        assert_eq!(result.last_pit, 5);
        assert_eq!(result.captured, 0);
        assert_eq!(board.pits(), &[0, 0, 0, 0, 1, 1, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_relay_then_capture_from_start() {
        let mut board = Board::new();
        let result = execute_move(&mut board, 1, Direction::Forward, &mut NoHook).unwrap();
        assert_eq!(result.relays().collect::<Vec<_>>(), vec![7]);
        assert_eq!(result.captured, 6);
        assert_eq!(result.end, MoveEnd::CaptureChain { captures: 1 });
        assert_eq!(board.pits(), &[11, 0, 0, 6, 6, 6, 11, 0, 6, 6, 6, 6]);
        assert_eq!(board.total() + result.captured, TOTAL_STONES);
    }

    #[test]
    fn test_hook_can_end_move_in_granary() {
        let mut board = Board::new();
        let mut landings = Vec::new();
        let mut hook = |pit: Pit| {
            landings.push(pit);
            Landing::EndTurn
        };
        let result = execute_move(&mut board, 1, Direction::Forward, &mut hook).unwrap();
        assert!(result.ended_in_granary());
        assert_eq!(result.end, MoveEnd::LandedInGranary(6));
        assert_eq!(landings, vec![6]);
        assert_eq!(board.pits(), &[10, 0, 6, 6, 6, 6, 11, 5, 5, 5, 5, 5]);
    }

    #[test]
    fn test_capture_chain_runs_through_granary() {
        let mut board = Board::from_pits([0, 1, 0, 0, 4, 0, 3, 0, 0, 0, 0, 0]);
        let result = execute_move(&mut board, 1, Direction::Forward, &mut NoHook).unwrap();
        assert_eq!(result.captured, 7);
        assert_eq!(result.end, MoveEnd::CaptureChain { captures: 2 });
        let captures: Vec<_> = result
            .steps
            .iter()
            .filter(|s| matches!(s, SowStep::Capture { .. }))
            .copied()
            .collect();
        assert_eq!(
            captures,
            vec![
                SowStep::Capture { pit: 4, stones: 4 },
                SowStep::Capture { pit: 6, stones: 3 },
            ]
        );
        assert_eq!(board.total(), 1);
    }

    #[test]
    fn test_reverse_direction_capture() {
        let mut board = Board::from_pits([0, 4, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0]);
        let result = execute_move(&mut board, 5, Direction::Reverse, &mut NoHook).unwrap();
        assert_eq!(result.last_pit, 3);
        assert_eq!(result.captured, 4);
        assert_eq!(board.pits(), &[0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_next_without_target_captures_nothing() {
        let mut board = Board::from_pits([0, 1, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0]);
        let result = execute_move(&mut board, 1, Direction::Forward, &mut NoHook).unwrap();
        assert_eq!(result.end, MoveEnd::CaptureChain { captures: 0 });
        assert_eq!(result.captured, 0);
    }

    #[test]
    fn test_sowing_is_deterministic() {
        let mut a = Board::new();
        let mut b = Board::new();
        let ra = execute_move(&mut a, 4, Direction::Reverse, &mut NoHook).unwrap();
        let rb = execute_move(&mut b, 4, Direction::Reverse, &mut NoHook).unwrap();
        assert_eq!(ra, rb);
        assert_eq!(a, b);
    }
}
