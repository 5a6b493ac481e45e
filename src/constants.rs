//! Constants for board geometry, seeding, search, cards and pacing.
//!
//! The board is a ring of 12 pits. Pits 0 and 6 are the granaries, pits 1-5
//! form the player's row and pits 7-11 form the computer's row.
//!
//! ```text
//!        11  10   9   8   7
//!   [0]                       [6]
//!         1   2   3   4   5
//! ```

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of pits on the ring (granaries included).
pub const PITS: usize = 12;

/// Granary on the player's end of the board.
pub const PLAYER_GRANARY: usize = 0;

/// Granary on the computer's end of the board.
pub const COMPUTER_GRANARY: usize = 6;

/// Both granaries, in index order.
pub const GRANARIES: [usize; 2] = [PLAYER_GRANARY, COMPUTER_GRANARY];

/// Pits the player may sow from.
pub const PLAYER_PITS: std::ops::RangeInclusive<usize> = 1..=5;

/// Pits the computer may sow from.
pub const COMPUTER_PITS: std::ops::RangeInclusive<usize> = 7..=11;

// =============================================================================
// Initial Seeding
// =============================================================================

/// Stones placed in each granary at the start of a game.
pub const GRANARY_SEED: u32 = 10;

/// Stones placed in each row pit at the start of a game.
pub const PIT_SEED: u32 = 5;

/// Stones on the board at the start of a game (2 * 10 + 10 * 5).
pub const TOTAL_STONES: u32 = 2 * GRANARY_SEED + 10 * PIT_SEED;

// =============================================================================
// Turn Flow
// =============================================================================

/// Turns the player holds when a game starts.
pub const INITIAL_PLAYER_TURNS: u32 = 1;

/// Upper bound on relay pickups within a single move. Relay sowing can in
/// principle cycle forever; a move that reaches this bound simply ends.
pub const MAX_RELAYS: usize = 1_000;

// =============================================================================
// Search Parameters
// =============================================================================

/// Plies explored below each candidate computer move.
pub const SEARCH_DEPTH: u32 = 3;

// =============================================================================
// Card Draw
// =============================================================================

/// Card rolls are uniform over `1..=CARD_ROLL_MAX`.
pub const CARD_ROLL_MAX: u32 = 100;

/// Rolls up to and including this value draw a reverse-turn card (50%).
pub const REVERSE_ROLL_MAX: u32 = 50;

/// Rolls above [`REVERSE_ROLL_MAX`] up to this value draw a skip-turn card (26%).
/// Everything above draws an extra-turn card.
pub const SKIP_ROLL_MAX: u32 = 76;

// =============================================================================
// Presentation Pauses
// =============================================================================
//
// The engine never sleeps. These durations are handed to the observer at each
// suspension point so a front end can animate at the board's usual pace.

/// Highlight shown on a pit when its stones are picked up.
pub const PAUSE_PICKUP: Duration = Duration::from_millis(800);

/// Delay between two dropped stones, and between capture steps.
pub const PAUSE_SOW_STEP: Duration = Duration::from_millis(200);

/// Delay between a player's pit selection and the first pickup.
pub const PAUSE_BEFORE_MOVE: Duration = Duration::from_millis(500);

/// Delay between the end of the player's turn and the computer's move.
pub const PAUSE_BEFORE_COMPUTER: Duration = Duration::from_millis(1000);

/// Delay before and after a card takes effect.
pub const PAUSE_CARD: Duration = Duration::from_millis(500);

/// Delay between two pits while sweeping stones into the final scores.
pub const PAUSE_SWEEP: Duration = Duration::from_millis(500);
