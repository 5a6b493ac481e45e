//! Rule engine and computer opponent for Ô Ăn Quan.
//!
//! Two sides share a ring of twelve pits. Pits 0 and 6 are granaries, the
//! player sows from pits 1-5 and the computer from pits 7-11. Stones are
//! sown one per pit, relayed from non-empty pits and captured across empty
//! ones. Landing the last stone in a granary earns the player a card that
//! reverses play, skips the turn or grants an extra turn.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, seeding, search and pacing parameters
//! - [`board`] - Stone counts and ring arithmetic
//! - [`sowing`] - Move execution (sowing, relays, capture chains)
//! - [`cards`] - Card draws and card effects
//! - [`turn`] - Turn counters, direction, held card and scores
//! - [`search`] - Minimax with alpha-beta pruning for the computer
//! - [`endgame`] - End-of-game detection and final sweep
//! - [`game`] - Turn controller tying it all together
//! - [`protocol`] - Text command interface
//!
//! ## Example
//!
//! ```
//! use oanquan::game::{Game, GameConfig};
//!
//! let mut game = Game::new(GameConfig::default().with_seed(7));
//! let report = game.select_pit(3).unwrap();
//! assert_eq!(report.sow.captured, 6);
//! assert!(report.computer.is_some());
//! ```

pub mod board;
pub mod cards;
pub mod constants;
pub mod endgame;
pub mod error;
pub mod game;
pub mod protocol;
pub mod search;
pub mod sowing;
pub mod turn;
