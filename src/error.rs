//! Errors reported by the game engine.
//!
//! Every variant is recoverable: the game state is left untouched and play
//! continues. None of them should ever abort a session.

use thiserror::Error;

use crate::board::Pit;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The chosen pit is empty or outside the mover's row.
    #[error("invalid move at pit {pit}: {reason}")]
    InvalidMove { pit: Pit, reason: &'static str },

    /// The side to move has no stones in its row.
    #[error("no legal moves left")]
    NoLegalMoves,

    /// A card was played with none held, or at the wrong moment.
    #[error("card cannot be used: {0}")]
    CardMisuse(&'static str),

    /// A request arrived in a phase that does not accept it.
    #[error("out of turn: {0}")]
    OutOfTurn(&'static str),

    /// Another operation on the same surface is still in flight.
    #[error("operation already in progress")]
    ReentrantOperation,

    /// The game has finished; only a restart is accepted.
    #[error("game is over")]
    GameOver,
}

impl GameError {
    /// Whether this error should be shown to the player as a notice.
    ///
    /// Reentrant requests are dropped silently.
    pub fn is_surfaced(&self) -> bool {
        !matches!(self, GameError::ReentrantOperation)
    }
}
