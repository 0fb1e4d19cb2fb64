//! Error types for the rules engine.
//!
//! Every error here is recoverable: the board is left untouched and the
//! caller can re-prompt. Internal inconsistencies (a stale piece id, a
//! square disagreeing with the piece it holds) are invariant violations
//! and panic instead of being folded into this enum.

use thiserror::Error;

use crate::piece::{Color, PieceKind};
use crate::position::Position;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A coordinate outside the 8x8 board. Correct legal-move generation
    /// never produces one of these; it always signals bad input.
    #[error("{0} is outside the board")]
    OutOfBounds(Position),

    /// The destination is not in the piece's current legal set.
    #[error("{from} -> {to} is not a legal move")]
    IllegalMove { from: Position, to: Position },

    #[error("no piece on {0}")]
    NoPieceAtSquare(Position),

    #[error("it is not {0}'s turn")]
    WrongTurnColor(Color),

    /// A move command arrived while a promotion choice is outstanding.
    #[error("a promotion choice is outstanding")]
    PromotionPending,

    #[error("{0} is not a valid promotion choice")]
    InvalidPromotionChoice(PieceKind),

    #[error("no promotion is pending")]
    NoPromotionPending,

    /// Two identical squares have no direction between them.
    #[error("no direction between {0} and itself")]
    ZeroLengthDirection(Position),
}

pub type Result<T> = std::result::Result<T, Error>;
