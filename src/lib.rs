pub mod board;
pub mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod position;

pub use error::{Error, Result};
pub use game::{Game, GameStatus, MoveOutcome};
pub use moves::MoveSet;
pub use piece::{Color, Piece, PieceKind};
pub use position::Position;
