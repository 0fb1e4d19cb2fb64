//! The 8x8 occupancy grid and per-color square control flags.
//!
//! The board is a mechanical occupancy store: it never validates
//! legality. Control flags are derived state, rebuilt from scratch by the
//! game's post-move orchestration; any mutation invalidates them until
//! the next rebuild.

use crate::error::{Error, Result};
use crate::piece::{Color, PieceId};
use crate::position::Position;

/// One square: the piece sitting on it (by id) and which colors currently
/// attack it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Square {
    pub piece: Option<PieceId>,
    control: [bool; 2],
}

impl Square {
    /// Whether `color` attacked this square as of the last control
    /// recomputation.
    pub fn controlled_by(&self, color: Color) -> bool {
        self.control[color.index()]
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    squares: [[Square; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            squares: [[Square::default(); 8]; 8],
        }
    }

    pub fn square(&self, pos: Position) -> Result<&Square> {
        pos.checked()?;
        Ok(self.at(pos))
    }

    /// Unchecked accessor for positions already known to be on the board;
    /// an off-board index here is a caller bug and panics.
    pub(crate) fn at(&self, pos: Position) -> &Square {
        &self.squares[pos.x as usize][pos.y as usize]
    }

    fn at_mut(&mut self, pos: Position) -> &mut Square {
        &mut self.squares[pos.x as usize][pos.y as usize]
    }

    pub(crate) fn place(&mut self, pos: Position, id: PieceId) {
        self.at_mut(pos).piece = Some(id);
    }

    pub(crate) fn clear(&mut self, pos: Position) {
        self.at_mut(pos).piece = None;
    }

    /// Relocates the occupant of `from` to `to`, returning the id of a
    /// captured occupant for the caller to destroy. Purely mechanical;
    /// legality is the move generator's job.
    pub(crate) fn move_piece(&mut self, from: Position, to: Position) -> Result<Option<PieceId>> {
        let moving = self
            .square(from)?
            .piece
            .ok_or(Error::NoPieceAtSquare(from))?;
        let captured = self.square(to)?.piece;
        self.at_mut(from).piece = None;
        self.at_mut(to).piece = Some(moving);
        Ok(captured)
    }

    pub(crate) fn reset_control(&mut self, color: Color) {
        for file in self.squares.iter_mut() {
            for square in file.iter_mut() {
                square.control[color.index()] = false;
            }
        }
    }

    pub(crate) fn mark_control(&mut self, pos: Position, color: Color) {
        self.at_mut(pos).control[color.index()] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, PieceKind, PieceStore};

    #[test]
    fn move_piece_returns_the_capture() {
        let mut store = PieceStore::new();
        let rook = store.insert(Piece::new(PieceKind::Rook, Color::White, Position::new(0, 0)));
        let pawn = store.insert(Piece::new(PieceKind::Pawn, Color::Black, Position::new(0, 6)));

        let mut board = Board::new();
        board.place(Position::new(0, 0), rook);
        board.place(Position::new(0, 6), pawn);

        let captured = board
            .move_piece(Position::new(0, 0), Position::new(0, 6))
            .unwrap();
        assert_eq!(captured, Some(pawn));
        assert!(board.at(Position::new(0, 0)).piece.is_none());
        assert_eq!(board.at(Position::new(0, 6)).piece, Some(rook));
    }

    #[test]
    fn move_piece_rejects_empty_origin_and_bad_coords() {
        let mut board = Board::new();
        assert_eq!(
            board.move_piece(Position::new(3, 3), Position::new(3, 4)),
            Err(Error::NoPieceAtSquare(Position::new(3, 3)))
        );
        assert_eq!(
            board.move_piece(Position::new(8, 0), Position::new(0, 0)),
            Err(Error::OutOfBounds(Position::new(8, 0)))
        );
    }

    #[test]
    fn control_flags_reset_per_color() {
        let mut board = Board::new();
        let pos = Position::new(4, 4);
        board.mark_control(pos, Color::White);
        board.mark_control(pos, Color::Black);
        board.reset_control(Color::White);
        assert!(!board.at(pos).controlled_by(Color::White));
        assert!(board.at(pos).controlled_by(Color::Black));
    }
}
