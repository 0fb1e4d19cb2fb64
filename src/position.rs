//! Integer board coordinates and the vector arithmetic move generation
//! walks with.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use crate::error::{Error, Result};

/// A file/rank coordinate pair. (0, 0) is White's queenside corner; x grows
/// toward the kingside, y toward Black. Also used for direction vectors,
/// which may have negative components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// True when the coordinate lies on the 8x8 board.
    pub fn on_board(self) -> bool {
        (0..8).contains(&self.x) && (0..8).contains(&self.y)
    }

    /// Bounds check that errors instead of clamping; an off-board
    /// coordinate is always bad input, never something to repair.
    pub fn checked(self) -> Result<Self> {
        if self.on_board() {
            Ok(self)
        } else {
            Err(Error::OutOfBounds(self))
        }
    }
}

impl Add for Position {
    type Output = Position;
    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;
    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i8> for Position {
    type Output = Position;
    fn mul(self, k: i8) -> Position {
        Position::new(self.x * k, self.y * k)
    }
}

impl Div<i8> for Position {
    type Output = Position;
    fn div(self, k: i8) -> Position {
        Position::new(self.x / k, self.y / k)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction from `from` to `to`, scaled down by its largest absolute
/// component. Fails on identical squares: there is nothing to divide by.
pub fn unit_direction(from: Position, to: Position) -> Result<Position> {
    if from == to {
        return Err(Error::ZeroLengthDirection(from));
    }
    let delta = to - from;
    let divisor = delta.x.abs().max(delta.y.abs());
    Ok(delta / divisor)
}

/// Unit step from `from` to `to` when the two squares share a rank, file or
/// diagonal, `None` otherwise. Only these lines carry pins and sliding
/// checks; a knight-shaped offset has no unit step.
pub fn line_direction(from: Position, to: Position) -> Option<Position> {
    if from == to {
        return None;
    }
    let delta = to - from;
    if delta.x == 0 || delta.y == 0 || delta.x.abs() == delta.y.abs() {
        Some(Position::new(delta.x.signum(), delta.y.signum()))
    } else {
        None
    }
}
