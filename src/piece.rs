//! Piece variants, their movesets, and the arena that owns every live
//! piece.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Slot in per-color arrays (control flags, checker lists).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Forward direction for this color's pawns.
    pub fn pawn_step(self) -> Position {
        match self {
            Color::White => Position::new(0, 1),
            Color::Black => Position::new(0, -1),
        }
    }

    pub fn home_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank a pawn of this color promotes on.
    pub fn last_rank(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const ORTHOGONALS: [Position; 4] = [
    Position::new(1, 0),
    Position::new(-1, 0),
    Position::new(0, 1),
    Position::new(0, -1),
];

pub const DIAGONALS: [Position; 4] = [
    Position::new(1, 1),
    Position::new(-1, 1),
    Position::new(1, -1),
    Position::new(-1, -1),
];

pub const EVERY_DIRECTION: [Position; 8] = [
    Position::new(1, 0),
    Position::new(-1, 0),
    Position::new(0, 1),
    Position::new(0, -1),
    Position::new(1, 1),
    Position::new(-1, 1),
    Position::new(1, -1),
    Position::new(-1, -1),
];

pub const KNIGHT_JUMPS: [Position; 8] = [
    Position::new(1, 2),
    Position::new(2, 1),
    Position::new(-1, 2),
    Position::new(-2, 1),
    Position::new(1, -2),
    Position::new(2, -1),
    Position::new(-1, -2),
    Position::new(-2, -1),
];

const WHITE_PAWN_STEP: [Position; 1] = [Position::new(0, 1)];
const BLACK_PAWN_STEP: [Position; 1] = [Position::new(0, -1)];

impl PieceKind {
    /// Direction vectors this kind steps or slides along. Only pawns
    /// depend on color.
    pub fn moveset(self, color: Color) -> &'static [Position] {
        match self {
            PieceKind::Pawn => match color {
                Color::White => &WHITE_PAWN_STEP,
                Color::Black => &BLACK_PAWN_STEP,
            },
            PieceKind::Knight => &KNIGHT_JUMPS,
            PieceKind::Bishop => &DIAGONALS,
            PieceKind::Rook => &ORTHOGONALS,
            PieceKind::Queen | PieceKind::King => &EVERY_DIRECTION,
        }
    }

    /// Whether this kind can pin along `dir`. Kings, pawns and knights
    /// never pin; sliders pin only along their own moveset directions,
    /// which keeps a rook off the diagonals and a bishop off the files.
    pub fn pins_along(self, dir: Position) -> bool {
        match self {
            PieceKind::Bishop => DIAGONALS.contains(&dir),
            PieceKind::Rook => ORTHOGONALS.contains(&dir),
            PieceKind::Queen => EVERY_DIRECTION.contains(&dir),
            _ => false,
        }
    }

    pub fn to_char(self, color: Color) -> char {
        let ch = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Position,
    pub has_moved: bool,
    /// Set on pieces created by a promotion.
    pub promoted: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, position: Position) -> Self {
        Self {
            kind,
            color,
            position,
            has_moved: false,
            promoted: false,
        }
    }

    pub fn moveset(&self) -> &'static [Position] {
        self.kind.moveset(self.color)
    }

    /// Maximum slide distance along each moveset direction. Pawns lose
    /// their double step once they have moved.
    pub fn range(&self) -> i8 {
        match self.kind {
            PieceKind::Knight | PieceKind::King => 1,
            PieceKind::Pawn => 2 - self.has_moved as i8,
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => 7,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.color, self.kind, self.position)
    }
}

/// Non-owning handle into the [`PieceStore`]. Squares and transient check
/// state hold ids so nothing keeps a second owning reference to a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(usize);

/// Arena owning every live piece, with per-color id lists and a king
/// lookup per color. A captured piece's slot is tombstoned; its id must
/// never be dereferenced again.
#[derive(Debug, Clone, Default)]
pub struct PieceStore {
    slots: Vec<Option<Piece>>,
    by_color: [Vec<PieceId>; 2],
    kings: [Option<PieceId>; 2],
}

impl PieceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.slots.len());
        self.by_color[piece.color.index()].push(id);
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = Some(id);
        }
        self.slots.push(Some(piece));
        id
    }

    /// Destroys a piece, dropping it from its color's list. Returns the
    /// piece so the caller can report what was captured.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.slots[id.0].take()?;
        self.by_color[piece.color.index()].retain(|&other| other != id);
        Some(piece)
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Live piece ids of one color, in creation order.
    pub fn color_ids(&self, color: Color) -> &[PieceId] {
        &self.by_color[color.index()]
    }

    pub fn king(&self, color: Color) -> Option<PieceId> {
        self.kings[color.index()]
    }

    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.king(color).and_then(|id| self.get(id)).map(|k| k.position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|p| (PieceId(i), p)))
    }
}

impl Index<PieceId> for PieceStore {
    type Output = Piece;
    fn index(&self, id: PieceId) -> &Piece {
        self.slots[id.0].as_ref().expect("stale piece id")
    }
}

impl IndexMut<PieceId> for PieceStore {
    fn index_mut(&mut self, id: PieceId) -> &mut Piece {
        self.slots[id.0].as_mut().expect("stale piece id")
    }
}
