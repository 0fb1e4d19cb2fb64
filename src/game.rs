//! Game orchestration: turn order, move application, the special moves
//! (castling, en passant, promotion), and the post-move recomputation of
//! square control, checkers and the check defense list.

use std::fmt;

use crate::board::Board;
use crate::error::{Error, Result};
use crate::moves::{attack_footprint, possible_moves, MoveSet};
use crate::piece::{Color, Piece, PieceId, PieceKind, PieceStore};
use crate::position::{line_direction, Position};

/// Outcome of the last completed double pawn push, alive for exactly one
/// ply: the enemy pawns entitled to capture in passing, and the square
/// the double-stepper started from.
#[derive(Debug, Clone)]
pub(crate) struct EnPassant {
    pub(crate) eligible: Vec<PieceId>,
    pub(crate) origin: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The named color's king is attacked but the game goes on.
    Check(Color),
    /// The named color is mated and has lost.
    Checkmate(Color),
    Stalemate,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Check(color) => write!(f, "{color} is in check"),
            GameStatus::Checkmate(color) => write!(f, "checkmate, {color} loses"),
            GameStatus::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// What a successful move did.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub captured: Option<Piece>,
    /// The mover must call [`Game::resolve_promotion`] before the game
    /// continues.
    pub promotion_pending: bool,
    pub status: GameStatus,
}

/// A full two-player game. All derived state (control flags, checker
/// lists, the defense list) is recomputed from scratch after every
/// completed move; nothing is updated incrementally.
pub struct Game {
    pub(crate) board: Board,
    pub(crate) pieces: PieceStore,
    turn: Color,
    /// Pieces currently checking each color's king.
    checkers: [Vec<PieceId>; 2],
    /// Squares where a non-king piece of the side to move may land to
    /// end a single check. Empty under double check or no check.
    pub(crate) check_defenses: Vec<Position>,
    pub(crate) en_passant: Option<EnPassant>,
    pending_promotion: Option<PieceId>,
    status: GameStatus,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Game {
    /// A fresh game in the standard starting position, White to move.
    pub fn new() -> Self {
        let mut pieces = Vec::with_capacity(32);
        for color in [Color::White, Color::Black] {
            let home = color.home_rank();
            let pawn_rank = home + color.pawn_step().y;
            for (x, &kind) in BACK_RANK.iter().enumerate() {
                pieces.push(Piece::new(kind, color, Position::new(x as i8, home)));
            }
            for x in 0..8 {
                pieces.push(Piece::new(
                    PieceKind::Pawn,
                    color,
                    Position::new(x, pawn_rank),
                ));
            }
        }
        Self::from_pieces(pieces, Color::White)
    }

    /// A game from an arbitrary piece layout. Derived state is computed
    /// immediately, so the position may already be check or even mate.
    pub fn from_pieces(pieces: Vec<Piece>, turn: Color) -> Self {
        let mut store = PieceStore::new();
        let mut board = Board::new();
        for piece in pieces {
            let pos = piece.position;
            let id = store.insert(piece);
            board.place(pos, id);
        }
        let mut game = Self {
            board,
            pieces: store,
            turn,
            checkers: [Vec::new(), Vec::new()],
            check_defenses: Vec::new(),
            en_passant: None,
            pending_promotion: None,
            status: GameStatus::Ongoing,
        };
        game.refresh();
        game
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn in_check(&self, color: Color) -> bool {
        !self.checkers[color.index()].is_empty()
    }

    pub fn piece_at(&self, pos: Position) -> Result<Option<&Piece>> {
        Ok(self.board.square(pos)?.piece.map(|id| &self.pieces[id]))
    }

    /// Legal moves of the piece on `pos`, for either color.
    pub fn legal_moves_for(&self, pos: Position) -> Result<MoveSet> {
        let id = self
            .board
            .square(pos)?
            .piece
            .ok_or(Error::NoPieceAtSquare(pos))?;
        Ok(possible_moves(self, id))
    }

    /// Plays `from -> to` for the side to move. Castling is requested by
    /// the two-square king move and brings the rook along; an en-passant
    /// capture removes the passed pawn. A pawn reaching the last rank
    /// leaves the game waiting on [`Game::resolve_promotion`].
    pub fn apply_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome> {
        if self.pending_promotion.is_some() {
            return Err(Error::PromotionPending);
        }
        if matches!(
            self.status,
            GameStatus::Checkmate(_) | GameStatus::Stalemate
        ) {
            return Err(Error::IllegalMove { from, to });
        }
        let id = self
            .board
            .square(from)?
            .piece
            .ok_or(Error::NoPieceAtSquare(from))?;
        to.checked()?;
        let mover = self.pieces[id].clone();
        if mover.color != self.turn {
            return Err(Error::WrongTurnColor(mover.color));
        }
        if !possible_moves(self, id).contains(to) {
            return Err(Error::IllegalMove { from, to });
        }

        // En passant is the one capture that lands on an empty square;
        // the passed pawn sits beside the destination, on the mover's
        // starting rank.
        let ep_victim = if mover.kind == PieceKind::Pawn
            && to.x != from.x
            && self.board.at(to).piece.is_none()
        {
            self.board.at(Position::new(to.x, from.y)).piece
        } else {
            None
        };

        let mut captured = self
            .board
            .move_piece(from, to)?
            .and_then(|victim| self.pieces.remove(victim));
        if let Some(victim) = ep_victim {
            self.board.clear(Position::new(to.x, from.y));
            captured = self.pieces.remove(victim);
        }

        {
            let piece = &mut self.pieces[id];
            piece.position = to;
            piece.has_moved = true;
        }

        // A two-square king move is castling; the rook jumps to the
        // square the king crossed.
        if mover.kind == PieceKind::King && (to.x - from.x).abs() == 2 {
            let (rook_from, rook_to) = if to.x > from.x {
                (Position::new(7, from.y), Position::new(5, from.y))
            } else {
                (Position::new(0, from.y), Position::new(3, from.y))
            };
            self.board.move_piece(rook_from, rook_to)?;
            if let Some(rook_id) = self.board.at(rook_to).piece {
                let rook = &mut self.pieces[rook_id];
                rook.position = rook_to;
                rook.has_moved = true;
            }
        }

        // The en-passant window is a single ply: whatever was recorded
        // last move dies here, and only a fresh double push with an enemy
        // pawn alongside opens a new one.
        self.en_passant = None;
        if mover.kind == PieceKind::Pawn && (to.y - from.y).abs() == 2 {
            let mut eligible = Vec::new();
            for dx in [-1, 1] {
                let beside = Position::new(to.x + dx, to.y);
                if !beside.on_board() {
                    continue;
                }
                if let Some(neighbor_id) = self.board.at(beside).piece {
                    let neighbor = &self.pieces[neighbor_id];
                    if neighbor.color != mover.color && neighbor.kind == PieceKind::Pawn {
                        eligible.push(neighbor_id);
                    }
                }
            }
            if !eligible.is_empty() {
                self.en_passant = Some(EnPassant {
                    eligible,
                    origin: from,
                });
            }
        }

        self.turn = self.turn.opponent();

        let promotion_pending =
            mover.kind == PieceKind::Pawn && to.y == mover.color.last_rank();
        if promotion_pending {
            // Derived state stays frozen until the new piece is chosen;
            // a pawn standing on the last rank attacks nothing real.
            self.pending_promotion = Some(id);
        } else {
            self.refresh();
        }

        Ok(MoveOutcome {
            captured,
            promotion_pending,
            status: self.status,
        })
    }

    /// Turns the pawn awaiting promotion into `kind` and resumes the
    /// game. Only queen, rook, bishop and knight are valid choices.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<GameStatus> {
        let id = self.pending_promotion.ok_or(Error::NoPromotionPending)?;
        if !matches!(
            kind,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        ) {
            return Err(Error::InvalidPromotionChoice(kind));
        }
        {
            let piece = &mut self.pieces[id];
            piece.kind = kind;
            piece.promoted = true;
        }
        self.pending_promotion = None;
        self.refresh();
        Ok(self.status)
    }

    /// Rebuilds every piece of derived state from the current occupancy:
    /// control flags, checker lists, the defense list for the side to
    /// move, and the game status.
    fn refresh(&mut self) {
        self.board.reset_control(Color::White);
        self.board.reset_control(Color::Black);
        self.checkers = [Vec::new(), Vec::new()];
        for color in [Color::White, Color::Black] {
            let ids: Vec<PieceId> = self.pieces.color_ids(color).to_vec();
            for id in ids {
                let (squares, gives_check) =
                    attack_footprint(&self.board, &self.pieces, self.en_passant.as_ref(), id);
                for pos in squares {
                    self.board.mark_control(pos, color);
                }
                if gives_check {
                    self.checkers[color.opponent().index()].push(id);
                }
            }
        }
        self.check_defenses = self.defense_squares(self.turn);
        self.status = self.evaluate_status();
    }

    /// Squares that answer a single check on `color`'s king: the
    /// checker's own square plus, for a sliding checker, the squares
    /// strictly between it and the king. Double check has no answer
    /// short of a king move, so the list comes back empty.
    fn defense_squares(&self, color: Color) -> Vec<Position> {
        let checkers = &self.checkers[color.index()];
        if checkers.len() != 1 {
            return Vec::new();
        }
        let checker = &self.pieces[checkers[0]];
        let mut squares = vec![checker.position];
        let Some(king_pos) = self.pieces.king_position(color) else {
            return squares;
        };
        if let Some(dir) = line_direction(checker.position, king_pos) {
            if checker.kind.pins_along(dir) {
                let mut pos = checker.position + dir;
                while pos != king_pos {
                    squares.push(pos);
                    pos = pos + dir;
                }
            }
        }
        squares
    }

    fn evaluate_status(&self) -> GameStatus {
        let color = self.turn;
        let any_moves = self
            .pieces
            .color_ids(color)
            .iter()
            .any(|&id| !possible_moves(self, id).is_empty());
        match (self.in_check(color), any_moves) {
            (true, true) => GameStatus::Check(color),
            (true, false) => GameStatus::Checkmate(color),
            (false, true) => GameStatus::Ongoing,
            (false, false) => GameStatus::Stalemate,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..8).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..8 {
                let square = self.board.at(Position::new(x, y));
                let ch = match square.piece {
                    Some(id) => {
                        let piece = &self.pieces[id];
                        piece.kind.to_char(piece.color)
                    }
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(kind: PieceKind, color: Color, x: i8, y: i8) -> Piece {
        Piece::new(kind, color, Position::new(x, y))
    }

    fn at(x: i8, y: i8) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn back_rank_mate() {
        let mut game = Game::from_pieces(
            vec![
                piece(PieceKind::King, Color::Black, 7, 7),
                piece(PieceKind::Pawn, Color::Black, 5, 6),
                piece(PieceKind::Pawn, Color::Black, 6, 6),
                piece(PieceKind::Pawn, Color::Black, 7, 6),
                piece(PieceKind::Rook, Color::White, 0, 0),
                piece(PieceKind::King, Color::White, 4, 0),
            ],
            Color::White,
        );
        let outcome = game.apply_move(at(0, 0), at(0, 7)).unwrap();
        assert_eq!(outcome.status, GameStatus::Checkmate(Color::Black));
        assert_eq!(
            game.apply_move(at(7, 7), at(6, 7)).unwrap_err(),
            Error::IllegalMove {
                from: at(7, 7),
                to: at(6, 7)
            }
        );
    }

    #[test]
    fn cornered_king_with_no_moves_is_stalemate() {
        let game = Game::from_pieces(
            vec![
                piece(PieceKind::King, Color::Black, 0, 7),
                piece(PieceKind::Queen, Color::White, 2, 6),
                piece(PieceKind::King, Color::White, 4, 0),
            ],
            Color::Black,
        );
        assert!(!game.in_check(Color::Black));
        assert_eq!(game.status(), GameStatus::Stalemate);
    }

    #[test]
    fn promotion_waits_for_a_choice() {
        let mut game = Game::from_pieces(
            vec![
                piece(PieceKind::Pawn, Color::White, 0, 6),
                piece(PieceKind::King, Color::White, 4, 0),
                piece(PieceKind::King, Color::Black, 7, 4),
            ],
            Color::White,
        );
        let outcome = game.apply_move(at(0, 6), at(0, 7)).unwrap();
        assert!(outcome.promotion_pending);
        // the turn has already flipped, but play is frozen
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(
            game.apply_move(at(7, 4), at(7, 5)).unwrap_err(),
            Error::PromotionPending
        );
        assert_eq!(
            game.resolve_promotion(PieceKind::King),
            Err(Error::InvalidPromotionChoice(PieceKind::King))
        );
        game.resolve_promotion(PieceKind::Queen).unwrap();
        let queen = game.piece_at(at(0, 7)).unwrap().unwrap();
        assert_eq!(queen.kind, PieceKind::Queen);
        assert!(queen.promoted);
        assert_eq!(
            game.resolve_promotion(PieceKind::Queen),
            Err(Error::NoPromotionPending)
        );
    }

    #[test]
    fn turn_order_and_input_errors() {
        let mut game = Game::new();
        assert_eq!(
            game.apply_move(at(4, 6), at(4, 5)).unwrap_err(),
            Error::WrongTurnColor(Color::Black)
        );
        assert_eq!(
            game.apply_move(at(4, 1), at(4, 4)).unwrap_err(),
            Error::IllegalMove {
                from: at(4, 1),
                to: at(4, 4)
            }
        );
        assert_eq!(
            game.apply_move(at(4, 3), at(4, 4)).unwrap_err(),
            Error::NoPieceAtSquare(at(4, 3))
        );
        assert_eq!(
            game.apply_move(at(8, 1), at(8, 2)).unwrap_err(),
            Error::OutOfBounds(at(8, 1))
        );
    }

    #[test]
    fn control_recomputation_is_idempotent() {
        let mut game = Game::new();
        game.apply_move(at(4, 1), at(4, 3)).unwrap();
        let snapshot: Vec<(bool, bool)> = (0..64)
            .map(|i| {
                let square = game.board.at(at(i % 8, i / 8));
                (
                    square.controlled_by(Color::White),
                    square.controlled_by(Color::Black),
                )
            })
            .collect();
        game.refresh();
        let again: Vec<(bool, bool)> = (0..64)
            .map(|i| {
                let square = game.board.at(at(i % 8, i / 8));
                (
                    square.controlled_by(Color::White),
                    square.controlled_by(Color::Black),
                )
            })
            .collect();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn en_passant_window_lasts_one_ply() {
        let mut game = Game::new();
        game.apply_move(at(4, 1), at(4, 3)).unwrap(); // e4
        game.apply_move(at(3, 6), at(3, 4)).unwrap(); // d5
        game.apply_move(at(4, 3), at(4, 4)).unwrap(); // e5
        game.apply_move(at(5, 6), at(5, 4)).unwrap(); // f5
        let set = game.legal_moves_for(at(4, 4)).unwrap();
        assert!(set.contains(at(5, 5)));

        game.apply_move(at(0, 1), at(0, 2)).unwrap(); // a3, declining
        game.apply_move(at(0, 6), at(0, 5)).unwrap(); // a6
        let set = game.legal_moves_for(at(4, 4)).unwrap();
        assert!(!set.contains(at(5, 5)));
    }

    #[test]
    fn en_passant_capture_removes_the_passed_pawn() {
        let mut game = Game::new();
        game.apply_move(at(4, 1), at(4, 3)).unwrap(); // e4
        game.apply_move(at(0, 6), at(0, 5)).unwrap(); // a6
        game.apply_move(at(4, 3), at(4, 4)).unwrap(); // e5
        game.apply_move(at(3, 6), at(3, 4)).unwrap(); // d5
        let outcome = game.apply_move(at(4, 4), at(3, 5)).unwrap(); // exd6
        let captured = outcome.captured.unwrap();
        assert_eq!(captured.kind, PieceKind::Pawn);
        assert_eq!(captured.position, at(3, 4));
        assert!(game.piece_at(at(3, 4)).unwrap().is_none());
        assert!(game.piece_at(at(3, 5)).unwrap().is_some());
    }

    #[test]
    fn kingside_castling_brings_the_rook_along() {
        let mut game = Game::from_pieces(
            vec![
                piece(PieceKind::King, Color::White, 4, 0),
                piece(PieceKind::Rook, Color::White, 7, 0),
                piece(PieceKind::King, Color::Black, 4, 7),
            ],
            Color::White,
        );
        game.apply_move(at(4, 0), at(6, 0)).unwrap();
        let king = game.piece_at(at(6, 0)).unwrap().unwrap();
        assert_eq!(king.kind, PieceKind::King);
        let rook = game.piece_at(at(5, 0)).unwrap().unwrap();
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(rook.has_moved);
        assert!(game.piece_at(at(7, 0)).unwrap().is_none());
    }

    #[test]
    fn castling_lost_after_the_king_returns_home() {
        let mut game = Game::from_pieces(
            vec![
                piece(PieceKind::King, Color::White, 4, 0),
                piece(PieceKind::Rook, Color::White, 7, 0),
                piece(PieceKind::King, Color::Black, 4, 7),
            ],
            Color::White,
        );
        game.apply_move(at(4, 0), at(4, 1)).unwrap();
        game.apply_move(at(4, 7), at(4, 6)).unwrap();
        game.apply_move(at(4, 1), at(4, 0)).unwrap();
        game.apply_move(at(4, 6), at(4, 7)).unwrap();
        let set = game.legal_moves_for(at(4, 0)).unwrap();
        assert!(!set.contains(at(6, 0)));
    }
}
