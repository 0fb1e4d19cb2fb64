//! Move generation: the shared sliding walk, the per-variant
//! specializations, and the pin and check filters that turn raw walks
//! into legal moves.

use crate::board::Board;
use crate::game::{EnPassant, Game};
use crate::piece::{Piece, PieceId, PieceKind, PieceStore, EVERY_DIRECTION};
use crate::position::{line_direction, Position};

/// A piece's destinations, split the way the presentation layer wants
/// them: playable moves, playable captures, and squares the piece attacks
/// but cannot move to (friendly-occupied, or stripped by the pin/check
/// filters).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveSet {
    pub moves: Vec<Position>,
    pub captures: Vec<Position>,
    pub defending: Vec<Position>,
}

impl MoveSet {
    /// No playable move or capture. Defended squares don't count.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.captures.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.moves.contains(&pos) || self.captures.contains(&pos)
    }
}

/// Legal moves for one piece: raw walk, then the pin filter, then the
/// check filter. Kings skip both filters; their moves are constrained by
/// enemy square control instead.
pub(crate) fn possible_moves(game: &Game, id: PieceId) -> MoveSet {
    let piece = &game.pieces[id];
    if piece.kind == PieceKind::King {
        return king_moves(game, piece);
    }

    let (mut set, _) = match piece.kind {
        PieceKind::Pawn => pawn_raw(&game.board, &game.pieces, game.en_passant.as_ref(), id),
        _ => slide_raw(&game.board, &game.pieces, piece),
    };

    // A pinned piece keeps only the moves that stay on the pin axis; the
    // rest still defend their squares.
    if let Some(axis) = pin_axis(game, piece) {
        let origin = piece.position;
        let on_axis = |p: &Position| {
            line_direction(origin, *p).is_some_and(|d| d == axis || d == axis * -1)
        };
        reclassify(&mut set.moves, &mut set.defending, &on_axis);
        reclassify(&mut set.captures, &mut set.defending, &on_axis);
    }

    // With the king in check only defense-list squares stay playable. The
    // list is left empty under double check, so everything drops out and
    // only the king itself can act.
    if game.in_check(piece.color) {
        let defenses = &game.check_defenses;
        let saves = |p: &Position| defenses.contains(p);
        reclassify(&mut set.moves, &mut set.defending, &saves);
        reclassify(&mut set.captures, &mut set.defending, &saves);
    }

    set
}

/// Moves entries failing `keep` out of `list` into `defending`.
fn reclassify<F>(list: &mut Vec<Position>, defending: &mut Vec<Position>, keep: &F)
where
    F: Fn(&Position) -> bool,
{
    let mut kept = Vec::with_capacity(list.len());
    for pos in list.drain(..) {
        if keep(&pos) {
            kept.push(pos);
        } else {
            defending.push(pos);
        }
    }
    *list = kept;
}

/// Raw attack squares of one piece, for control-flag marking: every
/// square in moves, captures and defending, except pawn forward moves,
/// which threaten nothing. Also reports whether the piece currently
/// gives check. Kings contribute their eight neighbor squares only;
/// running their full move generation here would recurse into the very
/// control flags being rebuilt.
pub(crate) fn attack_footprint(
    board: &Board,
    store: &PieceStore,
    en_passant: Option<&EnPassant>,
    id: PieceId,
) -> (Vec<Position>, bool) {
    let piece = &store[id];
    let (set, gives_check) = match piece.kind {
        PieceKind::King => {
            let neighbors = EVERY_DIRECTION
                .iter()
                .map(|&step| piece.position + step)
                .filter(|p| p.on_board())
                .collect();
            return (neighbors, false);
        }
        PieceKind::Pawn => {
            let (mut set, check) = pawn_raw(board, store, en_passant, id);
            set.moves.clear();
            (set, check)
        }
        _ => slide_raw(board, store, piece),
    };
    let mut squares = set.moves;
    squares.extend(set.captures);
    squares.extend(set.defending);
    (squares, gives_check)
}

/// The shared sliding walk: step along each moveset direction up to the
/// piece's range. Empty squares are moves, enemy pieces are captures and
/// stop the walk, friendly pieces are defended and stop the walk. The
/// enemy king is never a capture: its square is defended, the piece is
/// flagged as checking, and the walk continues behind the king so it
/// cannot step backward along the ray.
fn slide_raw(board: &Board, store: &PieceStore, piece: &Piece) -> (MoveSet, bool) {
    let mut set = MoveSet::default();
    let mut gives_check = false;

    for &dir in piece.moveset() {
        let mut magnitude = 1;
        while magnitude <= piece.range() {
            let target = piece.position + dir * magnitude;
            if !target.on_board() {
                break;
            }
            let Some(other_id) = board.at(target).piece else {
                set.moves.push(target);
                magnitude += 1;
                continue;
            };
            let other = &store[other_id];
            if other.color == piece.color {
                set.defending.push(target);
            } else if other.kind != PieceKind::King {
                set.captures.push(target);
            } else {
                set.defending.push(target);
                gives_check = true;
                let mut behind = magnitude + 1;
                loop {
                    let shadow = piece.position + dir * behind;
                    if !shadow.on_board() {
                        break;
                    }
                    match board.at(shadow).piece {
                        None => {
                            set.defending.push(shadow);
                            behind += 1;
                        }
                        Some(blocker) => {
                            if store[blocker].color == piece.color {
                                set.defending.push(shadow);
                            }
                            break;
                        }
                    }
                }
            }
            break;
        }
    }

    (set, gives_check)
}

/// Pawns walk forward without capturing; their diagonal attacks are
/// separate, and an en-passant target is appended when this pawn was
/// recorded as eligible by the last double push.
fn pawn_raw(
    board: &Board,
    store: &PieceStore,
    en_passant: Option<&EnPassant>,
    id: PieceId,
) -> (MoveSet, bool) {
    let piece = &store[id];
    let (forward, _) = slide_raw(board, store, piece);
    let mut set = MoveSet {
        moves: forward.moves,
        ..MoveSet::default()
    };
    let mut gives_check = false;

    let step = piece.color.pawn_step();
    for side in [Position::new(-1, 0), Position::new(1, 0)] {
        let target = piece.position + step + side;
        if !target.on_board() {
            continue;
        }
        match board.at(target).piece {
            Some(other_id) => {
                let other = &store[other_id];
                if other.color == piece.color {
                    set.defending.push(target);
                } else if other.kind == PieceKind::King {
                    set.defending.push(target);
                    gives_check = true;
                } else {
                    set.captures.push(target);
                }
            }
            None => set.defending.push(target),
        }
    }

    if let Some(ep) = en_passant {
        if ep.eligible.contains(&id) {
            // Land behind the double-stepper: one step short of where it
            // started, from this pawn's point of view.
            set.captures.push(ep.origin - step);
        }
    }

    (set, gives_check)
}

/// King moves: the raw one-step walk minus enemy-controlled squares, plus
/// castling when king and rook are unmoved and the squares between them
/// are empty and safe.
fn king_moves(game: &Game, piece: &Piece) -> MoveSet {
    let (mut set, _) = slide_raw(&game.board, &game.pieces, piece);
    let enemy = piece.color.opponent();
    let board = &game.board;
    set.moves.retain(|p| !board.at(*p).controlled_by(enemy));
    set.captures.retain(|p| !board.at(*p).controlled_by(enemy));

    if piece.has_moved || game.in_check(piece.color) {
        return set;
    }

    let wings: [(Position, &[i8], Position); 2] = [
        // queenside: rook four files over, king ends two files toward it
        (Position::new(-4, 0), &[-1, -2, -3], Position::new(-2, 0)),
        // kingside
        (Position::new(3, 0), &[1, 2], Position::new(2, 0)),
    ];
    for (rook_offset, between, king_step) in wings {
        let rook_pos = piece.position + rook_offset;
        if !rook_pos.on_board() {
            continue;
        }
        let Some(rook_id) = board.at(rook_pos).piece else {
            continue;
        };
        let rook = &game.pieces[rook_id];
        if rook.kind != PieceKind::Rook || rook.color != piece.color || rook.has_moved {
            continue;
        }
        let path_clear = between.iter().all(|&dx| {
            let square = board.at(piece.position + Position::new(dx, 0));
            square.piece.is_none() && !square.controlled_by(enemy)
        });
        if path_clear {
            set.moves.push(piece.position + king_step);
        }
    }

    set
}

/// The king-to-piece direction when the piece is pinned, `None`
/// otherwise. A pin needs the piece alone on a rank/file/diagonal line
/// with its king, and the first piece beyond it an enemy slider whose
/// moveset covers the line.
fn pin_axis(game: &Game, piece: &Piece) -> Option<Position> {
    let king_pos = game.pieces.king_position(piece.color)?;
    let from_king = line_direction(king_pos, piece.position)?;
    let to_king = from_king * -1;

    // Anything between the piece and its king voids the pin.
    let mut pos = piece.position + to_king;
    while pos != king_pos {
        if game.board.at(pos).piece.is_some() {
            return None;
        }
        pos = pos + to_king;
    }

    let mut pos = piece.position + from_king;
    while pos.on_board() {
        if let Some(id) = game.board.at(pos).piece {
            let other = &game.pieces[id];
            if other.color != piece.color && other.kind.pins_along(to_king) {
                return Some(from_king);
            }
            return None;
        }
        pos = pos + from_king;
    }
    None
}
