//! Placement module - moving and rotating the active piece
//!
//! All operations are pure: they take the board and a piece by reference and
//! return a new piece. A blocked move or rotation returns `None`.

use arrayvec::ArrayVec;

use crate::board::{occupied_cells, Board, PieceCells, MAX_PIECE_CELLS};
use crate::geometry::{kick_offsets, rotate_ccw, rotate_cw, spawn_matrix, ShapeMatrix, MATRIX_SIZE};
use crate::types::{PieceKind, Rotation, RotationDirection, BOARD_WIDTH, SPAWN_Y};

/// Active falling piece
///
/// `x`/`y` are the board position of the matrix's top-left corner; `matrix`
/// caches the shape for `rotation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub rotation: Rotation,
    pub matrix: ShapeMatrix,
}

impl ActivePiece {
    /// Cells covered at the current position
    pub fn cells(&self) -> PieceCells {
        occupied_cells(&self.matrix, self.x, self.y, self.kind)
    }

    /// Same piece translated, without any collision check
    ///
    /// `None` when the matrix would leave the `i8` coordinate range.
    pub fn shifted(&self, dx: i8, dy: i8) -> Option<Self> {
        Some(Self {
            x: translate(self.x, dx)?,
            y: translate(self.y, dy)?,
            ..*self
        })
    }
}

/// `origin + delta`, with the far edge of the matrix still representable
fn translate(origin: i8, delta: i8) -> Option<i8> {
    let moved = origin.checked_add(delta)?;
    moved.checked_add(MATRIX_SIZE as i8 - 1).map(|_| moved)
}

/// Top-left matrix position a new piece spawns at
///
/// Centers the 4-wide matrix horizontally, one row above the board.
pub fn spawn_position(_kind: PieceKind) -> (i8, i8) {
    ((BOARD_WIDTH / 2) as i8 - 2, SPAWN_Y)
}

/// A new piece in spawn orientation at the spawn position
pub fn spawn_piece(kind: PieceKind) -> ActivePiece {
    let (x, y) = spawn_position(kind);
    ActivePiece {
        kind,
        x,
        y,
        rotation: Rotation::North,
        matrix: spawn_matrix(kind),
    }
}

/// True iff the piece does not collide where it currently is
pub fn can_place(board: &Board, piece: &ActivePiece) -> bool {
    !board.collides(&piece.cells())
}

/// The piece moved by `(dx, dy)`, or `None` if that position collides
pub fn try_move(board: &Board, piece: &ActivePiece, dx: i8, dy: i8) -> Option<ActivePiece> {
    let moved = piece.shifted(dx, dy)?;
    can_place(board, &moved).then_some(moved)
}

/// The piece rotated one step using SRS kicks, or `None` if every kick collides
///
/// O pieces never rotate.
pub fn try_rotate(
    board: &Board,
    piece: &ActivePiece,
    direction: RotationDirection,
) -> Option<ActivePiece> {
    if piece.kind == PieceKind::O {
        return None;
    }

    let rotation = piece.rotation.rotate(direction);
    let matrix = match direction {
        RotationDirection::Cw => rotate_cw(&piece.matrix),
        RotationDirection::Ccw => rotate_ccw(&piece.matrix),
    };

    kick_offsets(piece.kind, piece.rotation, rotation)
        .iter()
        .filter_map(|&(dx, dy)| piece.shifted(dx, dy))
        .map(|kicked| ActivePiece {
            rotation,
            matrix,
            ..kicked
        })
        .find(|candidate| can_place(board, candidate))
}

/// The piece moved straight down as far as it goes, plus the rows travelled
pub fn drop_to_rest(board: &Board, piece: &ActivePiece) -> (ActivePiece, u32) {
    let mut current = *piece;
    let mut rows = 0;
    while let Some(next) = try_move(board, &current, 0, 1) {
        current = next;
        rows += 1;
    }
    (current, rows)
}

/// Landing preview: `(x, y)` of the cells at the resting position
pub fn ghost_cells(board: &Board, piece: &ActivePiece) -> ArrayVec<(i8, i8), MAX_PIECE_CELLS> {
    let (rest, _) = drop_to_rest(board, piece);
    rest.cells().iter().map(|c| (c.x, c.y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_is_centered_above_board() {
        for kind in PieceKind::ALL {
            let piece = spawn_piece(kind);
            assert_eq!((piece.x, piece.y), (3, -1));
            assert_eq!(piece.rotation, Rotation::North);
            assert_eq!(piece.matrix, spawn_matrix(kind));
        }
    }

    #[test]
    fn spawn_fits_on_empty_board() {
        let board = Board::new();
        for kind in PieceKind::ALL {
            assert!(can_place(&board, &spawn_piece(kind)));
        }
    }

    #[test]
    fn move_is_blocked_by_wall() {
        let board = Board::new();
        let mut piece = spawn_piece(PieceKind::T);
        let mut moves = 0;
        while let Some(next) = try_move(&board, &piece, -1, 0) {
            piece = next;
            moves += 1;
        }
        assert_eq!(moves, 3);
        assert_eq!(piece.x, 0);
    }

    #[test]
    fn upward_move_above_board_is_allowed_by_walls_only() {
        let board = Board::new();
        let piece = spawn_piece(PieceKind::I);
        assert!(try_move(&board, &piece, 0, -1).is_some());
    }

    #[test]
    fn o_piece_never_rotates() {
        let board = Board::new();
        let piece = spawn_piece(PieceKind::O);
        assert_eq!(try_rotate(&board, &piece, RotationDirection::Cw), None);
        assert_eq!(try_rotate(&board, &piece, RotationDirection::Ccw), None);
    }

    #[test]
    fn shift_refuses_out_of_range_coordinates() {
        let piece = spawn_piece(PieceKind::T);
        assert_eq!(piece.shifted(127, 0), None);
        assert_eq!(piece.shifted(0, -128), None);

        let far = ActivePiece { x: 124, ..piece };
        assert_eq!(far.shifted(1, 0), None);
        assert_eq!(far.shifted(-1, 0).map(|p| p.x), Some(123));
        assert_eq!(try_move(&Board::new(), &piece, 127, 0), None);
    }

    #[test]
    fn rotation_in_open_space_uses_no_kick() {
        let board = Board::new();
        let piece = spawn_piece(PieceKind::T).shifted(0, 5).unwrap();
        let rotated = try_rotate(&board, &piece, RotationDirection::Cw).unwrap();
        assert_eq!((rotated.x, rotated.y), (piece.x, piece.y));
        assert_eq!(rotated.rotation, Rotation::East);
        assert_eq!(rotated.matrix, rotate_cw(&piece.matrix));
    }

    #[test]
    fn vertical_i_against_left_wall_kicks_right() {
        let board = Board::new();
        // West-facing I occupies matrix column 1; x = -1 puts it in board column 0.
        let start = spawn_piece(PieceKind::I).shifted(0, 5).unwrap();
        let west = try_rotate(&board, &start, RotationDirection::Ccw).unwrap();
        assert_eq!(west.rotation, Rotation::West);
        let at_wall = west.shifted(-(west.x + 1), 0).unwrap();
        assert!(can_place(&board, &at_wall));

        // West -> North in place would put cells at x = -1; the first kick (+1, 0) fits.
        let north = try_rotate(&board, &at_wall, RotationDirection::Cw).unwrap();
        assert_eq!(north.rotation, Rotation::North);
        assert_eq!(north.x, at_wall.x + 1);
        assert_eq!(north.y, at_wall.y);
    }

    #[test]
    fn rotation_fails_when_every_kick_collides() {
        // A horizontal I sealed into a one-row tunnel cannot turn.
        let board = Board::from_rows(&[
            "TTTTTTTTTT",
            "T....TTTTT",
            "TTTTTTTTTT",
            "TTTTTTTTTT",
            "TTTTTTTTTT",
        ]);
        let piece = ActivePiece {
            y: 15,
            x: 1,
            ..spawn_piece(PieceKind::I)
        };
        assert!(can_place(&board, &piece));
        assert_eq!(try_rotate(&board, &piece, RotationDirection::Cw), None);
        assert_eq!(try_rotate(&board, &piece, RotationDirection::Ccw), None);
    }

    #[test]
    fn ghost_rests_on_floor() {
        let board = Board::new();
        let ghost = ghost_cells(&board, &spawn_piece(PieceKind::I));
        assert_eq!(ghost.as_slice(), &[(3, 19), (4, 19), (5, 19), (6, 19)]);
    }

    #[test]
    fn ghost_rests_on_stack() {
        let board = Board::from_rows(&["....O.....", "....O....."]);
        let ghost = ghost_cells(&board, &spawn_piece(PieceKind::T));
        // The flat side lands on top of the column at row 18.
        assert!(ghost.contains(&(4, 16)));
        assert!(ghost.contains(&(3, 17)));
    }

    #[test]
    fn drop_to_rest_counts_rows() {
        let board = Board::new();
        let (rest, rows) = drop_to_rest(&board, &spawn_piece(PieceKind::I));
        assert_eq!(rest.y, 18);
        assert_eq!(rows, 19);
    }
}
