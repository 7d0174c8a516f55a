//! Geometry module - tetromino shape matrices and SRS wall kicks
//!
//! Every piece lives in a 4x4 boolean matrix. Rotation is a plain square
//! matrix rotation; the kick tables decide which offsets are tried when the
//! rotated matrix does not fit in place.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, Rotation};

/// Side length of a shape matrix
pub const MATRIX_SIZE: usize = 4;

/// A 4x4 occupancy grid, indexed `[row][column]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShapeMatrix([[bool; MATRIX_SIZE]; MATRIX_SIZE]);

impl ShapeMatrix {
    /// Build a matrix from 0/1 rows
    pub const fn from_rows(rows: [[u8; MATRIX_SIZE]; MATRIX_SIZE]) -> Self {
        let mut out = [[false; MATRIX_SIZE]; MATRIX_SIZE];
        let mut y = 0;
        while y < MATRIX_SIZE {
            let mut x = 0;
            while x < MATRIX_SIZE {
                out[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self(out)
    }

    /// Set cells as `(x, y)` offsets inside the matrix, row-major order
    pub fn offsets(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.0.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, set)| **set)
                .map(move |(x, _)| (x as i8, y as i8))
        })
    }
}

const I_SPAWN: ShapeMatrix =
    ShapeMatrix::from_rows([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]);
const J_SPAWN: ShapeMatrix =
    ShapeMatrix::from_rows([[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const L_SPAWN: ShapeMatrix =
    ShapeMatrix::from_rows([[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const O_SPAWN: ShapeMatrix =
    ShapeMatrix::from_rows([[0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const S_SPAWN: ShapeMatrix =
    ShapeMatrix::from_rows([[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const T_SPAWN: ShapeMatrix =
    ShapeMatrix::from_rows([[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const Z_SPAWN: ShapeMatrix =
    ShapeMatrix::from_rows([[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);

/// Spawn-orientation matrix for a piece kind
///
/// Matrices are `Copy`, so every caller gets its own value.
pub fn spawn_matrix(kind: PieceKind) -> ShapeMatrix {
    match kind {
        PieceKind::I => I_SPAWN,
        PieceKind::J => J_SPAWN,
        PieceKind::L => L_SPAWN,
        PieceKind::O => O_SPAWN,
        PieceKind::S => S_SPAWN,
        PieceKind::T => T_SPAWN,
        PieceKind::Z => Z_SPAWN,
    }
}

/// Rotate 90° clockwise: source `(y, x)` lands at `(x, n-1-y)`
pub fn rotate_cw(matrix: &ShapeMatrix) -> ShapeMatrix {
    let n = MATRIX_SIZE;
    let mut out = [[false; MATRIX_SIZE]; MATRIX_SIZE];
    for (y, row) in matrix.0.iter().enumerate() {
        for (x, &set) in row.iter().enumerate() {
            out[x][n - 1 - y] = set;
        }
    }
    ShapeMatrix(out)
}

/// Rotate 90° counter-clockwise: source `(y, x)` lands at `(n-1-x, y)`
pub fn rotate_ccw(matrix: &ShapeMatrix) -> ShapeMatrix {
    let n = MATRIX_SIZE;
    let mut out = [[false; MATRIX_SIZE]; MATRIX_SIZE];
    for (y, row) in matrix.0.iter().enumerate() {
        for (x, &set) in row.iter().enumerate() {
            out[n - 1 - x][y] = set;
        }
    }
    ShapeMatrix(out)
}

/// SRS wall kick data
/// Each entry is a (dx, dy) offset, tried in order; entry 0 is the in-place rotation.
/// Offsets are applied directly to board coordinates (y grows downwards).
pub type KickTable = [[(i8, i8); 5]; 8];

const NO_KICK: [(i8, i8); 1] = [(0, 0)];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 1->0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// I piece kick table
const I_KICKS: KickTable = [
    // 0->1
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 1->0
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 0->3
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// Row of the kick tables for a transition, `None` for non-adjacent states
fn kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    use Rotation::*;
    match (from, to) {
        (North, East) => Some(0),
        (East, North) => Some(1),
        (East, South) => Some(2),
        (South, East) => Some(3),
        (South, West) => Some(4),
        (West, South) => Some(5),
        (West, North) => Some(6),
        (North, West) => Some(7),
        _ => None,
    }
}

/// Candidate offsets for rotating `kind` from `from` to `to`, in priority order
///
/// O never kicks; a transition without a table row only tries `(0, 0)`.
pub fn kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [(i8, i8)] {
    let table = match kind {
        PieceKind::O => return &NO_KICK,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    match kick_index(from, to) {
        Some(i) => &table[i],
        None => &NO_KICK,
    }
}
