//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Pieces may extend above the top edge (y < 0): such cells are only checked
//! against the side walls, and are dropped when merged.

use arrayvec::ArrayVec;

use crate::geometry::{ShapeMatrix, MATRIX_SIZE};
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Upper bound of cells a single shape matrix can occupy
pub const MAX_PIECE_CELLS: usize = MATRIX_SIZE * MATRIX_SIZE;

/// A piece cell in absolute board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedCell {
    pub x: i8,
    pub y: i8,
    pub kind: PieceKind,
}

/// Cell list produced from one shape matrix
pub type PieceCells = ArrayVec<PlacedCell, MAX_PIECE_CELLS>;

/// Absolute board cells covered by `matrix` with its top-left corner at `(origin_x, origin_y)`
///
/// Coordinates saturate at the `i8` bounds, which always lie off the board.
pub fn occupied_cells(
    matrix: &ShapeMatrix,
    origin_x: i8,
    origin_y: i8,
    kind: PieceKind,
) -> PieceCells {
    matrix
        .offsets()
        .map(|(dx, dy)| PlacedCell {
            x: origin_x.saturating_add(dx),
            y: origin_y.saturating_add(dy),
            kind,
        })
        .collect()
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether a single cell position is blocked for a piece
    ///
    /// Side walls and the floor always block; rows above the top never do.
    #[inline]
    fn blocks(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return true;
        }
        y >= 0 && self.is_occupied(x, y)
    }

    /// True if any cell is outside the walls/floor or overlaps a filled cell
    pub fn collides(&self, cells: &[PlacedCell]) -> bool {
        cells.iter().any(|c| self.blocks(c.x, c.y))
    }

    /// New board with every in-bounds cell written; cells above the top are dropped
    pub fn merge(&self, cells: &[PlacedCell]) -> Board {
        let mut out = self.clone();
        for c in cells {
            out.set(c.x, c.y, Some(c.kind));
        }
        out
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// New board with all full rows removed and empty rows padded at the top
    pub fn clear_lines(&self) -> (Board, usize) {
        let mut out = self.clone();
        let cleared = out.clear_full_rows();
        (out, cleared)
    }

    /// Remove full rows in place and return how many were removed
    /// Uses a two-pointer compaction with zero allocation
    fn clear_full_rows(&mut self) -> usize {
        let width = BOARD_WIDTH as usize;
        let mut cleared = 0;
        let mut write_y = BOARD_HEIGHT as usize;

        // Scan from bottom to top
        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        // Clear the remaining rows at the top
        self.cells[..write_y * width].fill(None);
        cleared
    }

    /// Rows top to bottom, for rendering
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Build a board from text rows (`.` empty, a piece letter filled), top to bottom
    ///
    /// Missing rows at the top are empty; characters past the width are ignored.
    ///
    /// ```
    /// use blockfall_core::Board;
    ///
    /// let board = Board::from_rows(&["IIII......"]);
    /// assert!(board.is_occupied(0, 19));
    /// assert!(!board.is_occupied(4, 19));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let height = BOARD_HEIGHT as usize;
        let skip = rows.len().saturating_sub(height);
        let top = height.saturating_sub(rows.len());
        for (i, row) in rows.iter().skip(skip).enumerate() {
            let y = (top + i) as i8;
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                let cell = PieceKind::from_str(ch.encode_utf8(&mut [0; 4]));
                board.set(x as i8, y, cell);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
