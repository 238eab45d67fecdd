//! Block placement puzzle core.
//!
//! Pieces are dragged over a fixed grid; [`placement::evaluate`] decides
//! whether the piece fits under the pointer and marks the preview, and
//! [`placement::commit`] writes a fitting piece into the grid.

pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod piece;
pub mod placement;
pub mod session;

pub use config::Config;
pub use error::{ConfigError, GridError, SessionError, ShapeError};
pub use geometry::{Bounds, Point};
pub use grid::{CellPos, Grid, GridCell};
pub use piece::{Piece, PieceId, PieceKind, Shape};
pub use placement::{commit, evaluate, Placement, Verdict};
pub use session::{PieceProvider, RandomPieceProvider, SequencePieceProvider, Session, SessionEvent};

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    /// Cell size used by the helpers: two columns by one row, like the terminal.
    pub const CELL_W: i32 = 2;
    pub const CELL_H: i32 = 1;

    /// An empty grid laid out from the origin.
    pub fn laid_out_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        grid.layout(Point::new(0, 0), CELL_W, CELL_H);
        grid
    }

    /// A point strictly inside the cell at (row, col) of a helper grid.
    pub fn point_in(row: usize, col: usize) -> Point {
        Point::new(col as i32 * CELL_W + 1, row as i32 * CELL_H)
    }

    pub fn shape(bits: &[&[u8]]) -> Shape {
        match Shape::from_bits(bits) {
            Ok(shape) => shape,
            Err(err) => panic!("invalid test shape: {err}"),
        }
    }

    /// A piece already being dragged at the centre of cell (row, col).
    pub fn dragged_at(bits: &[&[u8]], row: usize, col: usize) -> Piece {
        let mut piece = Piece::new(PieceId(0), shape(bits));
        piece.begin_drag();
        piece.move_to(point_in(row, col));
        piece
    }

    pub fn occupy(grid: &mut Grid, cells: &[(usize, usize)]) {
        for &(row, col) in cells {
            if let Err(err) = grid.set_occupied(row, col, true) {
                panic!("cannot occupy test cell: {err}");
            }
        }
    }
}
