//! Placement validation and commit.
//!
//! [`evaluate`] recomputes the preview for a dragged piece and returns a
//! [`Verdict`]. Only a fitting verdict carries a [`Placement`], and
//! [`commit`] requires one, so a piece can never be committed without a
//! successful evaluation immediately before it.

use log::{debug, info, trace};

use crate::error::GridError;
use crate::grid::{CellPos, Grid};
use crate::piece::{Piece, PieceId};

/// Proof that a piece fitted the grid at a given revision.
///
/// Not `Clone`: each successful evaluation commits at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct Placement {
    piece: PieceId,
    anchor: CellPos,
    cells: Vec<CellPos>,
    revision: u64,
}

impl Placement {
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    pub fn anchor(&self) -> CellPos {
        self.anchor
    }

    /// Cells the piece covers; equal to the highlight set of the evaluation.
    pub fn cells(&self) -> &[CellPos] {
        &self.cells
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The drag position is not over any cell.
    OffGrid,
    /// Over the grid, but some sub-cells land on occupied cells or past the
    /// right/bottom edge. Occupied conflicts are not highlighted.
    Blocked {
        anchor: CellPos,
        conflicts: Vec<CellPos>,
        out_of_bounds: usize,
    },
    Fits(Placement),
}

impl Verdict {
    pub fn fits(&self) -> bool {
        matches!(self, Verdict::Fits(_))
    }

    pub fn anchor(&self) -> Option<CellPos> {
        match self {
            Verdict::OffGrid => None,
            Verdict::Blocked { anchor, .. } => Some(*anchor),
            Verdict::Fits(placement) => Some(placement.anchor),
        }
    }

    pub fn into_placement(self) -> Option<Placement> {
        match self {
            Verdict::Fits(placement) => Some(placement),
            _ => None,
        }
    }
}

/// Validates `piece` at its drag position and marks the preview on `grid`.
///
/// Highlights are reset first. Every in-bounds, empty target cell is
/// highlighted even when the piece as a whole does not fit. The verdict is
/// also stored in `piece.fits_current_position`.
pub fn evaluate(piece: &mut Piece, grid: &mut Grid) -> Result<Verdict, GridError> {
    grid.reset_highlights();

    let Some(anchor) = grid.find_cell_containing(piece.drag_position) else {
        trace!("piece {:?} at {:?} is off the grid", piece.id, piece.drag_position);
        piece.fits_current_position = false;
        return Ok(Verdict::OffGrid);
    };

    let mut cells = Vec::with_capacity(piece.shape().filled_count());
    let mut conflicts = Vec::new();
    let mut out_of_bounds = 0;

    for (r, c) in piece.shape().filled_cells() {
        let (row, col) = (anchor.row + r, anchor.col + c);
        if !grid.contains(row, col) {
            out_of_bounds += 1;
        } else if grid.cell_at(row, col)?.is_occupied() {
            conflicts.push(CellPos::new(row, col));
        } else {
            grid.set_highlighted(row, col, true)?;
            cells.push(CellPos::new(row, col));
        }
    }

    let fits = conflicts.is_empty() && out_of_bounds == 0 && !cells.is_empty();
    piece.fits_current_position = fits;
    debug!(
        "piece {:?} anchored at {:?}: fits={} conflicts={} out_of_bounds={}",
        piece.id,
        anchor,
        fits,
        conflicts.len(),
        out_of_bounds
    );

    if fits {
        Ok(Verdict::Fits(Placement {
            piece: piece.id,
            anchor,
            cells,
            revision: grid.revision(),
        }))
    } else {
        Ok(Verdict::Blocked {
            anchor,
            conflicts,
            out_of_bounds,
        })
    }
}

/// Writes a fitting placement into the grid and returns the number of cells
/// filled. Highlights are left in place.
///
/// Fails with [`GridError::StalePlacement`] and changes nothing if the grid's
/// occupancy changed since the placement was evaluated.
pub fn commit(placement: Placement, grid: &mut Grid) -> Result<usize, GridError> {
    if placement.revision != grid.revision() {
        return Err(GridError::StalePlacement {
            expected: placement.revision,
            actual: grid.revision(),
        });
    }
    for cell in &placement.cells {
        grid.set_occupied(cell.row, cell.col, true)?;
    }
    info!(
        "committed piece {:?} at {:?} ({} cells)",
        placement.piece,
        placement.anchor,
        placement.cells.len()
    );
    Ok(placement.cells.len())
}
