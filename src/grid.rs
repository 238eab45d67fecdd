use crate::error::GridError;
use crate::geometry::{Bounds, Point};

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellPos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// One board cell. Renderers read the flags; only the placement engine writes them.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GridCell {
    occupied: bool,
    highlighted: bool,
    bounds: Option<Bounds>,
}

impl GridCell {
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Region written by the layout pass, `None` before the first layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Fixed-size board stored row-major (`row * width + col`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<GridCell>,
    revision: u64,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![GridCell::default(); width * height],
            revision: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bumped every time a cell's occupancy actually changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if !self.contains(row, col) {
            return Err(GridError::OutOfRange {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row * self.width + col)
    }

    fn position(&self, index: usize) -> CellPos {
        CellPos::new(index / self.width, index % self.width)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<&GridCell, GridError> {
        let idx = self.index(row, col)?;
        Ok(&self.cells[idx])
    }

    pub fn set_highlighted(
        &mut self,
        row: usize,
        col: usize,
        value: bool,
    ) -> Result<(), GridError> {
        let idx = self.index(row, col)?;
        self.cells[idx].highlighted = value;
        Ok(())
    }

    pub fn set_occupied(&mut self, row: usize, col: usize, value: bool) -> Result<(), GridError> {
        let idx = self.index(row, col)?;
        if self.cells[idx].occupied != value {
            self.cells[idx].occupied = value;
            self.revision += 1;
        }
        Ok(())
    }

    pub fn set_bounds(&mut self, row: usize, col: usize, bounds: Bounds) -> Result<(), GridError> {
        let idx = self.index(row, col)?;
        self.cells[idx].bounds = Some(bounds);
        Ok(())
    }

    /// Uniform layout pass: cell (row, col) gets the region starting at
    /// `origin + (col * cell_width, row * cell_height)`.
    pub fn layout(&mut self, origin: Point, cell_width: i32, cell_height: i32) {
        let width = self.width;
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            let row = (idx / width) as i32;
            let col = (idx % width) as i32;
            cell.bounds = Some(Bounds::new(
                origin.x + col * cell_width,
                origin.y + row * cell_height,
                cell_width,
                cell_height,
            ));
        }
    }

    pub fn reset_highlights(&mut self) {
        for cell in &mut self.cells {
            cell.highlighted = false;
        }
    }

    /// The cell whose bounds contain `point`. Cells without bounds never match.
    pub fn find_cell_containing(&self, point: Point) -> Option<CellPos> {
        self.cells
            .iter()
            .position(|cell| cell.bounds.is_some_and(|b| b.contains(point)))
            .map(|idx| self.position(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellPos, &GridCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (self.position(idx), cell))
    }

    pub fn highlighted_cells(&self) -> Vec<CellPos> {
        self.iter()
            .filter(|(_, cell)| cell.highlighted)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn occupied_cells(&self) -> Vec<CellPos> {
        self.iter()
            .filter(|(_, cell)| cell.occupied)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.occupied).count()
    }
}
