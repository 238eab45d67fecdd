use crate::error::ShapeError;
use crate::geometry::Point;

// ============================================================================
// Shape
// ============================================================================

/// Rectangular fill matrix of a piece, relative to its top-left sub-cell.
///
/// Construction rejects ragged matrices and matrices without any filled
/// sub-cell, so every shape covers at least one grid cell when placed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Shape {
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, ShapeError> {
        let expected = rows.first().map(Vec::len).ok_or(ShapeError::NoRows)?;
        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(ShapeError::Ragged {
                    row,
                    len: values.len(),
                    expected,
                });
            }
            cells.extend_from_slice(values);
        }
        if !cells.iter().any(|&filled| filled) {
            return Err(ShapeError::NoFilledCells);
        }
        Ok(Self {
            rows: rows.len(),
            cols: expected,
            cells,
        })
    }

    /// Builds a shape from a 0/1 matrix; any non-zero value is filled.
    pub fn from_bits(bits: &[&[u8]]) -> Result<Self, ShapeError> {
        Self::from_rows(
            bits.iter()
                .map(|row| row.iter().map(|&b| b != 0).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Filled sub-cells as (row, col), in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &filled)| filled)
            .map(move |(idx, _)| (idx / cols, idx % cols))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&filled| filled).count()
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceKind {
    Monomino,
    DominoH,
    DominoV,
    TrominoH,
    TrominoV,
    Corner,
    Square,
    L,
    T,
    BigSquare,
}

impl PieceKind {
    pub const ALL: [PieceKind; 10] = [
        PieceKind::Monomino,
        PieceKind::DominoH,
        PieceKind::DominoV,
        PieceKind::TrominoH,
        PieceKind::TrominoV,
        PieceKind::Corner,
        PieceKind::Square,
        PieceKind::L,
        PieceKind::T,
        PieceKind::BigSquare,
    ];

    fn bits(&self) -> &'static [&'static [u8]] {
        match self {
            PieceKind::Monomino => &[&[1]],
            PieceKind::DominoH => &[&[1, 1]],
            PieceKind::DominoV => &[&[1], &[1]],
            PieceKind::TrominoH => &[&[1, 1, 1]],
            PieceKind::TrominoV => &[&[1], &[1], &[1]],
            PieceKind::Corner => &[&[1, 0], &[1, 1]],
            PieceKind::Square => &[&[1, 1], &[1, 1]],
            PieceKind::L => &[&[1, 0], &[1, 0], &[1, 1]],
            PieceKind::T => &[&[1, 1, 1], &[0, 1, 0]],
            PieceKind::BigSquare => &[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]],
        }
    }

    pub fn shape(&self) -> Shape {
        let bits = self.bits();
        let cols = bits[0].len();
        Shape {
            rows: bits.len(),
            cols,
            cells: bits.iter().flat_map(|row| row.iter().map(|&b| b != 0)).collect(),
        }
    }
}

// ============================================================================
// Piece
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u64);

#[derive(Clone, Debug)]
pub struct Piece {
    pub id: PieceId,
    pub kind: Option<PieceKind>,
    shape: Shape,
    pub drag_position: Point,
    pub is_being_dragged: bool,
    pub fits_current_position: bool,
}

impl Piece {
    pub fn new(id: PieceId, shape: Shape) -> Self {
        Self {
            id,
            kind: None,
            shape,
            drag_position: Point::default(),
            is_being_dragged: false,
            fits_current_position: false,
        }
    }

    pub fn from_kind(id: PieceId, kind: PieceKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::new(id, kind.shape())
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn begin_drag(&mut self) {
        self.is_being_dragged = true;
        self.fits_current_position = false;
    }

    pub fn move_to(&mut self, position: Point) {
        self.drag_position = position;
    }

    /// Back to resting state in the holding area.
    pub fn end_drag(&mut self) {
        self.is_being_dragged = false;
        self.fits_current_position = false;
        self.drag_position = Point::default();
    }
}
