use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the {width}x{height} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },
    #[error("placement was evaluated at grid revision {expected}, grid is now at {actual}")]
    StalePlacement { expected: u64, actual: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape has no rows")]
    NoRows,
    #[error("shape row {row} has {len} columns, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },
    #[error("shape has no filled cells")]
    NoFilledCells,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("holding slot {slot} does not exist ({slots} slots)")]
    SlotOutOfRange { slot: usize, slots: usize },
    #[error("holding slot {0} is empty")]
    EmptySlot(usize),
    #[error("piece in slot {0} is not being dragged")]
    NotDragging(usize),
    #[error("piece in slot {0} is already being dragged")]
    AlreadyDragging(usize),
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
