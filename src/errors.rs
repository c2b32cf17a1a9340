use thiserror::Error;

use crate::cells::Cell;

pub type Result<T> = std::result::Result<T, MazeError>;

#[derive(Error, Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeError {
    #[error("invalid maze dimensions {height} x {width}")]
    InvalidDimension { height: usize, width: usize },

    #[error("cell {0} lies outside the grid")]
    OutOfBounds(Cell),

    #[error("cells {0} and {1} are not orthogonal neighbours")]
    NotAdjacent(Cell, Cell),

    #[error("no passage route from {from} to {to}")]
    Disconnected { from: Cell, to: Cell },

    #[error("gave up after {steps} steps without reaching the exit")]
    StepLimitExceeded { steps: usize },

    #[error("inconsistent maze structure between {cell} and {neighbour}")]
    InconsistentStructure { cell: Cell, neighbour: Cell },
}
