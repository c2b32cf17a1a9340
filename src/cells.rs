use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

use crate::units::{ColumnIndex, RowIndex};

/// A (row, column) grid coordinate, 0-indexed from the top left corner.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cell {
    pub row: u32,
    pub column: u32,
}

pub type CellSmallVec = SmallVec<[Cell; 4]>;

impl Cell {
    pub fn new(row: u32, column: u32) -> Cell {
        Cell { row, column }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> Cell {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        Cell::new(row as u32, col as u32)
    }

    /// Creates a new `Cell` offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable (it would be negative).
    /// Grid bounds on the south and east sides are not checked here.
    pub fn offset(self, dir: CompassPrimary) -> Option<Cell> {
        let (row, column) = (self.row, self.column);
        match dir {
            CompassPrimary::North => {
                if row > 0 {
                    Some(Cell::new(row - 1, column))
                } else {
                    None
                }
            }
            CompassPrimary::South => row.checked_add(1).map(|r| Cell::new(r, column)),
            CompassPrimary::East => column.checked_add(1).map(|c| Cell::new(row, c)),
            CompassPrimary::West => {
                if column > 0 {
                    Some(Cell::new(row, column - 1))
                } else {
                    None
                }
            }
        }
    }

    /// The direction to take from this cell to step onto `other`, if they are orthogonal neighbours.
    pub fn direction_to(self, other: Cell) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|&dir| self.offset(dir) == Some(other))
    }

    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.direction_to(other).is_some()
    }
}

impl From<(u32, u32)> for Cell {
    fn from(row_column_pair: (u32, u32)) -> Cell {
        Cell::new(row_column_pair.0, row_column_pair.1)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [
        CompassPrimary::North,
        CompassPrimary::South,
        CompassPrimary::West,
        CompassPrimary::East,
    ];

    /// Clockwise quarter turn, i.e. the direction on your right hand side when facing `self`.
    pub fn turn_right(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::East,
            CompassPrimary::East => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::North,
        }
    }

    pub fn turn_left(self) -> CompassPrimary {
        self.turn_right().reverse()
    }

    pub fn reverse(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }
}
