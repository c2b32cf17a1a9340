use std::fmt;

use crate::cells::Cell;
use crate::grid::Grid;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// Every cell of a grid in row-major order.
#[derive(Copy, Clone)]
pub struct CellIter {
    grid: Grid,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(grid: Grid) -> CellIter {
        CellIter {
            grid,
            current_cell_number: 0,
            cells_count: grid.size(),
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cell;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let cell = self.grid.index_to_cell(self.current_cell_number);
            self.current_cell_number += 1;
            cell
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Whole rows of a grid, top to bottom.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_row: usize,
    rows_size: RowsCount,
    cols_size: ColumnsCount,
}

impl RowIter {
    pub(crate) fn new(grid: Grid) -> RowIter {
        RowIter {
            current_row: 0,
            rows_size: grid.rows(),
            cols_size: grid.columns(),
        }
    }
}

impl ExactSizeIterator for RowIter {} // default impl using size_hint()
impl Iterator for RowIter {
    type Item = Vec<Cell>;
    fn next(&mut self) -> Option<Self::Item> {

        let RowsCount(rows_count) = self.rows_size;
        if self.current_row >= rows_count {
            return None;
        }

        let row = self.current_row;
        let ColumnsCount(length) = self.cols_size;
        let cells = (0..length)
            .map(|i: usize| Cell::from_row_column_indices(RowIndex(row), ColumnIndex(i)))
            .collect();
        self.current_row += 1;
        Some(cells)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.rows_size.0 - self.current_row;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
