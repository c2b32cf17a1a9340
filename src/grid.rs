use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{Cell, CellSmallVec, CompassPrimary};
use crate::errors::{MazeError, Result};
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{ColumnsCount, Height, RowsCount, Width};

pub type CellOptionSmallVec = SmallVec<[Option<Cell>; 4]>;

/// The cell coordinates of a rectangular grid and how they sit next to each other.
///
/// A grid knows nothing about walls or passages, see `Maze` for that.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Grid {
    rows: RowsCount,
    columns: ColumnsCount,
}

impl Grid {
    /// Fails with `InvalidDimension` for an empty grid or one with more cells than a `u32` can index.
    pub fn new(height: Height, width: Width) -> Result<Grid> {
        let (Height(h), Width(w)) = (height, width);
        let too_large = h.checked_mul(w).map_or(true, |size| size > u32::MAX as usize);
        if h == 0 || w == 0 || too_large {
            return Err(MazeError::InvalidDimension { height: h, width: w });
        }

        Ok(Grid {
            rows: RowsCount(h),
            columns: ColumnsCount(w),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.rows.0 * self.columns.0
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline]
    pub fn height(&self) -> Height {
        Height(self.rows.0)
    }

    #[inline]
    pub fn width(&self) -> Width {
        Width(self.columns.0)
    }

    /// Is the cell within the grid's dimensions
    #[inline]
    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        (cell.row as usize) < self.rows.0 && (cell.column as usize) < self.columns.0
    }

    #[inline]
    pub fn check_cell(&self, cell: Cell) -> Result<()> {
        if self.is_valid_cell(cell) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds(cell))
        }
    }

    /// Convert a cell to a one dimensional index in the range 0...grid.size().
    /// Returns None if the cell is outside the grid.
    #[inline]
    pub fn cell_to_index(&self, cell: Cell) -> Option<usize> {
        if self.is_valid_cell(cell) {
            Some(cell.row as usize * self.columns.0 + cell.column as usize)
        } else {
            None
        }
    }

    /// Row major index of a cell that is known to be on the grid.
    #[inline]
    pub(crate) fn index_of(&self, cell: Cell) -> usize {
        debug_assert!(self.is_valid_cell(cell));
        cell.row as usize * self.columns.0 + cell.column as usize
    }

    #[inline]
    pub fn index_to_cell(&self, index: usize) -> Option<Cell> {
        if index < self.size() {
            let row = index / self.columns.0;
            let column = index % self.columns.0;
            Some(Cell::new(row as u32, column as u32))
        } else {
            None
        }
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        let index = rng.gen_range(0..self.size());
        Cell::new((index / self.columns.0) as u32,
                  (index % self.columns.0) as u32)
    }

    pub fn neighbour_at_direction(&self, cell: Cell, direction: CompassPrimary) -> Option<Cell> {
        if !self.is_valid_cell(cell) {
            return None;
        }
        cell.offset(direction)
            .filter(|neighbour| self.is_valid_cell(*neighbour))
    }

    pub fn neighbours_at_directions(&self,
                                    cell: Cell,
                                    dirs: &[CompassPrimary])
                                    -> CellOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(cell, *direction))
            .collect()
    }

    /// Cells that are to the North, South, West or East of a particular cell, in that order.
    /// Walls and passages play no part. A cell outside the grid has no neighbours.
    pub fn contiguous_cells(&self, cell: Cell) -> CellSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(cell, *dir))
            .collect()
    }

    pub fn is_contiguous(&self, a: Cell, b: Cell) -> bool {
        self.is_valid_cell(a) && self.is_valid_cell(b) && a.is_adjacent(b)
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(*self)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(*self)
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;
    use crate::utils;

    fn grid(h: usize, w: usize) -> Grid {
        Grid::new(Height(h), Width(w)).expect("valid grid dimensions")
    }

    #[test]
    fn invalid_dimensions() {
        assert_eq!(Grid::new(Height(0), Width(3)),
                   Err(MazeError::InvalidDimension { height: 0, width: 3 }));
        assert_eq!(Grid::new(Height(3), Width(0)),
                   Err(MazeError::InvalidDimension { height: 3, width: 0 }));
        assert!(Grid::new(Height(usize::MAX), Width(2)).is_err());
        assert!(Grid::new(Height(1), Width(1)).is_ok());
    }

    #[test]
    fn contiguous_cells() {
        let g = grid(10, 10);

        let check_expected_neighbours = |cell, expected_neighbours: &[Cell]| {
            let neighbours: Vec<Cell> = g.contiguous_cells(cell).iter().cloned().sorted().collect();
            let expected: Vec<Cell> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };
        let gc = |r, c| Cell::new(r, c);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(0, 1), gc(1, 0)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(9, 9), &[gc(8, 9), gc(9, 8)]);

        // side element examples
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(1, 1), gc(0, 2)]);
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(2, 0), gc(1, 1)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        // Nothing is next to a cell that is not on the grid
        check_expected_neighbours(gc(10, 3), &[]);
    }

    #[test]
    fn contiguous_cells_order() {
        let g = grid(3, 3);
        assert_eq!(&*g.contiguous_cells(Cell::new(1, 1)),
                   &[Cell::new(0, 1), Cell::new(2, 1), Cell::new(1, 0), Cell::new(1, 2)]);
    }

    #[test]
    fn neighbours_at_dirs() {
        let g = grid(2, 2);
        let gc = |r, c| Cell::new(r, c);

        let check_neighbours = |cell, dirs: &[CompassPrimary], neighbour_opts: &[Option<Cell>]| {
            let neighbour_options = g.neighbours_at_directions(cell, dirs);
            assert_eq!(&*neighbour_options, neighbour_opts);
        };
        check_neighbours(gc(0, 0), &[], &[]);
        check_neighbours(gc(0, 0), &[CompassPrimary::North], &[None]);
        check_neighbours(gc(0, 0), &[CompassPrimary::West, CompassPrimary::North], &[None, None]);
        check_neighbours(gc(0, 0),
                         &[CompassPrimary::East, CompassPrimary::South],
                         &[Some(gc(0, 1)), Some(gc(1, 0))]);
        check_neighbours(gc(1, 1),
                         &[CompassPrimary::South, CompassPrimary::East],
                         &[None, None]);
        check_neighbours(gc(1, 1),
                         &[CompassPrimary::West, CompassPrimary::North],
                         &[Some(gc(1, 0)), Some(gc(0, 1))]);
    }

    #[test]
    fn grid_size() {
        let g = grid(10, 7);
        assert_eq!(g.size(), 70);
        assert_eq!(g.rows(), RowsCount(10));
        assert_eq!(g.columns(), ColumnsCount(7));
    }

    #[test]
    fn cell_as_index() {
        let g = grid(3, 3);
        let indices: Vec<Option<usize>> = g.iter().map(|cell| g.cell_to_index(cell)).collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.cell_to_index(Cell::new(3, 2)), None);
        assert_eq!(g.cell_to_index(Cell::new(2, 3)), None);
        assert_eq!(g.cell_to_index(Cell::new(u32::MAX, u32::MAX)), None);
        assert_eq!(g.index_to_cell(4), Some(Cell::new(1, 1)));
        assert_eq!(g.index_to_cell(9), None);
    }

    #[test]
    fn random_cell() {
        let g = grid(4, 6);
        let mut rng = utils::seeded_rng(7);
        for _ in 0..1000 {
            assert!(g.is_valid_cell(g.random_cell(&mut rng)));
        }
    }

    #[test]
    fn cell_iter() {
        let g = grid(2, 3);
        assert_eq!(g.iter().len(), 6);
        assert_eq!(g.iter().collect::<Vec<Cell>>(),
                   &[Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2),
                     Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)]);
    }

    #[test]
    fn row_iter() {
        let g = grid(2, 2);
        assert_eq!(g.iter_row().len(), 2);
        assert_eq!(g.iter_row().collect::<Vec<Vec<Cell>>>(),
                   &[&[Cell::new(0, 0), Cell::new(0, 1)],
                     &[Cell::new(1, 0), Cell::new(1, 1)]]);
    }

    #[test]
    fn row_iter_counts_down() {
        let g = grid(3, 2);
        let mut rows = g.iter_row();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.nth(2), Some(vec![Cell::new(2, 0), Cell::new(2, 1)]));
        assert_eq!(rows.len(), 0);
        assert_eq!(rows.next(), None);
    }
}
