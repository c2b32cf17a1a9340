use std::fmt;

use crate::cells::{Cell, CellSmallVec, CompassPrimary};
use crate::errors::{MazeError, Result};
use crate::grid::Grid;
use crate::grid_iterators::CellIter;
use crate::units::{Height, Width};

/// A rectangular maze: grid cells joined by passages, anything else being a wall.
///
/// The passages form an undirected relation between orthogonally adjacent cells. The relation
/// is only ever opened up through `remove_wall`, which `empty` also goes through, and walled
/// off by `add_wall` or `fill`, so it stays symmetric.
#[derive(Clone, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    // Indexed by the row major index of the cell. At most 4 neighbours each.
    neighbours: Vec<CellSmallVec>,
}

impl Maze {
    /// A fully walled maze, no cell can reach any other.
    pub fn new(height: Height, width: Width) -> Result<Maze> {
        let grid = Grid::new(height, width)?;
        Ok(Maze {
            grid,
            neighbours: vec![CellSmallVec::new(); grid.size()],
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.grid.height()
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.grid.width()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Put back every wall.
    pub fn fill(&mut self) {
        for links in self.neighbours.iter_mut() {
            links.clear();
        }
    }

    /// Knock down every wall inside the border of the maze.
    pub fn empty(&mut self) {
        for cell in self.grid.iter() {
            for &dir in [CompassPrimary::East, CompassPrimary::South].iter() {
                if let Some(next) = self.grid.neighbour_at_direction(cell, dir) {
                    let opened = self.remove_wall(cell, next);
                    debug_assert!(opened.is_ok());
                }
            }
        }
    }

    /// Build a wall between two cells, removing any passage joining them.
    ///
    /// Idempotent. Cells that are not next to each other never have a passage so there is
    /// nothing to do for them.
    pub fn add_wall(&mut self, a: Cell, b: Cell) -> Result<()> {
        let (a_index, b_index) = self.checked_indices(a, b)?;
        self.neighbours[a_index].retain(|c| *c != b);
        self.neighbours[b_index].retain(|c| *c != a);
        Ok(())
    }

    /// Knock down the wall between two adjacent cells, making a passage.
    ///
    /// Idempotent. Also repairs a passage that was only recorded in one direction.
    pub fn remove_wall(&mut self, a: Cell, b: Cell) -> Result<()> {
        let (a_index, b_index) = self.checked_indices(a, b)?;
        if !a.is_adjacent(b) {
            return Err(MazeError::NotAdjacent(a, b));
        }
        if !self.neighbours[a_index].contains(&b) {
            self.neighbours[a_index].push(b);
        }
        if !self.neighbours[b_index].contains(&a) {
            self.neighbours[b_index].push(a);
        }
        Ok(())
    }

    /// Every cell of the maze in row major order.
    #[inline]
    pub fn cells(&self) -> CellIter {
        self.grid.iter()
    }

    /// Cells orthogonally next to `cell`, ignoring walls.
    #[inline]
    pub fn contiguous_cells(&self, cell: Cell) -> CellSmallVec {
        self.grid.contiguous_cells(cell)
    }

    /// Cells joined to `cell` by a passage.
    pub fn reachable_cells(&self, cell: Cell) -> Result<&[Cell]> {
        self.grid
            .cell_to_index(cell)
            .map(|index| &*self.neighbours[index])
            .ok_or(MazeError::OutOfBounds(cell))
    }

    /// Are two cells joined by a passage?
    pub fn is_linked(&self, a: Cell, b: Cell) -> bool {
        self.grid
            .cell_to_index(a)
            .map_or(false, |index| self.neighbours[index].contains(&b))
    }

    pub fn is_neighbour_linked(&self, cell: Cell, direction: CompassPrimary) -> bool {
        self.grid
            .neighbour_at_direction(cell, direction)
            .map_or(false, |neighbour| self.is_linked(cell, neighbour))
    }

    /// Every wall still standing between two cells, each reported once as a pair of a cell and
    /// the cell to its east or south. Row major order, east before south.
    pub fn walls(&self) -> Vec<(Cell, Cell)> {
        let mut walls = Vec::with_capacity(2 * self.size());
        for cell in self.cells() {
            for &dir in [CompassPrimary::East, CompassPrimary::South].iter() {
                if let Some(next) = self.grid.neighbour_at_direction(cell, dir) {
                    if !self.is_linked(cell, next) {
                        walls.push((cell, next));
                    }
                }
            }
        }
        walls
    }

    /// Every passage, each reported once with the row major smaller cell first.
    pub fn iter_passages<'a>(&'a self) -> impl Iterator<Item = (Cell, Cell)> + 'a {
        self.cells().flat_map(move |cell| {
            self.neighbours[self.index(cell)]
                .iter()
                .filter(move |&&other| other > cell)
                .map(move |&other| (cell, other))
        })
    }

    pub fn passages_count(&self) -> usize {
        let directed: usize = self.neighbours.iter().map(|links| links.len()).sum();
        directed / 2
    }

    /// Check that every passage is recorded from both ends and only joins adjacent cells.
    pub fn check_consistency(&self) -> Result<()> {
        for cell in self.cells() {
            for &neighbour in self.neighbours[self.index(cell)].iter() {
                let symmetric = self.is_linked(neighbour, cell);
                if !symmetric || !self.grid.is_contiguous(cell, neighbour) {
                    return Err(MazeError::InconsistentStructure { cell, neighbour });
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_ok()
    }

    /// Record a passage only from `a` to `b`, leaving the maze inconsistent.
    #[cfg(test)]
    pub(crate) fn link_one_way(&mut self, a: Cell, b: Cell) {
        let a_index = self.index(a);
        self.neighbours[a_index].push(b);
    }

    fn checked_indices(&self, a: Cell, b: Cell) -> Result<(usize, usize)> {
        let a_index = self.grid.cell_to_index(a).ok_or(MazeError::OutOfBounds(a))?;
        let b_index = self.grid.cell_to_index(b).ok_or(MazeError::OutOfBounds(b))?;
        Ok((a_index, b_index))
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        self.grid.index_of(cell)
    }
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let consistency = match self.check_consistency() {
            Ok(()) => String::from("consistent"),
            Err(e) => e.to_string(),
        };
        write!(f, "Maze :: rows: {:?}, columns: {:?}, passages: {:?}, structure: {}",
               self.grid.rows().0, self.grid.columns().0, self.passages_count(), consistency)
    }
}
