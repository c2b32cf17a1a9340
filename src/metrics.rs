//! Measurements of a maze's shape.

use crate::cells::Cell;
use crate::errors::{MazeError, Result};
use crate::maze::Maze;
use crate::pathing::{self, Distances};

/// Length of the shortest passage route between two cells. Fails with `Disconnected` if there
/// is no route.
pub fn distance_geo(maze: &Maze, a: Cell, b: Cell) -> Result<usize> {
    pathing::solve_bfs(maze, a, b).map(|path| path.len())
}

/// Grid distance between two cells, as if there were no walls.
pub fn distance_man(a: Cell, b: Cell) -> usize {
    let rows = (a.row as i64 - b.row as i64).abs();
    let columns = (a.column as i64 - b.column as i64).abs();
    (rows + columns) as usize
}

/// Cells with only one way in or out, row major order.
pub fn dead_ends(maze: &Maze) -> Vec<Cell> {
    maze.cells()
        .filter(|cell| maze.reachable_cells(*cell).map_or(false, |links| links.len() == 1))
        .collect()
}

pub fn dead_end_count(maze: &Maze) -> usize {
    dead_ends(maze).len()
}

/// The furthest any dead end is from `origin`, following passages. 0 if there are no dead ends.
/// Fails with `Disconnected` when a dead end cannot be reached from `origin`.
pub fn worst_path_len(maze: &Maze, origin: Cell) -> Result<usize> {
    let distances = Distances::new(maze, origin)?;

    dead_ends(maze)
        .into_iter()
        .map(|dead_end| {
            distances.distance_from_start_to(dead_end)
                     .ok_or(MazeError::Disconnected { from: origin, to: dead_end })
        })
        .try_fold(0, |worst, distance| distance.map(|d| worst.max(d)))
}
