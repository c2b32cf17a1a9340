use bit_set::BitSet;
use itertools::Itertools;
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cells::{Cell, CellSmallVec, CompassPrimary};
use crate::errors::{MazeError, Result};
use crate::maze::Maze;
use crate::units::{Height, RowsCount, Width};
use crate::utils;

/// The maze generation algorithms on offer.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Algorithm {
    BinaryTree,
    Sidewinder,
    Fusion,
    Backtracker,
    Wilson,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [Algorithm::BinaryTree,
                                     Algorithm::Sidewinder,
                                     Algorithm::Fusion,
                                     Algorithm::Backtracker,
                                     Algorithm::Wilson];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BinaryTree => "binary tree",
            Algorithm::Sidewinder => "sidewinder",
            Algorithm::Fusion => "fusion",
            Algorithm::Backtracker => "backtracker",
            Algorithm::Wilson => "wilson",
        }
    }

    /// Wall up the maze and carve out a new one.
    pub fn apply<R: Rng + ?Sized>(self, maze: &mut Maze, rng: &mut R) -> Result<()> {
        match self {
            Algorithm::BinaryTree => binary_tree(maze, rng),
            Algorithm::Sidewinder => sidewinder(maze, rng),
            Algorithm::Fusion => fusion(maze, rng),
            Algorithm::Backtracker => backtracker(maze, rng),
            Algorithm::Wilson => wilson(maze, rng),
        }
    }

    pub fn generate<R: Rng + ?Sized>(self, height: Height, width: Width, rng: &mut R) -> Result<Maze> {
        let mut maze = Maze::new(height, width)?;
        self.apply(&mut maze, rng)?;
        debug!("{} maze {}x{} generated with {} passages",
               self.name(), height.0, width.0, maze.passages_count());
        Ok(maze)
    }
}

pub fn gen_binary_tree<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Result<Maze> {
    Algorithm::BinaryTree.generate(height, width, rng)
}

pub fn gen_sidewinder<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Result<Maze> {
    Algorithm::Sidewinder.generate(height, width, rng)
}

pub fn gen_fusion<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Result<Maze> {
    Algorithm::Fusion.generate(height, width, rng)
}

pub fn gen_backtracker<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Result<Maze> {
    Algorithm::Backtracker.generate(height, width, rng)
}

pub fn gen_wilson<R: Rng + ?Sized>(height: Height, width: Width, rng: &mut R) -> Result<Maze> {
    Algorithm::Wilson.generate(height, width, rng)
}

/// Apply the binary tree maze generation algorithm to a maze.
/// It works simply by visiting each cell in the grid and choosing to carve a passage
/// either south or east.
/// The two directions are fixed for the whole run, otherwise we would get areas with no way in or
/// out and not a perfect maze. The bottom row ends up as one long corridor heading east and the
/// rightmost column as one long corridor heading south.
pub fn binary_tree<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    maze.fill();
    let grid = *maze.grid();
    let neighbours_to_check = [CompassPrimary::South, CompassPrimary::East];

    for cell in grid.iter() {
        let neighbours = grid.neighbours_at_directions(cell, &neighbours_to_check)
                             .into_iter()
                             .flatten()
                             .collect::<CellSmallVec>();

        // Unless there are no neighbours (the south east corner), randomly choose a neighbour to connect.
        if let Some(&link_cell) = neighbours.choose(rng) {
            maze.remove_wall(cell, link_cell)?;
        }
    }
    Ok(())
}

/// Apply the sidewinder maze generation algorithm to a maze.
/// Works on the rows from the top, moving east along each row. A coin flip either carves east,
/// growing the current run of cells, or closes the run by carving south from a random member
/// of the run. The last cell of a row always closes the run.
/// The bottom row cannot carve south so it is a single corridor, which joins every run above it.
pub fn sidewinder<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    maze.fill();
    let grid = *maze.grid();
    let RowsCount(rows_count) = grid.rows();

    for (row_index, row) in grid.iter_row().enumerate() {

        if row_index + 1 == rows_count {
            for (&west, &east) in row.iter().tuple_windows() {
                maze.remove_wall(west, east)?;
            }
            break;
        }

        let mut run = Vec::with_capacity(row.len());
        let last_column = row.len() - 1;

        for (column_index, &cell) in row.iter().enumerate() {
            run.push(cell);

            let carve_east = column_index < last_column && rng.gen::<bool>(); // coin flip
            if carve_east {
                maze.remove_wall(cell, row[column_index + 1])?;
            } else {
                if let Some(&run_member) = run.choose(rng) {
                    if let Some(below) = grid.neighbour_at_direction(run_member, CompassPrimary::South) {
                        maze.remove_wall(run_member, below)?;
                    }
                }
                run.clear();
            }
        }
    }
    Ok(())
}

/// Randomised Kruskal style generation.
/// Every cell starts with its own label. The walls are visited in random order and a wall comes
/// down only if the cells either side of it carry different labels, after which the two labelled
/// regions are merged. Equal labels always mean the cells are already connected, so no loops
/// are made.
pub fn fusion<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    maze.fill();
    let grid = *maze.grid();
    let mut labels: Vec<usize> = (0..grid.size()).collect();

    let mut walls = maze.walls();
    walls.shuffle(rng);

    for (a, b) in walls {
        let keep_label = labels[grid.index_of(a)];
        let old_label = labels[grid.index_of(b)];

        if keep_label != old_label {
            maze.remove_wall(a, b)?;
            for label in labels.iter_mut().filter(|label| **label == old_label) {
                *label = keep_label;
            }
        }
    }
    Ok(())
}

/// Randomised depth first exploration, the recursive backtracker with an explicit stack.
/// From the cell on top of the stack carve into a random unvisited neighbour and push it, or pop
/// the cell when all its neighbours have been visited.
pub fn backtracker<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    maze.fill();
    let grid = *maze.grid();
    let mut visited = BitSet::with_capacity(grid.size());

    let start = grid.random_cell(rng);
    visited.insert(grid.index_of(start));
    let mut stack = vec![start];

    while let Some(&top) = stack.last() {
        let unvisited = grid.contiguous_cells(top)
                            .into_iter()
                            .filter(|cell| !visited.contains(grid.index_of(*cell)))
                            .collect::<CellSmallVec>();

        if let Some(&next) = unvisited.choose(rng) {
            maze.remove_wall(top, next)?;
            visited.insert(grid.index_of(next));
            stack.push(next);
        } else {
            stack.pop();
        }
    }
    Ok(())
}

/// Wilson's algorithm, loop erased random walks.
/// One random cell starts off as the maze. Then from a random cell not yet in the maze, walk at
/// random until hitting the maze, cutting out any loop the walk makes as soon as it is made.
/// The walk, now a simple path, is carved and becomes part of the maze. Repeat until all the
/// cells are in the maze.
///
/// Unbiased: every spanning tree of the grid is equally likely. Slow to start off with as the
/// first walks have only a small target to hit.
pub fn wilson<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    maze.fill();
    let grid = *maze.grid();
    let cells_count = grid.size();

    let mut in_maze = BitSet::with_capacity(cells_count);
    let first = grid.random_cell(rng);
    in_maze.insert(grid.index_of(first));

    let mut remaining = grid.iter().filter(|&cell| cell != first).collect::<Vec<Cell>>();

    // The walk never repeats a cell so it can never outgrow the grid.
    let mut walk: Vec<Cell> = Vec::with_capacity(cells_count);
    let mut walk_positions = utils::fnv_hashmap::<Cell, usize>(cells_count);

    while let Some(&start) = remaining.choose(rng) {
        walk.clear();
        walk_positions.clear();

        let mut current = start;
        let mut steps = 0usize;
        while !in_maze.contains(grid.index_of(current)) {

            // Loop erasure
            if let Some(&loop_start) = walk_positions.get(&current) {
                for erased in walk.drain(loop_start..) {
                    walk_positions.remove(&erased);
                }
            }
            walk_positions.insert(current, walk.len());
            walk.push(current);
            debug_assert!(walk.len() <= cells_count, "loop erased walk longer than the grid");

            current = match grid.contiguous_cells(current).choose(rng) {
                Some(&next) => next,
                None => return Err(MazeError::Disconnected { from: start, to: first }),
            };
            steps += 1;
        }
        walk.push(current);

        for cell in &walk {
            in_maze.insert(grid.index_of(*cell));
        }
        for (&a, &b) in walk.iter().tuple_windows() {
            maze.remove_wall(a, b)?;
        }
        trace!("wilson walk from {} took {} steps, carved {} passages", start, steps, walk.len() - 1);

        remaining.retain(|cell| !in_maze.contains(grid.index_of(*cell)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {

    use quickcheck::quickcheck;
    use std::collections::VecDeque;

    use super::*;
    use crate::utils::seeded_rng;

    fn reachable_count(maze: &Maze, from: Cell) -> usize {
        let mut seen = BitSet::with_capacity(maze.size());
        let mut queue = VecDeque::new();
        seen.insert(maze.grid().index_of(from));
        queue.push_back(from);
        while let Some(cell) = queue.pop_front() {
            for &next in maze.reachable_cells(cell).unwrap() {
                if seen.insert(maze.grid().index_of(next)) {
                    queue.push_back(next);
                }
            }
        }
        seen.len()
    }

    fn is_spanning_tree(maze: &Maze) -> bool {
        maze.is_consistent() &&
        maze.passages_count() == maze.size() - 1 &&
        reachable_count(maze, Cell::new(0, 0)) == maze.size()
    }

    fn small_dimensions(h: u8, w: u8) -> (Height, Width) {
        (Height(1 + (h % 9) as usize), Width(1 + (w % 9) as usize))
    }

    #[test]
    fn every_algorithm_makes_spanning_trees() {
        fn p(seed: u64, h: u8, w: u8) -> bool {
            let (height, width) = small_dimensions(h, w);
            let mut rng = seeded_rng(seed);
            Algorithm::ALL.iter().all(|algorithm| {
                let maze = algorithm.generate(height, width, &mut rng).unwrap();
                is_spanning_tree(&maze)
            })
        }
        quickcheck(p as fn(u64, u8, u8) -> bool)
    }

    #[test]
    fn every_algorithm_keeps_passages_local() {
        fn p(seed: u64, h: u8, w: u8) -> bool {
            let (height, width) = small_dimensions(h, w);
            let mut rng = seeded_rng(seed);
            Algorithm::ALL.iter().all(|algorithm| {
                let maze = algorithm.generate(height, width, &mut rng).unwrap();
                maze.iter_passages().all(|(a, b)| a.is_adjacent(b)) &&
                maze.cells().all(|a| {
                    maze.reachable_cells(a).unwrap().iter().all(|&b| maze.is_linked(b, a))
                })
            })
        }
        quickcheck(p as fn(u64, u8, u8) -> bool)
    }

    #[test]
    fn same_seed_same_maze() {
        for algorithm in Algorithm::ALL.iter() {
            let a = algorithm.generate(Height(7), Width(5), &mut seeded_rng(99)).unwrap();
            let b = algorithm.generate(Height(7), Width(5), &mut seeded_rng(99)).unwrap();
            assert_eq!(a, b, "{} is not reproducible", algorithm.name());
        }
    }

    #[test]
    fn regeneration_starts_from_a_walled_maze() {
        let mut rng = seeded_rng(5);
        let mut maze = Maze::new(Height(6), Width(6)).unwrap();
        maze.empty();
        for algorithm in Algorithm::ALL.iter() {
            algorithm.apply(&mut maze, &mut rng).unwrap();
            assert!(is_spanning_tree(&maze), "{} kept old passages", algorithm.name());
        }
    }

    #[test]
    fn fill_after_generation_removes_every_passage() {
        let mut rng = seeded_rng(11);
        for algorithm in Algorithm::ALL.iter() {
            let mut maze = algorithm.generate(Height(5), Width(8), &mut rng).unwrap();
            maze.fill();
            assert_eq!(maze.passages_count(), 0);
            assert_eq!(maze, Maze::new(Height(5), Width(8)).unwrap());
        }
    }

    #[test]
    fn single_cell_mazes() {
        let mut rng = seeded_rng(1);
        for algorithm in Algorithm::ALL.iter() {
            let maze = algorithm.generate(Height(1), Width(1), &mut rng).unwrap();
            assert_eq!(maze.passages_count(), 0);
        }
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let mut rng = seeded_rng(1);
        assert_eq!(gen_wilson(Height(0), Width(4), &mut rng),
                   Err(MazeError::InvalidDimension { height: 0, width: 4 }));
        assert_eq!(gen_sidewinder(Height(4), Width(0), &mut rng),
                   Err(MazeError::InvalidDimension { height: 4, width: 0 }));
    }

    #[test]
    fn binary_tree_3x3() {
        for seed in 0..20 {
            let maze = gen_binary_tree(Height(3), Width(3), &mut seeded_rng(seed)).unwrap();
            assert_eq!(maze.passages_count(), 8);
            assert!(is_spanning_tree(&maze));

            // bottom row runs east, right column runs south
            let gc = |r, c| Cell::new(r, c);
            assert!(maze.is_linked(gc(2, 0), gc(2, 1)));
            assert!(maze.is_linked(gc(2, 1), gc(2, 2)));
            assert!(maze.is_linked(gc(0, 2), gc(1, 2)));
            assert!(maze.is_linked(gc(1, 2), gc(2, 2)));

            // every other cell carved exactly one of south or east
            for cell in maze.cells().filter(|c| c.row < 2 && c.column < 2) {
                let south = maze.is_neighbour_linked(cell, CompassPrimary::South);
                let east = maze.is_neighbour_linked(cell, CompassPrimary::East);
                assert!(south != east);
            }
        }
    }

    #[test]
    fn sidewinder_bottom_row_is_a_corridor() {
        let mut rng = seeded_rng(3);
        let maze = gen_sidewinder(Height(6), Width(7), &mut rng).unwrap();
        for column in 0..6 {
            assert!(maze.is_neighbour_linked(Cell::new(5, column), CompassPrimary::East));
        }
    }

    #[test]
    fn sidewinder_top_row_runs_each_exit_south_once() {
        let mut rng = seeded_rng(8);
        let maze = gen_sidewinder(Height(5), Width(5), &mut rng).unwrap();
        let top_row_south_exits = (0..5)
            .filter(|&c| maze.is_neighbour_linked(Cell::new(0, c), CompassPrimary::South))
            .count();
        let top_row_east_passages = (0..4)
            .filter(|&c| maze.is_neighbour_linked(Cell::new(0, c), CompassPrimary::East))
            .count();
        // each run closes with exactly one south exit
        assert_eq!(top_row_south_exits + top_row_east_passages, 5);
    }

    #[test]
    fn sidewinder_single_row_and_column() {
        let mut rng = seeded_rng(4);
        let row = gen_sidewinder(Height(1), Width(6), &mut rng).unwrap();
        assert!(is_spanning_tree(&row));
        assert!(row.walls().is_empty());

        let column = gen_sidewinder(Height(6), Width(1), &mut rng).unwrap();
        assert!(is_spanning_tree(&column));
        assert!(column.walls().is_empty());
    }

    #[test]
    fn wilson_marks_every_cell() {
        let mut rng = seeded_rng(21);
        let maze = gen_wilson(Height(12), Width(9), &mut rng).unwrap();
        assert!(is_spanning_tree(&maze));
        assert!(maze.cells().all(|cell| !maze.reachable_cells(cell).unwrap().is_empty()));
    }

    #[test]
    fn wilson_covers_every_spanning_tree_of_a_square() {
        // A 2x2 grid has exactly 4 spanning trees, one per missing passage.
        let mut rng = seeded_rng(0);
        let mut seen = utils::fnv_hashset::<Vec<(Cell, Cell)>>(4);
        for _ in 0..200 {
            let maze = gen_wilson(Height(2), Width(2), &mut rng).unwrap();
            seen.insert(maze.walls());
        }
        assert_eq!(seen.len(), 4);
    }
}
