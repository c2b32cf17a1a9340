use bit_set::BitSet;
use log::debug;
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::cells::{Cell, CompassPrimary};
use crate::errors::{MazeError, Result};
use crate::maze::Maze;
use crate::utils;
use crate::utils::FnvHashMap;

/// What a cell is to a solved path.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum PathMarker {
    Start,
    End,
    Path,
}

pub type PathMarkers = FnvHashMap<Cell, PathMarker>;

/// A route through a maze, made of cells joined one to the next by passages.
///
/// Never empty, the start and end are the same cell for a route that goes nowhere.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    fn new(cells: Vec<Cell>) -> Path {
        debug_assert!(!cells.is_empty());
        Path { cells }
    }

    #[inline]
    pub fn start(&self) -> Cell {
        self.cells[0]
    }

    #[inline]
    pub fn end(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// The cells in the order they are walked, start first.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of moves from the start to the end.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every cell on the path with its marker. The end marker wins over the start marker when
    /// the path goes nowhere.
    pub fn markers(&self) -> PathMarkers {
        let mut markers = utils::fnv_hashmap(self.cells.len());
        for &cell in &self.cells {
            markers.insert(cell, PathMarker::Path);
        }
        markers.insert(self.start(), PathMarker::Start);
        markers.insert(self.end(), PathMarker::End);
        markers
    }
}

#[derive(Copy, Clone, Debug)]
enum Frontier {
    Stack,
    Queue,
}

/// Depth first search for a route from `start` to `stop`. Any route will do, it need not be short.
pub fn solve_dfs(maze: &Maze, start: Cell, stop: Cell) -> Result<Path> {
    search(maze, start, stop, Frontier::Stack)
}

/// Breadth first search for a shortest route from `start` to `stop`.
pub fn solve_bfs(maze: &Maze, start: Cell, stop: Cell) -> Result<Path> {
    search(maze, start, stop, Frontier::Queue)
}

fn search(maze: &Maze, start: Cell, stop: Cell, frontier_type: Frontier) -> Result<Path> {
    let grid = maze.grid();
    grid.check_cell(start)?;
    grid.check_cell(stop)?;

    let cells_count = maze.size();
    let mut marked = BitSet::with_capacity(cells_count);
    // The start is its own predecessor
    let mut predecessors = utils::fnv_hashmap::<Cell, Cell>(cells_count);
    predecessors.insert(start, start);
    marked.insert(grid.index_of(start));

    let mut frontier = VecDeque::new();
    frontier.push_back(start);
    let mut found = false;

    loop {
        let next_cell = match frontier_type {
            Frontier::Stack => frontier.pop_back(),
            Frontier::Queue => frontier.pop_front(),
        };
        let cell = match next_cell {
            Some(cell) => cell,
            None => break,
        };

        if cell == stop {
            found = true;
            break;
        }

        for &link in maze.reachable_cells(cell)? {
            let link_index = grid.cell_to_index(link).ok_or(MazeError::OutOfBounds(link))?;
            if marked.insert(link_index) {
                predecessors.insert(link, cell);
                frontier.push_back(link);
            }
        }
    }

    if !found {
        debug!("{:?} search: no route from {} to {} after marking {} cells",
               frontier_type, start, stop, marked.len());
        return Err(MazeError::Disconnected { from: start, to: stop });
    }

    let mut cells = vec![stop];
    let mut current = stop;
    while current != start {
        current = *predecessors.get(&current)
                               .ok_or(MazeError::Disconnected { from: start, to: stop })?;
        cells.push(current);
    }
    cells.reverse();

    debug!("{:?} search: route from {} to {} of {} moves after marking {} cells",
           frontier_type, start, stop, cells.len() - 1, marked.len());
    Ok(Path::new(cells))
}

/// The default number of moves the wall follower may make before giving up.
/// A walk around a perfect maze covers every passage twice, well within this.
pub fn default_step_limit(maze: &Maze) -> usize {
    4 * maze.size()
}

/// Keep your right hand on the wall until you reach `stop`.
///
/// Only certain to work on perfect mazes, see `solve_wall_follower_bounded`.
pub fn solve_wall_follower(maze: &Maze, start: Cell, stop: Cell) -> Result<Path> {
    solve_wall_follower_bounded(maze, start, stop, default_step_limit(maze))
}

/// Right hand rule maze solving. At each cell try turning right, then straight on, then left and
/// finally turning back, taking the first direction with a passage.
/// The first move is made as if walking east into the start cell, so south is tried first.
///
/// The path returned is every move made, including doubling back out of dead ends. A maze with
/// loops, or with `stop` out of reach, can have the walker going round forever, hence the limit on
/// the number of moves, failing with `StepLimitExceeded`. A start cell with no passages fails
/// with `Disconnected`.
pub fn solve_wall_follower_bounded(maze: &Maze,
                                   start: Cell,
                                   stop: Cell,
                                   max_steps: usize)
                                   -> Result<Path> {
    let grid = maze.grid();
    grid.check_cell(start)?;
    grid.check_cell(stop)?;

    let mut walk = vec![start];
    let mut current = start;
    let mut heading = CompassPrimary::East;

    while current != stop {
        let steps = walk.len() - 1;
        if steps >= max_steps {
            return Err(MazeError::StepLimitExceeded { steps });
        }

        let candidates = [heading.turn_right(), heading, heading.turn_left(), heading.reverse()];
        let next_move = candidates.iter()
            .cloned()
            .filter_map(|dir| grid.neighbour_at_direction(current, dir).map(|cell| (dir, cell)))
            .find(|&(_, cell)| maze.is_linked(current, cell));

        match next_move {
            Some((dir, cell)) => {
                heading = dir;
                current = cell;
                walk.push(cell);
            }
            None => return Err(MazeError::Disconnected { from: start, to: stop }),
        }
    }

    debug!("wall follower: {} to {} in {} moves", start, stop, walk.len() - 1);
    Ok(Path::new(walk))
}

/// Flood fill distances from a start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_cell: Cell,
    distances: FnvHashMap<Cell, usize>,
    max_distance: usize,
}

impl Distances {
    pub fn new(maze: &Maze, start_cell: Cell) -> Result<Distances> {
        maze.grid().check_cell(start_cell)?;

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(maze.size());
        distances.insert(start_cell, 0);

        // We don't have any weights on the passages to consider, every step is just one from the
        // previous cell, so the first distance recorded for a cell is already the shortest.
        // The distances map doubles as the visited set.
        let mut frontier = vec![start_cell];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell in &frontier {
                let distance_to_cell = distances[cell];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link in maze.reachable_cells(*cell)? {
                    if !distances.contains_key(link) {
                        distances.insert(*link, distance_to_cell + 1);
                        new_frontier.push(*link);
                    }
                }
            }
            frontier = new_frontier;
        }

        Ok(Distances {
            start_cell,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cell {
        self.start_cell
    }

    #[inline(always)]
    pub fn max(&self) -> usize {
        self.max_distance
    }

    /// None if the cell cannot be reached from the start.
    #[inline(always)]
    pub fn distance_from_start_to(&self, cell: Cell) -> Option<usize> {
        self.distances.get(&cell).cloned()
    }

    /// The cells at the greatest distance from the start, in row major order.
    pub fn furthest_points(&self) -> SmallVec<[Cell; 8]> {
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == self.max_distance)
            .map(|(cell, _)| *cell)
            .collect::<SmallVec<[Cell; 8]>>();
        furthest.sort();
        furthest
    }
}

/// Walk downhill through the distances from `end_point` back to the start of the distances.
/// None if the end point cannot be reached.
pub fn shortest_path(maze: &Maze, distances_from_start: &Distances, end_point: Cell) -> Option<Path> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let start = distances_from_start.start();
    let mut path = vec![end_point];
    let mut current_cell = end_point;

    while current_cell != start {
        let closer = maze.reachable_cells(current_cell)
            .ok()?
            .iter()
            .cloned()
            .filter_map(|cell| {
                distances_from_start.distance_from_start_to(cell).map(|distance| (cell, distance))
            })
            .min_by_key(|&(_, distance)| distance);

        match closer {
            Some((closer_cell, closer_distance)) if closer_distance < current_distance => {
                current_cell = closer_cell;
                current_distance = closer_distance;
                path.push(current_cell);
            }
            // No way downhill, the distances must be for some other maze.
            _ => return None,
        }
    }

    path.reverse();
    Some(Path::new(path))
}

/// Finds the longest route in a perfect maze: the point furthest from an arbitrary start is one
/// end of it, and the point furthest from that the other.
/// For mazes with loops or unreachable areas this is only some long path.
pub fn longest_path(maze: &Maze) -> Result<Path> {
    let first_distances = Distances::new(maze, Cell::new(0, 0))?;
    let long_path_start = first_distances.furthest_points()[0];

    let distances_from_start = Distances::new(maze, long_path_start)?;
    let end_point = distances_from_start.furthest_points()[0];

    shortest_path(maze, &distances_from_start, end_point)
        .ok_or(MazeError::Disconnected { from: long_path_start, to: end_point })
}
