//! **mazes** is a rectangular maze generation, route finding and measuring library.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod maze;
pub mod metrics;
pub mod pathing;
pub mod units;
pub mod utils;

pub use crate::cells::Cell;
pub use crate::errors::{MazeError, Result};
pub use crate::maze::Maze;
