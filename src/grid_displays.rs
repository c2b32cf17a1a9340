use std::fmt;

use crate::cells::{Cell, CompassPrimary};
use crate::maze::Maze;
use crate::pathing::{Distances, Path, PathMarker, PathMarkers};
use crate::units::{ColumnsCount, RowsCount};

/// Decides what is drawn inside each cell when a maze is rendered as text.
/// Every cell body is three characters wide.
pub trait GridDisplay {
    fn render_cell_body(&self, _cell: Cell) -> String {
        String::from("   ")
    }
}

impl GridDisplay for Distances {
    fn render_cell_body(&self, cell: Cell) -> String {
        if let Some(d) = self.distance_from_start_to(cell) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

/// Shows the start, end and every step between of a solved path.
#[derive(Debug)]
pub struct PathDisplay {
    markers: PathMarkers,
}

impl PathDisplay {
    pub fn new(path: &Path) -> Self {
        PathDisplay { markers: path.markers() }
    }

    pub fn from_markers(markers: PathMarkers) -> Self {
        PathDisplay { markers }
    }
}

impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, cell: Cell) -> String {
        match self.markers.get(&cell) {
            Some(PathMarker::Start) => String::from(" S "),
            Some(PathMarker::End) => String::from(" E "),
            Some(PathMarker::Path) => String::from(" . "),
            None => String::from("   "),
        }
    }
}

/// A maze paired with the cell body renderer to draw it with.
pub struct MazeDisplay<'a> {
    maze: &'a Maze,
    displayer: Option<&'a dyn GridDisplay>,
}

impl Maze {
    pub fn display_with<'a>(&'a self, displayer: &'a dyn GridDisplay) -> MazeDisplay<'a> {
        MazeDisplay { maze: self, displayer: Some(displayer) }
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&MazeDisplay { maze: self, displayer: None }, f)
    }
}

impl<'a> fmt::Display for MazeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";

        let maze = self.maze;
        let grid = maze.grid();
        let ColumnsCount(columns_count) = grid.columns();
        let RowsCount(rows_count) = grid.rows();

        let cell_body = |cell: Cell| match self.displayer {
            Some(displayer) => displayer.render_cell_body(cell),
            None => String::from("   "),
        };

        // The north most boundary is the only one not drawn as the bottom of some row
        let mut output = String::from(WALL_RD);
        if let Some(first_grid_row) = grid.iter_row().next() {
            for (index, cell) in first_grid_row.iter().enumerate() {
                output.push_str(WALL_LR_3);
                if maze.is_neighbour_linked(*cell, CompassPrimary::East) {
                    output.push_str(WALL_LR);
                } else if index == columns_count - 1 {
                    output.push_str(WALL_LD);
                } else {
                    output.push_str(WALL_LRD);
                }
            }
        }
        output.push('\n');

        for (index_row, row) in grid.iter_row().enumerate() {

            let is_last_row = index_row == rows_count - 1;

            // The top of each cell is the bottom of the row above
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for (index_column, cell) in row.into_iter().enumerate() {

                let render_cell_side = |direction, passage_clear_text, blocking_wall_text| {
                    if maze.is_neighbour_linked(cell, direction) {
                        passage_clear_text
                    } else {
                        blocking_wall_text
                    }
                };
                let is_first_column = index_column == 0;
                let is_last_column = index_column == columns_count - 1;
                let east_open = maze.is_neighbour_linked(cell, CompassPrimary::East);
                let south_open = maze.is_neighbour_linked(cell, CompassPrimary::South);

                row_middle_section_render.push_str(&cell_body(cell));
                row_middle_section_render.push_str(render_cell_side(CompassPrimary::East, " ", WALL_UD));

                if is_first_column {
                    row_bottom_section_render.push_str(if is_last_row {
                        WALL_RU
                    } else if south_open {
                        WALL_UD
                    } else {
                        WALL_RUD
                    });
                }
                row_bottom_section_render.push_str(render_cell_side(CompassPrimary::South, "   ", WALL_LR_3));

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let access_se_from_east =
                            grid.neighbour_at_direction(cell, CompassPrimary::East)
                                .map_or(false, |c| maze.is_neighbour_linked(c, CompassPrimary::South));
                        let access_se_from_south =
                            grid.neighbour_at_direction(cell, CompassPrimary::South)
                                .map_or(false, |c| maze.is_neighbour_linked(c, CompassPrimary::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
