use docopt::Docopt;
use error_chain::bail;
use log::info;
use mazes::{
    cells::Cell,
    generators::Algorithm,
    grid_displays::PathDisplay,
    maze::Maze,
    metrics,
    pathing::{self, Distances, Path},
    units::{Height, Width},
    utils,
};
use serde_derive::Deserialize;

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [(binary|sidewinder|fusion|backtracker|wilson)] [--height=<h>] [--width=<w>] [--seed=<n>] [--solve=<solver>] [--show-distances] [--stats]

Options:
    -h --help           Show this screen.
    --height=<h>        Number of rows in the maze [default: 8].
    --width=<w>         Number of columns in the maze [default: 8].
    --seed=<n>          Seed for the random number generator. Picked at random if not given.
    --solve=<solver>    Show a route from the top left to the bottom right cell found with dfs, bfs or wall-follower.
    --show-distances    Show the distance from the top left cell to every other cell.
    --stats             Print the passage count, dead end count, worst path length from the top left cell and the longest path length.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_binary: bool,
    cmd_sidewinder: bool,
    cmd_fusion: bool,
    cmd_backtracker: bool,
    cmd_wilson: bool,
    flag_height: usize,
    flag_width: usize,
    flag_seed: Option<u64>,
    flag_solve: Option<String>,
    flag_show_distances: bool,
    flag_stats: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Maze(::mazes::errors::MazeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    logger_builder(env_logger::DEFAULT_FILTER_ENV).init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let algorithm = chosen_algorithm(&args);
    let seed = args.flag_seed.unwrap_or_else(rand::random);
    info!("{} maze, {}x{}, seed {}", algorithm.name(), args.flag_height, args.flag_width, seed);

    let mut rng = utils::seeded_rng(seed);
    let maze = algorithm.generate(Height(args.flag_height), Width(args.flag_width), &mut rng)?;

    let top_left = Cell::new(0, 0);
    let bottom_right = Cell::new(args.flag_height as u32 - 1, args.flag_width as u32 - 1);

    if let Some(ref solver) = args.flag_solve {
        let path = solve(&maze, solver, top_left, bottom_right)
            .chain_err(|| format!("Failed to solve the maze with {}", solver))?;
        info!("{} path length {}", solver, path.len());
        println!("{}", maze.display_with(&PathDisplay::new(&path)));
    } else {
        println!("{}", maze);
    }

    if args.flag_show_distances {
        let distances = Distances::new(&maze, top_left)?;
        println!("{}", maze.display_with(&distances));
    }

    if args.flag_stats {
        print_stats(&maze, top_left)?;
    }

    Ok(())
}

/// Log filters come from the `filter_var` environment variable, `info` if it is not set.
fn logger_builder(filter_var: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(filter_var, "info"))
}

fn chosen_algorithm(args: &MazeArgs) -> Algorithm {
    if args.cmd_binary {
        Algorithm::BinaryTree
    } else if args.cmd_sidewinder {
        Algorithm::Sidewinder
    } else if args.cmd_fusion {
        Algorithm::Fusion
    } else if args.cmd_backtracker {
        Algorithm::Backtracker
    } else {
        // wilson is also the default
        Algorithm::Wilson
    }
}

fn solve(maze: &Maze, solver: &str, start: Cell, stop: Cell) -> Result<Path> {
    let path = match solver {
        "dfs" => pathing::solve_dfs(maze, start, stop)?,
        "bfs" => pathing::solve_bfs(maze, start, stop)?,
        "wall-follower" => pathing::solve_wall_follower(maze, start, stop)?,
        unknown => bail!("Unknown solver '{}', expected dfs, bfs or wall-follower", unknown),
    };
    Ok(path)
}

fn print_stats(maze: &Maze, origin: Cell) -> Result<()> {
    println!("passages:      {}", maze.passages_count());
    println!("dead ends:     {}", metrics::dead_end_count(maze));
    println!("worst path:    {}", metrics::worst_path_len(maze, origin)?);
    println!("longest path:  {}", pathing::longest_path(maze)?.len());
    Ok(())
}

#[cfg(test)]
mod tests {

    use log::LevelFilter;

    use super::*;

    #[test]
    fn log_level_defaults_to_info() {
        let logger = logger_builder("MAZES_DRIVER_UNSET_LOG").build();
        assert_eq!(logger.filter(), LevelFilter::Info);
    }

    #[test]
    fn log_level_follows_the_environment() {
        std::env::set_var("MAZES_DRIVER_DEBUG_LOG", "debug");
        let logger = logger_builder("MAZES_DRIVER_DEBUG_LOG").build();
        assert_eq!(logger.filter(), LevelFilter::Debug);
    }

    #[test]
    fn algorithm_from_command() {
        let args: MazeArgs = Docopt::new(USAGE)
            .and_then(|d| d.argv(vec!["mazes_driver", "fusion", "--height=3"]).deserialize())
            .unwrap();
        assert_eq!(chosen_algorithm(&args), Algorithm::Fusion);
        assert_eq!((args.flag_height, args.flag_width), (3, 8));

        let defaults: MazeArgs = Docopt::new(USAGE)
            .and_then(|d| d.argv(vec!["mazes_driver"]).deserialize())
            .unwrap();
        assert_eq!(chosen_algorithm(&defaults), Algorithm::Wilson);
        assert_eq!(defaults.flag_seed, None);
    }
}
