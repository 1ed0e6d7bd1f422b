use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use slider_astar::{read_board, Board, Move, Solver, SolverConfig};

#[derive(Parser)]
#[command(name = "slider-astar")]
#[command(about = "Finds the shortest solution to an N×N sliding-tile puzzle")]
#[command(version)]
struct Cli {
    /// Puzzle file: N followed by N² tiles, 0 for the blank
    #[arg(value_name = "FILE", required_unless_present = "random")]
    file: Option<PathBuf>,

    /// Solve a random N×N board instead of reading a file
    #[arg(long, value_name = "N", conflicts_with = "file")]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Give up after expanding this many search nodes
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Print boards without colour
    #[arg(long)]
    plain: bool,
}

fn load(cli: &Cli) -> Result<Board> {
    if let Some(path) = &cli.file {
        return read_board(path)
            .with_context(|| format!("cannot load puzzle from {}", path.display()));
    }

    let Some(dimension) = cli.random else {
        bail!("give a puzzle file or --random <N>");
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Board::shuffled(dimension, &mut rng).context("cannot generate a random board")
}

// `moved` is the cell the last tile slid into.
fn render(board: &Board, moved: Option<usize>, plain: bool) -> String {
    if plain {
        return board.to_string();
    }

    let mut out = format!("{}\n", board.dimension());
    for (i, &val) in board.tiles().iter().enumerate() {
        let cell = format!("{:2}", val);
        let styled = if val == 0 {
            cell.dark_grey().to_string()
        } else if Some(i) == moved {
            cell.yellow().bold().to_string()
        } else {
            cell
        };
        out.push_str(&styled);
        out.push(' ');
        if (i + 1) % board.dimension() == 0 {
            out.push('\n');
        }
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let initial = load(&cli)?;
    info!("initial board:\n{}", initial);

    let config = SolverConfig {
        max_expansions: cli.max_expansions,
    };
    let solver = Solver::with_config(initial, &config)?;

    let stats = solver.stats();
    info!(
        "expanded {} nodes, enqueued {}, frontier peaked at {}",
        stats.expanded, stats.enqueued, stats.max_frontier
    );

    match (solver.solution(), solver.move_count()) {
        (Some(path), Some(moves)) => {
            println!("Minimum number of moves = {}", moves);
            let mut previous: Option<&Board> = None;
            for board in path {
                let step = previous.and_then(|prev| Move::between(prev, board));
                if let Some(step) = step {
                    println!("{}", step);
                }
                let moved = previous.map(Board::blank_index);
                println!("{}", render(board, moved, cli.plain));
                previous = Some(board.as_ref());
            }
        }
        _ => println!("No solution possible"),
    }

    info!("elapsed: {} ms", start.elapsed().as_millis());
    Ok(())
}
