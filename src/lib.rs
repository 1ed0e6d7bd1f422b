//! Optimal solver for N×N sliding-tile puzzles.
//!
//! [`Solver`] runs A* with the Manhattan heuristic from both the given board and its
//! [twin](Board::twin). Whichever lineage reaches the goal first decides solvability.

pub mod error;
pub mod frontier;
pub mod loader;
pub mod puzzle;
pub mod solver;

pub use error::{BoardError, LoadError, SolveError};
pub use loader::{parse_board, read_board};
pub use puzzle::{Board, Move};
pub use solver::{SearchStats, Solver, SolverConfig};
