//! Capacitated assignment of shops to offices.
//!
//! Every shop (row of the cost matrix) is assigned to exactly one office
//! (column), every office receives between `min` and `max` shops, and the sum
//! of the assigned costs is minimal. The problem is solved exactly as a
//! minimum cost flow with lower bounds, see [`FlowSolver`].
//!
//! ```
//! use territory_optimizer::{solve, CapacityBounds, Matrix, SolutionReport};
//!
//! let costs = Matrix::from_rows(&[[5_i64, 150], [20, 135], [90, 50], [60, 35], [360, 500]])?;
//! let assignment = solve(&costs, CapacityBounds::new(0, 5))?;
//! assert_eq!(assignment.row_to_col(), &[0, 0, 1, 1, 0]);
//! assert_eq!(SolutionReport::new(&costs, &assignment)?.total(), 470);
//! # Ok::<(), anyhow::Error>(())
//! ```
pub mod bounds;
pub mod config;
pub mod cost;
pub mod error;
pub mod format;
pub mod generator;
pub mod matrix;
pub mod network;
pub mod report;
pub mod solver;

#[cfg(test)]
mod testing;

pub use crate::bounds::CapacityBounds;
pub use crate::config::{ShortestPath, SolverConfig};
pub use crate::cost::Cost;
pub use crate::error::{BoundViolation, SolveError};
pub use crate::format::{FormatError, LabeledMatrix};
pub use crate::matrix::{AssignmentMatrix, Matrix};
pub use crate::report::SolutionReport;
pub use crate::solver::{solve, AssignmentSolver, FlowSolver};
