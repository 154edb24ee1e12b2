use std::fmt::{self, Display};
use thiserror::Error;

/// Which side of the capacity bounds can not be met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundViolation {
    /// `min * offices > shops`
    MinimumExceedsShops,
    /// `max * offices < shops`
    MaximumBelowShops,
    /// `min > max`
    MinimumAboveMaximum,
}

impl Display for BoundViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundViolation::MinimumExceedsShops => write!(f, "min * offices > shops"),
            BoundViolation::MaximumBelowShops => write!(f, "max * offices < shops"),
            BoundViolation::MinimumAboveMaximum => write!(f, "min > max"),
        }
    }
}

/// Failure of the assignment optimizer.
///
/// Every variant carries enough numbers to tell which constraint failed
/// without looking into solver internals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(
        "cost matrix is {cost_rows} x {cost_cols} but the assignment is \
         {assignment_rows} x {assignment_cols}"
    )]
    DimensionMismatch {
        cost_rows: usize,
        cost_cols: usize,
        assignment_rows: usize,
        assignment_cols: usize,
    },

    #[error("cost at row {row}, column {col} is negative or not finite")]
    InvalidCost { row: usize, col: usize },

    #[error(
        "infeasible constraints: {violation} (shops {shops}, offices {offices}, \
         min per office {min}, max per office {max})"
    )]
    InfeasibleConstraints {
        violation: BoundViolation,
        shops: usize,
        offices: usize,
        min: usize,
        max: usize,
    },

    #[error("no feasible flow: shipped {shipped} of {required} units ({reason})")]
    NoFeasibleFlow {
        shipped: usize,
        required: usize,
        reason: &'static str,
    },

    #[error("numeric overflow while {context}")]
    NumericOverflow { context: &'static str },

    #[error("cancelled after shipping {shipped} of {required} units")]
    Cancelled { shipped: usize, required: usize },
}
