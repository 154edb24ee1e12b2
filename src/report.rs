use crate::cost::Cost;
use crate::error::SolveError;
use crate::matrix::{AssignmentMatrix, Matrix};
use std::fmt::{self, Display};

/// Total and average cost of an assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolutionReport<C: Cost> {
    total: C,
    average: f64,
    shops: usize,
}

impl<C: Cost> SolutionReport<C> {
    /// Sums `costs` over the assigned cells. Integer costs are summed exactly,
    /// overflow is reported instead of wrapping.
    pub fn new(costs: &Matrix<C>, assignment: &AssignmentMatrix) -> Result<Self, SolveError> {
        if costs.rows() != assignment.rows() || costs.cols() != assignment.cols() {
            return Err(SolveError::DimensionMismatch {
                cost_rows: costs.rows(),
                cost_cols: costs.cols(),
                assignment_rows: assignment.rows(),
                assignment_cols: assignment.cols(),
            });
        }
        let total = (0..assignment.rows())
            .try_fold(C::zero(), |acc, shop| {
                acc.checked_add_cost(costs.get(shop, assignment.office_of(shop)))
            })
            .ok_or(SolveError::NumericOverflow {
                context: "summing the assignment cost",
            })?;
        let shops = assignment.rows();
        Ok(Self {
            total,
            average: total.as_f64() / shops as f64,
            shops,
        })
    }

    #[inline]
    pub fn total(&self) -> C {
        self.total
    }

    #[inline]
    pub fn average(&self) -> f64 {
        self.average
    }

    #[inline]
    pub fn shops(&self) -> usize {
        self.shops
    }
}

impl<C: Cost> Display for SolutionReport<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total cost of this solution is : {}", self.total)?;
        write!(f, "Average cost of this solution is : {}", self.average)
    }
}
