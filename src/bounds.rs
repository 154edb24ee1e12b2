use crate::error::{BoundViolation, SolveError};
use tracing::debug;

/// Number of shops every office may receive, applied uniformly to all offices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityBounds {
    pub min: usize,
    pub max: usize,
}

impl CapacityBounds {
    #[inline]
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Bounds that never bind: `[0, shops]`.
    #[inline]
    pub fn unconstrained(shops: usize) -> Self {
        Self { min: 0, max: shops }
    }

    /// `shops / offices ± slack`, clamped to `[0, shops]`.
    ///
    /// The floor of the average is used for the lower bound and the ceiling
    /// for the upper one, so the result always admits a complete assignment.
    /// Callers should still run [`CapacityBounds::check`].
    pub fn around_average(shops: usize, offices: usize, slack: usize) -> Self {
        if offices == 0 {
            return Self::unconstrained(shops);
        }
        let floor = shops / offices;
        let ceil = (shops + offices - 1) / offices;
        let bounds = Self {
            min: floor.saturating_sub(slack),
            max: ceil.saturating_add(slack).min(shops),
        };
        debug!(
            "bounds around average {}/{} ± {}: [{}, {}]",
            shops, offices, slack, bounds.min, bounds.max
        );
        bounds
    }

    /// Fails when no row-complete assignment of `shops` to `offices` can
    /// satisfy the bounds.
    pub fn check(&self, shops: usize, offices: usize) -> Result<(), SolveError> {
        let violation = if self.min > self.max {
            Some(BoundViolation::MinimumAboveMaximum)
        } else if self
            .min
            .checked_mul(offices)
            .map_or(true, |required| required > shops)
        {
            Some(BoundViolation::MinimumExceedsShops)
        } else if self
            .max
            .checked_mul(offices)
            .map_or(false, |available| available < shops)
        {
            Some(BoundViolation::MaximumBelowShops)
        } else {
            None
        };

        match violation {
            Some(violation) => Err(SolveError::InfeasibleConstraints {
                violation,
                shops,
                offices,
                min: self.min,
                max: self.max,
            }),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::CapacityBounds;
    use crate::error::{BoundViolation, SolveError};

    #[test]
    fn test_minimum_above_shops_is_infeasible() {
        let err = CapacityBounds::new(3, 3).check(5, 2).unwrap_err();
        assert_eq!(
            err,
            SolveError::InfeasibleConstraints {
                violation: BoundViolation::MinimumExceedsShops,
                shops: 5,
                offices: 2,
                min: 3,
                max: 3,
            }
        );
    }

    #[test]
    fn test_maximum_below_shops_is_infeasible() {
        let err = CapacityBounds::new(0, 2).check(5, 2).unwrap_err();
        assert!(matches!(
            err,
            SolveError::InfeasibleConstraints {
                violation: BoundViolation::MaximumBelowShops,
                ..
            }
        ));
    }

    #[test]
    fn test_inverted_bounds_are_infeasible() {
        let err = CapacityBounds::new(4, 2).check(6, 2).unwrap_err();
        assert!(matches!(
            err,
            SolveError::InfeasibleConstraints {
                violation: BoundViolation::MinimumAboveMaximum,
                ..
            }
        ));
    }

    #[test]
    fn test_tight_bounds_are_feasible() {
        assert!(CapacityBounds::new(3, 3).check(6, 2).is_ok());
        assert!(CapacityBounds::unconstrained(5).check(5, 2).is_ok());
    }

    #[test]
    fn test_around_average() {
        assert_eq!(
            CapacityBounds::around_average(330, 11, 3),
            CapacityBounds::new(27, 33)
        );
        // floor/ceil split keeps uneven averages feasible
        let bounds = CapacityBounds::around_average(10, 3, 0);
        assert_eq!(bounds, CapacityBounds::new(3, 4));
        assert!(bounds.check(10, 3).is_ok());
    }

    #[test]
    fn test_around_average_clamps() {
        assert_eq!(
            CapacityBounds::around_average(4, 2, 3),
            CapacityBounds::new(0, 4)
        );
        assert_eq!(
            CapacityBounds::around_average(2, 5, 3),
            CapacityBounds::new(0, 2)
        );
    }
}
