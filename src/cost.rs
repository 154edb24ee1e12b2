use num_traits::{CheckedAdd, CheckedSub, NumCast, ToPrimitive, Zero};
use std::fmt::{Debug, Display};
use std::ops::Neg;

/// Numeric type usable as an arc cost.
///
/// Costs have to be signed because residual arcs carry negated costs. Integer
/// types are exact: every sum is checked and never wraps. Float types fail a
/// checked operation only when the result stops being finite.
pub trait Cost:
    Copy
    + PartialOrd
    + Zero
    + Neg<Output = Self>
    + NumCast
    + ToPrimitive
    + Display
    + Debug
    + Send
    + Sync
    + 'static
{
    /// true when summation in this type is lossless
    const EXACT: bool;

    fn checked_add_cost(self, rhs: Self) -> Option<Self>;

    fn checked_sub_cost(self, rhs: Self) -> Option<Self>;

    /// Finite and non-negative.
    fn is_valid_cost(self) -> bool;

    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

macro_rules! impl_integer_cost {
    ($($t:ty),*) => {$(
        impl Cost for $t {
            const EXACT: bool = true;

            #[inline]
            fn checked_add_cost(self, rhs: Self) -> Option<Self> {
                CheckedAdd::checked_add(&self, &rhs)
            }

            #[inline]
            fn checked_sub_cost(self, rhs: Self) -> Option<Self> {
                CheckedSub::checked_sub(&self, &rhs)
            }

            #[inline]
            fn is_valid_cost(self) -> bool {
                self >= 0
            }
        }
    )*};
}

macro_rules! impl_float_cost {
    ($($t:ty),*) => {$(
        impl Cost for $t {
            const EXACT: bool = false;

            #[inline]
            fn checked_add_cost(self, rhs: Self) -> Option<Self> {
                let sum = self + rhs;
                if sum.is_finite() { Some(sum) } else { None }
            }

            #[inline]
            fn checked_sub_cost(self, rhs: Self) -> Option<Self> {
                let difference = self - rhs;
                if difference.is_finite() { Some(difference) } else { None }
            }

            #[inline]
            fn is_valid_cost(self) -> bool {
                self.is_finite() && self >= 0.
            }
        }
    )*};
}

impl_integer_cost!(i32, i64);
impl_float_cost!(f32, f64);
