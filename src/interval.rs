use std::{fmt::Display, ops::RangeInclusive};

use crate::Error;

/// A closed interval `[low, high]`.
///
/// An [`Interval`] is ordered by the lower bound, and tie-broken with the
/// upper bound.
///
/// Construction validates `low <= high`, so every [`Interval`] observed by an
/// [`IntervalTreap`](crate::IntervalTreap) is well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<T> {
    low: T,
    high: T,
}

impl<T> Interval<T>
where
    T: Ord,
{
    /// Construct the closed interval `[low, high]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvertedInterval`] if `low > high`.
    pub fn new(low: T, high: T) -> Result<Self, Error> {
        if low > high {
            return Err(Error::InvertedInterval);
        }
        Ok(Self { low, high })
    }

    /// Returns true if `self` and `other` share at least one point.
    ///
    /// Two closed intervals `[a, b]` and `[c, d]` overlap iff `a <= d` and
    /// `c <= b`.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

impl<T> Interval<T> {
    pub fn low(&self) -> &T {
        &self.low
    }

    pub fn high(&self) -> &T {
        &self.high
    }

    /// Explode this [`Interval`] into the `(low, high)` bounds it contains.
    pub fn into_inner(self) -> (T, T) {
        (self.low, self.high)
    }
}

impl<T> TryFrom<RangeInclusive<T>> for Interval<T>
where
    T: Ord,
{
    type Error = Error;

    fn try_from(value: RangeInclusive<T>) -> Result<Self, Self::Error> {
        let (low, high) = value.into_inner();
        Self::new(low, high)
    }
}

impl<T> TryFrom<(T, T)> for Interval<T>
where
    T: Ord,
{
    type Error = Error;

    fn try_from((low, high): (T, T)) -> Result<Self, Self::Error> {
        Self::new(low, high)
    }
}

impl<T> Display for Interval<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}
