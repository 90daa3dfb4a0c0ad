use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A closed interval `[begin, end]` whose bounds may be stored in either
/// order while the user is dragging. Use [`TimeRange::fix`] to get the
/// ascending form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange<T> {
    pub begin: T,
    pub end: T,
}

impl<T: Copy + PartialOrd> TimeRange<T> {
    pub fn new(begin: T, end: T) -> Self {
        Self { begin, end }
    }

    pub fn set(&mut self, begin: T, end: T) {
        self.begin = begin;
        self.end = end;
    }

    /// The same interval with `begin <= end`.
    pub fn fix(&self) -> Self {
        if self.begin > self.end {
            Self::new(self.end, self.begin)
        } else {
            *self
        }
    }

    pub fn contains(&self, value: T) -> bool {
        let fixed = self.fix();
        fixed.begin <= value && value <= fixed.end
    }

    /// Smallest interval covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let (a, b) = (self.fix(), other.fix());
        let begin = if b.begin < a.begin { b.begin } else { a.begin };
        let end = if b.end > a.end { b.end } else { a.end };
        Self::new(begin, end)
    }
}

impl<T: Copy + Sub<Output = T>> TimeRange<T> {
    pub fn delta(&self) -> T {
        self.end - self.begin
    }
}

impl TimeRange<f64> {
    pub fn midpoint(&self) -> f64 {
        (self.begin + self.end) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_orders_bounds() {
        let r = TimeRange::new(5.0, 2.0);
        assert_eq!(r.fix(), TimeRange::new(2.0, 5.0));
        assert_eq!(r.fix().delta(), 3.0);
        // Already ordered ranges are unchanged.
        assert_eq!(TimeRange::new(1, 4).fix(), TimeRange::new(1, 4));
    }

    #[test]
    fn delta_is_signed_before_fix() {
        assert_eq!(TimeRange::new(4, 1).delta(), -3);
    }

    #[test]
    fn union_covers_both() {
        let a = TimeRange::new(1.0, 3.0);
        let b = TimeRange::new(7.0, 2.0);
        assert_eq!(a.union(&b), TimeRange::new(1.0, 7.0));
        assert!(a.union(&b).contains(6.5));
    }
}
