use std::ops::{Add, Div, Sub};

/// A nullable f64 with explicit null propagation: any arithmetic with a
/// null operand is null, and a null never satisfies a comparison.
///
/// The annotator does all derived-metric arithmetic through this type so the
/// null rules live in one place instead of being re-decided per column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nullable(Option<f64>);

impl Nullable {
    pub const NULL: Nullable = Nullable(None);

    pub fn some(v: f64) -> Self {
        Nullable(Some(v))
    }

    pub fn get(self) -> Option<f64> {
        self.0
    }

    /// Null is never ≤ anything.
    pub fn le(self, rhs: f64) -> bool {
        matches!(self.0, Some(v) if v <= rhs)
    }
}

impl From<Option<f64>> for Nullable {
    fn from(v: Option<f64>) -> Self {
        Nullable(v)
    }
}

impl Add for Nullable {
    type Output = Nullable;

    fn add(self, rhs: Nullable) -> Nullable {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Nullable(Some(a + b)),
            _ => Nullable::NULL,
        }
    }
}

impl Sub for Nullable {
    type Output = Nullable;

    fn sub(self, rhs: Nullable) -> Nullable {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Nullable(Some(a - b)),
            _ => Nullable::NULL,
        }
    }
}

impl Div for Nullable {
    type Output = Nullable;

    fn div(self, rhs: Nullable) -> Nullable {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Nullable(Some(a / b)),
            _ => Nullable::NULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_propagates_null() {
        let a = Nullable::some(0.45);
        assert_eq!((a - Nullable::NULL).get(), None);
        assert_eq!((Nullable::NULL + a).get(), None);
        assert_eq!((Nullable::NULL / a).get(), None);
    }

    #[test]
    fn arithmetic_on_present_values() {
        let spread = Nullable::some(0.45) - Nullable::some(0.40);
        assert!((spread.get().unwrap() - 0.05).abs() < 1e-12);

        let mid = (Nullable::some(0.40) + Nullable::some(0.50)) / Nullable::some(2.0);
        assert!((mid.get().unwrap() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn null_is_never_le() {
        assert!(!Nullable::NULL.le(f64::INFINITY));
        assert!(Nullable::some(0.02).le(0.02));
        assert!(!Nullable::some(0.0201).le(0.02));
    }
}
