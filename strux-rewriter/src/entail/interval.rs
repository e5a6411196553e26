//! Integer intervals with optional bounds.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;

/// Possible values of an integer term (inclusive bounds, `None` =
/// unbounded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Lower bound
    pub min: Option<BigInt>,
    /// Upper bound
    pub max: Option<BigInt>,
}

impl Interval {
    /// All integers.
    pub fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// All lengths, `[0, ∞)`.
    pub fn any_length() -> Self {
        Self::at_least(BigInt::zero())
    }

    /// `[min, ∞)`.
    pub fn at_least(min: BigInt) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// `[n, n]`.
    pub fn point(n: BigInt) -> Self {
        Self {
            min: Some(n.clone()),
            max: Some(n),
        }
    }

    /// `[min, max]`.
    pub fn bounded(min: BigInt, max: BigInt) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// The single value, if the interval is a point.
    pub fn as_point(&self) -> Option<&BigInt> {
        match (&self.min, &self.max) {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        }
    }

    /// Interval of `a + b`.
    pub fn add(&self, other: &Interval) -> Interval {
        Interval {
            min: sum(&self.min, &other.min),
            max: sum(&self.max, &other.max),
        }
    }

    /// Interval of `k * a`.
    pub fn scale(&self, k: &BigInt) -> Interval {
        match k.sign() {
            num_bigint::Sign::NoSign => Interval::point(BigInt::zero()),
            num_bigint::Sign::Plus => Interval {
                min: self.min.as_ref().map(|m| m * k),
                max: self.max.as_ref().map(|m| m * k),
            },
            num_bigint::Sign::Minus => Interval {
                min: self.max.as_ref().map(|m| m * k),
                max: self.min.as_ref().map(|m| m * k),
            },
        }
    }

    /// Smallest interval containing both.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval {
            min: match (&self.min, &other.min) {
                (Some(a), Some(b)) => Some(a.min(b).clone()),
                _ => None,
            },
            max: match (&self.max, &other.max) {
                (Some(a), Some(b)) => Some(a.max(b).clone()),
                _ => None,
            },
        }
    }

    /// Tighten the lower bound to at least `min`.
    pub fn raise_min(&self, min: &BigInt) -> Interval {
        let min = match &self.min {
            Some(m) if m >= min => m.clone(),
            _ => min.clone(),
        };
        Interval {
            min: Some(min),
            max: self.max.clone(),
        }
    }

    /// Clamp both bounds to be non-negative.
    pub fn non_negative(&self) -> Interval {
        let clamp = |b: &BigInt| if b.is_negative() { BigInt::zero() } else { b.clone() };
        Interval {
            min: Some(self.min.as_ref().map_or_else(BigInt::zero, clamp)),
            max: self.max.as_ref().map(clamp),
        }
    }

    /// Compare every value of the interval against `k`.
    ///
    /// `Some(Greater)` means all values are `> k`; `Some(Equal)` means the
    /// interval is `[k, k]`, and so on. `None` when values fall on both
    /// sides.
    pub fn compare(&self, k: &BigInt) -> Option<Ordering> {
        if let Some(min) = &self.min
            && min > k
        {
            return Some(Ordering::Greater);
        }
        if let Some(max) = &self.max
            && max < k
        {
            return Some(Ordering::Less);
        }
        (self.as_point() == Some(k)).then_some(Ordering::Equal)
    }

    /// Check whether every value is `>= k`.
    pub fn all_geq(&self, k: &BigInt) -> bool {
        self.min.as_ref().is_some_and(|m| m >= k)
    }

    /// Check whether every value is `< k`.
    pub fn all_lt(&self, k: &BigInt) -> bool {
        self.max.as_ref().is_some_and(|m| m < k)
    }
}

fn sum(a: &Option<BigInt>, b: &Option<BigInt>) -> Option<BigInt> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        _ => None,
    }
}
