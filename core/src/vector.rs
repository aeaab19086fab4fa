//! Value-returning two dimensional vector math.
//!
//! Every operation produces a new [`Vec2`]; nothing mutates its receiver. The
//! simulation frequently feeds the same vector into several operations within
//! one expression, which is only safe when no call aliases another's output.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// Point or displacement in continuous grid units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component, increasing toward higher columns.
    pub x: f64,
    /// Vertical component, increasing toward higher rows.
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiplies both components by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Dot product with `other`.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared Euclidean length.
    #[must_use]
    pub fn norm2(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(self) -> f64 {
        self.norm2().sqrt()
    }

    /// Reports whether both components are exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns a vector pointing the same way with the requested length.
    ///
    /// Zero-length input has no direction, so `None` is returned instead of a
    /// vector full of NaNs.
    #[must_use]
    pub fn with_length(self, length: f64) -> Option<Self> {
        let norm = self.norm();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        Some(self.scale(length / norm))
    }

    /// Projects `self` onto the line spanned by `axis`.
    ///
    /// Projection onto the zero vector yields the zero vector.
    #[must_use]
    pub fn project_onto(self, axis: Self) -> Self {
        let axis_norm2 = axis.norm2();
        if axis_norm2 == 0.0 {
            return Self::ZERO;
        }
        axis.scale(self.dot(axis) / axis_norm2)
    }

    /// Rounds both components to the nearest cell, halves toward positive
    /// infinity.
    #[must_use]
    pub fn round(self) -> CellCoord {
        CellCoord::new((self.x + 0.5).floor() as i32, (self.y + 0.5).floor() as i32)
    }

    /// Squared distance to `other`.
    #[must_use]
    pub fn distance2(self, other: Self) -> f64 {
        (other - self).norm2()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
