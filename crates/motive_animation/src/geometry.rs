//! 2D points for positional transforms

use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 2D point or vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Length of the vector
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).magnitude()
    }

    /// Interpolate between `start` and `end`.
    ///
    /// `t` is not clamped. Evaluated as `start·(1-t) + end·t` so that
    /// `t = 0` and `t = 1` land exactly on the endpoints.
    pub fn lerp(start: Vec2, end: Vec2, t: f64) -> Vec2 {
        Vec2 {
            x: lerp(start.x, end.x, t),
            y: lerp(start.y, end.y, t),
        }
    }
}

/// Scalar interpolation, exact at both endpoints
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, scalar: f64) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;

    fn div(self, scalar: f64) -> Vec2 {
        Vec2::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}
