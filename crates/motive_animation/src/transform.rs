//! Transforms turn an eased value into a mutation of some target
//!
//! The target is owned elsewhere (usually by the renderer) and shared with
//! the transform through `Rc<Cell<_>>`, so the renderer can read the latest
//! value on its next paint.

use crate::geometry::{lerp, Vec2};
use std::cell::Cell;
use std::rc::Rc;

/// Shared output point written by positional transforms
pub type SharedVec2 = Rc<Cell<Vec2>>;

/// Shared output scalar written by [`ScalarLinear`]
pub type SharedScalar = Rc<Cell<f64>>;

/// Mutates a target given an eased value
pub trait Transform {
    fn step(&mut self, eased: f64);
}

impl<F: FnMut(f64)> Transform for F {
    fn step(&mut self, eased: f64) {
        self(eased)
    }
}

/// Does nothing. Default transform of every motion.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTransform;

impl Transform for NoTransform {
    fn step(&mut self, _eased: f64) {}
}

/// Moves a shared point along the segment `start -> end`
///
/// The eased value is used as the interpolation factor as-is; timing functions
/// that overshoot push the point outside the segment.
#[derive(Clone, Debug)]
pub struct PositionLinear {
    pub start: Vec2,
    pub end: Vec2,
    current: SharedVec2,
}

impl PositionLinear {
    pub fn new(start: impl Into<Vec2>, end: impl Into<Vec2>, current: SharedVec2) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            current,
        }
    }

    /// Handle to the output point
    pub fn current(&self) -> SharedVec2 {
        self.current.clone()
    }
}

impl Transform for PositionLinear {
    fn step(&mut self, eased: f64) {
        self.current.set(Vec2::lerp(self.start, self.end, eased));
    }
}

/// Interpolates a single shared value, e.g. opacity or rotation
#[derive(Clone, Debug)]
pub struct ScalarLinear {
    pub start: f64,
    pub end: f64,
    current: SharedScalar,
}

impl ScalarLinear {
    pub fn new(start: f64, end: f64, current: SharedScalar) -> Self {
        Self {
            start,
            end,
            current,
        }
    }

    pub fn current(&self) -> SharedScalar {
        self.current.clone()
    }
}

impl Transform for ScalarLinear {
    fn step(&mut self, eased: f64) {
        self.current.set(lerp(self.start, self.end, eased));
    }
}
