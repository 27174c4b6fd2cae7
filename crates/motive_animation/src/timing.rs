//! Timing functions for motions
//!
//! A timing function remaps normalized progress (`0.0..=1.0`) to an eased
//! value. Built-in families are plain variants; combinators wrap another
//! timing function and are built with the consuming helper methods:
//!
//! ```rust
//! use motive_animation::Timing;
//!
//! let landing = Timing::Bounce.ease_out();
//! let breathe = Timing::Smooth.forward_reverse();
//!
//! assert_eq!(breathe.apply(0.0), breathe.apply(1.0));
//! assert!((landing.apply(1.0) - 1.0).abs() < 1e-12);
//! ```

use smallvec::SmallVec;
use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;

/// User supplied timing function
pub type TimingFn = Rc<dyn Fn(f64) -> f64>;

/// Timing function type
#[derive(Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Timing {
    /// `f(p) = p`
    #[default]
    Linear,
    /// `f(p) = p^n`
    Pow(f64),
    /// Progress along a circular arc: `1 - sin(acos(p))`
    Arc,
    /// Decaying bounce landing. Not bounded to `0..=1` in general.
    Bounce,
    /// Polynomial with coefficients in descending-degree order
    Poly(SmallVec<[f64; 4]>),
    /// Cosine smoothing of both ends
    Smooth,
    /// Cosine smoothing of the start only
    SmoothStart,
    /// One full cosine period, `0 -> 1 -> 0`
    SmoothLoop,
    /// CSS-style cubic bezier `(x1, y1, x2, y2)`
    CubicBezier(f64, f64, f64, f64),
    /// `1 - f(1 - p)`
    EaseOut(Box<Timing>),
    /// First half runs `f`, second half runs its ease-out mirror
    EaseInOut(Box<Timing>),
    /// `f(1 - p)`
    Reverse(Box<Timing>),
    /// Ping-pong: `f(2p)` then `f(2 - 2p)`
    ForwardReverse(Box<Timing>),
    /// Arbitrary function
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(TimingFn),
}

impl Timing {
    pub fn pow(n: f64) -> Self {
        Timing::Pow(n)
    }

    /// Polynomial from coefficients, highest degree first
    pub fn poly(coefficients: impl IntoIterator<Item = f64>) -> Self {
        Timing::Poly(coefficients.into_iter().collect())
    }

    pub fn custom<F: Fn(f64) -> f64 + 'static>(f: F) -> Self {
        Timing::Custom(Rc::new(f))
    }

    pub fn ease_out(self) -> Self {
        Timing::EaseOut(Box::new(self))
    }

    pub fn ease_in_out(self) -> Self {
        Timing::EaseInOut(Box::new(self))
    }

    pub fn reversed(self) -> Self {
        Timing::Reverse(Box::new(self))
    }

    pub fn forward_reverse(self) -> Self {
        Timing::ForwardReverse(Box::new(self))
    }

    /// Apply the timing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, p: f64) -> f64 {
        match self {
            Timing::Linear => p,
            Timing::Pow(n) => p.powf(*n),
            Timing::Arc => 1.0 - p.acos().sin(),
            Timing::Bounce => bounce(p),
            Timing::Poly(coefficients) => coefficients.iter().fold(0.0, |acc, c| acc * p + c),
            Timing::Smooth => (1.0 - (p * PI).cos()) / 2.0,
            Timing::SmoothStart => 1.0 - (p * PI / 2.0).cos(),
            Timing::SmoothLoop => (1.0 - (p * 2.0 * PI).cos()) / 2.0,
            Timing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(p, *x1, *y1, *x2, *y2),
            Timing::EaseOut(inner) => 1.0 - inner.apply(1.0 - p),
            Timing::EaseInOut(inner) => {
                if p < 0.5 {
                    inner.apply(2.0 * p) / 2.0
                } else {
                    (2.0 - inner.apply(2.0 - 2.0 * p)) / 2.0
                }
            }
            Timing::Reverse(inner) => inner.apply(1.0 - p),
            Timing::ForwardReverse(inner) => {
                if p < 0.5 {
                    inner.apply(2.0 * p)
                } else {
                    inner.apply(2.0 - 2.0 * p)
                }
            }
            Timing::Custom(f) => f(p),
        }
    }
}

impl fmt::Debug for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timing::Linear => f.write_str("Linear"),
            Timing::Pow(n) => f.debug_tuple("Pow").field(n).finish(),
            Timing::Arc => f.write_str("Arc"),
            Timing::Bounce => f.write_str("Bounce"),
            Timing::Poly(c) => f.debug_tuple("Poly").field(c).finish(),
            Timing::Smooth => f.write_str("Smooth"),
            Timing::SmoothStart => f.write_str("SmoothStart"),
            Timing::SmoothLoop => f.write_str("SmoothLoop"),
            Timing::CubicBezier(x1, y1, x2, y2) => f
                .debug_tuple("CubicBezier")
                .field(x1)
                .field(y1)
                .field(x2)
                .field(y2)
                .finish(),
            Timing::EaseOut(inner) => f.debug_tuple("EaseOut").field(inner).finish(),
            Timing::EaseInOut(inner) => f.debug_tuple("EaseInOut").field(inner).finish(),
            Timing::Reverse(inner) => f.debug_tuple("Reverse").field(inner).finish(),
            Timing::ForwardReverse(inner) => f.debug_tuple("ForwardReverse").field(inner).finish(),
            Timing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Parabolic segments of halving width. Segment `k` starts at
/// `(7 - 4a) / 11` where `a = 0, 1, 1.5, 1.75, ...`.
fn bounce(p: f64) -> f64 {
    // Below zero the thresholds never catch up, the last segment covers it.
    let p = p.max(0.0);
    let mut a = 0.0;
    let mut b = 1.0;
    loop {
        if p >= (7.0 - 4.0 * a) / 11.0 {
            return -((11.0 - 6.0 * a - 11.0 * p) / 4.0).powi(2) + b * b;
        }
        a += b;
        b /= 2.0;
    }
}

/// Cubic bezier easing calculation (matches CSS `cubic-bezier()` in browsers).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut p = t;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = t;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - t).abs() < 1e-7 {
            break;
        }
        if val < t {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³, in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
