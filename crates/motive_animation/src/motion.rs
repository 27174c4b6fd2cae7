//! Motions
//!
//! A motion is one timed, repeatable interpolation: every frame it turns the
//! animation time into progress, eases it through its [`Timing`] and hands the
//! eased value to its [`Transform`].
//!
//! # Example
//!
//! ```rust
//! use motive_animation::{Advance, MotionConfig, PositionLinear, Timing, Vec2};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let position = Rc::new(Cell::new(Vec2::ZERO));
//! let mut motion = MotionConfig::new(1000.0)
//!     .start(0.0)
//!     .timing(Timing::Smooth)
//!     .transform(PositionLinear::new((0.0, 0.0), (200.0, 0.0), position.clone()))
//!     .build(0.0)
//!     .unwrap();
//!
//! assert_eq!(motion.advance(500.0), Advance::Continue);
//! assert!((position.get().x - 100.0).abs() < 1e-9);
//! assert_eq!(motion.advance(1000.0), Advance::Finished);
//! ```

use crate::error::{ConfigError, HookFailure, HookKind, Result};
use crate::hooks::{hook, Hook, HookResult, MotionHooks};
use crate::timing::Timing;
use crate::transform::{NoTransform, Transform};
use smallvec::SmallVec;
use std::fmt;

/// Outcome of [`Motion::advance`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Keep the motion for the next frame
    Continue,
    /// The motion is done and should be dropped by its owner
    Finished,
}

/// How many more cycles a motion runs after the current one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

impl Repeat {
    /// `-1` repeats forever, `n >= 0` repeats `n` more times
    pub fn from_count(count: i32) -> Result<Self> {
        match count {
            -1 => Ok(Repeat::Forever),
            n if n >= 0 => Ok(Repeat::Times(n as u32)),
            n => Err(ConfigError::InvalidRepeat(n)),
        }
    }

    /// Inverse of [`Repeat::from_count`]
    pub fn count(self) -> i64 {
        match self {
            Repeat::Times(n) => n as i64,
            Repeat::Forever => -1,
        }
    }
}

/// Construction parameters for a [`Motion`]
///
/// Everything except `duration` is optional; defaults are resolved once in
/// [`MotionConfig::build`].
pub struct MotionConfig {
    /// Start time in ms. `None` means "now" at build time.
    pub start: Option<f64>,
    /// Duration of one cycle in ms
    pub duration: f64,
    /// `0` runs once, `n > 0` repeats n more times, `-1` forever
    pub repeat: i32,
    pub timing: Timing,
    pub transform: Option<Box<dyn Transform>>,
    pub hooks: MotionHooks,
}

impl MotionConfig {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            start: None,
            duration: duration_ms,
            repeat: 0,
            timing: Timing::Linear,
            transform: None,
            hooks: MotionHooks::default(),
        }
    }

    /// Builder: start time in ms
    pub fn start(mut self, start_ms: f64) -> Self {
        self.start = Some(start_ms);
        self
    }

    /// Builder: repeat count (-1 for infinite)
    pub fn repeat(mut self, count: i32) -> Self {
        self.repeat = count;
        self
    }

    /// Builder: repeat until removed
    pub fn repeat_forever(self) -> Self {
        self.repeat(-1)
    }

    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn transform<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    pub fn on_start<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.hooks.on_start = Some(hook(f));
        self
    }

    pub fn try_on_start<F: FnMut() -> HookResult + 'static>(mut self, f: F) -> Self {
        self.hooks.on_start = Some(Box::new(f) as Hook);
        self
    }

    pub fn on_repeat<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.hooks.on_repeat = Some(hook(f));
        self
    }

    pub fn try_on_repeat<F: FnMut() -> HookResult + 'static>(mut self, f: F) -> Self {
        self.hooks.on_repeat = Some(Box::new(f) as Hook);
        self
    }

    pub fn on_finish<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.hooks.on_finish = Some(hook(f));
        self
    }

    pub fn try_on_finish<F: FnMut() -> HookResult + 'static>(mut self, f: F) -> Self {
        self.hooks.on_finish = Some(Box::new(f) as Hook);
        self
    }

    pub fn on_draw<F: FnMut() + 'static>(mut self, f: F) -> Self {
        self.hooks.on_draw = Some(hook(f));
        self
    }

    pub fn try_on_draw<F: FnMut() -> HookResult + 'static>(mut self, f: F) -> Self {
        self.hooks.on_draw = Some(Box::new(f) as Hook);
        self
    }

    /// Validate and build the motion. `now` is used when no start was given.
    pub fn build(self, now: f64) -> Result<Motion> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        let repeat = Repeat::from_count(self.repeat)?;
        let start = self.start.unwrap_or(now);
        if !start.is_finite() {
            return Err(ConfigError::InvalidStart(start));
        }

        Ok(Motion {
            start,
            end: start + self.duration,
            duration: self.duration,
            repeat,
            timing: self.timing,
            transform: self
                .transform
                .unwrap_or_else(|| Box::new(NoTransform) as Box<dyn Transform>),
            hooks: self.hooks,
            progress: 0.0,
            started: false,
            finished: false,
            paused: false,
            repeats_done: 0,
            failures: SmallVec::new(),
        })
    }
}

/// A running interpolation
pub struct Motion {
    start: f64,
    end: f64,
    duration: f64,
    repeat: Repeat,
    timing: Timing,
    transform: Box<dyn Transform>,
    hooks: MotionHooks,
    progress: f64,
    started: bool,
    finished: bool,
    /// Paused motions skip both progress and hooks
    paused: bool,
    repeats_done: u32,
    /// Hook failures since the owner last collected them
    failures: SmallVec<[HookFailure; 1]>,
}

impl Motion {
    /// Advance the motion to `time` (ms)
    pub fn advance(&mut self, time: f64) -> Advance {
        if self.finished {
            return Advance::Finished;
        }
        if self.paused || time < self.start {
            return Advance::Continue;
        }

        if time >= self.end {
            match self.repeat {
                Repeat::Times(0) => {
                    self.finished = true;
                    tracing::debug!(time, repeats = self.repeats_done, "motion finished");
                    self.fire(HookKind::Finish);
                    return Advance::Finished;
                }
                Repeat::Times(n) => self.repeat = Repeat::Times(n - 1),
                Repeat::Forever => {}
            }
            // The crossing tick already renders the new cycle
            self.start = time;
            self.end = time + self.duration;
            self.repeats_done += 1;
            tracing::trace!(time, repeats = self.repeats_done, "motion repeating");
            self.fire(HookKind::Repeat);
        }

        if !self.started {
            self.started = true;
            self.fire(HookKind::Start);
        }
        self.fire(HookKind::Draw);

        self.progress = ((time - self.start) / self.duration).clamp(0.0, 1.0);
        let eased = self.timing.apply(self.progress);
        self.transform.step(eased);

        Advance::Continue
    }

    fn fire(&mut self, kind: HookKind) {
        if let Some(failure) = self.hooks.fire(kind) {
            self.failures.push(failure);
        }
    }

    /// Take the hook failures recorded since the last call
    pub fn take_hook_failures(&mut self) -> SmallVec<[HookFailure; 1]> {
        std::mem::take(&mut self.failures)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Normalized progress of the current cycle, as of the last advance
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Start of the current cycle (ms)
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End of the current cycle (ms)
    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Remaining repeats
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// Number of cycle boundaries crossed so far
    pub fn repeats_done(&self) -> u32 {
        self.repeats_done
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }
}

impl fmt::Debug for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Motion")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("duration", &self.duration)
            .field("repeat", &self.repeat)
            .field("timing", &self.timing)
            .field("progress", &self.progress)
            .field("started", &self.started)
            .field("finished", &self.finished)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::transform::PositionLinear;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Counts {
        start: Rc<Cell<u32>>,
        repeat: Rc<Cell<u32>>,
        finish: Rc<Cell<u32>>,
        draw: Rc<Cell<u32>>,
    }

    impl Counts {
        fn attach(&self, config: MotionConfig) -> MotionConfig {
            let (s, r, f, d) = (
                self.start.clone(),
                self.repeat.clone(),
                self.finish.clone(),
                self.draw.clone(),
            );
            config
                .on_start(move || s.set(s.get() + 1))
                .on_repeat(move || r.set(r.get() + 1))
                .on_finish(move || f.set(f.get() + 1))
                .on_draw(move || d.set(d.get() + 1))
        }
    }

    #[test]
    fn test_run_once_lifecycle() {
        let counts = Counts::default();
        let mut motion = counts
            .attach(MotionConfig::new(1000.0).start(0.0))
            .build(0.0)
            .unwrap();

        assert_eq!(motion.advance(0.0), Advance::Continue);
        assert_eq!(counts.start.get(), 1);
        assert!(motion.is_started());

        assert_eq!(motion.advance(500.0), Advance::Continue);
        assert_eq!(motion.progress(), 0.5);

        assert_eq!(motion.advance(999.9), Advance::Continue);
        assert_eq!(counts.finish.get(), 0);

        assert_eq!(motion.advance(1000.0), Advance::Finished);
        assert_eq!(counts.finish.get(), 1);
        assert_eq!(counts.start.get(), 1);
        assert_eq!(counts.repeat.get(), 0);

        // Terminal: no more hooks
        assert_eq!(motion.advance(2000.0), Advance::Finished);
        assert_eq!(counts.finish.get(), 1);
        assert_eq!(counts.draw.get(), 3);
    }

    #[test]
    fn test_pending_until_start() {
        let counts = Counts::default();
        let mut motion = counts
            .attach(MotionConfig::new(100.0).start(500.0))
            .build(0.0)
            .unwrap();

        assert_eq!(motion.advance(0.0), Advance::Continue);
        assert_eq!(motion.advance(499.0), Advance::Continue);
        assert!(!motion.is_started());
        assert_eq!(counts.start.get(), 0);
        assert_eq!(counts.draw.get(), 0);

        motion.advance(500.0);
        assert!(motion.is_started());
        assert_eq!(motion.progress(), 0.0);
    }

    #[test]
    fn test_repeat_n_times() {
        let counts = Counts::default();
        let mut motion = counts
            .attach(MotionConfig::new(100.0).start(0.0).repeat(2))
            .build(0.0)
            .unwrap();

        assert_eq!(motion.advance(0.0), Advance::Continue);
        assert_eq!(motion.advance(100.0), Advance::Continue);
        assert_eq!(counts.repeat.get(), 1);
        assert_eq!(motion.start(), 100.0);
        assert_eq!(motion.end(), 200.0);
        // The boundary tick renders the fresh cycle
        assert_eq!(motion.progress(), 0.0);

        assert_eq!(motion.advance(200.0), Advance::Continue);
        assert_eq!(counts.repeat.get(), 2);
        assert_eq!(counts.finish.get(), 0);

        assert_eq!(motion.advance(300.0), Advance::Finished);
        assert_eq!(counts.repeat.get(), 2);
        assert_eq!(counts.finish.get(), 1);
        assert_eq!(counts.start.get(), 1);
        assert_eq!(motion.repeats_done(), 2);
    }

    #[test]
    fn test_repeat_forever_never_finishes() {
        let counts = Counts::default();
        let mut motion = counts
            .attach(MotionConfig::new(10.0).start(0.0).repeat_forever())
            .build(0.0)
            .unwrap();

        let mut boundaries = 0;
        let mut end = motion.end();
        for step in 0..1000 {
            let t = step as f64 * 3.0;
            if t >= end {
                boundaries += 1;
            }
            assert_eq!(motion.advance(t), Advance::Continue);
            end = motion.end();
        }
        assert_eq!(counts.finish.get(), 0);
        assert_eq!(counts.repeat.get(), boundaries);
        assert_eq!(motion.repeat(), Repeat::Forever);
    }

    #[test]
    fn test_late_tick_starts_new_cycle_at_tick_time() {
        let mut motion = MotionConfig::new(100.0)
            .start(0.0)
            .repeat(1)
            .build(0.0)
            .unwrap();
        motion.advance(10.0);
        motion.advance(250.0);
        assert_eq!(motion.start(), 250.0);
        assert_eq!(motion.end(), 350.0);
        assert_eq!(motion.advance(349.0), Advance::Continue);
        assert_eq!(motion.advance(350.0), Advance::Finished);
    }

    #[test]
    fn test_transform_receives_eased_progress() {
        let out = Rc::new(Cell::new(Vec2::ZERO));
        let mut motion = MotionConfig::new(100.0)
            .start(0.0)
            .timing(Timing::pow(2.0))
            .transform(PositionLinear::new((0.0, 0.0), (100.0, 10.0), out.clone()))
            .build(0.0)
            .unwrap();

        motion.advance(50.0);
        assert_eq!(out.get(), Vec2::new(25.0, 2.5));
        motion.advance(99.0);
        assert!(out.get().x < 100.0);
    }

    #[test]
    fn test_default_start_is_now() {
        let motion = MotionConfig::new(100.0).build(42.0).unwrap();
        assert_eq!(motion.start(), 42.0);
        assert_eq!(motion.end(), 142.0);
        assert_eq!(motion.repeat(), Repeat::Times(0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert_eq!(
            MotionConfig::new(0.0).build(0.0).unwrap_err(),
            ConfigError::InvalidDuration(0.0)
        );
        assert_eq!(
            MotionConfig::new(-5.0).build(0.0).unwrap_err(),
            ConfigError::InvalidDuration(-5.0)
        );
        assert!(matches!(
            MotionConfig::new(f64::NAN).build(0.0),
            Err(ConfigError::InvalidDuration(_))
        ));
        assert_eq!(
            MotionConfig::new(100.0).repeat(-2).build(0.0).unwrap_err(),
            ConfigError::InvalidRepeat(-2)
        );
        assert!(matches!(
            MotionConfig::new(100.0).start(f64::INFINITY).build(0.0),
            Err(ConfigError::InvalidStart(_))
        ));
    }

    #[test]
    fn test_pause_gates_progress_and_hooks() {
        let counts = Counts::default();
        let mut motion = counts
            .attach(MotionConfig::new(100.0).start(0.0))
            .build(0.0)
            .unwrap();

        motion.advance(10.0);
        motion.pause();
        assert_eq!(motion.advance(50.0), Advance::Continue);
        assert_eq!(motion.advance(150.0), Advance::Continue);
        assert_eq!(motion.progress(), 0.1);
        assert_eq!(counts.draw.get(), 1);
        assert_eq!(counts.finish.get(), 0);

        motion.resume();
        assert_eq!(motion.advance(150.0), Advance::Finished);
        assert_eq!(counts.finish.get(), 1);
    }

    #[test]
    fn test_failing_hook_does_not_stop_motion() {
        let out = Rc::new(Cell::new(0.0));
        let sink = out.clone();
        let mut motion = MotionConfig::new(100.0)
            .start(0.0)
            .try_on_draw(|| Err("draw hook broke".into()))
            .transform(move |e: f64| sink.set(e))
            .build(0.0)
            .unwrap();

        assert_eq!(motion.advance(50.0), Advance::Continue);
        assert_eq!(out.get(), 0.5);

        let failures = motion.take_hook_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].hook, HookKind::Draw);
        assert!(motion.take_hook_failures().is_empty());
    }

    #[test]
    fn test_repeat_count_round_trip() {
        assert_eq!(Repeat::from_count(-1).unwrap().count(), -1);
        assert_eq!(Repeat::from_count(3).unwrap().count(), 3);
        assert!(Repeat::from_count(-7).is_err());
    }
}
