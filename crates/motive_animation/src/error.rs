//! Animation error types

use thiserror::Error;

/// Invalid motion configuration, reported by [`MotionConfig::build`](crate::MotionConfig::build)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Duration must be finite and strictly positive
    #[error("Invalid motion duration: {0} ms (must be finite and > 0)")]
    InvalidDuration(f64),

    /// Repeat must be -1 (forever) or a non-negative count
    #[error("Invalid repeat count: {0} (expected -1 or >= 0)")]
    InvalidRepeat(i32),

    /// Start time must be finite
    #[error("Invalid motion start: {0}")]
    InvalidStart(f64),
}

/// Result type for motion construction
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which lifecycle hook misbehaved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    Start,
    Repeat,
    Finish,
    Draw,
    Render,
}

impl HookKind {
    pub fn name(self) -> &'static str {
        match self {
            HookKind::Start => "on_start",
            HookKind::Repeat => "on_repeat",
            HookKind::Finish => "on_finish",
            HookKind::Draw => "on_draw",
            HookKind::Render => "render",
        }
    }
}

/// A hook returned an error or panicked. The tick carried on regardless.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} hook failed: {message}", .hook.name())]
pub struct HookFailure {
    pub hook: HookKind,
    pub message: String,
}
