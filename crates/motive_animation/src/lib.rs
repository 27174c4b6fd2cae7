//! Motive Animation Core
//!
//! Frame-driven interpolation of visual properties.
//!
//! # Features
//!
//! - **Scheduler**: owns the frame-request loop (`start`, `stop`, `cancel`, `step_once`)
//! - **Entities**: ordered sets of motions tied to one render target
//! - **Motions**: timed, repeatable interpolations with lifecycle hooks
//! - **Timing functions**: easing curves and combinators (`ease_out`, `forward_reverse`, ...)
//! - **Transforms**: turn eased progress into a mutation of a shared target
//!
//! # Example
//!
//! ```rust
//! use motive_animation::{Entity, MotionConfig, PositionLinear, Scheduler, Timing, Vec2};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let (mut scheduler, frames, _clock) = Scheduler::manual();
//!
//! let ball = Rc::new(Cell::new(Vec2::ZERO));
//! let mut entity = Entity::new().with_label("ball");
//! entity.add(
//!     scheduler
//!         .motion(
//!             MotionConfig::new(1000.0)
//!                 .timing(Timing::Bounce.ease_out())
//!                 .transform(PositionLinear::new((0.0, 0.0), (0.0, 300.0), ball.clone())),
//!         )
//!         .unwrap(),
//! );
//! scheduler.add(entity);
//!
//! scheduler.start();
//! frames.fire(&mut scheduler, 500.0);
//! assert!(ball.get().y > 0.0);
//! ```

pub mod commands;
pub mod entity;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod hooks;
pub mod motion;
pub mod scheduler;
pub mod timing;
pub mod transform;

pub use commands::{EntityCommands, SchedulerCommands};
pub use entity::{DrawReport, Entity, MotionId};
pub use error::{ConfigError, HookFailure, HookKind};
pub use frame::{Clock, FrameHandle, FrameRequester, ManualClock, ManualFrames, SystemClock};
pub use geometry::Vec2;
pub use hooks::{Hook, HookResult, RenderHook};
pub use motion::{Advance, Motion, MotionConfig, Repeat};
pub use scheduler::{EntityId, Scheduler, SchedulerState, TickReport};
pub use timing::Timing;
pub use transform::{NoTransform, PositionLinear, ScalarLinear, SharedScalar, SharedVec2, Transform};
