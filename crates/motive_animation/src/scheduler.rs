//! Animation scheduler
//!
//! Owns every entity and the frame-request lifecycle, and ticks all active
//! motions once per display refresh.
//!
//! ```text
//!            start()                     stop() / step_once()
//!   Idle ─────────────► Running ───────────────────────────► Draining
//!    ▲                     │                                     │
//!    │      cancel()       │         last queued frame ticks     │
//!    └─────────────────────┴─────────────────────────────────────┘
//! ```

use crate::commands::{CommandQueue, SchedulerCommand, SchedulerCommands};
use crate::entity::{DrawReport, Entity};
use crate::error::{HookFailure, Result};
use crate::frame::{Clock, FrameHandle, FrameRequester, ManualClock, ManualFrames};
use crate::motion::{Motion, MotionConfig};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identity of an entity inside its scheduler
    pub struct EntityId;
}

/// Coarse scheduler state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// No frame outstanding, nothing will be drawn
    Idle,
    /// Every tick requests the next one
    Running,
    /// One frame is still queued and will draw once, then the loop ends
    Draining,
}

/// Summary of one [`Scheduler::tick`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Animation time of the tick (ms)
    pub time: f64,
    /// Entities drawn
    pub entities: usize,
    pub motions_advanced: usize,
    pub motions_finished: usize,
    pub hook_failures: Vec<HookFailure>,
    /// Whether another frame was requested
    pub requested_next: bool,
}

impl TickReport {
    fn absorb(&mut self, draw: DrawReport) {
        self.entities += 1;
        self.motions_advanced += draw.advanced;
        self.motions_finished += draw.finished.len();
        self.hook_failures.extend(draw.hook_failures);
    }
}

/// The animation scheduler that ticks all entities
pub struct Scheduler {
    entities: SlotMap<EntityId, Entity>,
    /// Registration order
    order: Vec<EntityId>,
    running: bool,
    animation_time: f64,
    /// At most one outstanding request
    pending_frame: Option<FrameHandle>,
    frames: Box<dyn FrameRequester>,
    clock: Box<dyn Clock>,
    commands: CommandQueue<SchedulerCommand>,
    frame_count: u64,
}

impl Scheduler {
    pub fn new(frames: impl FrameRequester + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            entities: SlotMap::with_key(),
            order: Vec::new(),
            running: false,
            animation_time: 0.0,
            pending_frame: None,
            frames: Box::new(frames),
            clock: Box::new(clock),
            commands: CommandQueue::new(),
            frame_count: 0,
        }
    }

    /// A scheduler driven by hand, plus the handles that drive it
    pub fn manual() -> (Self, ManualFrames, ManualClock) {
        let frames = ManualFrames::new();
        let clock = ManualClock::default();
        let scheduler = Self::new(frames.clone(), clock.clone());
        (scheduler, frames, clock)
    }

    /// Start the frame loop. Idempotent.
    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!(time = self.animation_time, "scheduler started");
        }
        self.running = true;
        if self.pending_frame.is_none() {
            self.request_frame();
        }
    }

    /// Run exactly one more frame, then go idle
    pub fn step_once(&mut self) {
        self.running = false;
        if self.pending_frame.is_none() {
            self.request_frame();
        }
    }

    /// Stop after the frame that is already queued, if any
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(time = self.animation_time, "scheduler stopping");
        }
        self.running = false;
    }

    /// Stop now; the queued frame (if any) never fires
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.frames.cancel_frame(handle);
            tracing::debug!(handle = handle.0, "cancelled pending frame");
        }
        self.running = false;
    }

    /// Frame callback for `handle`: draw every entity at `time` (ms).
    ///
    /// Only the outstanding request ticks. A cancelled, already fired or
    /// unknown handle is ignored and returns `None`.
    pub fn tick(&mut self, handle: FrameHandle, time: f64) -> Option<TickReport> {
        if self.pending_frame != Some(handle) {
            tracing::debug!(handle = handle.0, "ignoring stale frame callback");
            return None;
        }
        // The request that brought us here has fired
        self.pending_frame = None;
        if time < self.animation_time {
            tracing::warn!(
                previous = self.animation_time,
                time,
                "frame time went backwards"
            );
        }
        self.animation_time = time;
        self.frame_count += 1;
        self.apply_commands();

        let mut report = TickReport {
            time,
            ..Default::default()
        };

        for &id in &self.order {
            let Some(entity) = self.entities.get_mut(id) else {
                continue;
            };
            report.absorb(entity.draw(time));
        }

        // Hooks may have stopped us; that takes effect before the next request
        self.apply_commands();

        if self.running {
            self.request_frame();
            report.requested_next = true;
        }

        tracing::trace!(
            time,
            entities = report.entities,
            advanced = report.motions_advanced,
            finished = report.motions_finished,
            "tick"
        );
        Some(report)
    }

    fn request_frame(&mut self) {
        debug_assert!(self.pending_frame.is_none());
        self.pending_frame = Some(self.frames.request_frame());
    }

    fn apply_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        for command in self.commands.drain() {
            match command {
                SchedulerCommand::Add(entity) => {
                    self.add(entity);
                }
                SchedulerCommand::Remove(id) => {
                    self.remove(id);
                }
                SchedulerCommand::Start => {
                    // Mid-tick the fired request is already cleared, so this
                    // only flags the loop and the tick requests the next frame.
                    self.running = true;
                }
                SchedulerCommand::Stop => self.stop(),
                SchedulerCommand::Cancel => self.cancel(),
            }
        }
    }

    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(entity);
        self.order.push(id);
        id
    }

    /// Remove an entity. Unknown ids are ignored.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Entity ids in registration order
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Get the number of entities in the scheduler
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Build a motion whose default start is the clock's current time
    pub fn motion(&self, config: MotionConfig) -> Result<Motion> {
        config.build(self.now())
    }

    /// Handle for queueing changes from inside hooks
    pub fn commands(&self) -> SchedulerCommands {
        SchedulerCommands::new(self.commands.clone())
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Time of the last tick (ms)
    pub fn animation_time(&self) -> f64 {
        self.animation_time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Ticks executed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn state(&self) -> SchedulerState {
        match (self.running, self.pending_frame.is_some()) {
            (true, _) => SchedulerState::Running,
            (false, true) => SchedulerState::Draining,
            (false, false) => SchedulerState::Idle,
        }
    }

    /// Check if any motions are still registered
    pub fn has_active_motions(&self) -> bool {
        self.entities.values().any(|entity| !entity.is_empty())
    }
}
