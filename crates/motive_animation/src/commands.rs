//! Deferred mutations
//!
//! Hooks run while an entity or the scheduler is in the middle of a draw pass,
//! so they cannot borrow the collection they live in. Instead they capture a
//! cheap command handle; queued commands are applied once the current pass is
//! over, so every motion is advanced at most once per tick.

use crate::entity::{Entity, MotionId};
use crate::motion::Motion;
use crate::scheduler::EntityId;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared single-thread command buffer
pub(crate) struct CommandQueue<C> {
    inner: Rc<RefCell<Vec<C>>>,
}

impl<C> CommandQueue<C> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn push(&self, command: C) {
        self.inner.borrow_mut().push(command);
    }

    /// Take everything queued so far
    pub(crate) fn drain(&self) -> Vec<C> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl<C> Clone for CommandQueue<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub(crate) enum EntityCommand {
    Add(Motion),
    Remove(MotionId),
    Clear,
}

/// Queue motion changes on an [`Entity`] from inside a hook
#[derive(Clone)]
pub struct EntityCommands {
    queue: CommandQueue<EntityCommand>,
}

impl EntityCommands {
    pub(crate) fn new(queue: CommandQueue<EntityCommand>) -> Self {
        Self { queue }
    }

    pub fn add(&self, motion: Motion) {
        self.queue.push(EntityCommand::Add(motion));
    }

    pub fn remove(&self, id: MotionId) {
        self.queue.push(EntityCommand::Remove(id));
    }

    /// Drop every motion of the entity
    pub fn clear(&self) {
        self.queue.push(EntityCommand::Clear);
    }
}

pub(crate) enum SchedulerCommand {
    Add(Entity),
    Remove(EntityId),
    Start,
    Stop,
    Cancel,
}

/// Queue scheduler changes from inside a hook
///
/// The queue is drained at the start and end of every tick.
#[derive(Clone)]
pub struct SchedulerCommands {
    queue: CommandQueue<SchedulerCommand>,
}

impl SchedulerCommands {
    pub(crate) fn new(queue: CommandQueue<SchedulerCommand>) -> Self {
        Self { queue }
    }

    pub fn add(&self, entity: Entity) {
        self.queue.push(SchedulerCommand::Add(entity));
    }

    pub fn remove(&self, id: EntityId) {
        self.queue.push(SchedulerCommand::Remove(id));
    }

    /// Keep the loop running past the current tick.
    ///
    /// Commands are applied by [`Scheduler::tick`](crate::Scheduler::tick), so
    /// this only has an effect from inside a hook. An idle scheduler is
    /// restarted with [`Scheduler::start`](crate::Scheduler::start).
    pub fn start(&self) {
        self.queue.push(SchedulerCommand::Start);
    }

    /// Stop after the current pass; no further frame is requested
    pub fn stop(&self) {
        self.queue.push(SchedulerCommand::Stop);
    }

    pub fn cancel(&self) {
        self.queue.push(SchedulerCommand::Cancel);
    }
}
