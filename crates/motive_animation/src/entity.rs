//! Entities own motions
//!
//! An entity stands for one render target. The target itself belongs to the
//! renderer; the entity only keeps the motions that mutate it plus an
//! optional render hook that runs after the motions advanced.

use crate::commands::{CommandQueue, EntityCommand, EntityCommands};
use crate::error::{HookFailure, HookKind};
use crate::hooks::{invoke, HookResult, RenderHook};
use crate::motion::{Advance, Motion};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::fmt;

new_key_type! {
    /// Identity of a motion inside its entity
    pub struct MotionId;
}

/// What happened during one [`Entity::draw`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawReport {
    /// Motions advanced this pass
    pub advanced: usize,
    /// Motions that finished and were removed
    pub finished: Vec<MotionId>,
    pub hook_failures: Vec<HookFailure>,
}

/// An animatable thing with an ordered set of motions
pub struct Entity {
    motions: SlotMap<MotionId, Motion>,
    /// Registration order
    order: Vec<MotionId>,
    label: Option<String>,
    render: Option<RenderHook>,
    commands: CommandQueue<EntityCommand>,
}

impl Entity {
    pub fn new() -> Self {
        Self {
            motions: SlotMap::with_key(),
            order: Vec::new(),
            label: None,
            render: None,
            commands: CommandQueue::new(),
        }
    }

    /// Builder: name used in logs
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: render hook, called with the animation time after every pass
    pub fn with_render<F: FnMut(f64) + 'static>(mut self, mut render: F) -> Self {
        self.render = Some(Box::new(move |time: f64| -> HookResult {
            render(time);
            Ok(())
        }));
        self
    }

    /// Builder: fallible render hook
    pub fn with_try_render<F: FnMut(f64) -> HookResult + 'static>(mut self, render: F) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Register a motion; it runs after every motion added before it
    pub fn add(&mut self, motion: Motion) -> MotionId {
        let id = self.motions.insert(motion);
        self.order.push(id);
        id
    }

    /// Remove a motion. Unknown ids are ignored.
    pub fn remove(&mut self, id: MotionId) -> Option<Motion> {
        let motion = self.motions.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(motion)
    }

    pub fn clear(&mut self) {
        self.motions.clear();
        self.order.clear();
    }

    pub fn motion(&self, id: MotionId) -> Option<&Motion> {
        self.motions.get(id)
    }

    pub fn motion_mut(&mut self, id: MotionId) -> Option<&mut Motion> {
        self.motions.get_mut(id)
    }

    /// Motion ids in registration order
    pub fn ids(&self) -> &[MotionId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    /// Handle for queueing changes from inside hooks
    pub fn commands(&self) -> EntityCommands {
        EntityCommands::new(self.commands.clone())
    }

    /// Advance every motion to `time`, in registration order.
    ///
    /// Finished motions are swept after the whole pass, then queued commands
    /// are applied, then the render hook runs.
    pub fn draw(&mut self, time: f64) -> DrawReport {
        self.apply_commands();

        let mut report = DrawReport::default();
        let mut finished: SmallVec<[MotionId; 4]> = SmallVec::new();

        for &id in &self.order {
            let Some(motion) = self.motions.get_mut(id) else {
                continue;
            };
            report.advanced += 1;
            if motion.advance(time) == Advance::Finished {
                finished.push(id);
            }
            report.hook_failures.extend(motion.take_hook_failures());
        }

        for &id in &finished {
            self.remove(id);
        }
        if !finished.is_empty() {
            tracing::debug!(
                entity = self.label.as_deref().unwrap_or("<unnamed>"),
                count = finished.len(),
                "removed finished motions"
            );
        }
        report.finished = finished.into_vec();

        self.apply_commands();

        if let Some(render) = self.render.as_mut() {
            if let Some(failure) = invoke(HookKind::Render, || render(time)) {
                report.hook_failures.push(failure);
            }
        }

        report
    }

    fn apply_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        for command in self.commands.drain() {
            match command {
                EntityCommand::Add(motion) => {
                    self.add(motion);
                }
                EntityCommand::Remove(id) => {
                    self.remove(id);
                }
                EntityCommand::Clear => self.clear(),
            }
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("label", &self.label)
            .field("motions", &self.order.len())
            .finish_non_exhaustive()
    }
}
