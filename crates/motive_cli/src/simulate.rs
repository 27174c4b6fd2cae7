//! Headless scene playback
//!
//! Builds a scheduler from a [`SceneConfig`] and fires frames at a fixed rate
//! through `ManualFrames`, reading every entity's position after each tick.

use anyhow::{Context, Result};
use motive_animation::{
    Entity, ManualClock, ManualFrames, MotionConfig, PositionLinear, Scheduler, SharedVec2, Vec2,
};
use serde::Serialize;
use std::cell::Cell;
use std::rc::Rc;

use crate::config::SceneConfig;

/// Positions after one simulated frame
#[derive(Debug, Serialize)]
pub struct FrameSample<'a> {
    pub frame: u64,
    pub time: f64,
    pub positions: Vec<PositionSample<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PositionSample<'a> {
    pub name: &'a str,
    pub x: f64,
    pub y: f64,
}

/// Totals of a finished run
#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub motions_finished: usize,
    pub hook_failures: usize,
    /// All motions were done before the playback duration ran out
    pub settled: bool,
}

struct Track {
    name: String,
    position: SharedVec2,
}

pub struct Simulation {
    scheduler: Scheduler,
    frames: ManualFrames,
    clock: ManualClock,
    tracks: Vec<Track>,
}

impl Simulation {
    pub fn from_scene(scene: &SceneConfig) -> Result<Self> {
        let (mut scheduler, frames, clock) = Scheduler::manual();
        let mut tracks = Vec::with_capacity(scene.entities.len());

        for entity_config in &scene.entities {
            let initial = entity_config
                .motions
                .first()
                .map(|m| Vec2::from(m.from))
                .unwrap_or_default();
            let position: SharedVec2 = Rc::new(Cell::new(initial));

            let mut entity = Entity::new().with_label(entity_config.name.clone());
            for (index, motion_spec) in entity_config.motions.iter().enumerate() {
                let mut config = MotionConfig::new(motion_spec.duration)
                    .repeat(motion_spec.repeat)
                    .timing(motion_spec.timing.clone())
                    .transform(PositionLinear::new(motion_spec.from, motion_spec.to, position.clone()));
                config.start = motion_spec.start;

                let motion = scheduler.motion(config).with_context(|| {
                    format!(
                        "Invalid motion #{} of entity `{}`",
                        index + 1,
                        entity_config.name
                    )
                })?;
                entity.add(motion);
            }

            scheduler.add(entity);
            tracks.push(Track {
                name: entity_config.name.clone(),
                position,
            });
        }

        tracing::debug!(entities = tracks.len(), "scene loaded");
        Ok(Self {
            scheduler,
            frames,
            clock,
            tracks,
        })
    }

    /// Simulate at `fps` until `duration_ms` elapsed or every motion finished.
    ///
    /// `sink` sees the state after each frame.
    pub fn run<F>(&mut self, fps: u32, duration_ms: f64, mut sink: F) -> Result<RunSummary>
    where
        F: FnMut(&FrameSample<'_>) -> Result<()>,
    {
        anyhow::ensure!(fps > 0, "fps must be greater than zero");
        anyhow::ensure!(
            duration_ms.is_finite() && duration_ms >= 0.0,
            "playback duration must be a finite, non-negative number of ms (got {})",
            duration_ms
        );
        let frame_ms = 1000.0 / fps as f64;
        let mut summary = RunSummary::default();

        self.scheduler.start();
        let mut frame = 0u64;
        loop {
            let time = frame as f64 * frame_ms;
            if time > duration_ms {
                break;
            }
            self.clock.set(time);
            let Some(report) = self.frames.fire(&mut self.scheduler, time) else {
                break;
            };

            summary.frames += 1;
            summary.motions_finished += report.motions_finished;
            summary.hook_failures += report.hook_failures.len();

            let sample = FrameSample {
                frame,
                time,
                positions: self
                    .tracks
                    .iter()
                    .map(|track| {
                        let p = track.position.get();
                        PositionSample {
                            name: &track.name,
                            x: p.x,
                            y: p.y,
                        }
                    })
                    .collect(),
            };
            sink(&sample)?;

            if !self.scheduler.has_active_motions() {
                summary.settled = true;
                break;
            }
            frame += 1;
        }

        self.scheduler.cancel();
        tracing::info!(
            frames = summary.frames,
            finished = summary.motions_finished,
            settled = summary.settled,
            "simulation done"
        );
        Ok(summary)
    }
}
