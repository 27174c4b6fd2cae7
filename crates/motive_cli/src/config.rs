//! Scene file handling (motive.toml)

use anyhow::{Context, Result};
use motive_animation::Timing;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level scene description
#[derive(Debug, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub entities: Vec<EntityConfig>,
}

/// How the scene is simulated
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Simulated display refresh rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Stop simulating after this much animation time
    #[serde(default = "default_duration")]
    pub duration_ms: f64,
}

fn default_fps() -> u32 {
    60
}

fn default_duration() -> f64 {
    2000.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            duration_ms: default_duration(),
        }
    }
}

/// One animated object; all its motions move the same point
#[derive(Debug, Deserialize, Serialize)]
pub struct EntityConfig {
    pub name: String,
    #[serde(default)]
    pub motions: Vec<MotionSpec>,
}

/// A positional motion
#[derive(Debug, Deserialize, Serialize)]
pub struct MotionSpec {
    /// Start time in ms; scene start when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    pub duration: f64,
    #[serde(default)]
    pub repeat: i32,
    #[serde(default)]
    pub timing: Timing,
    pub from: [f64; 2],
    pub to: [f64; 2],
}

impl SceneConfig {
    /// Load a scene from a file, or from `motive.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let scene_path = if path.is_dir() {
            path.join("motive.toml")
        } else {
            path.to_path_buf()
        };

        if !scene_path.exists() {
            anyhow::bail!(
                "No scene found at {}. Run `motive init` to create one.",
                scene_path.display()
            );
        }

        let content = fs::read_to_string(&scene_path)
            .with_context(|| format!("Failed to read {}", scene_path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", scene_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scene: SceneConfig = toml::from_str(content)?;
        if scene.playback.fps == 0 {
            anyhow::bail!("playback.fps must be greater than zero");
        }
        let duration = scene.playback.duration_ms;
        if !(duration.is_finite() && duration >= 0.0) {
            anyhow::bail!(
                "playback.duration_ms must be a finite, non-negative number (got {})",
                duration
            );
        }
        Ok(scene)
    }

    /// A small scene showing off a few timing functions
    pub fn sample() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            entities: vec![
                EntityConfig {
                    name: "ball".to_string(),
                    motions: vec![MotionSpec {
                        start: None,
                        duration: 1000.0,
                        repeat: 0,
                        timing: Timing::Bounce.ease_out(),
                        from: [0.0, 0.0],
                        to: [0.0, 300.0],
                    }],
                },
                EntityConfig {
                    name: "pendulum".to_string(),
                    motions: vec![MotionSpec {
                        start: Some(250.0),
                        duration: 500.0,
                        repeat: 2,
                        timing: Timing::Smooth.forward_reverse(),
                        from: [-50.0, 0.0],
                        to: [50.0, 0.0],
                    }],
                },
            ],
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scene")
    }
}

/// Parse a timing expression written in TOML value syntax.
///
/// Bare names need no quoting: `bounce`, `'"bounce"'` and
/// `'{ ease_out = "bounce" }'` are all accepted.
pub fn parse_timing(expr: &str) -> Result<Timing> {
    #[derive(Deserialize)]
    struct Wrapper {
        timing: Timing,
    }

    let expr = expr.trim();
    let value = if !expr.is_empty() && expr.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        format!("\"{}\"", expr)
    } else {
        expr.to_string()
    };

    let wrapper: Wrapper = toml::from_str(&format!("timing = {}", value))
        .with_context(|| format!("Invalid timing expression: {}", expr))?;
    Ok(wrapper.timing)
}
