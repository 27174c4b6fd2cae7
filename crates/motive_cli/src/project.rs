//! Scene scaffolding

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SceneConfig;

/// Write the sample scene. Directories get a `motive.toml` inside them.
pub fn create_scene(path: &Path, force: bool) -> Result<PathBuf> {
    let scene_path = if path.is_dir() {
        path.join("motive.toml")
    } else {
        path.to_path_buf()
    };

    if scene_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            scene_path.display()
        );
    }

    if let Some(parent) = scene_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = format!(
        "# Motive scene. Simulate with `motive run {}`\n\n{}",
        scene_path.display(),
        SceneConfig::sample().to_toml()?
    );
    fs::write(&scene_path, content)
        .with_context(|| format!("Failed to write {}", scene_path.display()))?;

    Ok(scene_path)
}
