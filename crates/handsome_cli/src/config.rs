//! Timeline and settings file loading

use anyhow::{Context, Result};
use handsome_animation::{NotificationSettings, TimelineConfig};
use std::fs;
use std::path::Path;

/// Load a timeline description from a TOML file
pub fn load_timeline(path: &Path) -> Result<TimelineConfig> {
    if !path.is_file() {
        anyhow::bail!("Timeline file {} does not exist", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = TimelineConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if config.steps.is_empty() {
        tracing::warn!("{} has no steps", path.display());
    }

    Ok(config)
}

/// Load level-up banner settings from a TOML file
pub fn load_notification_settings(path: &Path) -> Result<NotificationSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    NotificationSettings::from_toml_str(&content)
        .with_context(|| format!("Invalid notification settings in {}", path.display()))
}
