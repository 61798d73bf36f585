//! Architect settings persistence — save/load config to JSON file.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted settings. Saved to `Documents/Blockwright/settings.json`.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ArchitectSettings {
    // Map
    #[serde(default = "default_map_width")]
    pub map_width: usize,
    #[serde(default = "default_map_height")]
    pub map_height: usize,
    #[serde(default = "default_outline_wall")]
    pub outline_wall: usize,
    // Block pool
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
    #[serde(default = "default_pool_ceiling")]
    pub pool_ceiling: usize,
    // Builder
    #[serde(default = "default_build_range")]
    pub build_range: f32,
    #[serde(default = "default_build_interval")]
    pub build_interval: f32,
    #[serde(default = "default_sprint_multiplier")]
    pub sprint_multiplier: f32,
    // Selection
    #[serde(default = "default_rotate_interval")]
    pub rotate_interval: f32,
}

fn default_map_width() -> usize { DEFAULT_MAP_WIDTH }
fn default_map_height() -> usize { DEFAULT_MAP_HEIGHT }
fn default_outline_wall() -> usize { DEFAULT_OUTLINE_WALL }
fn default_pool_capacity() -> usize { DEFAULT_POOL_CAPACITY }
fn default_pool_ceiling() -> usize { POOL_ADDRESS_CEILING }
fn default_build_range() -> f32 { DEFAULT_BUILD_RANGE }
fn default_build_interval() -> f32 { DEFAULT_BUILD_INTERVAL }
fn default_sprint_multiplier() -> f32 { DEFAULT_SPRINT_MULTIPLIER }
fn default_rotate_interval() -> f32 { DEFAULT_ROTATE_INTERVAL }

impl Default for ArchitectSettings {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            outline_wall: DEFAULT_OUTLINE_WALL,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            pool_ceiling: POOL_ADDRESS_CEILING,
            build_range: DEFAULT_BUILD_RANGE,
            build_interval: DEFAULT_BUILD_INTERVAL,
            sprint_multiplier: DEFAULT_SPRINT_MULTIPLIER,
            rotate_interval: DEFAULT_ROTATE_INTERVAL,
        }
    }
}

impl ArchitectSettings {
    /// Replace nonsensical values (zero-sized map, negative timings) with defaults.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        if self.map_width == 0 { self.map_width = d.map_width; }
        if self.map_height == 0 { self.map_height = d.map_height; }
        if self.pool_ceiling == 0 { self.pool_ceiling = d.pool_ceiling; }
        self.pool_ceiling = self.pool_ceiling.min(POOL_ADDRESS_CEILING);
        if !(self.build_range > 0.0) { self.build_range = d.build_range; }
        if !(self.build_interval >= 0.0) { self.build_interval = d.build_interval; }
        if !(self.sprint_multiplier > 0.0) { self.sprint_multiplier = d.sprint_multiplier; }
        if !(self.rotate_interval >= 0.0) { self.rotate_interval = d.rotate_interval; }
        self
    }
}

fn settings_path() -> Option<PathBuf> {
    let home = std::env::var("USERPROFILE")
        .or_else(|_| std::env::var("HOME"))
        .ok()?;
    let dir = PathBuf::from(home).join("Documents").join("Blockwright");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("settings.json"))
}

pub fn save_settings_to(settings: &ArchitectSettings, path: &Path) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_settings_from(path: &Path) -> Result<ArchitectSettings, SettingsError> {
    let json = std::fs::read_to_string(path)?;
    let settings: ArchitectSettings = serde_json::from_str(&json)?;
    Ok(settings.sanitized())
}

pub fn save_settings(settings: &ArchitectSettings) {
    let Some(path) = settings_path() else { return };
    if let Err(e) = save_settings_to(settings, &path) {
        warn!("Failed to save settings: {}", e);
    }
}

pub fn load_settings() -> ArchitectSettings {
    let Some(path) = settings_path() else { return ArchitectSettings::default() };
    if !path.exists() {
        return ArchitectSettings::default();
    }
    match load_settings_from(&path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to load settings, using defaults: {}", e);
            ArchitectSettings::default()
        }
    }
}
