//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::animation::AnimationKind;

/// Seconds each animation kind plays before it completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDurations {
    pub build: f64,
    pub unbuild: f64,
    #[serde(rename = "move")]
    pub move_to: f64,
    pub rotate: f64,
}

impl Default for AnimationDurations {
    fn default() -> Self {
        Self {
            build: 1.5,
            unbuild: 1.4,
            move_to: 0.9,
            rotate: 0.9,
        }
    }
}

impl AnimationDurations {
    pub fn for_kind(&self, kind: AnimationKind) -> f64 {
        match kind {
            AnimationKind::Build => self.build,
            AnimationKind::Unbuild => self.unbuild,
            AnimationKind::Move => self.move_to,
            AnimationKind::Rotate => self.rotate,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Yaw added by one rotate action, in degrees
    pub rotation_step_degrees: f64,
    /// Inward shrink applied to a candidate footprint
    pub collision_buffer: f64,
    /// Outward growth applied to every road box
    pub obstacle_margin: f64,
    /// Placement grid cell size
    pub grid_unit: f64,
    /// Minimum gap between handled touch drag moves, in milliseconds
    pub touch_drag_interval_ms: u64,
    pub animation: AnimationDurations,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            rotation_step_degrees: 90.0,
            collision_buffer: 0.1,
            obstacle_margin: 0.1,
            grid_unit: shared::dims::BRICK_UNIT_SIZE,
            touch_drag_interval_ms: 16,
            animation: AnimationDurations::default(),
        }
    }
}

impl EditorSettings {
    /// Rotation step in radians
    pub fn rotation_step(&self) -> f64 {
        self.rotation_step_degrees.to_radians()
    }

    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "brickyard", "brickyard")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the user config directory, or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Load settings from an explicit file; missing keys fall back to defaults
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        serde_json::from_str(&json).map_err(|e| format!("invalid settings JSON: {e}"))
    }

    /// Save settings to the user config directory
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("Failed to save settings: {e}");
            }
        }
    }

    /// Save settings to an explicit file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, json).map_err(|e| e.to_string())
    }
}
