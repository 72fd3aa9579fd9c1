use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or writing tuning.ron.
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize tuning: {0}")]
    Serialize(#[from] ron::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// All tunable game parameters, loaded from tuning.ron.
///
/// Distances are screen pixels with y growing downward; speeds are pixels
/// per simulation tick.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub dt: f32,
    pub window_width: f32,
    pub window_height: f32,
    /// Distance from the bottom of the window to the floor line.
    pub floor_offset: f32,
    pub fighter_width: f32,
    pub fighter_height: f32,
    pub p1_spawn_x: f32,
    pub p2_spawn_x: f32,
    pub walk_speed: f32,
    /// Initial vertical velocity of a jump (negative = up).
    pub jump_velocity: f32,
    pub gravity: f32,
    pub max_hp: i32,
    pub attack_width: f32,
    pub attack_height: f32,
    pub attack_speed: f32,
    /// Attack lifetime in ticks.
    pub attack_lifetime: i32,
    pub attack_damage: i32,
    /// Round length in seconds.
    pub match_time: f32,
    /// Remaining seconds at or below which the timer blinks.
    pub critical_time: f32,
    /// How long the K.O. / Time Up banner stays up.
    pub result_display_secs: f32,
    pub default_volume: f32,
    pub volume_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            window_width: 1000.0,
            window_height: 600.0,
            floor_offset: 50.0,
            fighter_width: 60.0,
            fighter_height: 120.0,
            p1_spawn_x: 200.0,
            p2_spawn_x: 700.0,
            walk_speed: 6.0,
            jump_velocity: -20.0,
            gravity: 1.0,
            max_hp: 100,
            attack_width: 40.0,
            attack_height: 20.0,
            attack_speed: 12.0,
            attack_lifetime: 30,
            attack_damage: 5,
            match_time: 90.0,
            critical_time: 30.0,
            result_display_secs: 2.0,
            default_volume: 0.5,
            volume_step: 0.05,
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("kakutou")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Y coordinate of the floor line.
    pub fn floor_y(&self) -> f32 {
        self.window_height - self.floor_offset
    }

    pub fn fighter_size(&self) -> Vec2 {
        Vec2::new(self.fighter_width, self.fighter_height)
    }

    pub fn attack_size(&self) -> Vec2 {
        Vec2::new(self.attack_width, self.attack_height)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("dt", self.dt),
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("fighter_width", self.fighter_width),
            ("fighter_height", self.fighter_height),
            ("gravity", self.gravity),
            ("attack_width", self.attack_width),
            ("attack_height", self.attack_height),
            ("match_time", self.match_time),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        let non_negative = [
            ("walk_speed", self.walk_speed),
            ("attack_speed", self.attack_speed),
            ("critical_time", self.critical_time),
            ("result_display_secs", self.result_display_secs),
            ("volume_step", self.volume_step),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be zero or a positive number",
                });
            }
        }
        if !self.jump_velocity.is_finite() {
            return Err(TuningError::Invalid {
                field: "jump_velocity",
                reason: "must be a finite number",
            });
        }
        if self.floor_offset < 0.0 || self.floor_offset >= self.window_height {
            return Err(TuningError::Invalid {
                field: "floor_offset",
                reason: "must lie inside the window",
            });
        }
        if self.max_hp <= 0 {
            return Err(TuningError::Invalid {
                field: "max_hp",
                reason: "must be positive",
            });
        }
        if self.attack_damage <= 0 {
            return Err(TuningError::Invalid {
                field: "attack_damage",
                reason: "must be positive",
            });
        }
        if self.attack_lifetime <= 0 {
            return Err(TuningError::Invalid {
                field: "attack_lifetime",
                reason: "must be at least one tick",
            });
        }
        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err(TuningError::Invalid {
                field: "default_volume",
                reason: "must be within 0.0..=1.0",
            });
        }
        Ok(())
    }

    /// Parse and validate a tuning document.
    pub fn from_ron(contents: &str) -> Result<Self, TuningError> {
        let tuning: Self = ron::from_str(contents)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate the tuning file at `path`.
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&contents)
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match Self::load(&path) {
                Ok(tuning) => return tuning,
                Err(e) => {
                    warn!("{e}, using defaults");
                    return Self::default();
                }
            }
        }
        let tuning = Self::default();
        if let Err(e) = tuning.save_to(&path) {
            warn!("{e}");
        }
        tuning
    }

    /// Save current tuning to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), TuningError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| TuningError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let pretty = ron::ser::PrettyConfig::default();
        let s = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, s).map_err(|source| TuningError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }
}
