//! Configuration for the site-plan editor
//!
//! Provides configuration file handling and validation. Supports JSON and TOML
//! file formats stored in the platform-specific config directory.
//!
//! Configuration is organized into logical sections:
//! - Grid snapping (enabled, pitch)
//! - Viewport (fit padding, zoom limits, vertical axis convention)
//! - Interaction tolerances (handle offsets, hit radii, rotation snap)
//! - Notification debouncing
//! - Rendering-surface polling
//! - Default draw-tool footprints

use serde::{Deserialize, Serialize};
use siteplan_core::constants;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Vertical axis convention of world space relative to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    /// World +Y points up the screen (north up); screen Y is flipped.
    #[default]
    Up,
    /// World +Y points down the screen, matching pixel rows.
    Down,
}

impl std::fmt::Display for YAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Grid snapping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Whether pointer positions snap to the grid
    pub enabled: bool,
    /// Grid pitch in feet
    pub pitch_ft: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            pitch_ft: constants::DEFAULT_GRID_PITCH_FT,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Padding in pixels kept around content when fitting
    pub fit_padding_px: f64,
    /// Lower zoom clamp
    pub min_zoom: f64,
    /// Upper zoom clamp
    pub max_zoom: f64,
    /// Optional upper bound applied only by fit-to-bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_zoom_cap: Option<f64>,
    /// Vertical axis convention shared by hit-testing and painting
    pub y_axis: YAxis,
    /// Zoom multiplier per wheel step
    pub wheel_zoom_factor: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            fit_padding_px: constants::VIEW_PADDING_PX,
            min_zoom: constants::MIN_ZOOM,
            max_zoom: constants::MAX_ZOOM,
            fit_zoom_cap: None,
            y_axis: YAxis::Up,
            wheel_zoom_factor: 1.1,
        }
    }
}

/// Pointer interaction tolerances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Distance of the rotation handle beyond the element, in pixels
    pub rotation_handle_offset_px: f64,
    /// Rotation handle hit radius, in pixels
    pub handle_hit_radius_px: f64,
    /// Vertex handle hit radius, in pixels
    pub vertex_hit_radius_px: f64,
    /// Rotation increment while the snap modifier is held, in degrees
    pub rotation_snap_deg: f64,
    /// Offset applied to copied elements, in feet
    pub copy_offset_ft: (f64, f64),
    /// Measure and draw tools revert to Select after one use
    pub single_shot_tools: bool,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            rotation_handle_offset_px: constants::ROTATION_HANDLE_OFFSET_PX,
            handle_hit_radius_px: constants::HANDLE_HIT_RADIUS_PX,
            vertex_hit_radius_px: constants::VERTEX_HIT_RADIUS_PX,
            rotation_snap_deg: constants::ROTATION_SNAP_DEG,
            copy_offset_ft: constants::COPY_OFFSET_FT,
            single_shot_tools: true,
        }
    }
}

/// Notification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Debounce window for building update records, in milliseconds
    pub building_update_debounce_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            building_update_debounce_ms: constants::BUILDING_UPDATE_DEBOUNCE_MS,
        }
    }
}

/// Rendering-surface readiness polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    /// First retry interval, in milliseconds
    pub poll_interval_ms: u64,
    /// Maximum number of polls before giving up
    pub max_attempts: u32,
    /// Multiplier applied to the interval after each failed poll
    pub backoff_factor: f64,
    /// Ceiling for the retry interval, in milliseconds
    pub max_interval_ms: u64,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: constants::SURFACE_POLL_INTERVAL_MS,
            max_attempts: 20,
            backoff_factor: 1.5,
            max_interval_ms: 500,
        }
    }
}

/// Width and depth of a default footprint, in feet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width_ft: f64,
    pub depth_ft: f64,
}

impl From<(f64, f64)> for Footprint {
    fn from((width_ft, depth_ft): (f64, f64)) -> Self {
        Self { width_ft, depth_ft }
    }
}

/// Default footprints used by the draw tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintSettings {
    pub building: Footprint,
    pub parking: Footprint,
    pub greenspace: Footprint,
}

impl Default for FootprintSettings {
    fn default() -> Self {
        Self {
            building: constants::BUILDING_FOOTPRINT_FT.into(),
            parking: constants::PARKING_FOOTPRINT_FT.into(),
            greenspace: constants::GREENSPACE_FOOTPRINT_FT.into(),
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridSettings,
    pub viewport: ViewportSettings,
    pub interaction: InteractionSettings,
    pub notifications: NotificationSettings,
    pub surface: SurfaceSettings,
    pub footprints: FootprintSettings,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config_dir>/siteplan/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("siteplan").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load the config from the default location, falling back to defaults
    /// when no file exists yet.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                )
                .into())
            }
        };

        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                )
                .into())
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::SaveError(e.to_string()))?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("grid.pitch_ft", self.grid.pitch_ft)?;
        positive("viewport.min_zoom", self.viewport.min_zoom)?;
        positive("viewport.max_zoom", self.viewport.max_zoom)?;
        if self.viewport.min_zoom > self.viewport.max_zoom {
            return Err(out_of_range(
                "viewport.min_zoom",
                format!("{} > max_zoom {}", self.viewport.min_zoom, self.viewport.max_zoom),
            ));
        }
        if let Some(cap) = self.viewport.fit_zoom_cap {
            positive("viewport.fit_zoom_cap", cap)?;
        }
        if self.viewport.fit_padding_px < 0.0 || !self.viewport.fit_padding_px.is_finite() {
            return Err(out_of_range(
                "viewport.fit_padding_px",
                self.viewport.fit_padding_px.to_string(),
            ));
        }
        if self.viewport.wheel_zoom_factor <= 1.0 {
            return Err(out_of_range(
                "viewport.wheel_zoom_factor",
                self.viewport.wheel_zoom_factor.to_string(),
            ));
        }
        positive("interaction.handle_hit_radius_px", self.interaction.handle_hit_radius_px)?;
        positive("interaction.vertex_hit_radius_px", self.interaction.vertex_hit_radius_px)?;
        positive("interaction.rotation_snap_deg", self.interaction.rotation_snap_deg)?;
        if self.notifications.building_update_debounce_ms == 0 {
            return Err(out_of_range(
                "notifications.building_update_debounce_ms",
                "0".to_string(),
            ));
        }
        if self.surface.max_attempts == 0 {
            return Err(out_of_range("surface.max_attempts", "0".to_string()));
        }
        if self.surface.backoff_factor < 1.0 {
            return Err(out_of_range(
                "surface.backoff_factor",
                self.surface.backoff_factor.to_string(),
            ));
        }
        for (key, footprint) in [
            ("footprints.building", self.footprints.building),
            ("footprints.parking", self.footprints.parking),
            ("footprints.greenspace", self.footprints.greenspace),
        ] {
            positive(key, footprint.width_ft)?;
            positive(key, footprint.depth_ft)?;
        }
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value.to_string()))
    }
}

fn out_of_range(key: &str, value: String) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value,
    }
}
