//! SitePlan Settings Crate
//!
//! Handles editor configuration: grid, viewport, interaction tolerances,
//! notification debouncing, rendering-surface polling and default footprints.

pub mod config;
pub mod error;

pub use config::{
    Config, FootprintSettings, Footprint, GridSettings, InteractionSettings,
    NotificationSettings, SurfaceSettings, ViewportSettings, YAxis,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
