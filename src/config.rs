//! Command-line configuration for the viewer.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::map::{CameraConfig, PlannerConfig};
use crate::{Error, Result};

/// How road coordinates are turned into the planar world
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ProjectionKind {
    /// Meters around the dataset center, navigated with the camera
    #[default]
    Local,
    /// Dataset fitted into the viewport, re-projected after resizes
    Viewport,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tui-roads",
    author,
    version,
    about = "Road network viewer for the terminal",
    long_about = None
)]
pub struct Args {
    /// Road data to load (Overpass JSON or GeoJSON). Omit for a demo city.
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ProjectionKind::Local)]
    pub projection: ProjectionKind,

    /// Smallest camera scale (screen pixels per world unit)
    #[arg(long, default_value_t = 0.0)]
    pub min_scale: f64,

    /// Largest camera scale; `inf` for unbounded
    #[arg(long, default_value_t = f64::INFINITY)]
    pub max_scale: f64,

    /// Zoom factor per normalized wheel step
    #[arg(long, default_value_t = 1.1)]
    pub wheel_base: f64,

    /// Wheel delta units per step
    #[arg(long, default_value_t = 100.0)]
    pub wheel_normalization: f64,

    /// Simplification tolerance in screen pixels while the view is settled
    #[arg(long, default_value_t = 0.75)]
    pub still_tolerance_px: f64,

    /// Simplification tolerance in screen pixels while panning or zooming
    #[arg(long, default_value_t = 3.0)]
    pub moving_tolerance_px: f64,

    /// Time without input before the view counts as settled
    #[arg(long, default_value_t = 150)]
    pub quiescence_ms: u64,

    /// Trailing window for coalescing terminal resize bursts
    #[arg(long, default_value_t = 50)]
    pub resize_debounce_ms: u64,

    /// Disable the simplified path cache
    #[arg(long)]
    pub no_cache: bool,

    /// Log destination; the terminal itself is owned by the UI
    #[arg(long, default_value = "tui-roads.log")]
    pub log_file: PathBuf,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            file: None,
            projection: ProjectionKind::Local,
            min_scale: 0.0,
            max_scale: f64::INFINITY,
            wheel_base: 1.1,
            wheel_normalization: 100.0,
            still_tolerance_px: 0.75,
            moving_tolerance_px: 3.0,
            quiescence_ms: 150,
            resize_debounce_ms: 50,
            no_cache: false,
            log_file: PathBuf::from("tui-roads.log"),
        }
    }
}

/// Validated settings the app is built from
#[derive(Clone, Debug)]
pub struct Config {
    pub file: Option<PathBuf>,
    pub projection: ProjectionKind,
    pub camera: CameraConfig,
    pub planner: PlannerConfig,
    pub quiescence: Duration,
    pub resize_debounce: Duration,
    pub log_file: PathBuf,
}

impl Args {
    pub fn into_config(self) -> Result<Config> {
        let invalid = |msg: String| -> Result<Config> { Err(Error::InvalidConfig(msg)) };

        if self.min_scale.is_nan() || self.min_scale < 0.0 {
            return invalid(format!("min-scale must be >= 0, got {}", self.min_scale));
        }
        if self.max_scale.is_nan() || self.max_scale <= 0.0 || self.max_scale < self.min_scale {
            return invalid(format!(
                "max-scale must be positive and >= min-scale, got {}",
                self.max_scale
            ));
        }
        if !(self.wheel_base.is_finite() && self.wheel_base > 1.0) {
            return invalid(format!("wheel-base must be > 1, got {}", self.wheel_base));
        }
        if !(self.wheel_normalization.is_finite() && self.wheel_normalization > 0.0) {
            return invalid(format!(
                "wheel-normalization must be positive, got {}",
                self.wheel_normalization
            ));
        }
        for (name, px) in [
            ("still-tolerance-px", self.still_tolerance_px),
            ("moving-tolerance-px", self.moving_tolerance_px),
        ] {
            if !(px.is_finite() && px > 0.0) {
                return invalid(format!("{name} must be positive, got {px}"));
            }
        }

        Ok(Config {
            file: self.file,
            projection: self.projection,
            camera: CameraConfig {
                min_scale: self.min_scale,
                max_scale: self.max_scale,
                wheel_base: self.wheel_base,
                wheel_normalization: self.wheel_normalization,
            },
            planner: PlannerConfig {
                still_tolerance_px: self.still_tolerance_px,
                moving_tolerance_px: self.moving_tolerance_px,
                cache_enabled: !self.no_cache,
                ..PlannerConfig::default()
            },
            quiescence: Duration::from_millis(self.quiescence_ms),
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            log_file: self.log_file,
        })
    }
}
