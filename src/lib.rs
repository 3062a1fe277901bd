//! Road network viewer core.
//!
//! Turns a road network in geographic coordinates into simplified, culled,
//! screen-space draw lists for a pan/zoom canvas:
//!
//! - **[`map::Projector`]**: local equirectangular projection around a reference point
//! - **[`map::simplify`]**: Douglas-Peucker polyline simplification
//! - **[`map::Camera`]**: pan/zoom transform with cursor-anchored zoom
//! - **[`map::is_visible`]**: bounding box culling against the visible world rect
//! - **[`map::RenderPlanner`]**: per-redraw orchestration producing [`map::DrawItem`]s
//!
//! Drawing the resulting paths is left to the caller; the `tui-roads` binary
//! paints them onto a Braille canvas.

pub mod braille;
pub mod config;
pub mod data;
pub mod debounce;
pub mod geo;
mod hash;
pub mod map;

/// Error types for the viewer core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid simplification tolerance: {tolerance}")]
    InvalidTolerance { tolerance: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] simd_json::Error),

    #[error("GeoJSON parsing error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    #[error("Unrecognized road data format: {0}")]
    UnrecognizedFormat(String),

    #[error("No roads found in input")]
    EmptyNetwork,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<geojson::Error> for Error {
    fn from(err: geojson::Error) -> Self {
        Error::GeoJson(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
