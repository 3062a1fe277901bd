mod camera;
mod cull;
mod geometry;
mod motion;
mod planner;
mod projection;
mod simplify;
mod spatial;

pub use camera::{Camera, CameraConfig};
pub use cull::{is_visible, Rect};
pub use geometry::{clip_segment, draw_line, draw_path, draw_thick_line};
pub use motion::{MotionState, MotionTracker};
pub use planner::{
    DrawItem, PlanStats, PlannerConfig, ProjectedNetwork, ProjectedRoad, ProjectionMode,
    RenderPlan, RenderPlanner, ScreenTransform, StrokeStyle, StyleTier, ViewportSize,
};
pub use projection::{
    project_to_viewport, PlanePoint, Projector, ViewportFit, EARTH_RADIUS_M, VIEWPORT_PADDING,
};
pub use simplify::{segment_distance_sq, simplify, simplify_indices};
pub use spatial::RoadGrid;
