//! Per-redraw planning: cull, simplify and order roads for drawing.
//!
//! Roads are projected once per load into a [`ProjectedNetwork`]. Each pass
//! then picks a world-space tolerance from the camera scale and motion state,
//! culls roads against the visible world rectangle and emits screen-space
//! [`DrawItem`]s, minor tier first so major roads end up on top.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::DVec2;
use rayon::prelude::*;

use crate::data::{RoadId, RoadNetwork};
use crate::geo::GeoPoint;
use crate::map::camera::Camera;
use crate::map::cull::{is_visible, Rect};
use crate::map::motion::MotionState;
use crate::map::projection::{PlanePoint, Projector, ViewportFit};
use crate::map::simplify::simplify;
use crate::map::spatial::RoadGrid;
use crate::{Error, Result};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Visual weight class of a road
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleTier {
    Minor,
    Major,
}

/// Stroke parameters for a tier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub weight: f64,
    pub opacity: f64,
}

impl StyleTier {
    /// Motorway, trunk, primary and secondary are major; everything else is minor
    pub fn classify(class: &str) -> Self {
        match class {
            "motorway" | "trunk" | "primary" | "secondary" => StyleTier::Major,
            _ => StyleTier::Minor,
        }
    }

    pub fn stroke(self) -> StrokeStyle {
        match self {
            StyleTier::Major => StrokeStyle {
                weight: 2.0,
                opacity: 0.9,
            },
            StyleTier::Minor => StrokeStyle {
                weight: 1.0,
                opacity: 0.6,
            },
        }
    }
}

/// How geographic coordinates become the planar world
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectionMode {
    /// Meters around the dataset center; stable under viewport changes
    Local,
    /// Pixels of a `width` x `height` viewport the dataset is fitted into
    Viewport { width: f64, height: f64 },
}

/// A road in planar coordinates with its cached bounding box
#[derive(Clone, Debug)]
pub struct ProjectedRoad {
    pub id: RoadId,
    pub tier: StyleTier,
    pub points: Vec<PlanePoint>,
    pub bbox: Rect,
}

/// Planar snapshot of a [`RoadNetwork`], built once per load (or per resize
/// in viewport mode). Roads with fewer than two points are dropped here.
pub struct ProjectedNetwork {
    generation: u64,
    roads: Vec<ProjectedRoad>,
    grid: RoadGrid,
    skipped: usize,
    projector: Option<Projector>,
}

impl ProjectedNetwork {
    pub fn build(network: &RoadNetwork, mode: ProjectionMode) -> Self {
        let Some(bounds) = network.bounds() else {
            return Self::empty();
        };

        enum Projection {
            Local(Projector),
            Fit(ViewportFit),
        }
        let projection = match mode {
            ProjectionMode::Local => Projection::Local(Projector::new(bounds.center())),
            ProjectionMode::Viewport { width, height } => {
                Projection::Fit(ViewportFit::new(bounds, width, height))
            }
        };
        let project = |p: GeoPoint| match &projection {
            Projection::Local(proj) => proj.project_point(p),
            Projection::Fit(fit) => fit.project_point(p),
        };

        // Roads are independent; collect keeps source order
        let roads: Vec<ProjectedRoad> = network
            .roads()
            .par_iter()
            .filter(|road| road.points.len() >= 2)
            .filter_map(|road| {
                let points: Vec<PlanePoint> = road.points.iter().map(|&p| project(p)).collect();
                let bbox = Rect::from_points(&points)?;
                Some(ProjectedRoad {
                    id: road.id,
                    tier: StyleTier::classify(&road.class),
                    points,
                    bbox,
                })
            })
            .collect();

        let skipped = network.roads().len() - roads.len();
        if skipped > 0 {
            tracing::debug!(skipped, "skipped degenerate roads");
        }

        let grid = RoadGrid::build(roads.iter().map(|r| Some(&r.bbox)));
        let projector = match projection {
            Projection::Local(proj) => Some(proj),
            Projection::Fit(_) => None,
        };

        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            roads,
            grid,
            skipped,
            projector,
        }
    }

    /// The renderable "no network" state
    pub fn empty() -> Self {
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            roads: Vec::new(),
            grid: RoadGrid::new(1.0),
            skipped: 0,
            projector: None,
        }
    }

    pub fn roads(&self) -> &[ProjectedRoad] {
        &self.roads
    }

    /// World-space extent of all roads
    pub fn extent(&self) -> Option<Rect> {
        self.grid.extent()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Local projector, for converting screen positions back to lat/lon
    pub fn projector(&self) -> Option<&Projector> {
        self.projector.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Viewport dimensions in screen units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Tolerances are in screen pixels and divided by the camera scale
#[derive(Clone, Copy, Debug)]
pub struct PlannerConfig {
    pub still_tolerance_px: f64,
    pub moving_tolerance_px: f64,
    /// Tolerance buckets per doubling of the world tolerance
    pub buckets_per_octave: u32,
    pub cache_enabled: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            still_tolerance_px: 0.75,
            moving_tolerance_px: 3.0,
            buckets_per_octave: 2,
            cache_enabled: true,
        }
    }
}

impl PlannerConfig {
    pub fn base_tolerance(&self, motion: MotionState) -> f64 {
        match motion {
            MotionState::Still => self.still_tolerance_px,
            MotionState::Moving => self.moving_tolerance_px,
        }
    }

    /// World tolerance snapped down to its bucket, with the bucket index.
    /// Snapping makes cached paths valid for every scale in the bucket.
    pub fn bucketed_tolerance(&self, scale: f64, motion: MotionState) -> Result<(f64, i32)> {
        let tolerance = self.base_tolerance(motion) / scale;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(Error::InvalidTolerance { tolerance });
        }
        let per_octave = self.buckets_per_octave.max(1) as f64;
        let bucket = (tolerance.log2() * per_octave).floor();
        let snapped = (bucket / per_octave).exp2();
        // Extreme scales can push the bucket outside what f64 represents
        if !snapped.is_finite() || snapped <= 0.0 {
            return Err(Error::InvalidTolerance { tolerance });
        }
        Ok((snapped, bucket as i32))
    }
}

/// A single road ready to stroke
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    pub road_id: RoadId,
    pub tier: StyleTier,
    /// Simplified path in screen coordinates
    pub path: Vec<DVec2>,
}

/// Camera parameters the renderer needs alongside the draw list
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
    pub scale: f64,
    pub offset: DVec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanStats {
    pub roads_total: usize,
    pub roads_visible: usize,
    pub points_in: usize,
    pub points_out: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

/// Output of one planning pass
#[derive(Clone, Debug)]
pub struct RenderPlan {
    /// Minor tier first, then major, each in source road order
    pub items: Vec<DrawItem>,
    pub transform: ScreenTransform,
    /// World-space tolerance used, zero when nothing was simplified
    pub tolerance: f64,
    pub stats: PlanStats,
}

impl RenderPlan {
    fn empty(transform: ScreenTransform, roads_total: usize) -> Self {
        Self {
            items: Vec::new(),
            transform,
            tolerance: 0.0,
            stats: PlanStats {
                roads_total,
                ..PlanStats::default()
            },
        }
    }

    /// Items split into one batch per tier, in draw order
    pub fn batches(&self) -> [(StyleTier, &[DrawItem]); 2] {
        let split = self.items.partition_point(|i| i.tier == StyleTier::Minor);
        let (minor, major) = self.items.split_at(split);
        [(StyleTier::Minor, minor), (StyleTier::Major, major)]
    }
}

/// Simplified world-space paths for one network generation and tolerance bucket
#[derive(Default)]
struct PathCache {
    generation: u64,
    bucket: i32,
    paths: HashMap<usize, Arc<[PlanePoint]>>,
}

impl PathCache {
    /// Drop everything unless it was built for this network and bucket
    fn prepare(&mut self, generation: u64, bucket: i32) {
        if self.generation != generation || self.bucket != bucket {
            if !self.paths.is_empty() {
                tracing::trace!(
                    entries = self.paths.len(),
                    old_bucket = self.bucket,
                    bucket,
                    "path cache invalidated"
                );
            }
            self.paths.clear();
            self.generation = generation;
            self.bucket = bucket;
        }
    }
}

/// Plans draw lists. Holds only the optional path cache, so passes with the
/// same inputs always produce the same output.
#[derive(Default)]
pub struct RenderPlanner {
    config: PlannerConfig,
    cache: PathCache,
}

impl RenderPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            cache: PathCache::default(),
        }
    }

    pub fn plan(
        &mut self,
        network: &ProjectedNetwork,
        camera: &Camera,
        viewport: ViewportSize,
        motion: MotionState,
    ) -> Result<RenderPlan> {
        let transform = ScreenTransform {
            scale: camera.scale,
            offset: camera.offset,
        };
        let roads = network.roads();
        if viewport.is_empty() || roads.is_empty() {
            return Ok(RenderPlan::empty(transform, roads.len()));
        }

        let (tolerance, bucket) = self.config.bucketed_tolerance(camera.scale, motion)?;
        let visible = camera.visible_world_rect(viewport.width, viewport.height);
        if self.config.cache_enabled {
            self.cache.prepare(network.generation(), bucket);
        }

        let mut stats = PlanStats {
            roads_total: roads.len(),
            ..PlanStats::default()
        };
        let mut minor = Vec::new();
        let mut major = Vec::new();

        for idx in network.grid.query(&visible) {
            let road = &roads[idx];
            if !is_visible(&road.bbox, &visible) {
                continue;
            }

            let simplified: Arc<[PlanePoint]> = if self.config.cache_enabled {
                if let Some(path) = self.cache.paths.get(&idx) {
                    stats.cache_hits += 1;
                    path.clone()
                } else {
                    stats.cache_misses += 1;
                    let path: Arc<[PlanePoint]> = simplify(&road.points, tolerance)?.into();
                    self.cache.paths.insert(idx, path.clone());
                    path
                }
            } else {
                simplify(&road.points, tolerance)?.into()
            };

            stats.roads_visible += 1;
            stats.points_in += road.points.len();
            stats.points_out += simplified.len();

            let item = DrawItem {
                road_id: road.id,
                tier: road.tier,
                path: simplified.iter().map(|&p| camera.to_screen(p)).collect(),
            };
            match road.tier {
                StyleTier::Minor => minor.push(item),
                StyleTier::Major => major.push(item),
            }
        }

        minor.append(&mut major);
        tracing::debug!(
            visible = stats.roads_visible,
            total = stats.roads_total,
            points_in = stats.points_in,
            points_out = stats.points_out,
            tolerance,
            ?motion,
            "planned frame"
        );

        Ok(RenderPlan {
            items: minor,
            transform,
            tolerance,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_demo_city, Road};
    use crate::map::camera::CameraConfig;

    fn road(id: RoadId, class: &str, points: &[(f64, f64)]) -> Road {
        Road::new(
            id,
            class,
            "test",
            points.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect(),
        )
    }

    fn fitted_camera(network: &ProjectedNetwork, viewport: ViewportSize) -> Camera {
        let mut camera = Camera::new(CameraConfig::default());
        if let Some(extent) = network.extent() {
            camera.fit(extent, viewport.width, viewport.height, 10.0);
        }
        camera
    }

    #[test]
    fn test_classify() {
        for class in ["motorway", "trunk", "primary", "secondary"] {
            assert_eq!(StyleTier::classify(class), StyleTier::Major);
        }
        for class in ["tertiary", "residential", "unclassified", "motorway_link", ""] {
            assert_eq!(StyleTier::classify(class), StyleTier::Minor);
        }
        assert!(StyleTier::Major.stroke().weight > StyleTier::Minor.stroke().weight);
    }

    #[test]
    fn test_minor_drawn_before_major() {
        let network = RoadNetwork::new(
            vec![
                road(1, "primary", &[(0.0, 0.0), (0.01, 0.01)]),
                road(2, "residential", &[(0.0, 0.01), (0.01, 0.0)]),
                road(3, "motorway", &[(0.005, 0.0), (0.005, 0.01)]),
                road(4, "service", &[(0.0, 0.005), (0.01, 0.005)]),
            ],
            None,
        );
        let projected = ProjectedNetwork::build(&network, ProjectionMode::Local);
        let viewport = ViewportSize::new(200.0, 100.0);
        let camera = fitted_camera(&projected, viewport);

        let plan = RenderPlanner::default()
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();
        let ids: Vec<RoadId> = plan.items.iter().map(|i| i.road_id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);

        let [(minor_tier, minor), (major_tier, major)] = plan.batches();
        assert_eq!((minor_tier, minor.len()), (StyleTier::Minor, 2));
        assert_eq!((major_tier, major.len()), (StyleTier::Major, 2));
    }

    #[test]
    fn test_offscreen_roads_are_culled() {
        let network = RoadNetwork::new(
            vec![
                road(1, "residential", &[(0.0, 0.0), (0.001, 0.001)]),
                road(2, "residential", &[(1.0, 1.0), (1.001, 1.001)]),
            ],
            None,
        );
        let projected = ProjectedNetwork::build(&network, ProjectionMode::Local);
        let viewport = ViewportSize::new(100.0, 100.0);

        // Center road 1 at 1 px per meter
        let mut camera = Camera::new(CameraConfig::default());
        let first = &projected.roads()[0];
        camera.offset = DVec2::new(50.0, 50.0) - first.bbox.center();

        let plan = RenderPlanner::default()
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();
        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.items[0].road_id, 1);
        assert_eq!(plan.stats.roads_visible, 1);
        assert_eq!(plan.stats.roads_total, 2);
    }

    #[test]
    fn test_screen_paths_use_camera_transform() {
        let network = RoadNetwork::new(vec![road(9, "primary", &[(0.0, 0.0), (0.0, 0.001)])], None);
        let projected = ProjectedNetwork::build(&network, ProjectionMode::Local);
        let viewport = ViewportSize::new(400.0, 400.0);
        let camera = fitted_camera(&projected, viewport);

        let plan = RenderPlanner::default()
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();
        let expected: Vec<DVec2> = projected.roads()[0]
            .points
            .iter()
            .map(|&p| camera.to_screen(p))
            .collect();
        assert_eq!(plan.items[0].path, expected);
        assert_eq!(plan.transform.scale, camera.scale);
        assert_eq!(plan.transform.offset, camera.offset);
    }

    #[test]
    fn test_tolerance_follows_scale_and_motion() {
        let config = PlannerConfig::default();
        let (still, _) = config.bucketed_tolerance(1.0, MotionState::Still).unwrap();
        let (moving, _) = config.bucketed_tolerance(1.0, MotionState::Moving).unwrap();
        let (zoomed_in, _) = config.bucketed_tolerance(8.0, MotionState::Still).unwrap();

        assert!(moving > still);
        assert!(zoomed_in < still);
        // Snapped tolerance never exceeds the requested one
        assert!(still <= config.still_tolerance_px);
        assert!(still > config.still_tolerance_px / 2.0);
    }

    #[test]
    fn test_bucket_is_stable_within_octave_slice() {
        let config = PlannerConfig::default();
        let (a, bucket_a) = config.bucketed_tolerance(1.0, MotionState::Still).unwrap();
        let (b, bucket_b) = config.bucketed_tolerance(1.05, MotionState::Still).unwrap();
        assert_eq!(bucket_a, bucket_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_tolerance_fails_fast() {
        let config = PlannerConfig {
            still_tolerance_px: 0.0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.bucketed_tolerance(1.0, MotionState::Still),
            Err(Error::InvalidTolerance { .. })
        ));

        let network = RoadNetwork::new(vec![road(1, "primary", &[(0.0, 0.0), (0.0, 0.001)])], None);
        let projected = ProjectedNetwork::build(&network, ProjectionMode::Local);
        let result = RenderPlanner::new(config).plan(
            &projected,
            &Camera::default(),
            ViewportSize::new(100.0, 100.0),
            MotionState::Still,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_moving_plan_is_coarser() {
        let projected = ProjectedNetwork::build(&generate_demo_city(), ProjectionMode::Local);
        let viewport = ViewportSize::new(320.0, 160.0);
        let camera = fitted_camera(&projected, viewport);
        let mut planner = RenderPlanner::default();

        let still = planner
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();
        let moving = planner
            .plan(&projected, &camera, viewport, MotionState::Moving)
            .unwrap();
        assert_eq!(still.items.len(), moving.items.len());
        assert!(moving.stats.points_out <= still.stats.points_out);
        assert!(still.stats.points_out < still.stats.points_in);
        assert!(moving.tolerance > still.tolerance);
    }

    #[test]
    fn test_cache_reused_across_pan() {
        let projected = ProjectedNetwork::build(&generate_demo_city(), ProjectionMode::Local);
        let viewport = ViewportSize::new(320.0, 160.0);
        let mut camera = fitted_camera(&projected, viewport);
        let mut planner = RenderPlanner::default();

        let first = planner
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();
        assert_eq!(first.stats.cache_hits, 0);
        assert_eq!(first.stats.cache_misses, first.stats.roads_visible);

        camera.pan_by(3.0, -2.0);
        let second = planner
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();
        assert!(second.stats.cache_hits > 0);

        // Cached output matches an uncached pass
        let mut uncached = RenderPlanner::new(PlannerConfig {
            cache_enabled: false,
            ..PlannerConfig::default()
        });
        let fresh = uncached
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();
        assert_eq!(second.items, fresh.items);
    }

    #[test]
    fn test_cache_invalidated_by_new_network() {
        let network = generate_demo_city();
        let viewport = ViewportSize::new(320.0, 160.0);
        let mut planner = RenderPlanner::default();

        let projected = ProjectedNetwork::build(&network, ProjectionMode::Local);
        let camera = fitted_camera(&projected, viewport);
        planner
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();

        let reloaded = ProjectedNetwork::build(&network, ProjectionMode::Local);
        assert_ne!(reloaded.generation(), projected.generation());
        let plan = planner
            .plan(&reloaded, &camera, viewport, MotionState::Still)
            .unwrap();
        assert_eq!(plan.stats.cache_hits, 0);
    }

    #[test]
    fn test_extreme_zoom_still_plans() {
        let projected = ProjectedNetwork::build(&generate_demo_city(), ProjectionMode::Local);
        let viewport = ViewportSize::new(300.0, 170.0);
        let mut camera = fitted_camera(&projected, viewport);
        let mut planner = RenderPlanner::default();

        for _ in 0..2000 {
            camera.zoom_at(150.0, 85.0, 0.5);
        }
        for motion in [MotionState::Moving, MotionState::Still] {
            let plan = planner.plan(&projected, &camera, viewport, motion).unwrap();
            assert_eq!(plan.stats.roads_visible, projected.roads().len());
            assert!(plan.tolerance.is_finite());
        }

        for _ in 0..4000 {
            camera.zoom_at(150.0, 85.0, 2.0);
        }
        let plan = planner
            .plan(&projected, &camera, viewport, MotionState::Still)
            .unwrap();
        assert!(plan.tolerance > 0.0);
    }

    #[test]
    fn test_empty_inputs_yield_empty_plans() {
        let mut planner = RenderPlanner::default();
        let camera = Camera::default();

        let empty = ProjectedNetwork::empty();
        let plan = planner
            .plan(&empty, &camera, ViewportSize::new(100.0, 100.0), MotionState::Still)
            .unwrap();
        assert!(plan.items.is_empty());

        let projected = ProjectedNetwork::build(&generate_demo_city(), ProjectionMode::Local);
        for viewport in [ViewportSize::new(0.0, 100.0), ViewportSize::new(100.0, 0.0)] {
            let plan = planner
                .plan(&projected, &camera, viewport, MotionState::Still)
                .unwrap();
            assert!(plan.items.is_empty());
        }
    }

    #[test]
    fn test_degenerate_roads_skipped() {
        let network = RoadNetwork::new(
            vec![
                road(1, "primary", &[(1.0, 1.0)]),
                road(2, "primary", &[]),
                road(3, "primary", &[(1.0, 1.0), (1.001, 1.0)]),
            ],
            None,
        );
        let projected = ProjectedNetwork::build(&network, ProjectionMode::Local);
        assert_eq!(projected.roads().len(), 1);
        assert_eq!(projected.skipped(), 2);
        assert_eq!(projected.roads()[0].id, 3);
    }

    #[test]
    fn test_single_point_dataset() {
        let network = RoadNetwork::new(
            vec![
                road(1, "residential", &[(0.0, 0.0), (0.0, 0.0)]),
                road(2, "primary", &[(0.0, 0.0)]),
            ],
            None,
        );
        let bounds = network.bounds().unwrap();
        assert_eq!((bounds.lat_span(), bounds.lon_span()), (0.0, 0.0));

        let viewport = ViewportSize::new(120.0, 80.0);
        for mode in [
            ProjectionMode::Local,
            ProjectionMode::Viewport {
                width: viewport.width,
                height: viewport.height,
            },
        ] {
            let projected = ProjectedNetwork::build(&network, mode);
            let camera = fitted_camera(&projected, viewport);
            assert!(camera.scale.is_finite() && camera.offset.is_finite());

            let plan = RenderPlanner::default()
                .plan(&projected, &camera, viewport, MotionState::Still)
                .unwrap();
            assert!(plan.items.len() <= 1);
            for item in &plan.items {
                assert!(item.path.iter().all(|p| p.is_finite()));
                assert!(item.path.windows(2).all(|w| w[0] == w[1]));
            }
        }
    }

    #[test]
    fn test_viewport_mode_fills_viewport() {
        let network = generate_demo_city();
        let projected = ProjectedNetwork::build(
            &network,
            ProjectionMode::Viewport {
                width: 400.0,
                height: 300.0,
            },
        );
        let extent = projected.extent().unwrap();
        assert!(extent.min.x >= 0.0 && extent.max.x <= 400.0);
        assert!(extent.min.y >= 0.0 && extent.max.y <= 300.0);
        assert!(projected.projector().is_none());

        // Identity camera shows the whole network
        let plan = RenderPlanner::default()
            .plan(
                &projected,
                &Camera::default(),
                ViewportSize::new(400.0, 300.0),
                MotionState::Still,
            )
            .unwrap();
        assert_eq!(plan.stats.roads_visible, projected.roads().len());
    }
}
