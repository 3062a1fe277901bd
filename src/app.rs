use std::time::Instant;

use glam::DVec2;
use tui_roads::config::{Config, ProjectionKind};
use tui_roads::data::RoadNetwork;
use tui_roads::debounce::Debouncer;
use tui_roads::map::{
    Camera, MotionState, MotionTracker, ProjectedNetwork, ProjectionMode, RenderPlan,
    RenderPlanner, ViewportSize, VIEWPORT_PADDING,
};

/// Wheel delta reported for one notch, in browser-style pixel units
const WHEEL_NOTCH: f64 = 100.0;
/// Zoom factor for the +/- keys
const KEY_ZOOM: f64 = 1.5;

/// Convert a terminal cell to Braille pixel coordinates inside the map border.
/// Each cell is 2 pixels wide and 4 tall.
fn cell_to_pixel(col: u16, row: u16) -> DVec2 {
    DVec2::new(
        col.saturating_sub(1) as f64 * 2.0,
        row.saturating_sub(1) as f64 * 4.0,
    )
}

/// Map area in Braille pixels for a terminal of `width` x `height` cells
/// (border on every side plus the status bar)
fn map_viewport(width: usize, height: usize) -> ViewportSize {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    ViewportSize::new((inner_width * 2) as f64, (inner_height * 4) as f64)
}

/// Application state
pub struct App {
    config: Config,
    network: RoadNetwork,
    projected: ProjectedNetwork,
    pub camera: Camera,
    planner: RenderPlanner,
    motion: MotionTracker,
    resize: Debouncer<(usize, usize)>,
    viewport: ViewportSize,
    plan: Option<RenderPlan>,
    /// Camera, network or motion changed since the last plan
    dirty: bool,
    load_error: Option<String>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the cursor marker
    pub mouse_pos: Option<(u16, u16)>,
}

impl App {
    pub fn new(config: Config, width: usize, height: usize) -> Self {
        Self {
            camera: Camera::new(config.camera),
            planner: RenderPlanner::new(config.planner),
            motion: MotionTracker::new(config.quiescence),
            resize: Debouncer::new(config.resize_debounce),
            viewport: map_viewport(width, height),
            config,
            network: RoadNetwork::default(),
            projected: ProjectedNetwork::empty(),
            plan: None,
            dirty: true,
            load_error: None,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
        }
    }

    fn projection_mode(&self) -> ProjectionMode {
        match self.config.projection {
            ProjectionKind::Local => ProjectionMode::Local,
            ProjectionKind::Viewport => ProjectionMode::Viewport {
                width: self.viewport.width,
                height: self.viewport.height,
            },
        }
    }

    /// Replace the current network and fit it into view
    pub fn load(&mut self, network: RoadNetwork) {
        self.network = network;
        self.load_error = None;
        self.reproject();
        self.reset_view();
    }

    /// Drop any network and show `message` instead
    pub fn load_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(error = %message, "road data load failed");
        self.clear();
        self.load_error = Some(message);
    }

    /// Back to the empty "no network" state
    pub fn clear(&mut self) {
        self.network = RoadNetwork::default();
        self.projected = ProjectedNetwork::empty();
        self.load_error = None;
        self.camera.reset();
        self.dirty = true;
    }

    fn reproject(&mut self) {
        let started = Instant::now();
        self.projected = ProjectedNetwork::build(&self.network, self.projection_mode());
        tracing::debug!(
            roads = self.projected.roads().len(),
            skipped = self.projected.skipped(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "projected network"
        );
        self.dirty = true;
    }

    /// Fit the whole network into the map area
    pub fn reset_view(&mut self) {
        match (self.config.projection, self.projected.extent()) {
            (ProjectionKind::Local, Some(extent)) => {
                self.camera.fit(
                    extent,
                    self.viewport.width,
                    self.viewport.height,
                    VIEWPORT_PADDING,
                );
            }
            // Viewport projection already fits the data
            _ => self.camera.reset(),
        }
        self.dirty = true;
    }

    /// Queue a terminal resize; applied once the burst settles
    pub fn resize(&mut self, width: usize, height: usize, now: Instant) {
        self.resize.push((width, height), now);
    }

    fn apply_resize(&mut self, width: usize, height: usize) {
        let old = self.viewport;
        self.viewport = map_viewport(width, height);
        tracing::debug!(
            width = self.viewport.width,
            height = self.viewport.height,
            "viewport resized"
        );

        match self.config.projection {
            ProjectionKind::Viewport => {
                self.reproject();
                self.camera.reset();
            }
            // Keep whatever was at the centre of the map at the centre
            ProjectionKind::Local => self.camera.pan_by(
                (self.viewport.width - old.width) * 0.5,
                (self.viewport.height - old.height) * 0.5,
            ),
        }
        self.dirty = true;
    }

    /// Advance timers. Call once per frame.
    pub fn tick(&mut self, now: Instant) {
        if let Some((width, height)) = self.resize.poll(now) {
            self.apply_resize(width, height);
        }
        if self.motion.poll(now) {
            self.dirty = true;
        }
    }

    /// Re-plan if anything changed since the last pass
    pub fn update_plan(&mut self) {
        if !self.dirty && self.plan.is_some() {
            return;
        }
        match self.planner.plan(&self.projected, &self.camera, self.viewport, self.motion.state()) {
            Ok(plan) => self.plan = Some(plan),
            Err(err) => {
                tracing::warn!(error = %err, scale = self.camera.scale, "planning failed");
                self.plan = None;
            }
        }
        self.dirty = false;
    }

    fn camera_moved(&mut self, now: Instant) {
        self.motion.note_input(now);
        self.dirty = true;
    }

    /// Move the view by a pixel delta (positive x looks further east)
    pub fn pan(&mut self, dx: f64, dy: f64, now: Instant) {
        self.camera.pan_by(-dx, -dy);
        self.camera_moved(now);
    }

    /// Drag the map so it follows the mouse
    pub fn handle_drag(&mut self, col: u16, row: u16, now: Instant) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let delta = DVec2::new(
                (col as f64 - last_col as f64) * 2.0,
                (row as f64 - last_row as f64) * 4.0,
            );
            if delta != DVec2::ZERO {
                self.camera.pan_by(delta.x, delta.y);
                self.camera_moved(now);
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// One wheel notch at a terminal position; `up` zooms in
    pub fn wheel_at(&mut self, col: u16, row: u16, up: bool, now: Instant) {
        let anchor = cell_to_pixel(col, row);
        let delta = if up { -WHEEL_NOTCH } else { WHEEL_NOTCH };
        if self.camera.zoom_wheel(anchor.x, anchor.y, delta) {
            self.camera_moved(now);
        }
    }

    pub fn zoom_in(&mut self, now: Instant) {
        self.zoom_centered(KEY_ZOOM, now);
    }

    pub fn zoom_out(&mut self, now: Instant) {
        self.zoom_centered(1.0 / KEY_ZOOM, now);
    }

    fn zoom_centered(&mut self, factor: f64, now: Instant) {
        let cx = self.viewport.width * 0.5;
        let cy = self.viewport.height * 0.5;
        if self.camera.zoom_at(cx, cy, factor) {
            self.camera_moved(now);
        }
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Update mouse cursor position
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Mouse position in Braille pixel coordinates
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| {
            let p = cell_to_pixel(col, row);
            (p.x as i32, p.y as i32)
        })
    }

    pub fn plan(&self) -> Option<&RenderPlan> {
        self.plan.as_ref()
    }

    pub fn motion(&self) -> MotionState {
        self.motion.state()
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Scale as a human readable string
    pub fn scale_label(&self) -> String {
        match self.config.projection {
            ProjectionKind::Local => format!("{:.3} px/m", self.camera.scale),
            ProjectionKind::Viewport => format!("{:.2}x", self.camera.scale),
        }
    }

    /// Geographic coordinates at the centre of the map, when known
    pub fn center_coords(&self) -> Option<String> {
        let projector = self.projected.projector()?;
        let center = self
            .camera
            .to_world(DVec2::new(self.viewport.width * 0.5, self.viewport.height * 0.5));
        let geo = projector.unproject(center);
        Some(format!(
            "{:.4}°{}, {:.4}°{}",
            geo.lat.abs(),
            if geo.lat >= 0.0 { "N" } else { "S" },
            geo.lon.abs(),
            if geo.lon >= 0.0 { "E" } else { "W" }
        ))
    }
}
