use glam::DVec2;

use crate::map::cull::Rect;
use crate::map::projection::{fit_padding, PlanePoint};

/// Hard scale limits applied on top of the configured range. Beyond them
/// `1 / scale` or the squared world tolerance stops being a usable f64.
const SCALE_FLOOR: f64 = 1e-150;
const SCALE_CEILING: f64 = 1e150;

/// Zoom limits and wheel sensitivity.
/// Use `f64::INFINITY` as `max_scale` (and `0.0` as `min_scale`) for an unbounded camera;
/// the scale still stays within `[1e-150, 1e150]`.
#[derive(Clone, Copy, Debug)]
pub struct CameraConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Zoom factor per `wheel_normalization` units of wheel delta
    pub wheel_base: f64,
    pub wheel_normalization: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.0,
            max_scale: f64::INFINITY,
            wheel_base: 1.1,
            wheel_normalization: 100.0,
        }
    }
}

impl CameraConfig {
    /// Hard-bounded zoom range `[1, 10]`
    pub fn bounded() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 10.0,
            ..Self::default()
        }
    }

    /// Map a wheel delta to a multiplicative zoom factor.
    /// Negative delta (scroll up/forward) zooms in.
    pub fn wheel_factor(&self, delta_y: f64) -> f64 {
        if self.wheel_normalization <= 0.0 || !delta_y.is_finite() {
            return 1.0;
        }
        self.wheel_base.powf(-delta_y / self.wheel_normalization)
    }
}

/// Pan/zoom transform: `screen = world * scale + offset`
#[derive(Clone, Debug)]
pub struct Camera {
    pub scale: f64,
    pub offset: DVec2,
    pub config: CameraConfig,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            scale: 1.0,
            offset: DVec2::ZERO,
            config,
        };
        camera.reset();
        camera
    }

    /// Back to the identity transform (scale clamped into the configured range)
    pub fn reset(&mut self) {
        self.scale = self.clamp_scale(1.0).unwrap_or(1.0);
        self.offset = DVec2::ZERO;
    }

    /// Translate by a screen-space delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Zoom by `factor` keeping the world point under `(screen_x, screen_y)` fixed.
    /// Returns `false` when nothing changed (invalid factor or already at a limit).
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            tracing::warn!(factor, "ignoring invalid zoom factor");
            return false;
        }
        let Some(new_scale) = self.clamp_scale(self.scale * factor) else {
            return false;
        };
        if new_scale == self.scale {
            return false;
        }

        let ratio = new_scale / self.scale;
        let anchor = DVec2::new(screen_x, screen_y);
        self.offset = anchor - (anchor - self.offset) * ratio;
        self.scale = new_scale;
        true
    }

    /// Zoom at the cursor from a raw wheel delta
    pub fn zoom_wheel(&mut self, screen_x: f64, screen_y: f64, delta_y: f64) -> bool {
        let factor = self.config.wheel_factor(delta_y);
        self.zoom_at(screen_x, screen_y, factor)
    }

    #[inline(always)]
    pub fn to_screen(&self, p: PlanePoint) -> DVec2 {
        p * self.scale + self.offset
    }

    #[inline(always)]
    pub fn to_world(&self, screen: DVec2) -> PlanePoint {
        (screen - self.offset) / self.scale
    }

    /// World-space rectangle covered by a `width` x `height` viewport
    pub fn visible_world_rect(&self, width: f64, height: f64) -> Rect {
        let a = self.to_world(DVec2::ZERO);
        let b = self.to_world(DVec2::new(width, height));
        Rect::new(a.min(b), a.max(b))
    }

    /// Choose scale/offset so `world` fills the viewport minus `padding` pixels
    /// (capped by [`fit_padding`]), centered. Degenerate inputs fall back to
    /// the identity scale.
    pub fn fit(&mut self, world: Rect, width: f64, height: f64, padding: f64) {
        let size = world.size();
        let padding = fit_padding(padding, width, height);
        let avail_w = (width - padding * 2.0).max(0.0);
        let avail_h = (height - padding * 2.0).max(0.0);

        let mut scale = f64::INFINITY;
        if size.x > 0.0 {
            scale = scale.min(avail_w / size.x);
        }
        if size.y > 0.0 {
            scale = scale.min(avail_h / size.y);
        }
        if !scale.is_finite() || scale <= 0.0 {
            scale = 1.0;
        }
        self.scale = self.clamp_scale(scale).unwrap_or(1.0);

        let screen_center = DVec2::new(width * 0.5, height * 0.5);
        self.offset = screen_center - world.center() * self.scale;
    }

    /// Clamp into the configured range; `None` when the result is not a usable scale
    fn clamp_scale(&self, scale: f64) -> Option<f64> {
        let clamped = scale
            .max(self.config.min_scale)
            .min(self.config.max_scale)
            .clamp(SCALE_FLOOR, SCALE_CEILING);
        (clamped.is_finite() && clamped > 0.0).then_some(clamped)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-6 * (1.0 + b.length()), "{a} != {b}");
    }

    #[test]
    fn test_zoom_at_scenario() {
        let mut cam = Camera::default();
        let world = DVec2::new(100.0, 100.0);
        assert_eq!(cam.to_screen(world), DVec2::new(100.0, 100.0));

        assert!(cam.zoom_at(100.0, 100.0, 2.0));
        assert_eq!(cam.scale, 2.0);
        assert_eq!(cam.offset, DVec2::new(-100.0, -100.0));
        assert_eq!(cam.to_screen(world), DVec2::new(100.0, 100.0));
    }

    #[test]
    fn test_zoom_keeps_cursor_anchored() {
        let starts = [
            (1.0, DVec2::ZERO),
            (0.37, DVec2::new(120.0, -45.0)),
            (8.5, DVec2::new(-3000.0, 2500.5)),
        ];
        let cursors = [DVec2::new(0.0, 0.0), DVec2::new(317.0, 41.5), DVec2::new(-20.0, 900.0)];
        let factors = [0.01, 0.5, 1.0001, 3.0, 250.0];

        for (scale, offset) in starts {
            for cursor in cursors {
                for factor in factors {
                    let mut cam = Camera {
                        scale,
                        offset,
                        config: CameraConfig::default(),
                    };
                    let under_cursor = cam.to_world(cursor);
                    cam.zoom_at(cursor.x, cursor.y, factor);
                    assert_close(cam.to_screen(under_cursor), cursor);
                }
            }
        }
    }

    #[test]
    fn test_zoom_clamped_still_anchored() {
        let mut cam = Camera::new(CameraConfig::bounded());
        let cursor = DVec2::new(50.0, 80.0);
        let under_cursor = cam.to_world(cursor);

        assert!(cam.zoom_at(cursor.x, cursor.y, 100.0));
        assert_eq!(cam.scale, 10.0);
        assert_close(cam.to_screen(under_cursor), cursor);

        // Already at the limit: no change
        assert!(!cam.zoom_at(cursor.x, cursor.y, 2.0));
        assert!(cam.zoom_at(cursor.x, cursor.y, 0.0001));
        assert_eq!(cam.scale, 1.0);
    }

    #[test]
    fn test_zoom_rejects_invalid_factor() {
        let mut cam = Camera::default();
        for f in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(!cam.zoom_at(10.0, 10.0, f));
        }
        assert_eq!(cam.scale, 1.0);
        assert_eq!(cam.offset, DVec2::ZERO);
    }

    #[test]
    fn test_pan_roundtrip_is_exact() {
        let mut cam = Camera::default();
        cam.pan_by(42.0, -17.0);
        cam.pan_by(-42.0, 17.0);
        assert_eq!(cam.offset, DVec2::ZERO);

        cam.pan_by(13.25, -7.5);
        cam.zoom_at(0.0, 0.0, 2.0);
        let before = cam.offset;
        cam.pan_by(3.5, 0.25);
        cam.pan_by(-3.5, -0.25);
        assert_eq!(cam.offset, before);
        assert_eq!(cam.scale, 2.0);
    }

    #[test]
    fn test_wheel_direction() {
        let config = CameraConfig::default();
        assert!(config.wheel_factor(-100.0) > 1.0);
        assert!(config.wheel_factor(100.0) < 1.0);
        assert_eq!(config.wheel_factor(0.0), 1.0);
        assert!((config.wheel_factor(-100.0) - 1.1).abs() < 1e-12);
        // Two half-steps equal one full step
        let half = config.wheel_factor(-50.0);
        assert!((half * half - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_visible_world_rect() {
        let mut cam = Camera::default();
        cam.zoom_at(0.0, 0.0, 2.0);
        cam.pan_by(100.0, 50.0);
        let rect = cam.visible_world_rect(200.0, 100.0);
        assert_close(rect.min, DVec2::new(-50.0, -25.0));
        assert_close(rect.max, DVec2::new(50.0, 25.0));
    }

    #[test]
    fn test_fit_centers_world() {
        let mut cam = Camera::default();
        let world = Rect::new(DVec2::new(-500.0, -200.0), DVec2::new(500.0, 200.0));
        cam.fit(world, 220.0, 120.0, 10.0);
        assert!((cam.scale - 0.2).abs() < 1e-12);
        assert_close(cam.to_screen(world.center()), DVec2::new(110.0, 60.0));
    }

    #[test]
    fn test_fit_degenerate_world() {
        let mut cam = Camera::default();
        let world = Rect::new(DVec2::new(5.0, 5.0), DVec2::new(5.0, 5.0));
        cam.fit(world, 0.0, 0.0, 10.0);
        assert_eq!(cam.scale, 1.0);
        assert!(cam.offset.is_finite());
    }

    #[test]
    fn test_unbounded_zoom_stays_representable() {
        let mut cam = Camera::default();
        for _ in 0..2000 {
            cam.zoom_at(150.0, 85.0, 0.5);
        }
        assert_eq!(cam.scale, SCALE_FLOOR);
        assert!((1.0 / cam.scale).is_finite());
        assert!(cam.offset.is_finite());

        for _ in 0..4000 {
            cam.zoom_at(150.0, 85.0, 2.0);
        }
        assert_eq!(cam.scale, SCALE_CEILING);
        assert!(!cam.zoom_at(150.0, 85.0, 2.0));
    }

    #[test]
    fn test_fit_small_viewport_uses_reduced_padding() {
        let mut cam = Camera::default();
        let world = Rect::new(DVec2::new(0.0, 0.0), DVec2::new(1000.0, 1000.0));
        cam.fit(world, 156.0, 84.0, 40.0);
        // Padding capped at 8.4, leaving 67.2 px of height
        assert!((cam.scale - 0.0672).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut cam = Camera::new(CameraConfig::bounded());
        cam.zoom_at(1.0, 1.0, 4.0);
        cam.pan_by(5.0, 5.0);
        cam.reset();
        assert_eq!(cam.scale, 1.0);
        assert_eq!(cam.offset, DVec2::ZERO);
    }
}
