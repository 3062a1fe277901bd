use glam::DVec2;

use crate::geo::{Bounds, GeoPoint};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Pixels left empty around the dataset by [`project_to_viewport`]
pub const VIEWPORT_PADDING: f64 = 40.0;

/// Padding actually applied to a `width` x `height` viewport: at most a tenth
/// of the shorter side, so small terminals still get a usable area.
pub fn fit_padding(padding: f64, width: f64, height: f64) -> f64 {
    let cap = (width.min(height) * 0.1).max(0.0);
    if padding.is_finite() {
        padding.clamp(0.0, cap)
    } else {
        0.0
    }
}

/// Planar point produced by projection. `x` grows east, `y` grows south
/// so that the plane maps onto screen space with a plain scale + offset.
pub type PlanePoint = DVec2;

/// Local equirectangular projection around a reference point.
///
/// Longitude is compressed by `cos(reference latitude)` to account for meridian
/// convergence, latitude is linear. Distances and angles are approximately right
/// near the reference and degrade with distance from it.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    reference: GeoPoint,
    /// Meters per degree of longitude at the reference latitude
    lon_scale: f64,
    /// Meters per degree of latitude
    lat_scale: f64,
}

impl Projector {
    pub fn new(reference: GeoPoint) -> Self {
        let meters_per_degree = EARTH_RADIUS_M.to_radians();
        let cos_lat = reference.lat.to_radians().cos();
        // Non-finite reference or a pole: keep x uncompressed
        let cos_lat = if cos_lat.is_finite() && cos_lat > f64::EPSILON {
            cos_lat
        } else {
            1.0
        };

        Self {
            reference,
            lon_scale: meters_per_degree * cos_lat,
            lat_scale: meters_per_degree,
        }
    }

    /// Project a single geographic point to meters relative to the reference
    #[inline(always)]
    pub fn project_point(&self, p: GeoPoint) -> PlanePoint {
        DVec2::new(
            (p.lon - self.reference.lon) * self.lon_scale,
            -(p.lat - self.reference.lat) * self.lat_scale,
        )
    }

    /// Inverse of [`Projector::project_point`]
    pub fn unproject(&self, p: PlanePoint) -> GeoPoint {
        GeoPoint::new(
            self.reference.lat - p.y / self.lat_scale,
            self.reference.lon + p.x / self.lon_scale,
        )
    }
}

/// Scale and offset mapping a dataset's bounds into a fixed pixel rectangle,
/// uniformly scaled and centered with [`fit_padding`] on the tighter axis.
#[derive(Clone, Copy, Debug)]
pub struct ViewportFit {
    bounds: Bounds,
    /// Stretch applied to latitude so both axes share one scale
    lat_stretch: f64,
    scale: f64,
    offset: DVec2,
    height: f64,
}

impl ViewportFit {
    pub fn new(bounds: Bounds, width: f64, height: f64) -> Self {
        let avg_lat = (bounds.min_lat + bounds.max_lat) * 0.5;
        let cos_lat = avg_lat.to_radians().cos();
        let lat_stretch = if cos_lat.is_finite() && cos_lat > f64::EPSILON {
            1.0 / cos_lat
        } else {
            1.0
        };

        let lon_range = bounds.lon_span();
        let lat_range = bounds.lat_span() * lat_stretch;
        let padding = fit_padding(VIEWPORT_PADDING, width, height);
        let avail_w = (width - padding * 2.0).max(0.0);
        let avail_h = (height - padding * 2.0).max(0.0);

        // Zero-span axes do not constrain the scale
        let mut scale = f64::INFINITY;
        if lon_range > 0.0 {
            scale = scale.min(avail_w / lon_range);
        }
        if lat_range > 0.0 {
            scale = scale.min(avail_h / lat_range);
        }
        // Zero-span data or a zero-area viewport: identity scale
        if !scale.is_finite() || scale <= 0.0 {
            scale = 1.0;
        }

        let offset = DVec2::new(
            (width - lon_range * scale) * 0.5,
            (height - lat_range * scale) * 0.5,
        );

        Self {
            bounds,
            lat_stretch,
            scale,
            offset,
            height,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline(always)]
    pub fn project_point(&self, p: GeoPoint) -> PlanePoint {
        DVec2::new(
            (p.lon - self.bounds.min_lon) * self.scale + self.offset.x,
            self.height
                - ((p.lat - self.bounds.min_lat) * self.lat_stretch * self.scale + self.offset.y),
        )
    }
}

/// Project points so the whole `bounds` fits a `width` x `height` pixel rectangle
pub fn project_to_viewport(
    points: &[GeoPoint],
    bounds: &Bounds,
    width: f64,
    height: f64,
) -> Vec<PlanePoint> {
    let fit = ViewportFit::new(*bounds, width, height);
    points.iter().map(|&p| fit.project_point(p)).collect()
}
