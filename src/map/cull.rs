use glam::DVec2;

/// Axis-aligned rectangle in planar coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub const fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Bounding box of the points, `None` for an empty slice
    pub fn from_points(points: &[DVec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Rect::new(*first, *first);
        for &p in rest {
            rect.min = rect.min.min(p);
            rect.max = rect.max.max(p);
        }
        Some(rect)
    }

    pub fn union(self, other: Rect) -> Rect {
        Rect::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Overlapping part of two rectangles, `None` if they are disjoint
    pub fn intersection(self, other: Rect) -> Option<Rect> {
        if !self.intersects(&other) {
            return None;
        }
        Some(Rect::new(self.min.max(other.min), self.max.min(other.max)))
    }

    /// Closed-interval overlap test; touching edges count as overlap
    #[inline(always)]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

/// Whether a road's bounding box overlaps the visible world rectangle
#[inline(always)]
pub fn is_visible(road_bbox: &Rect, visible: &Rect) -> bool {
    road_bbox.intersects(visible)
}
