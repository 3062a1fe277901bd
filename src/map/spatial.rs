use std::collections::HashMap;

use glam::DVec2;

use crate::map::cull::Rect;

/// Cells per axis the network extent is divided into
const TARGET_CELLS_PER_AXIS: f64 = 64.0;

/// Spatial index over road bounding boxes using conservative approximation.
/// Each road is inserted into every cell its bbox overlaps, guaranteeing no
/// false negatives while allowing false positives (removed by the exact
/// bbox test afterwards).
pub struct RoadGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
    /// Union of all indexed boxes; queries are clamped to it
    extent: Option<Rect>,
}

impl RoadGrid {
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cells: HashMap::new(),
            cell_size,
            extent: None,
        }
    }

    #[inline(always)]
    fn to_cell(&self, p: DVec2) -> (i32, i32) {
        let x = (p.x / self.cell_size).floor() as i32;
        let y = (p.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from road bounding boxes in road order. `None` entries
    /// (degenerate roads) are never returned by queries.
    pub fn build<'a>(bboxes: impl Iterator<Item = Option<&'a Rect>> + Clone) -> Self {
        let extent = bboxes.clone().flatten().copied().reduce(Rect::union);
        let cell_size = extent
            .map(|e| e.size().max_element() / TARGET_CELLS_PER_AXIS)
            .unwrap_or(1.0);

        let mut grid = Self::new(cell_size);
        grid.extent = extent;
        for (idx, bbox) in bboxes.enumerate() {
            let Some(bbox) = bbox else { continue };
            let min_cell = grid.to_cell(bbox.min);
            let max_cell = grid.to_cell(bbox.max);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Candidate road indices whose cells overlap `area`, sorted ascending
    /// and deduplicated so callers see roads in their original order.
    pub fn query(&self, area: &Rect) -> Vec<usize> {
        let Some(area) = self.extent.and_then(|e| e.intersection(*area)) else {
            return Vec::new();
        };

        let min_cell = self.to_cell(area.min);
        let max_cell = self.to_cell(area.max);
        let mut results = Vec::new();
        for y in min_cell.1..=max_cell.1 {
            for x in min_cell.0..=max_cell.0 {
                if let Some(indices) = self.cells.get(&(x, y)) {
                    results.extend_from_slice(indices);
                }
            }
        }
        results.sort_unstable();
        results.dedup();
        results
    }

    pub fn extent(&self) -> Option<Rect> {
        self.extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(DVec2::new(x0, y0), DVec2::new(x1, y1))
    }

    #[test]
    fn test_query_returns_sorted_unique_candidates() {
        let boxes = [
            Some(rect(0.0, 0.0, 100.0, 100.0)),
            None,
            Some(rect(500.0, 500.0, 640.0, 640.0)),
            Some(rect(40.0, 40.0, 60.0, 60.0)),
        ];
        let grid = RoadGrid::build(boxes.iter().map(|b| b.as_ref()));

        let hits = grid.query(&rect(30.0, 30.0, 70.0, 70.0));
        assert!(hits.contains(&0));
        assert!(hits.contains(&3));
        assert!(!hits.contains(&1));
        assert!(!hits.contains(&2));
        assert!(hits.windows(2).all(|w| w[0] < w[1]));

        let everything = grid.query(&rect(-1e12, -1e12, 1e12, 1e12));
        assert_eq!(everything, vec![0, 2, 3]);
    }

    #[test]
    fn test_query_outside_extent_is_empty() {
        let boxes = [Some(rect(0.0, 0.0, 10.0, 10.0))];
        let grid = RoadGrid::build(boxes.iter().map(|b| b.as_ref()));
        assert!(grid.query(&rect(100.0, 100.0, 200.0, 200.0)).is_empty());
    }

    #[test]
    fn test_zero_extent_grid() {
        let boxes = [Some(rect(3.0, 3.0, 3.0, 3.0)), Some(rect(3.0, 3.0, 3.0, 3.0))];
        let grid = RoadGrid::build(boxes.iter().map(|b| b.as_ref()));
        assert_eq!(grid.query(&rect(0.0, 0.0, 5.0, 5.0)), vec![0, 1]);
    }

    #[test]
    fn test_empty_grid() {
        let boxes: [Option<Rect>; 0] = [];
        let grid = RoadGrid::build(boxes.iter().map(|b| b.as_ref()));
        assert!(grid.extent().is_none());
        assert!(grid.query(&rect(0.0, 0.0, 1.0, 1.0)).is_empty());
    }
}
