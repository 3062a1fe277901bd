//! Douglas-Peucker polyline simplification.
//!
//! Uses an explicit work stack instead of recursion so long near-collinear
//! inputs cannot exhaust the call stack. Distances are measured to the chord
//! *segment* (projection clamped to its endpoints) and compared squared.

use glam::DVec2;

use crate::{Error, Result};

/// Simplify `points`, keeping every point farther than `tolerance` from the
/// chord of the range it splits. First and last points are always kept.
///
/// Inputs with two points or fewer are returned unchanged. A non-positive or
/// non-finite tolerance is a caller bug and is rejected.
pub fn simplify(points: &[DVec2], tolerance: f64) -> Result<Vec<DVec2>> {
    let kept = simplify_indices(points, tolerance)?;
    Ok(kept.into_iter().map(|i| points[i]).collect())
}

/// Same as [`simplify`] but returns the indices of the kept points, ascending
pub fn simplify_indices(points: &[DVec2], tolerance: f64) -> Result<Vec<usize>> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(Error::InvalidTolerance { tolerance });
    }

    let n = points.len();
    if n <= 2 {
        return Ok((0..n).collect());
    }

    let tolerance_sq = tolerance * tolerance;
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let a = points[start];
        let b = points[end];
        let mut max_dist_sq = 0.0;
        let mut peak = start;

        // Strict comparison: ties resolve to the earliest index
        for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = segment_distance_sq(p, a, b);
            if d > max_dist_sq {
                max_dist_sq = d;
                peak = i;
            }
        }

        if max_dist_sq > tolerance_sq {
            keep[peak] = true;
            stack.push((peak, end));
            stack.push((start, peak));
        }
    }

    Ok(keep
        .iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect())
}

/// Squared distance from `p` to the segment `a`-`b`
#[inline(always)]
pub fn segment_distance_sq(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}
