//! Rasterizing screen-space paths onto a Braille canvas.

use glam::DVec2;

use crate::braille::BrailleCanvas;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Two-pixel stroke for major roads
pub fn draw_thick_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    draw_line(canvas, x0, y0, x1, y1);
    draw_line(canvas, x0 + 1, y0, x1 + 1, y1);
    draw_line(canvas, x0, y0 + 1, x1, y1 + 1);
}

/// Liang-Barsky clip of segment `a -> b` against `[min, max]`.
/// Keeps Bresenham bounded when a vertex lies far off screen.
pub fn clip_segment(a: DVec2, b: DVec2, min: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((a + d * t0, a + d * t1))
}

/// Stroke a screen-space polyline, clipped to the canvas pixel area
pub fn draw_path(canvas: &mut BrailleCanvas, path: &[DVec2], thick: bool) {
    let (w, h) = canvas.pixel_size();
    if w == 0 || h == 0 {
        return;
    }
    // One pixel of slack so thick strokes reach the edges
    let min = DVec2::splat(-1.0);
    let max = DVec2::new(w as f64, h as f64);

    for seg in path.windows(2) {
        if !(seg[0].is_finite() && seg[1].is_finite()) {
            continue;
        }
        let Some((a, b)) = clip_segment(seg[0], seg[1], min, max) else {
            continue;
        };
        let (x0, y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
        if thick {
            draw_thick_line(canvas, x0, y0, x1, y1);
        } else {
            draw_line(canvas, x0, y0, x1, y1);
        }
    }
}
