//! Nonzero-winding scanline polygon fill.
//!
//! Fills an arbitrary (possibly self-intersecting) polygon given in pixel
//! space, sampling each row at the pixel center `y + 0.5`. No anti-aliasing:
//! a pixel is either painted or left alone, and painting composites through
//! [`PixelBuffer::blend_pixel`].

use crate::basics::{clamp_i32, PointD};
use crate::color::Rgba;
use crate::pixel_buffer::PixelBuffer;

/// One edge crossing on a scanline: x position plus winding direction.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    x: f64,
    winding: i32,
}

/// Fill `points` (implicitly closed, last vertex wrapping to the first)
/// with `color` under the nonzero winding rule.
///
/// Degenerate input (fewer than 3 vertices) is a no-op.
pub fn fill_polygon(points: &[PointD], color: Rgba, buf: &mut PixelBuffer) {
    if points.len() < 3 || buf.width() == 0 || buf.height() == 0 {
        return;
    }

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for p in points {
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    let row_first = clamp_i32(y_min.floor() as i32, 0, buf.height() as i32 - 1);
    let row_last = clamp_i32(y_max.ceil() as i32, 0, buf.height() as i32 - 1);

    let mut crossings: Vec<Crossing> = Vec::new();
    for row in row_first..=row_last {
        let sample_y = row as f64 + 0.5;
        crossings.clear();

        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
            // Strict on both ends: horizontal edges and exact-vertex hits
            // contribute nothing.
            if sample_y > lo && sample_y < hi {
                let t = (sample_y - a.y) / (b.y - a.y);
                crossings.push(Crossing {
                    x: a.x + t * (b.x - a.x),
                    winding: if b.y > a.y { 1 } else { -1 },
                });
            }
        }
        if crossings.len() < 2 {
            continue;
        }
        crossings.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut winding = 0;
        for k in 0..crossings.len() - 1 {
            winding += crossings[k].winding;
            if winding == 0 {
                continue;
            }
            // Paint pixels whose centers lie in the half-open span
            // [crossings[k].x, crossings[k+1].x).
            let first = (crossings[k].x - 0.5).ceil() as i32;
            let last = (crossings[k + 1].x - 0.5).ceil() as i32 - 1;
            let first = clamp_i32(first, 0, buf.width() as i32 - 1);
            let last = clamp_i32(last, 0, buf.width() as i32 - 1);
            for px in first..=last {
                if (px as f64 + 0.5) >= crossings[k].x && (px as f64 + 0.5) < crossings[k + 1].x {
                    buf.blend_pixel(px, row, color);
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(buf: &PixelBuffer, x: i32, y: i32) -> bool {
        buf.pixel(x, y).map(|p| p.a > 0.5).unwrap_or(false)
    }

    #[test]
    fn test_square_fills_exact_pixels() {
        let mut buf = PixelBuffer::new(10, 10);
        let pts = [
            PointD::new(2.0, 2.0),
            PointD::new(8.0, 2.0),
            PointD::new(8.0, 8.0),
            PointD::new(2.0, 8.0),
        ];
        fill_polygon(&pts, Rgba::BLACK, &mut buf);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (2..8).contains(&x) && (2..8).contains(&y);
                assert_eq!(opaque(&buf, x, y), inside, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_degenerate_polygon_is_noop() {
        let mut buf = PixelBuffer::new(4, 4);
        fill_polygon(&[PointD::new(0.0, 0.0), PointD::new(3.0, 3.0)], Rgba::BLACK, &mut buf);
        assert!(buf.data().iter().all(|p| p.a == 0.0));
    }

    #[test]
    fn test_bowtie_nonzero_winding() {
        // Self-intersecting bowtie: (0,0) (10,0) (0,10) (10,10). Each row
        // crosses the two diagonal edges once, with windings summing to a
        // nonzero value between them, so both lobes fill.
        let mut buf = PixelBuffer::new(10, 10);
        let pts = [
            PointD::new(0.0, 0.0),
            PointD::new(10.0, 0.0),
            PointD::new(0.0, 10.0),
            PointD::new(10.0, 10.0),
        ];
        fill_polygon(&pts, Rgba::BLACK, &mut buf);

        // Row y=2 (sample 2.5): edges cross at x=2.5 (winding -1) and
        // x=7.5 (winding +1); pixels 2..=6 painted.
        for x in 0..10 {
            assert_eq!(opaque(&buf, x, 2), (2..=6).contains(&x), "row 2, x={}", x);
        }
        // Row y=7 (sample 7.5): crossings at x=2.5 (+1) and x=7.5 (-1).
        for x in 0..10 {
            assert_eq!(opaque(&buf, x, 7), (2..=6).contains(&x), "row 7, x={}", x);
        }
        // Middle row y=5 (sample 5.5): crossings at x=4.5 and x=5.5.
        // The half-open span covers pixel 4 (center 4.5) but not pixel 5
        // (center 5.5).
        assert!(opaque(&buf, 4, 5));
        assert!(!opaque(&buf, 6, 5));
    }

    #[test]
    fn test_winding_cancels_in_opposite_subpolygons() {
        // Two concentric squares wound in opposite directions: the inner
        // square is a hole under the nonzero rule.
        let pts = [
            PointD::new(1.0, 1.0),
            PointD::new(9.0, 1.0),
            PointD::new(9.0, 9.0),
            PointD::new(1.0, 9.0),
            PointD::new(1.0, 1.0),
            PointD::new(3.0, 3.0),
            PointD::new(3.0, 7.0),
            PointD::new(7.0, 7.0),
            PointD::new(7.0, 3.0),
            PointD::new(3.0, 3.0),
        ];
        let mut buf = PixelBuffer::new(10, 10);
        fill_polygon(&pts, Rgba::BLACK, &mut buf);
        assert!(opaque(&buf, 2, 5));
        assert!(!opaque(&buf, 5, 5), "hole must stay empty");
        assert!(opaque(&buf, 8, 5));
    }
}
