//! Per-shape rasterization into a caller-owned pixel buffer.
//!
//! Shapes are painted strictly in document order; each one composites over
//! what is already in the buffer. All geometry is clamped to buffer bounds,
//! and degenerate shapes (zero radius, fewer than 3 polygon points,
//! zero-length lines) are skipped, so rasterization never fails.
//!
//! Coordinates map from view-box space to pixel space independently per
//! axis (`pixel = (svg - origin) / view_box_size * buffer_size`); the image
//! stretches to fill the buffer rather than preserving aspect ratio.
//!
//! Stroking steps along each segment and stamps filled discs of radius
//! `stroke_width / 2`, which yields implicit round joins and caps from the
//! overlapping discs. This is an approximation, not a capsule-exact stroke.

use crate::basics::{clamp_f64, clamp_i32, PointD};
use crate::color::Rgba;
use crate::parser::Document;
use crate::path::flatten;
use crate::pixel_buffer::PixelBuffer;
use crate::scanline::fill_polygon;
use crate::shape::{Geometry, Shape};

/// Minimum stroke sampling density, in disc stamps per pixel of length.
pub const STROKE_SAMPLES_PER_PIXEL: f64 = 2.0;

/// Line segments per quarter-circle arc when a rounded rectangle is
/// approximated by a polygon.
const CORNER_ARC_SEGMENTS: usize = 8;

// ============================================================================
// View transform
// ============================================================================

/// Affine view-box -> pixel mapping, fixed per rasterize call.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    origin: PointD,
    scale_x: f64,
    scale_y: f64,
}

impl ViewTransform {
    pub fn new(doc: &Document, buf: &PixelBuffer) -> Self {
        // Document invariant: view_box_size is positive.
        Self {
            origin: doc.view_box_origin,
            scale_x: buf.width() as f64 / doc.view_box_size.x,
            scale_y: buf.height() as f64 / doc.view_box_size.y,
        }
    }

    #[inline]
    fn to_pixel(&self, p: PointD) -> PointD {
        PointD::new(
            (p.x - self.origin.x) * self.scale_x,
            (p.y - self.origin.y) * self.scale_y,
        )
    }

    #[inline]
    fn len_x(&self, v: f64) -> f64 {
        v * self.scale_x
    }

    #[inline]
    fn len_y(&self, v: f64) -> f64 {
        v * self.scale_y
    }

    /// Disc radius in pixels for a stroke width in view-box units. The two
    /// axis scales can differ; discs are circular, so take their mean.
    #[inline]
    fn stroke_radius(&self, width: f64) -> f64 {
        width * 0.5 * (self.scale_x + self.scale_y) * 0.5
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Rasterize every shape of `doc`, in document order, into `buf`.
///
/// The buffer is caller-owned and pre-filled; it is only blended into,
/// never cleared or resized.
pub fn rasterize(doc: &Document, buf: &mut PixelBuffer) {
    if buf.width() == 0 || buf.height() == 0 {
        return;
    }
    let vt = ViewTransform::new(doc, buf);
    for shape in &doc.shapes {
        rasterize_shape(shape, &vt, buf);
    }
}

/// Rasterize one shape. Fill paints first, then stroke over it.
pub fn rasterize_shape(shape: &Shape, vt: &ViewTransform, buf: &mut PixelBuffer) {
    match &shape.geometry {
        Geometry::Rect {
            x,
            y,
            width,
            height,
            rx,
            ry,
        } => rasterize_rect(shape, *x, *y, *width, *height, *rx, *ry, vt, buf),
        Geometry::Circle { cx, cy, r } => {
            rasterize_ellipse(shape, *cx, *cy, *r, *r, vt, buf);
        }
        Geometry::Ellipse { cx, cy, rx, ry } => {
            rasterize_ellipse(shape, *cx, *cy, *rx, *ry, vt, buf);
        }
        Geometry::Line { x1, y1, x2, y2 } => {
            if shape.has_stroke {
                let a = vt.to_pixel(PointD::new(*x1, *y1));
                let b = vt.to_pixel(PointD::new(*x2, *y2));
                stroke_segment(a, b, vt.stroke_radius(shape.stroke_width), shape.stroke_color, buf);
            }
        }
        Geometry::Polyline { points } => {
            if shape.has_stroke {
                let pts: Vec<PointD> = points.iter().map(|p| vt.to_pixel(*p)).collect();
                stroke_polyline(&pts, false, vt.stroke_radius(shape.stroke_width), shape.stroke_color, buf);
            }
        }
        Geometry::Polygon { points } => {
            let pts: Vec<PointD> = points.iter().map(|p| vt.to_pixel(*p)).collect();
            fill_and_stroke_loop(shape, &pts, vt, buf);
        }
        Geometry::Path { commands } => {
            let pts: Vec<PointD> = flatten(commands)
                .into_iter()
                .map(|p| vt.to_pixel(p))
                .collect();
            fill_and_stroke_loop(shape, &pts, vt, buf);
        }
    }
}

/// Shared tail for polygon and flattened path: nonzero-winding fill of the
/// implicitly closed point loop, then a closed stroke.
fn fill_and_stroke_loop(shape: &Shape, pts: &[PointD], vt: &ViewTransform, buf: &mut PixelBuffer) {
    if shape.has_fill {
        fill_polygon(pts, shape.fill_color, buf);
    }
    if shape.has_stroke {
        stroke_polyline(pts, true, vt.stroke_radius(shape.stroke_width), shape.stroke_color, buf);
    }
}

// ============================================================================
// Rect
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn rasterize_rect(
    shape: &Shape,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rx: f64,
    ry: f64,
    vt: &ViewTransform,
    buf: &mut PixelBuffer,
) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let p0 = vt.to_pixel(PointD::new(x, y));
    let p1 = vt.to_pixel(PointD::new(x + width, y + height));

    if shape.has_fill {
        if rx > 0.0 || ry > 0.0 {
            let poly: Vec<PointD> = rounded_rect_polygon(x, y, width, height, rx, ry)
                .into_iter()
                .map(|p| vt.to_pixel(p))
                .collect();
            fill_polygon(&poly, shape.fill_color, buf);
        } else {
            fill_rect_spans(p0, p1, shape.fill_color, buf);
        }
    }

    if shape.has_stroke {
        // Stroke follows the un-rounded edges even when corners are rounded.
        let radius = vt.stroke_radius(shape.stroke_width);
        let corners = [
            p0,
            PointD::new(p1.x, p0.y),
            p1,
            PointD::new(p0.x, p1.y),
        ];
        for i in 0..4 {
            stroke_segment(corners[i], corners[(i + 1) % 4], radius, shape.stroke_color, buf);
        }
    }
}

/// Direct scanline fill of an axis-aligned pixel-space box, painting the
/// pixels whose centers fall inside the half-open rectangle.
fn fill_rect_spans(p0: PointD, p1: PointD, color: Rgba, buf: &mut PixelBuffer) {
    let (x0, x1) = if p0.x <= p1.x { (p0.x, p1.x) } else { (p1.x, p0.x) };
    let (y0, y1) = if p0.y <= p1.y { (p0.y, p1.y) } else { (p1.y, p0.y) };
    let first_x = clamp_i32((x0 - 0.5).ceil() as i32, 0, buf.width() as i32 - 1);
    let last_x = clamp_i32((x1 - 0.5).ceil() as i32 - 1, 0, buf.width() as i32 - 1);
    let first_y = clamp_i32((y0 - 0.5).ceil() as i32, 0, buf.height() as i32 - 1);
    let last_y = clamp_i32((y1 - 0.5).ceil() as i32 - 1, 0, buf.height() as i32 - 1);
    for py in first_y..=last_y {
        let cy = py as f64 + 0.5;
        if cy < y0 || cy >= y1 {
            continue;
        }
        for px in first_x..=last_x {
            let cx = px as f64 + 0.5;
            if cx >= x0 && cx < x1 {
                buf.blend_pixel(px, py, color);
            }
        }
    }
}

/// Approximate a rounded rectangle by a polygon: straight edges joined by
/// 8-segment quarter-circle arcs, radii clamped to half the shorter side.
fn rounded_rect_polygon(x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64) -> Vec<PointD> {
    let max_r = width.min(height) * 0.5;
    let rx = clamp_f64(rx, 0.0, max_r);
    let ry = clamp_f64(ry, 0.0, max_r);

    // Corner arc centers, in drawing order starting after the top-left arc,
    // with the quarter sweep's start angle (y axis points down).
    let corners = [
        (PointD::new(x + width - rx, y + ry), 1.5 * std::f64::consts::PI), // top-right
        (PointD::new(x + width - rx, y + height - ry), 0.0),               // bottom-right
        (PointD::new(x + rx, y + height - ry), 0.5 * std::f64::consts::PI), // bottom-left
        (PointD::new(x + rx, y + ry), std::f64::consts::PI),               // top-left
    ];

    let mut pts = Vec::with_capacity(4 * (CORNER_ARC_SEGMENTS + 1));
    for (center, start_angle) in corners {
        for i in 0..=CORNER_ARC_SEGMENTS {
            let angle = start_angle
                + 0.5 * std::f64::consts::PI * (i as f64 / CORNER_ARC_SEGMENTS as f64);
            pts.push(PointD::new(
                center.x + rx * angle.cos(),
                center.y + ry * angle.sin(),
            ));
        }
    }
    pts
}

// ============================================================================
// Circle / Ellipse
// ============================================================================

fn rasterize_ellipse(
    shape: &Shape,
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    vt: &ViewTransform,
    buf: &mut PixelBuffer,
) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let center = vt.to_pixel(PointD::new(cx, cy));
    let rxp = vt.len_x(rx);
    let ryp = vt.len_y(ry);

    if shape.has_fill {
        ellipse_test(center, rxp, ryp, buf, |d2| d2 <= 1.0, shape.fill_color);
    }

    if shape.has_stroke {
        // Annulus between radii offset by half the stroke width, converted
        // to pixel units per axis.
        let hx = vt.len_x(shape.stroke_width) * 0.5;
        let hy = vt.len_y(shape.stroke_width) * 0.5;
        let (oxr, oyr) = (rxp + hx, ryp + hy);
        let (ixr, iyr) = ((rxp - hx).max(0.0), (ryp - hy).max(0.0));
        let first_x = clamp_i32((center.x - oxr).floor() as i32, 0, buf.width() as i32 - 1);
        let last_x = clamp_i32((center.x + oxr).ceil() as i32, 0, buf.width() as i32 - 1);
        let first_y = clamp_i32((center.y - oyr).floor() as i32, 0, buf.height() as i32 - 1);
        let last_y = clamp_i32((center.y + oyr).ceil() as i32, 0, buf.height() as i32 - 1);
        for py in first_y..=last_y {
            for px in first_x..=last_x {
                let dx = px as f64 + 0.5 - center.x;
                let dy = py as f64 + 0.5 - center.y;
                let outer = (dx / oxr) * (dx / oxr) + (dy / oyr) * (dy / oyr);
                if outer > 1.0 {
                    continue;
                }
                let inner_hit = ixr > 0.0
                    && iyr > 0.0
                    && (dx / ixr) * (dx / ixr) + (dy / iyr) * (dy / iyr) < 1.0;
                if !inner_hit {
                    buf.blend_pixel(px, py, shape.stroke_color);
                }
            }
        }
    }
}

/// Per-pixel inside test over the ellipse's bounding box; `accept` receives
/// the normalized squared distance from center.
fn ellipse_test<F: Fn(f64) -> bool>(
    center: PointD,
    rxp: f64,
    ryp: f64,
    buf: &mut PixelBuffer,
    accept: F,
    color: Rgba,
) {
    if rxp <= 0.0 || ryp <= 0.0 {
        return;
    }
    let first_x = clamp_i32((center.x - rxp).floor() as i32, 0, buf.width() as i32 - 1);
    let last_x = clamp_i32((center.x + rxp).ceil() as i32, 0, buf.width() as i32 - 1);
    let first_y = clamp_i32((center.y - ryp).floor() as i32, 0, buf.height() as i32 - 1);
    let last_y = clamp_i32((center.y + ryp).ceil() as i32, 0, buf.height() as i32 - 1);
    for py in first_y..=last_y {
        for px in first_x..=last_x {
            let dx = (px as f64 + 0.5 - center.x) / rxp;
            let dy = (py as f64 + 0.5 - center.y) / ryp;
            if accept(dx * dx + dy * dy) {
                buf.blend_pixel(px, py, color);
            }
        }
    }
}

// ============================================================================
// Stroking
// ============================================================================

/// Stroke consecutive segments of `pts`; `closed` adds the last-to-first
/// segment (polygon and path outlines).
fn stroke_polyline(pts: &[PointD], closed: bool, radius: f64, color: Rgba, buf: &mut PixelBuffer) {
    if pts.len() < 2 {
        return;
    }
    for w in pts.windows(2) {
        stroke_segment(w[0], w[1], radius, color, buf);
    }
    if closed && pts.len() > 2 {
        stroke_segment(pts[pts.len() - 1], pts[0], radius, color, buf);
    }
}

/// Stamp filled discs along the segment at `STROKE_SAMPLES_PER_PIXEL`
/// density. Zero-length segments are skipped.
fn stroke_segment(a: PointD, b: PointD, radius: f64, color: Rgba, buf: &mut PixelBuffer) {
    if radius <= 0.0 {
        return;
    }
    let len = a.distance_to(b);
    if len <= 0.0 {
        return;
    }
    let steps = ((len * STROKE_SAMPLES_PER_PIXEL).ceil() as usize).max(1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let c = PointD::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        stamp_disc(c, radius, color, buf);
    }
}

/// Fill a disc by testing Euclidean distance over its bounding box.
fn stamp_disc(center: PointD, radius: f64, color: Rgba, buf: &mut PixelBuffer) {
    let first_x = clamp_i32((center.x - radius).floor() as i32, 0, buf.width() as i32 - 1);
    let last_x = clamp_i32((center.x + radius).ceil() as i32, 0, buf.width() as i32 - 1);
    let first_y = clamp_i32((center.y - radius).floor() as i32, 0, buf.height() as i32 - 1);
    let last_y = clamp_i32((center.y + radius).ceil() as i32, 0, buf.height() as i32 - 1);
    let r2 = radius * radius;
    for py in first_y..=last_y {
        for px in first_x..=last_x {
            let dx = px as f64 + 0.5 - center.x;
            let dy = py as f64 + 0.5 - center.y;
            if dx * dx + dy * dy <= r2 {
                buf.blend_pixel(px, py, color);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
