//! Shape model: resolved paint plus a geometry sum type.
//!
//! A `Shape` carries paint that is already fully resolved at parse time —
//! group inheritance and the `opacity`/`fill-opacity`/`stroke-opacity`
//! multipliers are folded into the effective fill and stroke alpha, so the
//! rasterizer never looks back up the document tree.

use crate::basics::PointD;
use crate::color::Rgba;
use crate::path::PathCommand;

// ============================================================================
// Geometry
// ============================================================================

/// Type-specific geometry, in view-box coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
        ry: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: Vec<PointD>,
    },
    Polygon {
        points: Vec<PointD>,
    },
    Path {
        commands: Vec<PathCommand>,
    },
}

// ============================================================================
// Shape
// ============================================================================

/// One paintable element of the document.
///
/// Invariant: `has_stroke` is true only if `stroke_width > 0` and the
/// effective stroke alpha is > 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub fill_color: Rgba,
    pub has_fill: bool,
    pub stroke_color: Rgba,
    pub stroke_width: f64,
    pub has_stroke: bool,
    pub geometry: Geometry,
}

impl Shape {
    /// Build a shape, enforcing the stroke invariant.
    pub fn new(
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f64,
        geometry: Geometry,
    ) -> Self {
        let (fill_color, has_fill) = match fill {
            Some(c) if c.a > 0.0 => (c, true),
            _ => (Rgba::TRANSPARENT, false),
        };
        let (stroke_color, has_stroke) = match stroke {
            Some(c) if c.a > 0.0 && stroke_width > 0.0 => (c, true),
            _ => (Rgba::TRANSPARENT, false),
        };
        Self {
            fill_color,
            has_fill,
            stroke_color,
            stroke_width,
            has_stroke,
            geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_invariant() {
        let geom = Geometry::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        let s = Shape::new(None, Some(Rgba::BLACK), 0.0, geom.clone());
        assert!(!s.has_stroke);
        let s = Shape::new(None, Some(Rgba::new(0.0, 0.0, 0.0, 0.0)), 2.0, geom.clone());
        assert!(!s.has_stroke);
        let s = Shape::new(None, Some(Rgba::BLACK), 2.0, geom);
        assert!(s.has_stroke);
    }

    #[test]
    fn test_transparent_fill_disables_fill() {
        let geom = Geometry::Circle {
            cx: 0.0,
            cy: 0.0,
            r: 1.0,
        };
        let s = Shape::new(Some(Rgba::new(1.0, 0.0, 0.0, 0.0)), None, 0.0, geom);
        assert!(!s.has_fill);
    }
}
