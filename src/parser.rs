//! SVG document parser.
//!
//! Walks a `roxmltree` XML tree and emits a flat, ordered [`Shape`] list
//! plus the document coordinate system. Structural failures (markup that
//! does not parse, wrong root element) abort with [`ParseError`];
//! everything else degrades gracefully: unsupported elements are skipped,
//! missing numeric attributes default to 0, and unrecognized colors fall
//! back to the inherited value. Partial rendering of imperfect artwork
//! beats aborting on it.

use log::warn;
use thiserror::Error;

use crate::basics::PointD;
use crate::color::{parse_color, ColorSpec, Rgba};
use crate::path::parse_path_data;
use crate::scanner::parse_number_list;
use crate::shape::{Geometry, Shape};

/// Fallback for a missing/unparsable document width or height.
const DEFAULT_DOCUMENT_SIZE: f64 = 100.0;

// ============================================================================
// ParseError
// ============================================================================

/// Structural parse failures. Attribute-level problems are not errors;
/// they take documented fallbacks instead.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed markup: {0}")]
    MalformedMarkup(#[from] roxmltree::Error),
    #[error("root element is not <svg>")]
    MissingRoot,
}

// ============================================================================
// Document
// ============================================================================

/// A parsed document: coordinate system plus an ordered shape list.
///
/// The coordinate system is fixed at parse time. `view_box_size` is always
/// positive: a missing or malformed `viewBox` falls back to the document
/// size, which itself falls back to 100x100.
#[derive(Debug, Clone)]
pub struct Document {
    pub view_box_origin: PointD,
    pub view_box_size: PointD,
    pub document_size: PointD,
    pub has_view_box: bool,
    pub shapes: Vec<Shape>,
}

// ============================================================================
// Attribute helpers
// ============================================================================

fn attr_f64(node: roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn attr_opacity(node: roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(1.0)
}

/// Parse a `width`/`height` attribute, stripping a unit suffix.
fn parse_length(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return DEFAULT_DOCUMENT_SIZE;
    };
    let trimmed = value.trim();
    let numeric = trimmed
        .strip_suffix("px")
        .or_else(|| trimmed.strip_suffix("pt"))
        .or_else(|| trimmed.strip_suffix('%'))
        .unwrap_or(trimmed);
    match numeric.trim().parse::<f64>() {
        Ok(v) if v > 0.0 => v,
        _ => DEFAULT_DOCUMENT_SIZE,
    }
}

fn parse_points(text: &str) -> Vec<PointD> {
    let nums = parse_number_list(text);
    // A dangling odd coordinate is dropped.
    nums.chunks_exact(2)
        .map(|c| PointD::new(c[0], c[1]))
        .collect()
}

// ============================================================================
// Paint resolution
// ============================================================================

/// Paint state inherited from ancestor `<g>` elements, passed down by
/// recursion rather than stored per node.
#[derive(Debug, Clone, Copy)]
struct Inherited {
    /// `None` means `fill="none"` was inherited.
    fill: Option<Rgba>,
    opacity: f64,
}

impl Inherited {
    fn root() -> Self {
        // SVG paints black when nothing specifies a fill.
        Self {
            fill: Some(Rgba::BLACK),
            opacity: 1.0,
        }
    }
}

/// Resolve a shape's effective fill: its own attribute if present, else the
/// nearest ancestor's, with `opacity * fill-opacity` folded into alpha.
fn resolve_fill(node: roxmltree::Node<'_, '_>, inherited: &Inherited) -> Option<Rgba> {
    let base = match node.attribute("fill").map(parse_color) {
        Some(ColorSpec::NoPaint) => None,
        Some(ColorSpec::Color(c)) => Some(c),
        Some(ColorSpec::Inherit) | None => inherited.fill,
    };
    let alpha = inherited.opacity * attr_opacity(node, "opacity") * attr_opacity(node, "fill-opacity");
    base.map(|c| c.scaled_alpha(alpha))
}

/// Resolve a shape's effective stroke color. Strokes do not inherit through
/// groups; `inherit` or unrecognized text on a leaf means no stroke.
fn resolve_stroke(node: roxmltree::Node<'_, '_>, inherited: &Inherited) -> Option<Rgba> {
    let base = match node.attribute("stroke").map(parse_color) {
        Some(ColorSpec::Color(c)) => Some(c),
        _ => None,
    };
    let alpha =
        inherited.opacity * attr_opacity(node, "opacity") * attr_opacity(node, "stroke-opacity");
    base.map(|c| c.scaled_alpha(alpha))
}

fn stroke_width(node: roxmltree::Node<'_, '_>) -> f64 {
    node.attribute("stroke-width")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(1.0)
        .max(0.0)
}

// ============================================================================
// Element walk
// ============================================================================

fn build_shape(node: roxmltree::Node<'_, '_>, geometry: Geometry, inherited: &Inherited) -> Shape {
    Shape::new(
        resolve_fill(node, inherited),
        resolve_stroke(node, inherited),
        stroke_width(node),
        geometry,
    )
}

fn walk(node: roxmltree::Node<'_, '_>, inherited: &Inherited, shapes: &mut Vec<Shape>) {
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "g" => {
                let mut scope = *inherited;
                match child.attribute("fill").map(parse_color) {
                    Some(ColorSpec::NoPaint) => scope.fill = None,
                    Some(ColorSpec::Color(c)) => scope.fill = Some(c),
                    Some(ColorSpec::Inherit) | None => {}
                }
                scope.opacity *= attr_opacity(child, "opacity");
                walk(child, &scope, shapes);
            }
            "rect" => {
                let geometry = Geometry::Rect {
                    x: attr_f64(child, "x"),
                    y: attr_f64(child, "y"),
                    width: attr_f64(child, "width"),
                    height: attr_f64(child, "height"),
                    rx: attr_f64(child, "rx"),
                    ry: attr_f64(child, "ry"),
                };
                shapes.push(build_shape(child, geometry, inherited));
            }
            "circle" => {
                let geometry = Geometry::Circle {
                    cx: attr_f64(child, "cx"),
                    cy: attr_f64(child, "cy"),
                    r: attr_f64(child, "r"),
                };
                shapes.push(build_shape(child, geometry, inherited));
            }
            "ellipse" => {
                let geometry = Geometry::Ellipse {
                    cx: attr_f64(child, "cx"),
                    cy: attr_f64(child, "cy"),
                    rx: attr_f64(child, "rx"),
                    ry: attr_f64(child, "ry"),
                };
                shapes.push(build_shape(child, geometry, inherited));
            }
            "line" => {
                let geometry = Geometry::Line {
                    x1: attr_f64(child, "x1"),
                    y1: attr_f64(child, "y1"),
                    x2: attr_f64(child, "x2"),
                    y2: attr_f64(child, "y2"),
                };
                shapes.push(build_shape(child, geometry, inherited));
            }
            "polyline" => {
                let points = parse_points(child.attribute("points").unwrap_or(""));
                shapes.push(build_shape(child, Geometry::Polyline { points }, inherited));
            }
            "polygon" => {
                let points = parse_points(child.attribute("points").unwrap_or(""));
                shapes.push(build_shape(child, Geometry::Polygon { points }, inherited));
            }
            "path" => {
                let commands = parse_path_data(child.attribute("d").unwrap_or(""));
                shapes.push(build_shape(child, Geometry::Path { commands }, inherited));
            }
            other => {
                warn!("skipping unsupported element <{}>", other);
            }
        }
    }
}

// ============================================================================
// parse
// ============================================================================

/// Parse SVG source text into a [`Document`].
///
/// Fails only on markup that does not parse or a root element that is not
/// `<svg>`; see the module docs for the graceful-degradation policy.
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let xml = roxmltree::Document::parse(text)?;
    let root = xml.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ParseError::MissingRoot);
    }

    let document_size = PointD::new(
        parse_length(root.attribute("width")),
        parse_length(root.attribute("height")),
    );

    let mut view_box_origin = PointD::new(0.0, 0.0);
    let mut view_box_size = document_size;
    let mut has_view_box = false;
    if let Some(vb) = root.attribute("viewBox") {
        let nums = parse_number_list(vb);
        if nums.len() == 4 && nums[2] > 0.0 && nums[3] > 0.0 {
            view_box_origin = PointD::new(nums[0], nums[1]);
            view_box_size = PointD::new(nums[2], nums[3]);
            has_view_box = true;
        } else {
            warn!("malformed viewBox {:?}, falling back to document size", vb);
        }
    }

    let mut shapes = Vec::new();
    walk(root, &Inherited::root(), &mut shapes);

    Ok(Document {
        view_box_origin,
        view_box_size,
        document_size,
        has_view_box,
        shapes,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_is_error() {
        let err = parse("<not-svg><rect/></not-svg>").unwrap_err();
        assert!(matches!(err, ParseError::MissingRoot));
    }

    #[test]
    fn test_malformed_markup_is_error() {
        let err = parse("<svg><rect</svg>").unwrap_err();
        assert!(matches!(err, ParseError::MalformedMarkup(_)));
    }

    #[test]
    fn test_view_box_and_fallbacks() {
        let doc = parse(r#"<svg viewBox="0 0 200 100"/>"#).unwrap();
        assert!(doc.has_view_box);
        assert_eq!(doc.view_box_size, PointD::new(200.0, 100.0));
        // No width/height: document size falls back to 100x100.
        assert_eq!(doc.document_size, PointD::new(100.0, 100.0));

        let doc = parse(r#"<svg width="50px" height="30pt"/>"#).unwrap();
        assert!(!doc.has_view_box);
        assert_eq!(doc.document_size, PointD::new(50.0, 30.0));
        assert_eq!(doc.view_box_size, PointD::new(50.0, 30.0));

        let doc = parse(r#"<svg viewBox="0 0 -5 10"/>"#).unwrap();
        assert!(!doc.has_view_box);
        assert_eq!(doc.view_box_size, PointD::new(100.0, 100.0));
    }

    #[test]
    fn test_shape_attributes_default_to_zero() {
        let doc = parse(r#"<svg><rect width="10" height="5"/></svg>"#).unwrap();
        match &doc.shapes[0].geometry {
            Geometry::Rect { x, y, width, height, .. } => {
                assert_eq!((*x, *y, *width, *height), (0.0, 0.0, 10.0, 5.0));
            }
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn test_default_fill_is_black() {
        let doc = parse(r#"<svg><rect width="1" height="1"/></svg>"#).unwrap();
        let s = &doc.shapes[0];
        assert!(s.has_fill);
        assert_eq!(s.fill_color, Rgba::BLACK);
        assert!(!s.has_stroke);
    }

    #[test]
    fn test_group_fill_inheritance() {
        let doc = parse(r#"<svg><g fill="blue"><rect width="1" height="1"/></g></svg>"#).unwrap();
        let s = &doc.shapes[0];
        assert!(s.has_fill);
        assert_eq!(s.fill_color, Rgba::new_rgb(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_leaf_fill_overrides_group() {
        let doc = parse(
            r##"<svg><g fill="blue"><rect width="1" height="1" fill="#FF0000"/></g></svg>"##,
        )
        .unwrap();
        assert_eq!(doc.shapes[0].fill_color, Rgba::new_rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_fill_none_disables_fill() {
        let doc = parse(r#"<svg><rect width="1" height="1" fill="none"/></svg>"#).unwrap();
        assert!(!doc.shapes[0].has_fill);
    }

    #[test]
    fn test_opacity_multiplies() {
        let doc = parse(
            r#"<svg><g opacity="0.5"><rect width="1" height="1" fill="red" fill-opacity="0.5"/></g></svg>"#,
        )
        .unwrap();
        let s = &doc.shapes[0];
        assert!((s.fill_color.a - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_elements_skipped() {
        let doc = parse(
            r#"<svg><text>hi</text><rect width="1" height="1"/><filter/></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.shapes.len(), 1);
    }

    #[test]
    fn test_stroke_resolution() {
        let doc = parse(
            r##"<svg><line x1="0" y1="0" x2="5" y2="5" stroke="#00FF00" stroke-width="2"/></svg>"##,
        )
        .unwrap();
        let s = &doc.shapes[0];
        assert!(s.has_stroke);
        assert_eq!(s.stroke_color, Rgba::new_rgb(0.0, 1.0, 0.0));
        assert_eq!(s.stroke_width, 2.0);

        // stroke-width 0 kills the stroke.
        let doc = parse(
            r#"<svg><line x1="0" y1="0" x2="5" y2="5" stroke="red" stroke-width="0"/></svg>"#,
        )
        .unwrap();
        assert!(!doc.shapes[0].has_stroke);
    }

    #[test]
    fn test_nested_groups() {
        let doc = parse(
            r#"<svg>
                 <g fill="blue" opacity="0.5">
                   <g fill="none">
                     <rect width="1" height="1"/>
                     <circle r="2" fill="inherit"/>
                   </g>
                 </g>
               </svg>"#,
        )
        .unwrap();
        assert_eq!(doc.shapes.len(), 2);
        assert!(!doc.shapes[0].has_fill, "inner group turned fill off");
        assert!(!doc.shapes[1].has_fill, "inherit resolves to the nearest ancestor");
    }

    #[test]
    fn test_polygon_points() {
        let doc = parse(r#"<svg><polygon points="0,0 10,0 10,10 0,10 5"/></svg>"#).unwrap();
        match &doc.shapes[0].geometry {
            Geometry::Polygon { points } => assert_eq!(points.len(), 4),
            other => panic!("unexpected geometry: {:?}", other),
        }
    }
}
