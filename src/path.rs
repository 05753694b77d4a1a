//! SVG path data: command parsing and flattening to a polyline.
//!
//! `parse_path_data` turns a `d` attribute string into an ordered command
//! list; `flatten` walks that list and produces a single polyline, evaluating
//! cubic and quadratic Bezier segments by direct polynomial evaluation at a
//! fixed number of equally spaced parameter steps (no adaptive subdivision).

use crate::basics::PointD;
use crate::scanner::Scanner;

/// Number of line segments each Bezier curve is flattened into.
/// Higher values trade point count for smoothness.
pub const CURVE_SEGMENTS: usize = 12;

// ============================================================================
// PathCommand
// ============================================================================

/// One path command: a verb letter (`M L H V C S Q T Z`, lowercase for
/// relative) plus its flat numeric arguments, consumed in fixed-size groups.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    pub verb: u8,
    pub args: Vec<f64>,
}

/// Parse a `d` attribute into an ordered command list.
///
/// Unknown verbs are kept in the list (with their arguments) and ignored by
/// [`flatten`]; a malformed tail simply ends the parse. Never fails.
pub fn parse_path_data(d: &str) -> Vec<PathCommand> {
    let mut scanner = Scanner::new(d);
    let mut commands = Vec::new();
    while let Some(verb) = scanner.next_command() {
        let mut args = Vec::new();
        while let Some(v) = scanner.next_number() {
            args.push(v);
        }
        commands.push(PathCommand { verb, args });
    }
    commands
}

// ============================================================================
// Bezier evaluation
// ============================================================================

/// Cubic Bezier point at parameter `t`.
#[inline]
fn cubic_point(p0: PointD, c1: PointD, c2: PointD, p1: PointD, t: f64) -> PointD {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    PointD::new(
        b0 * p0.x + b1 * c1.x + b2 * c2.x + b3 * p1.x,
        b0 * p0.y + b1 * c1.y + b2 * c2.y + b3 * p1.y,
    )
}

/// Quadratic Bezier point at parameter `t`.
#[inline]
fn quadratic_point(p0: PointD, c: PointD, p1: PointD, t: f64) -> PointD {
    let u = 1.0 - t;
    let b0 = u * u;
    let b1 = 2.0 * u * t;
    let b2 = t * t;
    PointD::new(
        b0 * p0.x + b1 * c.x + b2 * p1.x,
        b0 * p0.y + b1 * c.y + b2 * p1.y,
    )
}

// ============================================================================
// Flattening
// ============================================================================

struct Flattener {
    points: Vec<PointD>,
    current: PointD,
    subpath_start: PointD,
    // Reflection anchors for S/T; cleared by any non-curve command.
    last_cubic_ctrl: Option<PointD>,
    last_quad_ctrl: Option<PointD>,
}

impl Flattener {
    fn new() -> Self {
        Self {
            points: Vec::new(),
            current: PointD::default(),
            subpath_start: PointD::default(),
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
        }
    }

    #[inline]
    fn emit(&mut self, p: PointD) {
        self.points.push(p);
        self.current = p;
    }

    /// Resolve a coordinate pair, relative to the current point for
    /// lowercase verbs.
    #[inline]
    fn resolve(&self, relative: bool, x: f64, y: f64) -> PointD {
        if relative {
            PointD::new(self.current.x + x, self.current.y + y)
        } else {
            PointD::new(x, y)
        }
    }

    /// Reflect `ctrl` through the current point; falls back to the current
    /// point itself when there is no previous curve to reflect.
    #[inline]
    fn reflect(&self, ctrl: Option<PointD>) -> PointD {
        match ctrl {
            Some(c) => PointD::new(
                2.0 * self.current.x - c.x,
                2.0 * self.current.y - c.y,
            ),
            None => self.current,
        }
    }

    fn emit_cubic(&mut self, c1: PointD, c2: PointD, end: PointD) {
        let p0 = self.current;
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f64 / CURVE_SEGMENTS as f64;
            let p = cubic_point(p0, c1, c2, end, t);
            self.points.push(p);
        }
        self.current = end;
        self.last_cubic_ctrl = Some(c2);
        self.last_quad_ctrl = None;
    }

    fn emit_quadratic(&mut self, c: PointD, end: PointD) {
        let p0 = self.current;
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f64 / CURVE_SEGMENTS as f64;
            let p = quadratic_point(p0, c, end, t);
            self.points.push(p);
        }
        self.current = end;
        self.last_quad_ctrl = Some(c);
        self.last_cubic_ctrl = None;
    }

    #[inline]
    fn clear_reflection(&mut self) {
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
    }

    fn apply(&mut self, cmd: &PathCommand) {
        let relative = cmd.verb.is_ascii_lowercase();
        let args = &cmd.args;
        match cmd.verb.to_ascii_uppercase() {
            b'M' => {
                self.clear_reflection();
                let mut groups = args.chunks_exact(2);
                if let Some(first) = groups.next() {
                    let p = self.resolve(relative, first[0], first[1]);
                    self.subpath_start = p;
                    self.emit(p);
                }
                // Extra coordinate pairs after the first are implicit line-tos.
                for g in groups {
                    let p = self.resolve(relative, g[0], g[1]);
                    self.emit(p);
                }
            }
            b'L' => {
                self.clear_reflection();
                for g in args.chunks_exact(2) {
                    let p = self.resolve(relative, g[0], g[1]);
                    self.emit(p);
                }
            }
            b'H' => {
                self.clear_reflection();
                for g in args.chunks_exact(1) {
                    let x = if relative { self.current.x + g[0] } else { g[0] };
                    let p = PointD::new(x, self.current.y);
                    self.emit(p);
                }
            }
            b'V' => {
                self.clear_reflection();
                for g in args.chunks_exact(1) {
                    let y = if relative { self.current.y + g[0] } else { g[0] };
                    let p = PointD::new(self.current.x, y);
                    self.emit(p);
                }
            }
            b'C' => {
                for g in args.chunks_exact(6) {
                    let c1 = self.resolve(relative, g[0], g[1]);
                    let c2 = self.resolve(relative, g[2], g[3]);
                    let end = self.resolve(relative, g[4], g[5]);
                    self.emit_cubic(c1, c2, end);
                }
            }
            b'S' => {
                for g in args.chunks_exact(4) {
                    let c1 = self.reflect(self.last_cubic_ctrl);
                    let c2 = self.resolve(relative, g[0], g[1]);
                    let end = self.resolve(relative, g[2], g[3]);
                    self.emit_cubic(c1, c2, end);
                }
            }
            b'Q' => {
                for g in args.chunks_exact(4) {
                    let c = self.resolve(relative, g[0], g[1]);
                    let end = self.resolve(relative, g[2], g[3]);
                    self.emit_quadratic(c, end);
                }
            }
            b'T' => {
                for g in args.chunks_exact(2) {
                    let c = self.reflect(self.last_quad_ctrl);
                    let end = self.resolve(relative, g[0], g[1]);
                    self.emit_quadratic(c, end);
                }
            }
            b'Z' => {
                self.clear_reflection();
                let p = self.subpath_start;
                self.emit(p);
            }
            _ => {
                // Unsupported verb (e.g. arcs) — skipped, parse continues.
                self.clear_reflection();
            }
        }
    }
}

/// Flatten a command list into a single polyline in path coordinate space.
pub fn flatten(commands: &[PathCommand]) -> Vec<PointD> {
    let mut f = Flattener::new();
    for cmd in commands {
        f.apply(cmd);
    }
    f.points
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(p: PointD, x: f64, y: f64) {
        assert!((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9, "{:?} vs ({}, {})", p, x, y);
    }

    #[test]
    fn test_parse_commands() {
        let cmds = parse_path_data("M0,0 L10,0 l0,10 Z");
        assert_eq!(cmds.len(), 4);
        assert_eq!(cmds[0].verb, b'M');
        assert_eq!(cmds[0].args, vec![0.0, 0.0]);
        assert_eq!(cmds[2].verb, b'l');
        assert_eq!(cmds[3].verb, b'Z');
        assert!(cmds[3].args.is_empty());
    }

    #[test]
    fn test_flatten_lines_and_close() {
        let pts = flatten(&parse_path_data("M0,0 L10,0 L10,10 L0,10 Z"));
        assert_eq!(pts.len(), 5);
        assert_point_eq(pts[0], 0.0, 0.0);
        assert_point_eq(pts[2], 10.0, 10.0);
        assert_point_eq(pts[4], 0.0, 0.0);
    }

    #[test]
    fn test_relative_reanchors_per_group() {
        let pts = flatten(&parse_path_data("M1,1 l2,0 2,0"));
        assert_point_eq(pts[1], 3.0, 1.0);
        assert_point_eq(pts[2], 5.0, 1.0);
    }

    #[test]
    fn test_implicit_lineto_after_moveto() {
        let pts = flatten(&parse_path_data("M0,0 5,5 10,0"));
        assert_eq!(pts.len(), 3);
        assert_point_eq(pts[1], 5.0, 5.0);
        assert_point_eq(pts[2], 10.0, 0.0);
    }

    #[test]
    fn test_horizontal_vertical() {
        let pts = flatten(&parse_path_data("M1,2 H5 v3 h-2"));
        assert_point_eq(pts[1], 5.0, 2.0);
        assert_point_eq(pts[2], 5.0, 5.0);
        assert_point_eq(pts[3], 3.0, 5.0);
    }

    #[test]
    fn test_cubic_midpoint_matches_analytic() {
        // Control points (0,0) (0,1) (1,1) (1,0): the flattened point at
        // t = 0.5 must match the de Casteljau evaluation (0.5, 0.75).
        let pts = flatten(&parse_path_data("M0,0 C0,1 1,1 1,0"));
        assert_eq!(pts.len(), 1 + CURVE_SEGMENTS);
        let mid = pts[CURVE_SEGMENTS / 2];
        assert!((mid.x - 0.5).abs() < 1e-3);
        assert!((mid.y - 0.75).abs() < 1e-3);
    }

    #[test]
    fn test_smooth_cubic_reflection() {
        // S after C reflects the previous second control point.
        let cmds = parse_path_data("M0,0 C0,1 1,1 1,0 S3,-1 3,0");
        let pts = flatten(&cmds);
        // First point of the S-curve's flattened run: t = 1/12 with
        // c1 = reflect((1,1)) through (1,0) = (1,-1).
        let p0 = PointD::new(1.0, 0.0);
        let c1 = PointD::new(1.0, -1.0);
        let c2 = PointD::new(3.0, -1.0);
        let end = PointD::new(3.0, 0.0);
        let t = 1.0 / CURVE_SEGMENTS as f64;
        let expected = super::cubic_point(p0, c1, c2, end, t);
        let got = pts[1 + CURVE_SEGMENTS];
        assert!((got.x - expected.x).abs() < 1e-9);
        assert!((got.y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_smooth_without_previous_curve_degrades() {
        // T with no preceding Q: control point collapses to the current
        // point, so the "curve" is a straight line to the endpoint.
        let pts = flatten(&parse_path_data("M0,0 T6,0"));
        let last = pts[pts.len() - 1];
        assert_point_eq(last, 6.0, 0.0);
        for p in &pts[1..] {
            assert!(p.y.abs() < 1e-9);
        }
    }

    #[test]
    fn test_quadratic_smooth_chain() {
        let pts = flatten(&parse_path_data("M0,0 Q1,2 2,0 T4,0"));
        // T reflects (1,2) through (2,0) -> (3,-2); midpoint of that curve
        // is at quadratic t=0.5: (3, -1).
        let mid = pts[CURVE_SEGMENTS + CURVE_SEGMENTS / 2];
        assert!((mid.x - 3.0).abs() < 1e-9);
        assert!((mid.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_verb_skipped() {
        let pts = flatten(&parse_path_data("M0,0 A1,1 0 0 0 5,5 L10,0"));
        // The arc is ignored; the line-to still lands.
        let last = pts[pts.len() - 1];
        assert_point_eq(last, 10.0, 0.0);
    }
}
