//! # svg-raster
//!
//! Minimal SVG document parser and software rasterizer. Consumes a textual
//! description of a scene graph built from a constrained vocabulary of 2D
//! shapes and paths, and produces a rectangular RGBA pixel buffer with the
//! rasterized, alpha-composited image — no platform 2D-graphics library
//! involved.
//!
//! Supported input: an `<svg>` root with optional `viewBox`/`width`/`height`,
//! containing `rect`, `circle`, `ellipse`, `line`, `polyline`, `polygon`,
//! `path`, and `g` elements. Paint attributes (`fill`, `stroke`, opacity
//! variants) inherit through groups. The renderer is deliberately a
//! pragmatic subset: nonzero-winding fills, disc-stamped strokes, no
//! anti-aliasing, no gradients/transforms/clipping — enough to rasterize
//! typical single-color logo artwork.
//!
//! ## Pipeline
//!
//! 1. **Scanner** — numbers and command letters out of attribute text
//! 2. **Parser** — XML tree to a flat, ordered shape list + coordinate system
//! 3. **Path interpreter** — `d` strings to commands, flattened to polylines
//! 4. **Rasterizer** — per-shape fill/stroke into the pixel buffer
//! 5. **Scanline fill & compositor** — nonzero winding spans, Porter-Duff over
//!
//! ## Example
//!
//! ```
//! use svg_raster::{parse, rasterize, PixelBuffer};
//!
//! let doc = parse(r#"<svg viewBox="0 0 100 100">
//!     <rect width="100" height="100" fill="red"/>
//! </svg>"#).unwrap();
//! let mut buf = PixelBuffer::new(64, 64);
//! rasterize(&doc, &mut buf);
//! assert!(buf.pixel(32, 32).unwrap().r > 0.99);
//! ```

// Foundation
pub mod basics;
pub mod color;

// Attribute text scanning & path interpretation
pub mod path;
pub mod scanner;

// Document model & parsing
pub mod parser;
pub mod shape;

// Rasterization
pub mod pixel_buffer;
pub mod raster;
pub mod scanline;

pub use basics::PointD;
pub use color::{parse_color, ColorSpec, Rgba};
pub use parser::{parse, Document, ParseError};
pub use path::{flatten, parse_path_data, PathCommand, CURVE_SEGMENTS};
pub use pixel_buffer::PixelBuffer;
pub use raster::{rasterize, rasterize_shape, ViewTransform};
pub use scanline::fill_polygon;
pub use shape::{Geometry, Shape};
