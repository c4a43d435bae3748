//! SVG import
//!
//! Loads SVG documents with usvg and turns every visible path into
//! [`Curve`](crate::types::Curve)s classified as cut (red) or engrave
//! (any other color). Closed filled paths are also reported as
//! [`Area`](crate::types::Area)s so they can be hatched.

pub mod parser;
pub mod style;

pub use parser::{ParseOptions, parse_svg_file, parse_svg_str, split_subpaths};
pub use style::{color_to_grey, is_cut_color};
