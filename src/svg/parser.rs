use crate::error::SvgResult;
use crate::svg::style::{fill_color, is_cut_color, path_color};
use crate::types::{Area, Curve, Drawing, Point2, Segment, XForm};
use std::path::Path;
use tracing::{debug, warn};
use usvg::tiny_skia_path::PathSegment;

/// Options controlling how SVG geometry is mapped into drawing space
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Flip the Y axis so that the origin sits at the bottom-left corner
    pub flip_y: bool,
    /// Canvas height used for flipping; defaults to the document height
    pub canvas_height: Option<f64>,
}

/// Parse an SVG document from a string
pub fn parse_svg_str(svg_data: &str, options: &ParseOptions) -> SvgResult<Drawing> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_data, &opt)?;

    let width = tree.size().width() as f64;
    let height = tree.size().height() as f64;

    let base = if options.flip_y {
        XForm::flip_y(options.canvas_height.unwrap_or(height))
    } else {
        XForm::identity()
    };

    let mut drawing = Drawing {
        width,
        height,
        ..Default::default()
    };
    parse_group(tree.root(), &base, &mut drawing);

    debug!(
        curves = drawing.curves.len(),
        cut = drawing.cut_count(),
        areas = drawing.areas.len(),
        "Parsed SVG document"
    );
    if drawing.is_empty() {
        warn!("SVG document contains no drawable paths");
    }

    Ok(drawing)
}

/// Parse an SVG file
pub fn parse_svg_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> SvgResult<Drawing> {
    let svg_data = std::fs::read_to_string(path.as_ref())?;
    parse_svg_str(&svg_data, options)
}

fn parse_group(group: &usvg::Group, base: &XForm, drawing: &mut Drawing) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => parse_group(g, base, drawing),
            usvg::Node::Path(path) => parse_path(path, base, drawing),
            _ => {}
        }
    }
}

fn parse_path(path: &usvg::Path, base: &XForm, drawing: &mut Drawing) {
    if !path.is_visible() {
        return;
    }

    let xform = base.compose(&XForm::from(path.abs_transform()));
    let cut = is_cut_color(&path_color(path));
    let curves = split_subpaths(path.data(), &xform, cut);
    if curves.is_empty() {
        return;
    }

    if let Some(color) = fill_color(path)
        && curves.iter().all(Curve::is_closed)
    {
        drawing.areas.push(Area {
            curves: curves.clone(),
            color,
        });
    }

    drawing.curves.extend(curves);
}

/// Split path data into one curve per subpath, mapping every point through `xform`
pub fn split_subpaths(data: &usvg::tiny_skia_path::Path, xform: &XForm, cut: bool) -> Vec<Curve> {
    let pt = |p: usvg::tiny_skia_path::Point| {
        xform.transform_point(Point2::new(p.x as f64, p.y as f64))
    };

    let mut curves = Vec::new();
    let mut segments: Vec<Segment> = Vec::new();
    let mut subpath_start = Point2::default();
    let mut current = Point2::default();

    for seg in data.segments() {
        match seg {
            PathSegment::MoveTo(p) => {
                if !segments.is_empty() {
                    curves.push(Curve::new(std::mem::take(&mut segments), cut));
                }
                subpath_start = pt(p);
                current = subpath_start;
            }
            PathSegment::LineTo(p) => {
                let end = pt(p);
                segments.push(Segment::Line {
                    start: current,
                    end,
                });
                current = end;
            }
            PathSegment::QuadTo(p1, p2) => {
                let end = pt(p2);
                segments.push(Segment::Quadratic {
                    start: current,
                    ctrl: pt(p1),
                    end,
                });
                current = end;
            }
            PathSegment::CubicTo(p1, p2, p3) => {
                let end = pt(p3);
                segments.push(Segment::Cubic {
                    start: current,
                    ctrl1: pt(p1),
                    ctrl2: pt(p2),
                    end,
                });
                current = end;
            }
            PathSegment::Close => {
                if current.distance(&subpath_start) > 1e-9 {
                    segments.push(Segment::Line {
                        start: current,
                        end: subpath_start,
                    });
                }
                current = subpath_start;
            }
        }
    }

    if !segments.is_empty() {
        curves.push(Curve::new(segments, cut));
    }

    curves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svg(body: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50" viewBox="0 0 100 50">{}</svg>"#,
            body
        )
    }

    #[test]
    fn test_red_fill_is_cut() {
        let doc = svg(r#"<path d="M10 10 L20 10 L20 20 Z" style="fill:#ff0000;stroke:none"/>"#);
        let drawing = parse_svg_str(&doc, &ParseOptions::default()).unwrap();
        assert_eq!(drawing.curves.len(), 1);
        assert!(drawing.curves[0].cut);
        assert_eq!(drawing.areas.len(), 1);
    }

    #[test]
    fn test_black_path_is_engraved() {
        let doc = svg(r#"<path d="M10 10 L20 10" fill="none" stroke="black"/>"#);
        let drawing = parse_svg_str(&doc, &ParseOptions::default()).unwrap();
        assert_eq!(drawing.curves.len(), 1);
        assert!(!drawing.curves[0].cut);
        assert!(drawing.areas.is_empty());
    }

    #[test]
    fn test_subpaths_are_split() {
        let doc = svg(r#"<path d="M0 0 L10 0 M20 20 L30 20" fill="none" stroke="red"/>"#);
        let drawing = parse_svg_str(&doc, &ParseOptions::default()).unwrap();
        assert_eq!(drawing.curves.len(), 2);
        assert!(drawing.curves.iter().all(|c| c.cut));
        assert_eq!(drawing.curves[1].start(), Some(Point2::new(20.0, 20.0)));
    }

    #[test]
    fn test_flip_y() {
        let doc = svg(r#"<path d="M10 10 L20 10" fill="none" stroke="black"/>"#);
        let options = ParseOptions {
            flip_y: true,
            canvas_height: None,
        };
        let drawing = parse_svg_str(&doc, &options).unwrap();
        assert_eq!(drawing.curves[0].start(), Some(Point2::new(10.0, 40.0)));
    }

    #[test]
    fn test_group_transform_applied() {
        let doc = svg(
            r#"<g transform="translate(5 7)"><path d="M1 1 L2 2" fill="none" stroke="black"/></g>"#,
        );
        let drawing = parse_svg_str(&doc, &ParseOptions::default()).unwrap();
        assert_eq!(drawing.curves[0].start(), Some(Point2::new(6.0, 8.0)));
    }

    #[test]
    fn test_closed_filled_path_is_area() {
        let doc = svg(r##"<path d="M0 0 L10 0 L10 10 Z" fill="#808080"/>"##);
        let drawing = parse_svg_str(&doc, &ParseOptions::default()).unwrap();
        assert_eq!(drawing.areas.len(), 1);
        assert_eq!(drawing.areas[0].color, "#808080");
        assert!(drawing.curves[0].is_closed());
    }

    #[test]
    fn test_invalid_svg_is_error() {
        assert!(parse_svg_str("not svg", &ParseOptions::default()).is_err());
    }
}
