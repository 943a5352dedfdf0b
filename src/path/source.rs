//! Point producers for [`PathModel`](crate::PathModel).
//!
//! Curves are not interpolated: every drawing command contributes only its end vertex, so a
//! quadratic or cubic segment becomes a straight chord. Closing commands contribute nothing.

use kurbo::{BezPath, PathEl};

use crate::foundation::{
    core::{Point, Vec2},
    error::{TraceError, TraceResult},
};

/// Parse SVG path data (`d` attribute syntax) into an ordered list of vertices.
///
/// Relative and absolute commands are both accepted. Consecutive duplicate points are kept.
pub fn points_from_path_data(d: &str, margin: Vec2) -> TraceResult<Vec<Point>> {
    if d.trim().is_empty() {
        return Err(TraceError::input_malformed("path data must be non-empty"));
    }
    let path = BezPath::from_svg(d)
        .map_err(|e| TraceError::input_malformed(format!("invalid path data: {e}")))?;
    Ok(end_points(&path, margin))
}

/// Parse an SVG document and extract the vertices of its largest path.
///
/// "Largest" is the path with the most segments; on ties the later one in document order wins.
/// The path's absolute transform is applied before the margin is added.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn points_from_svg(bytes: &[u8], margin: Vec2) -> TraceResult<Vec<Point>> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| TraceError::input_malformed(format!("parse svg document: {e}")))?;

    let mut best: Option<usvg::tiny_skia_path::Path> = None;
    collect_largest_path(tree.root(), &mut best);

    let Some(data) = best else {
        return Err(TraceError::input_malformed("svg document contains no path"));
    };

    let mut out = Vec::with_capacity(data.len());
    for seg in data.segments() {
        use usvg::tiny_skia_path::PathSegment;
        let end = match seg {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
            PathSegment::QuadTo(_, p) => p,
            PathSegment::CubicTo(_, _, p) => p,
            PathSegment::Close => continue,
        };
        out.push(Point::new(f64::from(end.x), f64::from(end.y)) + margin);
    }
    tracing::debug!(points = out.len(), "extracted svg path vertices");
    Ok(out)
}

fn collect_largest_path(group: &usvg::Group, best: &mut Option<usvg::tiny_skia_path::Path>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => collect_largest_path(g.as_ref(), best),
            usvg::Node::Path(p) => {
                let Some(data) = p.data().clone().transform(p.abs_transform()) else {
                    continue;
                };
                if best.as_ref().is_none_or(|b| data.len() >= b.len()) {
                    *best = Some(data);
                }
            }
            usvg::Node::Text(_) | usvg::Node::Image(_) => {}
        }
    }
}

fn end_points(path: &BezPath, margin: Vec2) -> Vec<Point> {
    path.elements()
        .iter()
        .filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
            PathEl::QuadTo(_, p) => Some(p),
            PathEl::CurveTo(_, _, p) => Some(p),
            PathEl::ClosePath => None,
        })
        .map(|p| p + margin)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_commands_accumulate() {
        let pts = points_from_path_data("m 10,10 5,0 0,5 l -5,0", Vec2::ZERO).unwrap();
        assert_eq!(
            pts,
            vec![
                Point::new(10.0, 10.0),
                Point::new(15.0, 10.0),
                Point::new(15.0, 15.0),
                Point::new(10.0, 15.0),
            ]
        );
    }

    #[test]
    fn curves_contribute_end_points_only_and_margin_applies() {
        let pts =
            points_from_path_data("M0,0 C 1,1 2,2 3,0 Q 4,4 6,0 Z", Vec2::new(100.0, 50.0))
                .unwrap();
        assert_eq!(
            pts,
            vec![
                Point::new(100.0, 50.0),
                Point::new(103.0, 50.0),
                Point::new(106.0, 50.0),
            ]
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let pts = points_from_path_data("M1,1 L1,1 L2,2", Vec2::ZERO).unwrap();
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], pts[1]);
    }

    #[test]
    fn bad_path_data_is_malformed() {
        assert!(matches!(
            points_from_path_data("", Vec2::ZERO),
            Err(TraceError::InputMalformed(_))
        ));
        assert!(matches!(
            points_from_path_data("M 1,1 L nope", Vec2::ZERO),
            Err(TraceError::InputMalformed(_))
        ));
    }

    #[test]
    fn svg_picks_largest_path() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
            <g>
              <path d="M0,0 L10,5" stroke="black"/>
              <path d="M0,0 L10,0 L10,10 L20,10" stroke="black"/>
            </g>
        </svg>"#;
        let pts = points_from_svg(svg, Vec2::ZERO).unwrap();
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[3], Point::new(20.0, 10.0));
    }

    #[test]
    fn svg_applies_group_transform() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
            <g transform="translate(5,7)">
              <path d="M0,0 L10,4" stroke="black"/>
            </g>
        </svg>"#;
        let pts = points_from_svg(svg, Vec2::ZERO).unwrap();
        assert_eq!(pts, vec![Point::new(5.0, 7.0), Point::new(15.0, 11.0)]);
    }

    #[test]
    fn svg_without_paths_is_malformed() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
        assert!(matches!(
            points_from_svg(svg, Vec2::ZERO),
            Err(TraceError::InputMalformed(_))
        ));
        assert!(points_from_svg(b"<svg", Vec2::ZERO).is_err());
    }
}
