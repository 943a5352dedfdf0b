use crate::foundation::core::{Line, Point};

/// Below this total length a path has nothing to draw.
pub const DEGENERATE_EPS: f64 = 1e-9;

/// An immutable polyline with its measurements computed once up front.
#[derive(Clone, Debug, PartialEq)]
pub struct PathModel {
    points: Vec<Point>,
    total_len: f64,
    max_x: f64,
    max_y: f64,
}

impl PathModel {
    pub fn new(points: Vec<Point>) -> Self {
        let total_len = points
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum::<f64>();

        // Maxima start at the origin; negative coordinates never lower them.
        let (max_x, max_y) = points
            .iter()
            .fold((0.0f64, 0.0f64), |(mx, my), p| (mx.max(p.x), my.max(p.y)));

        Self {
            points,
            total_len,
            max_x,
            max_y,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Sum of consecutive Euclidean distances; 0 for fewer than two points.
    pub fn length(&self) -> f64 {
        self.total_len
    }

    /// Component-wise `(max_x, max_y)` over all points.
    pub fn bounds(&self) -> (f64, f64) {
        (self.max_x, self.max_y)
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn segment(&self, idx: usize) -> Option<Line> {
        let p0 = *self.points.get(idx)?;
        let p1 = *self.points.get(idx + 1)?;
        Some(Line::new(p0, p1))
    }

    pub fn first_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn is_degenerate(&self) -> bool {
        self.total_len <= DEGENERATE_EPS
    }
}
