use iced_core::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Point),
    Cubic {
        control_a: Point,
        control_b: Point,
        to: Point,
    },
}

impl Segment {
    pub fn end(&self) -> Point {
        match self {
            Segment::Line(to) | Segment::Cubic { to, .. } => *to,
        }
    }
}

/// An open path: a starting point followed by connected segments.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePath {
    pub start: Point,
    pub segments: Vec<Segment>,
}

/// Cardinal spline through `points` with tension 0.
pub fn cardinal(points: &[Point]) -> Option<CurvePath> {
    cardinal_with_tension(points, 0.0)
}

/// Each interior segment `p1 -> p2` gets controls `p1 + k·(p2 − p0)` and
/// `p2 + k·(p1 − p3)` with `k = (1 − tension) / 6`. At the ends the missing
/// neighbour is reflected so the first and last controls sit on the endpoints.
/// Two points give a straight segment, a single point gives an empty path.
pub fn cardinal_with_tension(points: &[Point], tension: f32) -> Option<CurvePath> {
    let (&start, _) = points.split_first()?;
    let k = (1.0 - tension) / 6.0;

    let segments = match points.len() {
        1 => Vec::new(),
        2 => vec![Segment::Line(points[1])],
        n => (0..n - 1)
            .map(|i| {
                let p1 = points[i];
                let p2 = points[i + 1];
                let p0 = if i == 0 { p2 } else { points[i - 1] };
                let p3 = if i + 2 < n { points[i + 2] } else { p1 };

                Segment::Cubic {
                    control_a: Point::new(p1.x + k * (p2.x - p0.x), p1.y + k * (p2.y - p0.y)),
                    control_b: Point::new(p2.x + k * (p1.x - p3.x), p2.y + k * (p1.y - p3.y)),
                    to: p2,
                }
            })
            .collect(),
    };

    Some(CurvePath { start, segments })
}

/// Splits `points` at non-finite entries and fits a spline to each run.
pub fn cardinal_runs(points: &[Point]) -> Vec<CurvePath> {
    points
        .split(|p| !(p.x.is_finite() && p.y.is_finite()))
        .filter_map(cardinal)
        .collect()
}
