use chrono::NaiveDateTime;
use iced_core::{Point, Rectangle, Size};

use super::axis::Axis;
use super::curve::{CurvePath, cardinal_runs};
use super::scale::{DEFAULT_TICK_COUNT, LinearScale, TimeScale};
use super::{INNER_HEIGHT, INNER_WIDTH, MARGIN, MARKER_RADIUS, Series, WIDTH};
use crate::record::PricePoint;

const PRICE_PADDING_RATIO: f64 = 0.1;
/// Used instead of the ratio when every price is the same.
const FLAT_PRICE_PADDING: f64 = 1.0;

const LEGEND_SWATCH: Size = Size::new(20.0, 10.0);
const LEGEND_ROW_GAP: f32 = 25.0;

/// Identifies a marker: which series, and which point of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId {
    pub series: Series,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub center: Point,
    pub radius: f32,
}

impl Marker {
    pub fn contains(&self, p: Point) -> bool {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub series: Series,
    pub swatch: Rectangle,
    pub label_position: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        series: Series,
        paths: Vec<CurvePath>,
    },
    Marker(Marker),
    Axis(Axis),
    Legend(LegendEntry),
}

/// Everything drawn for one chart state, in paint order, in surface
/// coordinates (margins already applied).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    primitives: Vec<Primitive>,
    points: Vec<PricePoint>,
}

impl Scene {
    pub fn build(points: Vec<PricePoint>) -> Self {
        let Some(dates) = time_domain(&points) else {
            return Self::default();
        };

        let x = TimeScale::new(dates, (0.0, INNER_WIDTH));
        let y = LinearScale::new(price_domain(&points), (INNER_HEIGHT, 0.0));
        let origin = Point::new(MARGIN.left, MARGIN.top);

        let project = |series: Series| -> Vec<Point> {
            points
                .iter()
                .map(|p| {
                    let value = series.value(p);
                    if value.is_finite() {
                        Point::new(origin.x + x.map(p.date), origin.y + y.map(value))
                    } else {
                        Point::new(f32::NAN, f32::NAN)
                    }
                })
                .collect()
        };

        let projected: Vec<(Series, Vec<Point>)> = Series::DRAW_ORDER
            .iter()
            .map(|&series| (series, project(series)))
            .collect();

        let mut primitives = Vec::new();

        for (series, pts) in &projected {
            primitives.push(Primitive::Line {
                series: *series,
                paths: cardinal_runs(pts),
            });
        }

        for (series, pts) in &projected {
            for (index, center) in pts.iter().enumerate() {
                if !(center.x.is_finite() && center.y.is_finite()) {
                    continue;
                }
                primitives.push(Primitive::Marker(Marker {
                    id: MarkerId {
                        series: *series,
                        index,
                    },
                    center: *center,
                    radius: MARKER_RADIUS,
                }));
            }
        }

        primitives.push(Primitive::Axis(Axis::bottom(
            &x,
            Point::new(origin.x, origin.y + INNER_HEIGHT),
            DEFAULT_TICK_COUNT,
        )));
        primitives.push(Primitive::Axis(Axis::left(&y, origin, DEFAULT_TICK_COUNT)));

        let legend_x = WIDTH - MARGIN.right + 20.0;
        for (i, series) in Series::LEGEND.iter().enumerate() {
            let top = MARGIN.top + i as f32 * LEGEND_ROW_GAP;
            primitives.push(Primitive::Legend(LegendEntry {
                series: *series,
                swatch: Rectangle::new(Point::new(legend_x, top), LEGEND_SWATCH),
                label_position: Point::new(legend_x + 25.0, top + 9.0),
            }));
        }

        Self { primitives, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// The filtered points the scene was built from.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn markers(&self) -> impl DoubleEndedIterator<Item = &Marker> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Marker(m) => Some(m),
            _ => None,
        })
    }

    /// Topmost marker under `cursor`, if any.
    pub fn marker_at(&self, cursor: Point) -> Option<&Marker> {
        self.markers().rev().find(|m| m.contains(cursor))
    }

    pub fn tooltip(&self, id: MarkerId) -> Option<Tooltip> {
        let point = self.points.get(id.index)?;
        Some(Tooltip {
            date: point.date,
            series: id.series,
            value: id.series.value(point),
            difference: point.difference(),
        })
    }
}

/// Earliest and latest date among `points`.
pub fn time_domain(points: &[PricePoint]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let min = points.iter().map(|p| p.date).min()?;
    let max = points.iter().map(|p| p.date).max()?;
    Some((min, max))
}

/// Price extent across both series with 10% headroom on each side.
pub fn price_domain(points: &[PricePoint]) -> (f64, f64) {
    let (min, max) = points
        .iter()
        .flat_map(|p| [p.open, p.close])
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return (0.0, 1.0);
    }

    let span = max - min;
    let pad = if span > 0.0 {
        span * PRICE_PADDING_RATIO
    } else {
        FLAT_PRICE_PADDING
    };
    (min - pad, max + pad)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    pub date: NaiveDateTime,
    pub series: Series,
    pub value: f64,
    pub difference: f64,
}

impl Tooltip {
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Date: {}", self.date.format("%-m/%-d/%Y")),
            format!("{}: {:.2}", self.series, self.value),
            format!("Difference: {:.2}", self.difference),
        ]
    }
}
