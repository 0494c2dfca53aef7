use iced_core::Point;

use super::scale::AxisScale;

pub const TICK_SIZE: f32 = 6.0;
pub const TICK_PADDING: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Where the tick meets the axis line.
    pub anchor: Point,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orient: Orient,
    /// Axis line including the outer ticks at both range ends.
    pub domain: Vec<Point>,
    pub ticks: Vec<Tick>,
}

impl Axis {
    /// Horizontal axis along `origin.y`, ticks pointing down.
    pub fn bottom<S: AxisScale>(scale: &S, origin: Point, tick_count: usize) -> Self {
        let (r0, r1) = scale.range();
        let y = origin.y;

        let domain = vec![
            Point::new(origin.x + r0, y + TICK_SIZE),
            Point::new(origin.x + r0, y),
            Point::new(origin.x + r1, y),
            Point::new(origin.x + r1, y + TICK_SIZE),
        ];

        let ticks = scale
            .axis_ticks(tick_count)
            .into_iter()
            .map(|(pos, label)| Tick {
                anchor: Point::new(origin.x + pos, y),
                label,
            })
            .collect();

        Self {
            orient: Orient::Bottom,
            domain,
            ticks,
        }
    }

    /// Vertical axis along `origin.x`, ticks pointing left.
    pub fn left<S: AxisScale>(scale: &S, origin: Point, tick_count: usize) -> Self {
        let (r0, r1) = scale.range();
        let x = origin.x;

        let domain = vec![
            Point::new(x - TICK_SIZE, origin.y + r0),
            Point::new(x, origin.y + r0),
            Point::new(x, origin.y + r1),
            Point::new(x - TICK_SIZE, origin.y + r1),
        ];

        let ticks = scale
            .axis_ticks(tick_count)
            .into_iter()
            .map(|(pos, label)| Tick {
                anchor: Point::new(x, origin.y + pos),
                label,
            })
            .collect();

        Self {
            orient: Orient::Left,
            domain,
            ticks,
        }
    }

    pub fn tick_line(&self, tick: &Tick) -> (Point, Point) {
        let a = tick.anchor;
        match self.orient {
            Orient::Bottom => (a, Point::new(a.x, a.y + TICK_SIZE)),
            Orient::Left => (a, Point::new(a.x - TICK_SIZE, a.y)),
        }
    }

    /// Bottom labels hang below the tick, left labels end before it.
    pub fn label_anchor(&self, tick: &Tick) -> Point {
        let a = tick.anchor;
        let offset = TICK_SIZE + TICK_PADDING;
        match self.orient {
            Orient::Bottom => Point::new(a.x, a.y + offset),
            Orient::Left => Point::new(a.x - offset, a.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::scale::LinearScale;

    #[test]
    fn left_axis_places_ticks_on_price_scale() {
        let scale = LinearScale::new((0.0, 100.0), (340.0, 0.0));
        let axis = Axis::left(&scale, Point::new(40.0, 20.0), 5);

        assert_eq!(axis.orient, Orient::Left);
        assert_eq!(axis.domain.first(), Some(&Point::new(34.0, 360.0)));
        assert_eq!(axis.domain.last(), Some(&Point::new(34.0, 20.0)));

        let zero = &axis.ticks[0];
        assert_eq!(zero.label, "0");
        assert_eq!(zero.anchor, Point::new(40.0, 360.0));
        assert_eq!(axis.label_anchor(zero), Point::new(31.0, 360.0));
        assert_eq!(axis.tick_line(zero).1, Point::new(34.0, 360.0));

        let top = axis.ticks.last().unwrap();
        assert_eq!(top.label, "100");
        assert_eq!(top.anchor.y, 20.0);
    }

    #[test]
    fn bottom_axis_hangs_labels_below() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 560.0));
        let axis = Axis::bottom(&scale, Point::new(40.0, 360.0), 2);

        let tick = &axis.ticks[1];
        assert_eq!(tick.label, "5");
        assert_eq!(tick.anchor, Point::new(320.0, 360.0));
        assert_eq!(axis.label_anchor(tick), Point::new(320.0, 369.0));
        assert_eq!(axis.tick_line(tick).1, Point::new(320.0, 366.0));
    }
}
