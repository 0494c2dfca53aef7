use crate::style::{self, LINE_WIDTH, TEXT_SIZE, TooltipColors};

use data::Series;
use data::chart::axis::{Axis, Orient};
use data::chart::curve::{CurvePath, Segment};
use data::chart::scene::{LegendEntry, Marker};
use data::chart::{HEIGHT, MarkerId, PriceChart, Primitive, Scene, Tooltip, WIDTH};
use data::config::theme::darken;

use enum_map::EnumMap;
use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{self, Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::widget::canvas;
use iced::{Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector, mouse, window};

const TOOLTIP_OFFSET: Vector = Vector::new(10.0, -10.0);
const TOOLTIP_PADDING: f32 = 6.0;
const TOOLTIP_LINE_H: f32 = TEXT_SIZE + 4.0;
const CHAR_W: f32 = TEXT_SIZE * 0.6;

const MARKER_OUTLINE_DARKEN: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hover {
    marker: MarkerId,
    cursor: Point,
}

struct State {
    plot_cache: canvas::Cache,
    overlay_cache: canvas::Cache,
    hover: Option<Hover>,
    last_cache_rev: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            plot_cache: canvas::Cache::new(),
            overlay_cache: canvas::Cache::new(),
            hover: None,
            last_cache_rev: 0,
        }
    }
}

impl State {
    fn clear_all_caches(&mut self) {
        self.plot_cache.clear();
        self.overlay_cache.clear();
    }

    /// Drops cached geometry and any hover when the chart was rebuilt.
    fn sync_revision(&mut self, revision: u64) -> bool {
        if self.last_cache_rev == revision {
            return false;
        }
        self.clear_all_caches();
        self.hover = None;
        self.last_cache_rev = revision;
        true
    }

    fn set_hover(&mut self, hover: Option<Hover>) -> bool {
        if self.hover == hover {
            return false;
        }
        self.hover = hover;
        self.overlay_cache.clear();
        true
    }
}

/// Fixed-size line chart of one company's Open and Close prices for a month.
///
/// Plot geometry is cached and only rebuilt when the chart's revision moves;
/// the hover tooltip lives in its own cache so pointer motion never touches
/// the plot.
pub struct StockChart<'a> {
    chart: &'a PriceChart,
    colors: EnumMap<Series, Color>,
}

impl<'a> StockChart<'a> {
    pub fn new(chart: &'a PriceChart, colors: EnumMap<Series, Color>) -> Self {
        Self { chart, colors }
    }

    fn scene(&self) -> &Scene {
        self.chart.scene()
    }

    fn hover_at(&self, position: Option<Point>) -> Option<Hover> {
        let cursor = position?;
        let marker = self.scene().marker_at(cursor)?;
        Some(Hover {
            marker: marker.id,
            cursor,
        })
    }

    fn fill_scene(&self, frame: &mut canvas::Frame, theme: &Theme) {
        let axis_color = style::axis_color(theme);

        for primitive in self.scene().primitives() {
            match primitive {
                Primitive::Line { series, paths } => {
                    let stroke = canvas::Stroke::default()
                        .with_color(self.colors[*series])
                        .with_width(LINE_WIDTH);
                    for path in paths {
                        frame.stroke(&curve_path(path), stroke);
                    }
                }
                Primitive::Marker(marker) => self.fill_marker(frame, marker),
                Primitive::Axis(axis) => fill_axis(frame, axis, axis_color),
                Primitive::Legend(entry) => self.fill_legend_entry(frame, entry, axis_color),
            }
        }
    }

    fn fill_marker(&self, frame: &mut canvas::Frame, marker: &Marker) {
        let color = self.colors[marker.id.series];
        let circle = canvas::Path::circle(marker.center, marker.radius);

        frame.fill(&circle, color);
        frame.stroke(
            &circle,
            canvas::Stroke::default()
                .with_color(darken(color, MARKER_OUTLINE_DARKEN))
                .with_width(1.0),
        );
    }

    fn fill_legend_entry(&self, frame: &mut canvas::Frame, entry: &LegendEntry, text_color: Color) {
        frame.fill_rectangle(
            entry.swatch.position(),
            entry.swatch.size(),
            self.colors[entry.series],
        );
        frame.fill_text(canvas::Text {
            content: entry.series.label().to_string(),
            position: entry.label_position,
            color: text_color,
            size: TEXT_SIZE.into(),
            align_x: iced::Alignment::Start.into(),
            align_y: iced::Alignment::Center.into(),
            ..Default::default()
        });
    }
}

fn curve_path(path: &CurvePath) -> canvas::Path {
    let mut builder = canvas::path::Builder::new();
    builder.move_to(path.start);

    for segment in &path.segments {
        match *segment {
            Segment::Line(to) => builder.line_to(to),
            Segment::Cubic {
                control_a,
                control_b,
                to,
            } => builder.bezier_curve_to(control_a, control_b, to),
        }
    }

    builder.build()
}

fn fill_axis(frame: &mut canvas::Frame, axis: &Axis, color: Color) {
    let stroke = canvas::Stroke::default().with_color(color).with_width(1.0);

    let mut builder = canvas::path::Builder::new();
    if let Some((first, rest)) = axis.domain.split_first() {
        builder.move_to(*first);
        for p in rest {
            builder.line_to(*p);
        }
    }
    frame.stroke(&builder.build(), stroke);

    let (align_x, align_y) = match axis.orient {
        Orient::Bottom => (iced::Alignment::Center, iced::Alignment::Start),
        Orient::Left => (iced::Alignment::End, iced::Alignment::Center),
    };

    for tick in &axis.ticks {
        let (from, to) = axis.tick_line(tick);
        frame.stroke(&canvas::Path::line(from, to), stroke);

        frame.fill_text(canvas::Text {
            content: tick.label.clone(),
            position: axis.label_anchor(tick),
            color,
            size: TEXT_SIZE.into(),
            align_x: align_x.into(),
            align_y: align_y.into(),
            ..Default::default()
        });
    }
}

/// Box is anchored at the cursor offset and flipped to the other side of
/// the cursor when it would leave the surface.
fn tooltip_bounds(cursor: Point, lines: &[String], surface: Size) -> Rectangle {
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let size = Size::new(
        longest as f32 * CHAR_W + 2.0 * TOOLTIP_PADDING,
        lines.len() as f32 * TOOLTIP_LINE_H + 2.0 * TOOLTIP_PADDING,
    );

    let mut origin = cursor + TOOLTIP_OFFSET;
    if origin.x + size.width > surface.width {
        origin.x = cursor.x - TOOLTIP_OFFSET.x - size.width;
    }
    if origin.y + size.height > surface.height {
        origin.y = surface.height - size.height;
    }
    origin.x = origin.x.max(0.0);
    origin.y = origin.y.max(0.0);

    Rectangle::new(origin, size)
}

fn fill_tooltip(frame: &mut canvas::Frame, tooltip: &Tooltip, cursor: Point, colors: &TooltipColors) {
    let lines = tooltip.lines();
    let bounds = tooltip_bounds(cursor, &lines, frame.size());

    let background = canvas::Path::rectangle(bounds.position(), bounds.size());
    frame.fill(&background, colors.background);
    frame.stroke(
        &background,
        canvas::Stroke::default()
            .with_color(colors.border)
            .with_width(1.0),
    );

    for (i, line) in lines.into_iter().enumerate() {
        frame.fill_text(canvas::Text {
            content: line,
            position: Point::new(
                bounds.x + TOOLTIP_PADDING,
                bounds.y + TOOLTIP_PADDING + i as f32 * TOOLTIP_LINE_H,
            ),
            color: colors.text,
            size: TEXT_SIZE.into(),
            align_x: iced::Alignment::Start.into(),
            align_y: iced::Alignment::Start.into(),
            ..Default::default()
        });
    }
}

impl<M> Widget<M, Theme, Renderer> for StockChart<'_> {
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        Size {
            width: Length::Fixed(WIDTH),
            height: Length::Fixed(HEIGHT),
        }
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::atomic(limits, WIDTH, HEIGHT)
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) {
        let state = tree.state.downcast_mut::<State>();

        match event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let hover = self.hover_at(cursor.position_in(layout.bounds()));
                if state.set_hover(hover) {
                    shell.request_redraw();
                }
            }
            Event::Mouse(mouse::Event::CursorLeft) => {
                if state.set_hover(None) {
                    shell.request_redraw();
                }
            }
            Event::Window(window::Event::RedrawRequested(_)) => {
                state.sync_revision(self.chart.revision());
            }
            _ => {}
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use advanced::Renderer as _;
        use iced::advanced::graphics::geometry::Renderer as _;

        let state = tree.state.downcast_ref::<State>();
        let bounds = layout.bounds();

        if self.scene().is_empty() {
            return;
        }

        renderer.with_translation(Vector::new(bounds.x, bounds.y), |r| {
            let plot_geom = state.plot_cache.draw(r, bounds.size(), |frame| {
                self.fill_scene(frame, theme);
            });
            r.draw_geometry(plot_geom);

            let hovered = state
                .hover
                .and_then(|hover| Some((self.scene().tooltip(hover.marker)?, hover.cursor)));

            if let Some((tooltip, at)) = hovered {
                let colors = style::tooltip(theme);
                let overlay_geom = state.overlay_cache.draw(r, bounds.size(), |frame| {
                    fill_tooltip(frame, &tooltip, at, &colors);
                });
                r.with_layer(Rectangle::with_size(bounds.size()), |r| {
                    r.draw_geometry(overlay_geom);
                });
            }
        });
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> mouse::Interaction {
        let state = tree.state.downcast_ref::<State>();

        if state.hover.is_some() && cursor.is_over(layout.bounds()) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

impl<'a, M> From<StockChart<'a>> for Element<'a, M, Theme, Renderer>
where
    M: 'a,
{
    fn from(chart: StockChart<'a>) -> Self {
        Element::new(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<String> {
        vec![
            "Date: 11/3/2023".to_string(),
            "Close: 152.50".to_string(),
            "Difference: 2.50".to_string(),
        ]
    }

    fn hovering() -> Hover {
        Hover {
            marker: MarkerId {
                series: Series::Close,
                index: 0,
            },
            cursor: Point::new(40.0, 100.0),
        }
    }

    #[test]
    fn rebuild_drops_hover() {
        let mut state = State::default();
        assert!(state.sync_revision(1));
        assert!(state.set_hover(Some(hovering())));

        assert!(!state.sync_revision(1));
        assert_eq!(state.hover, Some(hovering()));

        assert!(state.sync_revision(2));
        assert_eq!(state.hover, None);
        assert_eq!(state.last_cache_rev, 2);
    }

    #[test]
    fn same_hover_is_not_a_change() {
        let mut state = State::default();

        assert!(state.set_hover(Some(hovering())));
        assert!(!state.set_hover(Some(hovering())));
        assert!(state.set_hover(None));
        assert!(!state.set_hover(None));
    }

    #[test]
    fn tooltip_sits_right_of_and_above_cursor() {
        let bounds = tooltip_bounds(Point::new(100.0, 100.0), &lines(), Size::new(WIDTH, HEIGHT));

        assert_eq!(bounds.position(), Point::new(110.0, 90.0));
        assert_eq!(bounds.height, 3.0 * TOOLTIP_LINE_H + 2.0 * TOOLTIP_PADDING);
    }

    #[test]
    fn tooltip_flips_at_right_edge() {
        let cursor = Point::new(595.0, 100.0);
        let bounds = tooltip_bounds(cursor, &lines(), Size::new(WIDTH, HEIGHT));

        assert!(bounds.x + bounds.width <= cursor.x);
        assert!(bounds.x + bounds.width <= WIDTH);
    }

    #[test]
    fn tooltip_stays_on_surface_near_edges() {
        let surface = Size::new(WIDTH, HEIGHT);

        let top = tooltip_bounds(Point::new(50.0, 2.0), &lines(), surface);
        assert_eq!(top.y, 0.0);

        let bottom = tooltip_bounds(Point::new(50.0, 395.0), &lines(), surface);
        assert!(bottom.y + bottom.height <= HEIGHT);
    }
}
