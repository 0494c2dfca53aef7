use iced::widget::container;
use iced::{Border, Color, Theme};

pub const TEXT_SIZE: f32 = 12.0;
pub const HEADING_SIZE: f32 = 14.0;

/// Stroke used for lines, axes and marker outlines.
pub const LINE_WIDTH: f32 = 1.5;

pub fn chart_surface(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.base.color.into()),
        border: Border {
            width: 1.0,
            color: palette.background.strong.color,
            radius: 4.0.into(),
        },
        ..Default::default()
    }
}

pub fn controls_panel(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            radius: 4.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Colors for the hover tooltip drawn on the chart canvas.
pub struct TooltipColors {
    pub background: Color,
    pub border: Color,
    pub text: Color,
}

pub fn tooltip(theme: &Theme) -> TooltipColors {
    let palette = theme.extended_palette();

    TooltipColors {
        background: palette.background.base.color,
        border: palette.background.strong.color,
        text: palette.background.base.text,
    }
}

pub fn axis_color(theme: &Theme) -> Color {
    theme.extended_palette().background.base.text
}
