use iced_core::Color;
use palette::{FromColor, Hsva, rgb::Rgba};
use serde::Deserialize;

/// Application theme, stored in the config as a lowercase name.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme(pub iced_core::Theme);

impl Default for Theme {
    fn default() -> Self {
        Self(iced_core::Theme::Light)
    }
}

impl From<Theme> for iced_core::Theme {
    fn from(val: Theme) -> Self {
        val.0
    }
}

const NAMED: [(&str, iced_core::Theme); 12] = [
    ("light", iced_core::Theme::Light),
    ("dark", iced_core::Theme::Dark),
    ("dracula", iced_core::Theme::Dracula),
    ("nord", iced_core::Theme::Nord),
    ("solarized_light", iced_core::Theme::SolarizedLight),
    ("solarized_dark", iced_core::Theme::SolarizedDark),
    ("gruvbox_light", iced_core::Theme::GruvboxLight),
    ("gruvbox_dark", iced_core::Theme::GruvboxDark),
    ("tokyo_night", iced_core::Theme::TokyoNight),
    ("tokyo_night_light", iced_core::Theme::TokyoNightLight),
    ("kanagawa_lotus", iced_core::Theme::KanagawaLotus),
    ("oxocarbon", iced_core::Theme::Oxocarbon),
];

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, theme)| Self(theme.clone()))
    }

    pub fn name(&self) -> &'static str {
        NAMED
            .iter()
            .find(|(_, theme)| *theme == self.0)
            .map_or("light", |(n, _)| *n)
    }

    pub fn is_dark(&self) -> bool {
        is_dark(self.0.palette().background)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Theme::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown theme: {name}")))
    }
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;
    let a = if digits.len() == 8 { channel(6)? } else { u8::MAX };

    Some(Color::from_rgba8(r, g, b, f32::from(a) / 255.0))
}

pub fn is_dark(color: Color) -> bool {
    let brightness = (color.r * 299.0 + color.g * 587.0 + color.b * 114.0) / 1000.0;
    brightness < 0.5
}

/// Lowers the HSV value by `amount`, clamped at black.
pub fn darken(color: Color, amount: f32) -> Color {
    let mut hsva = to_hsva(color);
    hsva.value = (hsva.value - amount).max(0.0);
    from_hsva(hsva)
}

fn to_hsva(color: Color) -> Hsva {
    let rgba: Rgba = Rgba::new(color.r, color.g, color.b, color.a);
    Hsva::from_color(rgba)
}

fn from_hsva(color: Hsva) -> Color {
    let rgba: Rgba = Rgba::from_color(color);
    Color {
        r: rgba.color.red,
        g: rgba.color.green,
        b: rgba.color.blue,
        a: rgba.alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_and_eight_digit_hex() {
        let open = hex_to_color("#b2df8a").unwrap();
        assert_eq!(open, Color::from_rgb8(0xb2, 0xdf, 0x8a));

        let faded = hex_to_color("#e41a1c80").unwrap();
        assert!((faded.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(hex_to_color("b2df8a").is_none());
        assert!(hex_to_color("#b2df8").is_none());
        assert!(hex_to_color("#zzzzzz").is_none());
        assert!(hex_to_color("#ééé").is_none());
    }

    #[test]
    fn darken_clamps_at_black() {
        let black = darken(Color::from_rgb(0.2, 0.2, 0.2), 1.0);
        assert!(black.r.abs() < 1e-6 && black.g.abs() < 1e-6 && black.b.abs() < 1e-6);

        let red = darken(Color::from_rgb(1.0, 0.0, 0.0), 0.5);
        assert!((red.r - 0.5).abs() < 1e-4);
        assert!(red.g.abs() < 1e-4);
    }

    #[test]
    fn theme_names_parse_from_json() {
        let theme: Theme = serde_json::from_str("\"Dark\"").unwrap();
        assert_eq!(theme, Theme(iced_core::Theme::Dark));
        assert!(theme.is_dark());
        assert_eq!(theme.name(), "dark");

        assert!(serde_json::from_str::<Theme>("\"neon\"").is_err());
    }

    #[test]
    fn default_theme_is_light() {
        assert!(!Theme::default().is_dark());
        assert_eq!(Theme::default().name(), "light");
    }
}
