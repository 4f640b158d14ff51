//! Colors and brushes.

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ShapeColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Fully transparent white, the "no paint" color of the brush popup.
    pub const fn transparent() -> Self {
        Self::new(255, 255, 255, 0)
    }
}

impl fmt::Display for ShapeColor {
    /// Formats as `#AARRGGBB`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color string: {0:?}")]
pub struct ColorParseError(pub String);

impl FromStr for ShapeColor {
    type Err = ColorParseError;

    /// Accepts `#RGB`, `#ARGB`, `#RRGGBB` and `#AARRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let component = |i: usize, len: usize| -> Result<u8, ColorParseError> {
            let v = u8::from_str_radix(&hex[i..i + len], 16).map_err(|_| err())?;
            Ok(if len == 1 { v * 17 } else { v })
        };

        let (a, r, g, b) = match hex.len() {
            3 => (255, component(0, 1)?, component(1, 1)?, component(2, 1)?),
            4 => (component(0, 1)?, component(1, 1)?, component(2, 1)?, component(3, 1)?),
            6 => (255, component(0, 2)?, component(2, 2)?, component(4, 2)?),
            8 => (component(0, 2)?, component(2, 2)?, component(4, 2)?, component(6, 2)?),
            _ => return Err(err()),
        };
        Ok(ShapeColor::new(r, g, b, a))
    }
}

impl From<Color> for ShapeColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<ShapeColor> for Color {
    fn from(color: ShapeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// One stop of a two-stop gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: ShapeColor,
    /// Offset along the gradient axis, in `[0, 1]`.
    pub offset: f64,
}

/// Horizontal (0°) two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: GradientStop,
    pub end: GradientStop,
}

impl LinearGradient {
    /// Half-width of the blend band the brush popup builds around its slider.
    pub const SLIDER_SPREAD: f64 = 0.3;

    pub fn new(start: GradientStop, end: GradientStop) -> Self {
        Self { start, end }
    }

    /// Build the gradient the brush popup produces for a slider in `0..=100`.
    pub fn from_slider(start: ShapeColor, end: ShapeColor, slider: f64) -> Self {
        let center = slider / 100.0;
        Self {
            start: GradientStop {
                color: start,
                offset: (center - Self::SLIDER_SPREAD).max(0.0),
            },
            end: GradientStop {
                color: end,
                offset: (center + Self::SLIDER_SPREAD).min(1.0),
            },
        }
    }

    /// Slider position that reproduces this gradient's blend center.
    pub fn slider_value(&self) -> f64 {
        (self.start.offset + self.end.offset) * 50.0
    }
}

/// Paint used for a quad's fill or a polyline's stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Brush {
    Solid(ShapeColor),
    LinearGradient(LinearGradient),
}

impl Default for Brush {
    fn default() -> Self {
        Brush::Solid(ShapeColor::black())
    }
}

impl Brush {
    pub fn solid(color: ShapeColor) -> Self {
        Brush::Solid(color)
    }

    /// The "clear brush" paint.
    pub fn transparent() -> Self {
        Brush::Solid(ShapeColor::transparent())
    }

    /// The solid color, or the first gradient stop's color.
    pub fn primary_color(&self) -> ShapeColor {
        match self {
            Brush::Solid(c) => *c,
            Brush::LinearGradient(g) => g.start.color,
        }
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, Brush::LinearGradient(_))
    }

    /// Convert to a peniko brush, laying a gradient horizontally across `bounds`.
    pub fn to_peniko(&self, bounds: Rect) -> peniko::Brush {
        match self {
            Brush::Solid(c) => peniko::Brush::Solid((*c).into()),
            Brush::LinearGradient(g) => {
                let mid_y = bounds.center().y;
                let gradient = peniko::Gradient::new_linear(
                    Point::new(bounds.x0, mid_y),
                    Point::new(bounds.x1, mid_y),
                )
                .with_stops([
                    (g.start.offset as f32, Color::from(g.start.color)),
                    (g.end.offset as f32, Color::from(g.end.color)),
                ]);
                peniko::Brush::Gradient(gradient)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_display_is_argb() {
        let c = ShapeColor::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_string(), "#78123456");
    }

    #[test]
    fn test_color_parse_forms() {
        assert_eq!("#78123456".parse::<ShapeColor>(), Ok(ShapeColor::new(0x12, 0x34, 0x56, 0x78)));
        assert_eq!("#123456".parse::<ShapeColor>(), Ok(ShapeColor::new(0x12, 0x34, 0x56, 0xFF)));
        assert_eq!("#F00".parse::<ShapeColor>(), Ok(ShapeColor::new(0xFF, 0, 0, 0xFF)));
        assert_eq!("#8F00".parse::<ShapeColor>(), Ok(ShapeColor::new(0xFF, 0, 0, 0x88)));
        assert!("red".parse::<ShapeColor>().is_err());
        assert!("#12345".parse::<ShapeColor>().is_err());
        assert!("#GG0000".parse::<ShapeColor>().is_err());
    }

    #[test]
    fn test_color_string_round_trip() {
        let c = ShapeColor::new(1, 2, 3, 4);
        assert_eq!(c.to_string().parse::<ShapeColor>(), Ok(c));
        assert_eq!(ShapeColor::transparent().to_string(), "#00FFFFFF");
    }

    #[test]
    fn test_peniko_conversion() {
        let c = ShapeColor::new(10, 20, 30, 40);
        let back: ShapeColor = Color::from(c).into();
        assert_eq!(back, c);
    }

    #[test]
    fn test_gradient_spans_bounds_horizontally() {
        let g = LinearGradient::from_slider(ShapeColor::black(), ShapeColor::white(), 50.0);
        let bounds = Rect::new(10.0, 20.0, 110.0, 60.0);
        let peniko::Brush::Gradient(gradient) = Brush::LinearGradient(g).to_peniko(bounds) else {
            panic!("expected a gradient brush");
        };
        let peniko::GradientKind::Linear(line) = gradient.kind else {
            panic!("expected a linear gradient");
        };
        assert_eq!(line.start, Point::new(10.0, 40.0));
        assert_eq!(line.end, Point::new(110.0, 40.0));

        let offsets: Vec<f32> = gradient.stops.iter().map(|stop| stop.offset).collect();
        assert_eq!(offsets, vec![g.start.offset as f32, g.end.offset as f32]);
        assert!((offsets[0] - 0.2).abs() < 1e-6);
        assert!((offsets[1] - 0.8).abs() < 1e-6);

        let solid = Brush::solid(ShapeColor::white()).to_peniko(bounds);
        assert!(matches!(solid, peniko::Brush::Solid(_)));
    }

    #[test]
    fn test_gradient_slider() {
        let g = LinearGradient::from_slider(ShapeColor::black(), ShapeColor::white(), 50.0);
        assert!((g.start.offset - 0.2).abs() < 1e-12);
        assert!((g.end.offset - 0.8).abs() < 1e-12);
        assert!((g.slider_value() - 50.0).abs() < 1e-9);

        let edge = LinearGradient::from_slider(ShapeColor::black(), ShapeColor::white(), 10.0);
        assert_eq!(edge.start.offset, 0.0);
        assert!((edge.end.offset - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_primary_color() {
        let g = LinearGradient::from_slider(ShapeColor::white(), ShapeColor::black(), 50.0);
        assert_eq!(Brush::LinearGradient(g).primary_color(), ShapeColor::white());
        assert!(!Brush::default().is_gradient());
    }
}
