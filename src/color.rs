//! Color value objects.
//!
//! Colors are immutable values created by the calling API. The drawing
//! layer compares them component-wise for redundant-operator elision and
//! extracts the engine-native representation via [`Color::native`].

use crate::engine::NativeColor;
use crate::error::{Error, Result};

/// A device color in one of the supported color spaces.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// DeviceGray, single component in 0.0..=1.0
    Gray(f32),
    /// DeviceRGB, components in 0.0..=1.0
    Rgb(f32, f32, f32),
    /// DeviceCMYK, components in 0.0..=1.0
    Cmyk(f32, f32, f32, f32),
}

impl Color {
    /// Parse an HTML-style hex color: `#RRGGBB` or `#RGB`.
    pub fn from_hex(spec: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(spec.to_string());

        let digits = spec.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }
        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).map_err(|_| invalid())?;
                let g = u8::from_str_radix(&digits[2..4], 16).map_err(|_| invalid())?;
                let b = u8::from_str_radix(&digits[4..6], 16).map_err(|_| invalid())?;
                Ok(Self::from_rgb8(r, g, b))
            },
            3 => {
                let component = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|v| v * 16 + v)
                        .map_err(|_| invalid())
                };
                Ok(Self::from_rgb8(component(0)?, component(1)?, component(2)?))
            },
            _ => Err(invalid()),
        }
    }

    /// Create an RGB color from 8-bit components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Black in DeviceRGB.
    pub fn black() -> Self {
        Color::Rgb(0.0, 0.0, 0.0)
    }

    /// White in DeviceRGB.
    pub fn white() -> Self {
        Color::Rgb(1.0, 1.0, 1.0)
    }

    /// The raw component values, in color-space order.
    ///
    /// Two colors are interchangeable for state-caching purposes exactly
    /// when their component vectors are equal.
    pub fn components(&self) -> Vec<f32> {
        match self {
            Color::Gray(g) => vec![*g],
            Color::Rgb(r, g, b) => vec![*r, *g, *b],
            Color::Cmyk(c, m, y, k) => vec![*c, *m, *y, *k],
        }
    }

    /// Extract the engine-native color handle.
    pub fn native(&self) -> NativeColor {
        match *self {
            Color::Gray(g) => NativeColor::Gray(g),
            Color::Rgb(r, g, b) => NativeColor::Rgb(r, g, b),
            Color::Cmyk(c, m, y, k) => NativeColor::Cmyk(c, m, y, k),
        }
    }
}
