//! Font value objects.
//!
//! A [`Font`] bundles the base-14 font names for the four standard style
//! variants and tracks which variant is currently selected. The drawing
//! layer extracts the resource for the *current* style at call time, so a
//! style change between two `set_font` calls selects a different engine
//! font without constructing a new value.

use crate::engine::FontResource;

/// Style variant of a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    /// Regular weight, upright
    #[default]
    Normal,
    /// Bold weight
    Bold,
    /// Italic/oblique
    Italic,
    /// Bold and italic
    BoldItalic,
}

/// A style-aware font over base-14 font names.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    normal: String,
    bold: String,
    italic: String,
    bold_italic: String,
    style: FontStyle,
}

impl Font {
    /// Create a font from explicit base font names per style.
    pub fn new(
        normal: impl Into<String>,
        bold: impl Into<String>,
        italic: impl Into<String>,
        bold_italic: impl Into<String>,
    ) -> Self {
        Self {
            normal: normal.into(),
            bold: bold.into(),
            italic: italic.into(),
            bold_italic: bold_italic.into(),
            style: FontStyle::Normal,
        }
    }

    /// The Helvetica family.
    pub fn helvetica() -> Self {
        Self::new(
            "Helvetica",
            "Helvetica-Bold",
            "Helvetica-Oblique",
            "Helvetica-BoldOblique",
        )
    }

    /// The Times family.
    pub fn times() -> Self {
        Self::new("Times-Roman", "Times-Bold", "Times-Italic", "Times-BoldItalic")
    }

    /// The Courier family.
    pub fn courier() -> Self {
        Self::new("Courier", "Courier-Bold", "Courier-Oblique", "Courier-BoldOblique")
    }

    /// Select the style used by subsequent [`current_resource`](Self::current_resource) calls.
    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    /// The currently selected style.
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Extract the engine resource for the currently selected style.
    pub fn current_resource(&self) -> FontResource {
        let base_font = match self.style {
            FontStyle::Normal => &self.normal,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
            FontStyle::BoldItalic => &self.bold_italic,
        };
        FontResource::new(base_font.clone())
    }
}
