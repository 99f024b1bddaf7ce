//! The graphics context: a state-caching adapter over a delegate page.
//!
//! A [`GraphicsContext`] presents the stable drawing API and owns the
//! page it draws on. Style setters keep a small cache of the last value
//! actually sent to the page, so a run of equal values emits a single
//! operator. `save_graphics_state`/`restore_graphics_state` snapshot the
//! cache alongside the page's own q/Q pair through a single-slot
//! memento.
//!
//! One context (and its page) belongs to one logical thread of control;
//! the shared outline handle is `!Send`, so the compiler enforces this.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use crate::color::Color;
use crate::engine::{
    Destination, LinkAnnotation, OutlineEntry, Page, PaintMode, TextEncoding,
};
use crate::error::{Error, Result};
use crate::font::Font;
use crate::geometry::Rect;
use crate::image::Image;

/// Shared handle to the owning document's outline list.
pub(crate) type OutlineHandle = Rc<RefCell<Vec<OutlineEntry>>>;

/// How a shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Stroke the outline only
    Stroke,
    /// Fill the interior only
    Fill,
    /// Fill, then stroke
    FillAndStroke,
}

impl FillMode {
    /// Translate to the engine's painting selector.
    fn to_paint_mode(self) -> PaintMode {
        match self {
            FillMode::Stroke => PaintMode::Stroke,
            FillMode::Fill => PaintMode::Fill,
            FillMode::FillAndStroke => PaintMode::FillAndStroke,
        }
    }
}

impl FromStr for FillMode {
    type Err = Error;

    /// Parse the textual style representation.
    ///
    /// Anything other than the three recognized modes is rejected; the
    /// enum itself cannot hold an unrecognized value, so this boundary is
    /// where invalid input surfaces.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stroke" => Ok(FillMode::Stroke),
            "fill" => Ok(FillMode::Fill),
            "fill_and_stroke" => Ok(FillMode::FillAndStroke),
            other => Err(Error::InvalidFillMode(other.to_string())),
        }
    }
}

/// A line dashing pattern.
///
/// Named patterns resolve to their engine array representation before
/// any redundancy check, so `Dotted` and an equivalent explicit array
/// are interchangeable.
#[derive(Debug, Clone, PartialEq)]
pub enum DashPattern {
    /// Solid line (empty dash array)
    Solid,
    /// One-on, two-off dotted line
    Dotted,
    /// Explicit dash array, passed through unchanged
    Custom(Vec<f32>),
}

impl DashPattern {
    /// The engine array representation of this pattern.
    pub fn resolve(&self) -> Vec<f32> {
        match self {
            DashPattern::Solid => Vec::new(),
            DashPattern::Dotted => vec![1.0, 2.0],
            DashPattern::Custom(pattern) => pattern.clone(),
        }
    }
}

/// Last values actually applied to the page, one slot per attribute.
#[derive(Debug, Clone, Default)]
struct StateCache {
    fill_color: Option<Color>,
    line_color: Option<Color>,
    line_width: Option<f32>,
    /// Resolved dash array
    dash_pattern: Option<Vec<f32>>,
}

/// A drawing surface for one page, with redundant-operator elision.
#[derive(Debug)]
pub struct GraphicsContext {
    page: Page,
    state: StateCache,
    memento: Option<StateCache>,
    outlines: OutlineHandle,
}

impl GraphicsContext {
    pub(crate) fn new(page: Page, outlines: OutlineHandle) -> Self {
        Self {
            page,
            state: StateCache::default(),
            memento: None,
            outlines,
        }
    }

    /// The delegate page, usable as a destination for other contexts.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Intersect the clipping region with the rectangle spanned by two
    /// corners. Forwards unconditionally; coordinates are not validated.
    pub fn clip_rectangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.page.clip_rectangle(x1, y1, x2, y2);
    }

    /// Save the graphics state and snapshot the style cache.
    ///
    /// Only one snapshot slot exists: a second save before a restore
    /// overwrites the first.
    pub fn save_graphics_state(&mut self) {
        self.page.save_state();
        self.memento = Some(self.state.clone());
    }

    /// Restore the graphics state, consuming the snapshot.
    ///
    /// With no snapshot present the cache resets to unset, so later
    /// setters re-apply rather than wrongly elide.
    pub fn restore_graphics_state(&mut self) {
        self.page.restore_state();
        self.state = self.memento.take().unwrap_or_default();
    }

    /// Paint an image into the rectangle spanned by two corners.
    pub fn draw_image(&mut self, image: &Image, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.page.draw_image(image.resource(), x1, y1, x2, y2);
    }

    /// Draw and stroke a line segment.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.page.draw_line(x1, y1, x2, y2);
    }

    /// Draw a closed polygon from parallel coordinate slices.
    pub fn draw_polygon(&mut self, xs: &[f32], ys: &[f32], mode: FillMode) {
        self.page.draw_polygon(xs, ys, mode.to_paint_mode());
    }

    /// Draw text at a position. Delegate failures (no font selected,
    /// unencodable character) propagate unmodified.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        encoding: TextEncoding,
    ) -> Result<()> {
        self.page.draw_text(text, x, y, encoding)?;
        Ok(())
    }

    /// Select the font's current style variant at the given size.
    ///
    /// Never cached: the font is stateful and identity+size pairs change
    /// too often for elision to pay off.
    pub fn set_font(&mut self, font: &Font, size: f32) {
        self.page.set_font(&font.current_resource(), size);
    }

    /// Set the fill color, eliding component-equal repeats.
    pub fn set_fill_color(&mut self, color: &Color) {
        let stale = self
            .state
            .fill_color
            .as_ref()
            .map_or(true, |cached| cached.components() != color.components());
        if stale {
            self.page.set_fill_color(color.native());
            self.state.fill_color = Some(color.clone());
        }
    }

    /// Set the stroke color, eliding component-equal repeats.
    pub fn set_line_color(&mut self, color: &Color) {
        let stale = self
            .state
            .line_color
            .as_ref()
            .map_or(true, |cached| cached.components() != color.components());
        if stale {
            self.page.set_line_color(color.native());
            self.state.line_color = Some(color.clone());
        }
    }

    /// Set the line width, eliding equal repeats.
    ///
    /// A cached width of zero always re-applies.
    pub fn set_line_width(&mut self, width: f32) {
        let stale = match self.state.line_width {
            Some(cached) => cached == 0.0 || cached != width,
            None => true,
        };
        if stale {
            self.page.set_line_width(width);
            self.state.line_width = Some(width);
        }
    }

    /// Set the dash pattern, eliding repeats of the same resolved array.
    pub fn set_line_dashing_pattern(&mut self, pattern: &DashPattern) {
        let resolved = pattern.resolve();
        if self.state.dash_pattern.as_deref() != Some(resolved.as_slice()) {
            self.page.set_dash_pattern(&resolved);
            self.state.dash_pattern = Some(resolved);
        }
    }

    /// Draw a rounded rectangle painted per `mode`.
    pub fn draw_rounded_rectangle(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        radius: f32,
        mode: FillMode,
    ) {
        self.page
            .draw_rounded_rectangle(x1, y1, x2, y2, radius, mode.to_paint_mode());
    }

    /// Attach a clickable region opening an external URI.
    ///
    /// Engine rejection (malformed URI) is wrapped with the offending
    /// URI; nothing is attached on failure.
    pub fn uri_action(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, uri: &str) -> Result<()> {
        let annotation = LinkAnnotation::uri(Rect::from_points(x1, y1, x2, y2), uri)
            .map_err(|source| Error::UriAction {
                uri: uri.to_string(),
                source,
            })?;
        self.page.attach_annotation(annotation);
        Ok(())
    }

    /// Attach a clickable region jumping to a fit-width destination on
    /// another context's page at vertical offset `top`.
    pub fn go_to_action(
        &mut self,
        target: &GraphicsContext,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        top: f32,
    ) -> Result<()> {
        let destination = Destination::fit_horizontally(target.page().id(), top)
            .map_err(Error::GoToAction)?;
        self.page
            .attach_annotation(LinkAnnotation::internal(
                Rect::from_points(x1, y1, x2, y2),
                destination,
            ));
        Ok(())
    }

    /// Append a named bookmark pointing at a fit-width destination on
    /// this page at vertical offset `top`.
    pub fn add_bookmark(&mut self, name: &str, top: f32) -> Result<()> {
        let entry = Destination::fit_horizontally(self.page.id(), top)
            .and_then(|destination| OutlineEntry::new(name, destination))
            .map_err(|source| Error::Bookmark {
                title: name.to_string(),
                source,
            })?;
        self.outlines.borrow_mut().push(entry);
        Ok(())
    }
}

impl Clone for GraphicsContext {
    /// Duplicate the context with an independent deep copy of its page.
    ///
    /// The style cache and memento are value copies; the outline handle
    /// keeps pointing at the same owning document.
    fn clone(&self) -> Self {
        Self {
            page: self.page.duplicate(),
            state: self.state.clone(),
            memento: self.memento.clone(),
            outlines: Rc::clone(&self.outlines),
        }
    }
}
