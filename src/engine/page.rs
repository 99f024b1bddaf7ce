//! The delegate page: an operator-accumulating drawing surface.
//!
//! A `Page` owns its content stream, attached annotations, and the font
//! and image resources its operators reference. Pages are created by the
//! engine through a graphics context and collected again at render time.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use super::annotation::LinkAnnotation;
use super::content::{ContentOp, ContentStream, NativeColor, PaintMode, TextEncoding};
use super::EngineError;

/// Process-unique page identity, used as a destination handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(u64);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

static NEXT_PAGE_ID: AtomicU64 = AtomicU64::new(1);

impl PageId {
    fn next() -> Self {
        PageId(NEXT_PAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Engine-native font handle: a base-14 font name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResource {
    base_font: String,
}

impl FontResource {
    /// Create a font resource for a base font name.
    pub fn new(base_font: impl Into<String>) -> Self {
        Self {
            base_font: base_font.into(),
        }
    }

    /// The base font name.
    pub fn base_font(&self) -> &str {
        &self.base_font
    }
}

/// Pixel payload of an image XObject.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    /// Complete JPEG stream, embedded with the DCTDecode filter
    Jpeg(Bytes),
    /// Raw 8-bit RGB pixels, row-major
    Rgb(Bytes),
    /// Raw 8-bit grayscale pixels, row-major
    Gray(Bytes),
}

/// Engine-native image handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResource {
    width: u32,
    height: u32,
    data: ImageData,
}

impl ImageResource {
    /// Create an image resource.
    pub fn new(width: u32, height: u32, data: ImageData) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel payload.
    pub fn data(&self) -> &ImageData {
        &self.data
    }
}

/// A single page being drawn.
#[derive(Debug)]
pub struct Page {
    id: PageId,
    width: f32,
    height: f32,
    content: ContentStream,
    annotations: Vec<LinkAnnotation>,
    /// base font name -> resource name (F1, F2, ...)
    fonts: BTreeMap<String, String>,
    /// (resource name, image), in registration order
    images: Vec<(String, ImageResource)>,
    current_font: Option<String>,
}

impl Page {
    /// Create an empty page with the given media box dimensions.
    pub(crate) fn new(width: f32, height: f32) -> Self {
        Self {
            id: PageId::next(),
            width,
            height,
            content: ContentStream::new(),
            annotations: Vec::new(),
            fonts: BTreeMap::new(),
            images: Vec::new(),
            current_font: None,
        }
    }

    /// Deep copy under a fresh page identity.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: PageId::next(),
            width: self.width,
            height: self.height,
            content: self.content.clone(),
            annotations: self.annotations.clone(),
            fonts: self.fonts.clone(),
            images: self.images.clone(),
            current_font: self.current_font.clone(),
        }
    }

    /// This page's identity.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Media box width in points.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Media box height in points.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The content-stream operations emitted so far.
    pub fn operations(&self) -> &[ContentOp] {
        self.content.operations()
    }

    /// The annotations attached so far.
    pub fn annotations(&self) -> &[LinkAnnotation] {
        &self.annotations
    }

    pub(crate) fn content(&self) -> &ContentStream {
        &self.content
    }

    pub(crate) fn fonts(&self) -> &BTreeMap<String, String> {
        &self.fonts
    }

    pub(crate) fn images(&self) -> &[(String, ImageResource)] {
        &self.images
    }

    /// Intersect the clipping region with a rectangle.
    pub fn clip_rectangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.content
            .op(ContentOp::Rectangle(x1, y1, x2 - x1, y2 - y1))
            .op(ContentOp::Clip)
            .op(ContentOp::EndPath);
    }

    /// Save the graphics state (q).
    pub fn save_state(&mut self) {
        self.content.op(ContentOp::SaveState);
    }

    /// Restore the graphics state (Q).
    pub fn restore_state(&mut self) {
        self.content.op(ContentOp::RestoreState);
    }

    /// Draw and stroke a straight line segment.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.content
            .op(ContentOp::MoveTo(x1, y1))
            .op(ContentOp::LineTo(x2, y2))
            .op(ContentOp::Stroke);
    }

    /// Draw a closed polygon from parallel coordinate slices.
    ///
    /// Vertices beyond the shorter slice are ignored; fewer than two
    /// vertices produce no output.
    pub fn draw_polygon(&mut self, xs: &[f32], ys: &[f32], mode: PaintMode) {
        let count = xs.len().min(ys.len());
        if count < 2 {
            return;
        }
        self.content.op(ContentOp::MoveTo(xs[0], ys[0]));
        for i in 1..count {
            self.content.op(ContentOp::LineTo(xs[i], ys[i]));
        }
        self.content.op(ContentOp::ClosePath);
        self.content.op(mode.paint_op());
    }

    /// Draw text at a position using the selected font.
    ///
    /// Fails if no font was selected or a character is not representable
    /// in the requested encoding.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        encoding: TextEncoding,
    ) -> Result<(), EngineError> {
        if self.current_font.is_none() {
            return Err(EngineError::NoFontSelected);
        }

        let show = match encoding {
            TextEncoding::WinAnsi => {
                let mut bytes = Vec::with_capacity(text.len());
                for ch in text.chars() {
                    bytes.push(winansi_byte(ch).ok_or(EngineError::UnencodableText {
                        ch,
                        encoding: encoding.name(),
                    })?);
                }
                ContentOp::ShowText(bytes)
            },
            TextEncoding::Utf16Be => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_be_bytes());
                }
                ContentOp::ShowTextHex(bytes)
            },
        };

        self.content
            .op(ContentOp::BeginText)
            .op(ContentOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y))
            .op(show)
            .op(ContentOp::EndText);
        Ok(())
    }

    /// Select a font for subsequent text, registering it as a resource.
    pub fn set_font(&mut self, font: &FontResource, size: f32) {
        let next_index = self.fonts.len() + 1;
        let name = self
            .fonts
            .entry(font.base_font().to_string())
            .or_insert_with(|| format!("F{}", next_index))
            .clone();
        self.content.op(ContentOp::SetFont(name.clone(), size));
        self.current_font = Some(name);
    }

    /// Set the fill color.
    pub fn set_fill_color(&mut self, color: NativeColor) {
        self.content.op(ContentOp::SetFillColor(color));
    }

    /// Set the stroke color.
    pub fn set_line_color(&mut self, color: NativeColor) {
        self.content.op(ContentOp::SetStrokeColor(color));
    }

    /// Set the line width.
    pub fn set_line_width(&mut self, width: f32) {
        self.content.op(ContentOp::SetLineWidth(width));
    }

    /// Set the dash pattern; an empty slice selects a solid line.
    pub fn set_dash_pattern(&mut self, pattern: &[f32]) {
        self.content
            .op(ContentOp::SetDashPattern(pattern.to_vec(), 0.0));
    }

    /// Paint an image into the rectangle spanned by two corners.
    pub fn draw_image(&mut self, image: &ImageResource, x1: f32, y1: f32, x2: f32, y2: f32) {
        let name = format!("Im{}", self.images.len() + 1);
        self.images.push((name.clone(), image.clone()));
        self.content
            .op(ContentOp::SaveState)
            .op(ContentOp::Transform(x2 - x1, 0.0, 0.0, y2 - y1, x1, y1))
            .op(ContentOp::PaintXObject(name))
            .op(ContentOp::RestoreState);
    }

    /// Draw a rectangle with rounded corners and paint it per `mode`.
    pub fn draw_rounded_rectangle(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        radius: f32,
        mode: PaintMode,
    ) {
        let (x, y) = (x1.min(x2), y1.min(y2));
        let (width, height) = ((x2 - x1).abs(), (y2 - y1).abs());

        if radius <= 0.0 {
            self.content.op(ContentOp::Rectangle(x, y, width, height));
            self.content.op(mode.paint_op());
            return;
        }

        let r = radius.min(width / 2.0).min(height / 2.0);
        // Bézier approximation constant for quarter circles
        let k = r * 0.552_284_8;

        self.content
            .op(ContentOp::MoveTo(x + r, y))
            .op(ContentOp::LineTo(x + width - r, y))
            .op(ContentOp::CurveTo(x + width - r + k, y, x + width, y + r - k, x + width, y + r))
            .op(ContentOp::LineTo(x + width, y + height - r))
            .op(ContentOp::CurveTo(
                x + width,
                y + height - r + k,
                x + width - r + k,
                y + height,
                x + width - r,
                y + height,
            ))
            .op(ContentOp::LineTo(x + r, y + height))
            .op(ContentOp::CurveTo(x + r - k, y + height, x, y + height - r + k, x, y + height - r))
            .op(ContentOp::LineTo(x, y + r))
            .op(ContentOp::CurveTo(x, y + r - k, x + r - k, y, x + r, y))
            .op(ContentOp::ClosePath);
        self.content.op(mode.paint_op());
    }

    /// Attach a link annotation to this page.
    pub fn attach_annotation(&mut self, annotation: LinkAnnotation) {
        self.annotations.push(annotation);
    }
}

/// Map a character to its WinAnsi (cp1252) byte, if it has one.
fn winansi_byte(ch: char) -> Option<u8> {
    match ch {
        // ASCII and the Latin-1 range map through directly, except the
        // cp1252 window at 0x80..0x9F.
        '\u{0000}'..='\u{007F}' => Some(ch as u8),
        '\u{00A0}'..='\u{00FF}' => Some(ch as u8),
        '\u{20AC}' => Some(0x80),
        '\u{201A}' => Some(0x82),
        '\u{0192}' => Some(0x83),
        '\u{201E}' => Some(0x84),
        '\u{2026}' => Some(0x85),
        '\u{2020}' => Some(0x86),
        '\u{2021}' => Some(0x87),
        '\u{02C6}' => Some(0x88),
        '\u{2030}' => Some(0x89),
        '\u{0160}' => Some(0x8A),
        '\u{2039}' => Some(0x8B),
        '\u{0152}' => Some(0x8C),
        '\u{017D}' => Some(0x8E),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201C}' => Some(0x93),
        '\u{201D}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        '\u{02DC}' => Some(0x98),
        '\u{2122}' => Some(0x99),
        '\u{0161}' => Some(0x9A),
        '\u{203A}' => Some(0x9B),
        '\u{0153}' => Some(0x9C),
        '\u{017E}' => Some(0x9E),
        '\u{0178}' => Some(0x9F),
        _ => None,
    }
}
