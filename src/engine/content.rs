//! Content stream operators and their serialization.
//!
//! Operators follow PDF specification ISO 32000-1:2008 Sections 8-9. The
//! stream is accumulated as typed operations so callers (and tests) can
//! inspect exactly what was emitted, and serialized to operator syntax
//! when the document is assembled.

use std::io::Write;

/// Device color in the engine's native representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeColor {
    /// DeviceGray (g / G)
    Gray(f32),
    /// DeviceRGB (rg / RG)
    Rgb(f32, f32, f32),
    /// DeviceCMYK (k / K)
    Cmyk(f32, f32, f32, f32),
}

/// Path painting selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Stroke the path (S)
    Stroke,
    /// Fill the path (f)
    Fill,
    /// Fill, then stroke (B)
    FillAndStroke,
}

impl PaintMode {
    /// The painting operator for this mode.
    pub(crate) fn paint_op(self) -> ContentOp {
        match self {
            PaintMode::Stroke => ContentOp::Stroke,
            PaintMode::Fill => ContentOp::Fill,
            PaintMode::FillAndStroke => ContentOp::FillStroke,
        }
    }
}

/// How text is encoded into string operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// WinAnsi (cp1252) literal strings; the base-14 default.
    #[default]
    WinAnsi,
    /// UTF-16BE hex strings.
    Utf16Be,
}

impl TextEncoding {
    /// Encoding name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::WinAnsi => "WinAnsi",
            TextEncoding::Utf16Be => "UTF-16BE",
        }
    }
}

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Bézier curve to (c)
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Close path (h)
    ClosePath,
    /// Stroke (S)
    Stroke,
    /// Fill (f)
    Fill,
    /// Fill and stroke (B)
    FillStroke,
    /// End path without painting (n)
    EndPath,
    /// Clip using non-zero winding rule (W)
    Clip,
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show encoded text as a literal string (Tj)
    ShowText(Vec<u8>),
    /// Show encoded text as a hex string (Tj)
    ShowTextHex(Vec<u8>),
    /// Set fill color (g / rg / k)
    SetFillColor(NativeColor),
    /// Set stroke color (G / RG / K)
    SetStrokeColor(NativeColor),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Set dash pattern (d)
    SetDashPattern(Vec<f32>, f32),
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// An accumulated content stream for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStream {
    operations: Vec<ContentOp>,
}

impl ContentStream {
    /// Create an empty content stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn op(&mut self, op: ContentOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// The operations emitted so far.
    pub fn operations(&self) -> &[ContentOp] {
        &self.operations
    }

    /// Serialize all operations to PDF operator syntax.
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        for op in &self.operations {
            write_op(&mut buf, op)?;
            writeln!(buf)?;
        }
        Ok(buf)
    }
}

/// Write a single operation in operator syntax.
fn write_op<W: Write>(w: &mut W, op: &ContentOp) -> std::io::Result<()> {
    match op {
        ContentOp::SaveState => write!(w, "q"),
        ContentOp::RestoreState => write!(w, "Q"),
        ContentOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", a, b, c, d, e, f)
        },
        ContentOp::MoveTo(x, y) => write!(w, "{} {} m", x, y),
        ContentOp::LineTo(x, y) => write!(w, "{} {} l", x, y),
        ContentOp::CurveTo(x1, y1, x2, y2, x3, y3) => {
            write!(w, "{} {} {} {} {} {} c", x1, y1, x2, y2, x3, y3)
        },
        ContentOp::Rectangle(x, y, width, height) => {
            write!(w, "{} {} {} {} re", x, y, width, height)
        },
        ContentOp::ClosePath => write!(w, "h"),
        ContentOp::Stroke => write!(w, "S"),
        ContentOp::Fill => write!(w, "f"),
        ContentOp::FillStroke => write!(w, "B"),
        ContentOp::EndPath => write!(w, "n"),
        ContentOp::Clip => write!(w, "W"),
        ContentOp::BeginText => write!(w, "BT"),
        ContentOp::EndText => write!(w, "ET"),
        ContentOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, size),
        ContentOp::SetTextMatrix(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} Tm", a, b, c, d, e, f)
        },
        ContentOp::ShowText(bytes) => {
            write!(w, "(")?;
            for &byte in bytes {
                match byte {
                    b'(' => write!(w, "\\(")?,
                    b')' => write!(w, "\\)")?,
                    b'\\' => write!(w, "\\\\")?,
                    b'\n' => write!(w, "\\n")?,
                    b'\r' => write!(w, "\\r")?,
                    b'\t' => write!(w, "\\t")?,
                    _ => w.write_all(&[byte])?,
                }
            }
            write!(w, ") Tj")
        },
        ContentOp::ShowTextHex(bytes) => {
            write!(w, "<")?;
            for byte in bytes {
                write!(w, "{:02X}", byte)?;
            }
            write!(w, "> Tj")
        },
        ContentOp::SetFillColor(color) => match color {
            NativeColor::Gray(g) => write!(w, "{} g", g),
            NativeColor::Rgb(r, g, b) => write!(w, "{} {} {} rg", r, g, b),
            NativeColor::Cmyk(c, m, y, k) => write!(w, "{} {} {} {} k", c, m, y, k),
        },
        ContentOp::SetStrokeColor(color) => match color {
            NativeColor::Gray(g) => write!(w, "{} G", g),
            NativeColor::Rgb(r, g, b) => write!(w, "{} {} {} RG", r, g, b),
            NativeColor::Cmyk(c, m, y, k) => write!(w, "{} {} {} {} K", c, m, y, k),
        },
        ContentOp::SetLineWidth(width) => write!(w, "{} w", width),
        ContentOp::SetDashPattern(pattern, phase) => {
            write!(w, "[")?;
            for (i, p) in pattern.iter().enumerate() {
                if i > 0 {
                    write!(w, " ")?;
                }
                write!(w, "{}", p)?;
            }
            write!(w, "] {} d", phase)
        },
        ContentOp::PaintXObject(name) => write!(w, "/{} Do", name),
    }
}
