//! The writer engine: the delegate side of the drawing layer.
//!
//! ## Architecture
//!
//! ```text
//! GraphicsContext (state-caching adapter)
//!     ↓
//! [Page] (primitive operations → ContentOp list, annotations, resources)
//!     ↓
//! [Engine] (assembles catalog, pages, outlines, xref, trailer)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! The engine owns document-level concerns (metadata, outline list, byte
//! assembly); pages are owned by their graphics contexts and collected by
//! reference at render time.

mod annotation;
mod content;
mod document;
mod object;
mod outline;
mod page;

pub use annotation::{Destination, LinkAnnotation, LinkTarget};
pub use content::{ContentOp, ContentStream, NativeColor, PaintMode, TextEncoding};
pub use document::{DocumentConfig, Engine};
pub use object::{Object, ObjectRef, ObjectSerializer};
pub use outline::OutlineEntry;
pub use page::{FontResource, ImageData, ImageResource, Page, PageId};

/// Failures raised inside the writer engine.
///
/// The drawing layer wraps these at its annotation entry points and
/// passes them through unmodified everywhere else.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A URI did not have the shape `scheme:rest` or contained
    /// whitespace/control bytes.
    #[error("malformed URI \"{0}\"")]
    MalformedUri(String),

    /// A destination's vertical offset was NaN or infinite.
    #[error("destination offset must be finite, got {0}")]
    InvalidDestinationOffset(f32),

    /// An outline entry was created with an empty title.
    #[error("outline title must not be empty")]
    EmptyOutlineTitle,

    /// Text was drawn before any font was selected on the page.
    #[error("no font selected before drawing text")]
    NoFontSelected,

    /// A character has no representation in the requested encoding.
    #[error("character {ch:?} is not representable in {encoding} encoding")]
    UnencodableText {
        /// The offending character
        ch: char,
        /// Name of the encoding that rejected it
        encoding: &'static str,
    },

    /// A link or outline destination references a page that is not part
    /// of the rendered document.
    #[error("destination references unknown page {0}")]
    UnknownDestinationPage(PageId),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
