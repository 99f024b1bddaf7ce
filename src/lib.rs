// Drawing APIs take corner coordinates, so several functions carry many
// positional arguments by design.
#![allow(clippy::too_many_arguments)]

//! # pdf_quill
//!
//! Programmatic PDF drawing with redundant-operator elision.
//!
//! ## Core Features
//!
//! - **Graphics contexts**: shapes, text, images, clipping, and graphics
//!   state per page, with a state cache that drops repeated color, line
//!   width, and dash operators from the output
//! - **Interactive elements**: URI links, in-document jump links, and
//!   named bookmarks with fit-width destinations
//! - **Writer engine**: content-stream serialization and full document
//!   assembly (catalog, page tree, xref, trailer), with optional
//!   FlateDecode compression
//!
//! ## Quick Start
//!
//! ```
//! use pdf_quill::{Color, Engine, Font};
//!
//! # fn main() -> pdf_quill::Result<()> {
//! let engine = Engine::new();
//! let mut gc = engine.create_context(612.0, 792.0);
//!
//! gc.set_fill_color(&Color::from_hex("#1a1a1a")?);
//! gc.set_font(&Font::helvetica(), 12.0);
//! gc.draw_text("Hello, world!", 72.0, 720.0, Default::default())?;
//! gc.add_bookmark("Greeting", 720.0)?;
//!
//! let bytes = engine.render(&[gc])?;
//! assert!(bytes.starts_with(b"%PDF-"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! A graphics context and its page belong to one logical thread of
//! control for the duration of a document build; contexts are not `Send`.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Geometry and value objects
pub mod color;
pub mod font;
pub mod geometry;
pub mod image;

// The drawing API
pub mod context;

// The writer engine
pub mod engine;

// Re-exports
pub use color::Color;
pub use context::{DashPattern, FillMode, GraphicsContext};
pub use engine::{DocumentConfig, Engine, EngineError, TextEncoding};
pub use error::{Error, Result};
pub use font::{Font, FontStyle};
pub use geometry::Rect;
pub use image::Image;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        // VERSION is populated from CARGO_PKG_VERSION at compile time
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_quill");
    }
}
