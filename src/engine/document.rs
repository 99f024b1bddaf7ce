//! Document-level state and byte assembly.
//!
//! The [`Engine`] owns everything that outlives a single page: metadata,
//! the outline list, and final assembly of the PDF byte stream (header,
//! body, cross-reference table, trailer).

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::rc::Rc;

use super::object::{Object, ObjectRef, ObjectSerializer};
use super::outline::{build_outline_chain, OutlineEntry};
use super::page::{ImageData, Page, PageId};
use crate::context::GraphicsContext;
use crate::error::Result;

/// Configuration for document generation.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to compress content streams and raw image data
    pub compress: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: Some("pdf_quill".to_string()),
            compress: false,
        }
    }
}

impl DocumentConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set document keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set the creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Enable or disable stream compression (FlateDecode).
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data for the FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// The document engine.
///
/// Creates graphics contexts, holds the shared outline list they append
/// bookmarks to, and renders a slice of contexts into PDF bytes. The
/// engine manages no files beyond the explicit [`save`](Engine::save)
/// convenience.
#[derive(Debug)]
pub struct Engine {
    config: DocumentConfig,
    outlines: Rc<RefCell<Vec<OutlineEntry>>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            config,
            outlines: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Create a graphics context drawing on a fresh page of the given
    /// dimensions (in points).
    pub fn create_context(&self, width: f32, height: f32) -> GraphicsContext {
        GraphicsContext::new(Page::new(width, height), Rc::clone(&self.outlines))
    }

    /// Number of bookmarks added so far.
    pub fn bookmark_count(&self) -> usize {
        self.outlines.borrow().len()
    }

    /// Render the given contexts, in order, into a complete PDF document.
    pub fn render(&self, contexts: &[GraphicsContext]) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::new();
        let outlines = self.outlines.borrow();

        log::debug!(
            "assembling document: {} pages, {} bookmarks, compress={}",
            contexts.len(),
            outlines.len(),
            self.config.compress
        );

        // Allocate object ids up front: catalog, page tree, then one
        // page + one content stream per context.
        let catalog_id = 1u32;
        let pages_tree_id = 2u32;
        let mut next_obj_id = 3u32;
        let mut alloc = |next: &mut u32| {
            let id = *next;
            *next += 1;
            id
        };

        let mut page_ids = Vec::with_capacity(contexts.len());
        let mut page_refs: HashMap<PageId, ObjectRef> = HashMap::new();
        for gc in contexts {
            let page_id = alloc(&mut next_obj_id);
            let content_id = alloc(&mut next_obj_id);
            page_ids.push((page_id, content_id));
            page_refs.insert(gc.page().id(), ObjectRef::new(page_id, 0));
        }

        // One font object per distinct base font across all pages.
        let mut font_objects: BTreeMap<String, u32> = BTreeMap::new();
        for gc in contexts {
            for base_font in gc.page().fonts().keys() {
                if !font_objects.contains_key(base_font) {
                    font_objects.insert(base_font.clone(), alloc(&mut next_obj_id));
                }
            }
        }

        // Ordered object list; every allocated id must appear here so the
        // cross-reference table has no gaps.
        let mut objects: Vec<(u32, Object)> = Vec::new();

        // Page, content stream, image, and annotation objects.
        for (gc, &(page_id, content_id)) in contexts.iter().zip(&page_ids) {
            let page = gc.page();

            let mut image_refs: Vec<(String, ObjectRef)> = Vec::new();
            for (name, image) in page.images() {
                let id = alloc(&mut next_obj_id);
                objects.push((id, self.image_object(image.width(), image.height(), image.data())?));
                image_refs.push((name.clone(), ObjectRef::new(id, 0)));
            }

            let mut annot_refs: Vec<Object> = Vec::new();
            for annotation in page.annotations() {
                let id = alloc(&mut next_obj_id);
                objects.push((id, annotation.to_object(&page_refs)?));
                annot_refs.push(ObjectSerializer::reference(id, 0));
            }

            objects.push((content_id, self.content_object(page)?));
            objects.push((
                page_id,
                self.page_object(page, pages_tree_id, content_id, &font_objects, &image_refs, annot_refs),
            ));
        }

        // Font objects.
        for (base_font, id) in &font_objects {
            objects.push((
                *id,
                ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("Font")),
                    ("Subtype", ObjectSerializer::name("Type1")),
                    ("BaseFont", ObjectSerializer::name(base_font)),
                    ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
                ]),
            ));
        }

        // Outline chain.
        let outline_root = match build_outline_chain(&outlines, &page_refs, next_obj_id)? {
            Some((root_ref, outline_objects)) => {
                next_obj_id += outline_objects.len() as u32;
                objects.extend(outline_objects);
                Some(root_ref)
            },
            None => None,
        };

        // Page tree.
        let kids: Vec<Object> = page_ids
            .iter()
            .map(|&(page_id, _)| ObjectSerializer::reference(page_id, 0))
            .collect();
        objects.push((
            pages_tree_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Pages")),
                ("Kids", Object::Array(kids)),
                ("Count", ObjectSerializer::integer(contexts.len() as i64)),
            ]),
        ));

        // Catalog.
        let mut catalog_entries = vec![
            ("Type", ObjectSerializer::name("Catalog")),
            ("Pages", ObjectSerializer::reference(pages_tree_id, 0)),
        ];
        if let Some(root_ref) = outline_root {
            catalog_entries.push(("Outlines", Object::Reference(root_ref)));
        }
        objects.push((catalog_id, ObjectSerializer::dict(catalog_entries)));

        // Info dictionary.
        let info_id = alloc(&mut next_obj_id);
        objects.push((info_id, self.info_object()));

        log::debug!("writing {} indirect objects", objects.len());

        // Header, body, xref, trailer.
        let mut output = Vec::new();
        writeln!(output, "%PDF-{}", self.config.version)?;
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref_offsets: Vec<(u32, usize)> = Vec::with_capacity(objects.len());
        for (id, obj) in &objects {
            xref_offsets.push((*id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(*id, 0, obj)?);
        }

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", next_obj_id)?;
        writeln!(output, "0000000000 65535 f ")?;
        xref_offsets.sort_by_key(|(id, _)| *id);
        for (_, offset) in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(next_obj_id as i64)),
            ("Root", ObjectSerializer::reference(catalog_id, 0)),
            ("Info", ObjectSerializer::reference(info_id, 0)),
        ]);
        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&trailer)?);
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }

    /// Render and write the document to a file.
    pub fn save(
        &self,
        contexts: &[GraphicsContext],
        path: impl AsRef<std::path::Path>,
    ) -> Result<()> {
        let bytes = self.render(contexts)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Build the content stream object for a page.
    fn content_object(&self, page: &Page) -> Result<Object> {
        let raw = page.content().to_bytes()?;

        let (data, compressed) = if self.config.compress {
            match compress_data(&raw) {
                Ok(compressed) => {
                    log::debug!(
                        "content stream compressed: {} -> {} bytes",
                        raw.len(),
                        compressed.len()
                    );
                    (compressed, true)
                },
                // Fall back to the uncompressed stream.
                Err(_) => (raw, false),
            }
        } else {
            (raw, false)
        };

        let mut dict = HashMap::new();
        dict.insert("Length".to_string(), Object::Integer(data.len() as i64));
        if compressed {
            dict.insert("Filter".to_string(), ObjectSerializer::name("FlateDecode"));
        }
        Ok(Object::Stream {
            dict,
            data: bytes::Bytes::from(data),
        })
    }

    /// Build a page dictionary.
    fn page_object(
        &self,
        page: &Page,
        pages_tree_id: u32,
        content_id: u32,
        font_objects: &BTreeMap<String, u32>,
        image_refs: &[(String, ObjectRef)],
        annot_refs: Vec<Object>,
    ) -> Object {
        let mut resources: Vec<(&str, Object)> = Vec::new();

        if !page.fonts().is_empty() {
            let font_dict: HashMap<String, Object> = page
                .fonts()
                .iter()
                .filter_map(|(base_font, resource_name)| {
                    font_objects
                        .get(base_font)
                        .map(|id| (resource_name.clone(), ObjectSerializer::reference(*id, 0)))
                })
                .collect();
            resources.push(("Font", Object::Dictionary(font_dict)));
        }

        if !image_refs.is_empty() {
            let xobject_dict: HashMap<String, Object> = image_refs
                .iter()
                .map(|(name, obj_ref)| (name.clone(), Object::Reference(*obj_ref)))
                .collect();
            resources.push(("XObject", Object::Dictionary(xobject_dict)));
        }

        let mut entries = vec![
            ("Type", ObjectSerializer::name("Page")),
            ("Parent", ObjectSerializer::reference(pages_tree_id, 0)),
            (
                "MediaBox",
                ObjectSerializer::rect(0.0, 0.0, page.width() as f64, page.height() as f64),
            ),
            ("Contents", ObjectSerializer::reference(content_id, 0)),
            ("Resources", ObjectSerializer::dict(resources)),
        ];
        if !annot_refs.is_empty() {
            entries.push(("Annots", Object::Array(annot_refs)));
        }
        ObjectSerializer::dict(entries)
    }

    /// Build an image XObject.
    fn image_object(&self, width: u32, height: u32, data: &ImageData) -> Result<Object> {
        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), ObjectSerializer::name("XObject"));
        dict.insert("Subtype".to_string(), ObjectSerializer::name("Image"));
        dict.insert("Width".to_string(), Object::Integer(width as i64));
        dict.insert("Height".to_string(), Object::Integer(height as i64));
        dict.insert("BitsPerComponent".to_string(), Object::Integer(8));

        let payload = match data {
            ImageData::Jpeg(bytes) => {
                dict.insert("ColorSpace".to_string(), ObjectSerializer::name("DeviceRGB"));
                dict.insert("Filter".to_string(), ObjectSerializer::name("DCTDecode"));
                bytes.clone()
            },
            ImageData::Rgb(bytes) => {
                dict.insert("ColorSpace".to_string(), ObjectSerializer::name("DeviceRGB"));
                self.raw_pixels(&mut dict, bytes)?
            },
            ImageData::Gray(bytes) => {
                dict.insert("ColorSpace".to_string(), ObjectSerializer::name("DeviceGray"));
                self.raw_pixels(&mut dict, bytes)?
            },
        };

        dict.insert("Length".to_string(), Object::Integer(payload.len() as i64));
        Ok(Object::Stream {
            dict,
            data: payload,
        })
    }

    /// Optionally compress raw pixel data, tagging the filter.
    fn raw_pixels(
        &self,
        dict: &mut HashMap<String, Object>,
        bytes: &bytes::Bytes,
    ) -> Result<bytes::Bytes> {
        if self.config.compress {
            if let Ok(compressed) = compress_data(bytes) {
                dict.insert("Filter".to_string(), ObjectSerializer::name("FlateDecode"));
                return Ok(bytes::Bytes::from(compressed));
            }
        }
        Ok(bytes.clone())
    }

    /// Build the Info dictionary.
    fn info_object(&self) -> Object {
        let mut entries = Vec::new();
        if let Some(title) = &self.config.title {
            entries.push(("Title", ObjectSerializer::string(title)));
        }
        if let Some(author) = &self.config.author {
            entries.push(("Author", ObjectSerializer::string(author)));
        }
        if let Some(subject) = &self.config.subject {
            entries.push(("Subject", ObjectSerializer::string(subject)));
        }
        if let Some(keywords) = &self.config.keywords {
            entries.push(("Keywords", ObjectSerializer::string(keywords)));
        }
        if let Some(creator) = &self.config.creator {
            entries.push(("Creator", ObjectSerializer::string(creator)));
        }
        ObjectSerializer::dict(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = DocumentConfig::default()
            .with_title("Report")
            .with_author("QA")
            .with_compress(true);
        assert_eq!(config.title.as_deref(), Some("Report"));
        assert_eq!(config.author.as_deref(), Some("QA"));
        assert!(config.compress);
        assert_eq!(config.version, "1.7");
    }

    #[test]
    fn test_empty_document_structure() {
        let engine = Engine::new();
        let gc = engine.create_context(612.0, 792.0);
        let bytes = engine.render(&[gc]).unwrap();

        let content = String::from_utf8_lossy(&bytes);
        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/Type /Page"));
        assert!(content.contains("[0 0 612 792]"));
        assert!(content.contains("xref"));
        assert!(content.ends_with("%%EOF"));
    }

    #[test]
    fn test_metadata_in_info() {
        let engine =
            Engine::with_config(DocumentConfig::default().with_title("Quarterly Report"));
        let gc = engine.create_context(595.0, 842.0);
        let bytes = engine.render(&[gc]).unwrap();

        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/Title (Quarterly Report)"));
        assert!(content.contains("/Creator (pdf_quill)"));
    }

    #[test]
    fn test_compression_helper_round_trip() {
        use std::io::Read;

        let data = b"q 1 0 0 1 0 0 cm Q ".repeat(64);
        let compressed = compress_data(&data).unwrap();
        assert!(compressed.len() < data.len());

        let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
        let mut round_tripped = Vec::new();
        decoder.read_to_end(&mut round_tripped).unwrap();
        assert_eq!(round_tripped, data);
    }
}
