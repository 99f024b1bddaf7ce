//! Link annotations and destinations.
//!
//! A link annotation attaches a clickable rectangular region to a page,
//! pointing either at an external URI or at a fit-horizontally
//! destination on another page. Both targets are validated at
//! construction; the dictionary is built at render time once page object
//! references are known.

use std::collections::HashMap;

use super::object::{Object, ObjectRef, ObjectSerializer};
use super::page::PageId;
use super::EngineError;
use crate::geometry::Rect;

/// An in-document destination: fit the page width, positioned at a
/// vertical offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    page: PageId,
    top: f32,
}

impl Destination {
    /// Create a fit-horizontally destination at the given vertical offset.
    pub fn fit_horizontally(page: PageId, top: f32) -> Result<Self, EngineError> {
        if !top.is_finite() {
            return Err(EngineError::InvalidDestinationOffset(top));
        }
        Ok(Self { page, top })
    }

    /// The destination page.
    pub fn page(&self) -> PageId {
        self.page
    }

    /// The vertical offset on the destination page.
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Build the `[page /FitH top]` destination array.
    pub(crate) fn to_object(
        &self,
        page_refs: &HashMap<PageId, ObjectRef>,
    ) -> Result<Object, EngineError> {
        let page_ref = page_refs
            .get(&self.page)
            .ok_or(EngineError::UnknownDestinationPage(self.page))?;
        Ok(Object::Array(vec![
            Object::Reference(*page_ref),
            ObjectSerializer::name("FitH"),
            ObjectSerializer::real(self.top as f64),
        ]))
    }
}

/// What a link annotation points at.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    /// Open an external URI
    Uri(String),
    /// Jump to an in-document destination
    Destination(Destination),
}

/// A link annotation covering a rectangular page region.
///
/// Links are created with a zero-width invisible border.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    rect: Rect,
    target: LinkTarget,
}

impl LinkAnnotation {
    /// Create a link opening an external URI.
    pub fn uri(rect: Rect, uri: &str) -> Result<Self, EngineError> {
        validate_uri(uri)?;
        Ok(Self {
            rect,
            target: LinkTarget::Uri(uri.to_string()),
        })
    }

    /// Create a link jumping to an in-document destination.
    pub fn internal(rect: Rect, destination: Destination) -> Self {
        Self {
            rect,
            target: LinkTarget::Destination(destination),
        }
    }

    /// The covered page region.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The link target.
    pub fn target(&self) -> &LinkTarget {
        &self.target
    }

    /// Build the annotation dictionary.
    pub(crate) fn to_object(
        &self,
        page_refs: &HashMap<PageId, ObjectRef>,
    ) -> Result<Object, EngineError> {
        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), ObjectSerializer::name("Annot"));
        dict.insert("Subtype".to_string(), ObjectSerializer::name("Link"));
        dict.insert(
            "Rect".to_string(),
            ObjectSerializer::rect(
                self.rect.x as f64,
                self.rect.y as f64,
                self.rect.right() as f64,
                self.rect.top() as f64,
            ),
        );
        dict.insert(
            "Border".to_string(),
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(0),
            ]),
        );

        match &self.target {
            LinkTarget::Uri(uri) => {
                let action = ObjectSerializer::dict(vec![
                    ("S", ObjectSerializer::name("URI")),
                    ("URI", ObjectSerializer::string(uri)),
                ]);
                dict.insert("A".to_string(), action);
            },
            LinkTarget::Destination(destination) => {
                dict.insert("Dest".to_string(), destination.to_object(page_refs)?);
            },
        }

        Ok(Object::Dictionary(dict))
    }
}

/// Reject URIs without a `scheme:` prefix or with whitespace/control bytes.
fn validate_uri(uri: &str) -> Result<(), EngineError> {
    let malformed = || EngineError::MalformedUri(uri.to_string());

    let (scheme, rest) = uri.split_once(':').ok_or_else(malformed)?;
    let mut chars = scheme.chars();
    let first_is_alpha = chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
    if !first_is_alpha || !chars.all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
        return Err(malformed());
    }
    if rest.is_empty() || uri.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(malformed());
    }
    Ok(())
}
