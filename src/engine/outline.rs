//! Document outline (bookmark) entries.
//!
//! Bookmarks collected through the drawing layer form a flat chain under
//! the `/Outlines` root, per PDF spec Section 12.3.3.

use std::collections::HashMap;

use super::annotation::Destination;
use super::object::{Object, ObjectRef, ObjectSerializer};
use super::page::PageId;
use super::EngineError;

/// A single named bookmark pointing at a fit-horizontally destination.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    title: String,
    destination: Destination,
}

impl OutlineEntry {
    /// Create an outline entry. The title must be non-empty.
    pub fn new(title: impl Into<String>, destination: Destination) -> Result<Self, EngineError> {
        let title = title.into();
        if title.is_empty() {
            return Err(EngineError::EmptyOutlineTitle);
        }
        Ok(Self { title, destination })
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Destination when clicked.
    pub fn destination(&self) -> Destination {
        self.destination
    }
}

/// Build the outline root and its flat chain of entries.
///
/// Returns `None` when there are no entries; otherwise the root
/// reference plus every outline object keyed by its id, starting at
/// `start_id`.
pub(crate) fn build_outline_chain(
    entries: &[OutlineEntry],
    page_refs: &HashMap<PageId, ObjectRef>,
    start_id: u32,
) -> Result<Option<(ObjectRef, Vec<(u32, Object)>)>, EngineError> {
    if entries.is_empty() {
        return Ok(None);
    }

    let root_id = start_id;
    let item_id = |index: usize| root_id + 1 + index as u32;

    let mut objects = Vec::with_capacity(entries.len() + 1);
    for (index, entry) in entries.iter().enumerate() {
        let mut dict = HashMap::new();
        dict.insert("Title".to_string(), ObjectSerializer::string(entry.title()));
        dict.insert("Parent".to_string(), ObjectSerializer::reference(root_id, 0));
        dict.insert(
            "Dest".to_string(),
            entry.destination.to_object(page_refs)?,
        );
        if index > 0 {
            dict.insert(
                "Prev".to_string(),
                ObjectSerializer::reference(item_id(index - 1), 0),
            );
        }
        if index + 1 < entries.len() {
            dict.insert(
                "Next".to_string(),
                ObjectSerializer::reference(item_id(index + 1), 0),
            );
        }
        objects.push((item_id(index), Object::Dictionary(dict)));
    }

    let root = ObjectSerializer::dict(vec![
        ("Type", ObjectSerializer::name("Outlines")),
        ("First", ObjectSerializer::reference(item_id(0), 0)),
        ("Last", ObjectSerializer::reference(item_id(entries.len() - 1), 0)),
        ("Count", ObjectSerializer::integer(entries.len() as i64)),
    ]);
    objects.push((root_id, root));

    Ok(Some((ObjectRef::new(root_id, 0), objects)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::page::Page;

    fn entry(page: PageId, title: &str, top: f32) -> OutlineEntry {
        OutlineEntry::new(title, Destination::fit_horizontally(page, top).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_title_rejected() {
        let page = Page::new(612.0, 792.0);
        let destination = Destination::fit_horizontally(page.id(), 0.0).unwrap();
        assert!(matches!(
            OutlineEntry::new("", destination),
            Err(EngineError::EmptyOutlineTitle)
        ));
    }

    #[test]
    fn test_empty_chain_builds_nothing() {
        let result = build_outline_chain(&[], &HashMap::new(), 10).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_chain_linking() {
        let page = Page::new(612.0, 792.0);
        let mut refs = HashMap::new();
        refs.insert(page.id(), ObjectRef::new(3, 0));

        let entries = vec![
            entry(page.id(), "Chapter 1", 700.0),
            entry(page.id(), "Chapter 2", 400.0),
            entry(page.id(), "Chapter 3", 100.0),
        ];
        let (root_ref, objects) = build_outline_chain(&entries, &refs, 10).unwrap().unwrap();

        assert_eq!(root_ref, ObjectRef::new(10, 0));
        assert_eq!(objects.len(), 4);

        let middle = objects
            .iter()
            .find(|(id, _)| *id == 12)
            .map(|(_, obj)| obj)
            .unwrap();
        let Object::Dictionary(dict) = middle else {
            panic!("expected dictionary");
        };
        assert_eq!(dict.get("Prev"), Some(&ObjectSerializer::reference(11, 0)));
        assert_eq!(dict.get("Next"), Some(&ObjectSerializer::reference(13, 0)));

        let root = objects
            .iter()
            .find(|(id, _)| *id == 10)
            .map(|(_, obj)| obj)
            .unwrap();
        let Object::Dictionary(dict) = root else {
            panic!("expected dictionary");
        };
        assert_eq!(dict.get("Count"), Some(&Object::Integer(3)));
    }

    #[test]
    fn test_unknown_page_fails_chain() {
        let page = Page::new(612.0, 792.0);
        let entries = vec![entry(page.id(), "Orphan", 0.0)];
        assert!(build_outline_chain(&entries, &HashMap::new(), 10).is_err());
    }
}
