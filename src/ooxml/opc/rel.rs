//! Relationship registry for a single source part.
//!
//! Parses a part's companion `.rels` file into an immutable map from
//! relationship id to `(type, normalized target)`.

use crate::ooxml::dom::ElementNode;
use crate::ooxml::opc::constants::{reltype_suffix, target_mode};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::package::PartSource;
use crate::ooxml::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEntry {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference as written in the .rels file
    target_ref: String,

    /// Normalized absolute target for internal relationships
    target: Option<PackURI>,
}

impl RelationshipEntry {
    /// Create an entry, resolving `target_ref` against `base_uri` unless external.
    pub fn new(r_id: String, reltype: String, target_ref: String, base_uri: &str, is_external: bool) -> Self {
        let target = if is_external {
            None
        } else {
            PackURI::from_rel_ref(base_uri, &target_ref).ok()
        };
        Self {
            r_id,
            reltype,
            target_ref,
            target,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type URI.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference as written.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Normalized target partname; `None` for external relationships.
    #[inline]
    pub fn target(&self) -> Option<&PackURI> {
        self.target.as_ref()
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target.is_none()
    }
}

/// Collection of relationships from a single source part.
///
/// Entries keep document order; a duplicate id replaces the earlier entry in
/// place (last wins). Immutable once built.
#[derive(Debug, Clone)]
pub struct RelationshipMap {
    /// The part these relationships belong to
    source: PackURI,

    entries: Vec<RelationshipEntry>,

    /// Map of relationship ID to position in `entries`
    index: HashMap<String, usize>,
}

impl RelationshipMap {
    /// Create an empty map for `source`.
    pub fn empty(source: PackURI) -> Self {
        Self {
            source,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Load the relationships of `source` from a package.
    ///
    /// A missing `.rels` file yields an empty map, never an error.
    pub fn load<S: PartSource + ?Sized>(package: &S, source: &PackURI) -> Result<Self> {
        match package.read_part(&source.rels_uri()) {
            Some(xml) => Self::from_xml(xml, source.clone()),
            None => Ok(Self::empty(source.clone())),
        }
    }

    /// Parse a `.rels` document.
    pub fn from_xml(rels_xml: &[u8], source: PackURI) -> Result<Self> {
        let mut map = Self::empty(source);
        let base_uri = map.source.base_uri().to_string();
        let mut reader = Reader::from_reader(rels_xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut r_id = None;
                        let mut reltype = None;
                        let mut target_ref = None;
                        let mut external = false;

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                                b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                                b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                                b"TargetMode" => {
                                    external = attr.unescape_value()? == target_mode::EXTERNAL
                                },
                                _ => {},
                            }
                        }

                        if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                            map.insert(RelationshipEntry::new(id, rt, tr, &base_uri, external));
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Build from an already-parsed `<Relationships>` tree.
    pub fn from_node(root: &ElementNode, source: PackURI) -> Self {
        let mut map = Self::empty(source);
        let base_uri = map.source.base_uri().to_string();
        for rel in root.children_named("Relationship") {
            if let (Some(id), Some(rt), Some(tr)) = (rel.attr("Id"), rel.attr("Type"), rel.attr("Target")) {
                let external = rel.attr("TargetMode") == Some(target_mode::EXTERNAL);
                map.insert(RelationshipEntry::new(
                    id.to_string(),
                    rt.to_string(),
                    tr.to_string(),
                    &base_uri,
                    external,
                ));
            }
        }
        map
    }

    fn insert(&mut self, entry: RelationshipEntry) {
        match self.index.get(entry.r_id()) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(entry.r_id().to_string(), self.entries.len());
                self.entries.push(entry);
            },
        }
    }

    /// The part these relationships belong to.
    #[inline]
    pub fn source(&self) -> &PackURI {
        &self.source
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&RelationshipEntry> {
        self.index.get(r_id).map(|&pos| &self.entries[pos])
    }

    /// Target partname of an internal relationship by ID.
    pub fn target_of(&self, r_id: &str) -> Option<&PackURI> {
        self.get(r_id).and_then(RelationshipEntry::target)
    }

    /// First internal target whose type URI ends with `/{suffix}`.
    ///
    /// # Arguments
    /// * `suffix` - Final segment of the type URI, e.g. `"slideLayout"`
    pub fn first_target_of_type(&self, suffix: &str) -> Option<&PackURI> {
        self.entries
            .iter()
            .filter(|rel| reltype_suffix(rel.reltype()) == suffix)
            .find_map(RelationshipEntry::target)
    }

    /// Get an iterator over all relationships in document order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &RelationshipEntry> {
        self.entries.iter()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::package::MemoryPackage;

    const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image9.png"/>
</Relationships>"#;

    fn slide_uri() -> PackURI {
        PackURI::new("/ppt/slides/slide1.xml").unwrap()
    }

    #[test]
    fn test_parse_and_normalize() {
        let rels = RelationshipMap::from_xml(SLIDE_RELS.as_bytes(), slide_uri()).unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(
            rels.first_target_of_type("slideLayout").map(PackURI::as_str),
            Some("/ppt/slideLayouts/slideLayout1.xml")
        );
        assert!(rels.get("rId3").unwrap().is_external());
        assert_eq!(rels.target_of("rId3"), None);
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let rels = RelationshipMap::from_xml(SLIDE_RELS.as_bytes(), slide_uri()).unwrap();
        assert_eq!(
            rels.target_of("rId2").map(PackURI::as_str),
            Some("/ppt/media/image9.png")
        );
    }

    #[test]
    fn test_from_node_matches_streaming_parse() {
        let root = ElementNode::parse(SLIDE_RELS.as_bytes()).unwrap();
        let from_tree = RelationshipMap::from_node(&root, slide_uri());
        let streamed = RelationshipMap::from_xml(SLIDE_RELS.as_bytes(), slide_uri()).unwrap();
        let a: Vec<_> = from_tree.iter().cloned().collect();
        let b: Vec<_> = streamed.iter().cloned().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_rels_file_is_empty() {
        let package = MemoryPackage::new();
        let rels = RelationshipMap::load(&package, &slide_uri()).unwrap();
        assert!(rels.is_empty());
        assert_eq!(rels.source(), &slide_uri());
    }
}
