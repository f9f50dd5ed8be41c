//! Typed XML element tree for presentation parts.
//!
//! Parts are parsed once into an [`ElementNode`] tree keyed by local names
//! (namespace prefixes are dropped), with children kept in document order.
//! Resolvers navigate it through the typed accessors here instead of
//! string-array path lookups.

use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// An XML element: local tag name, attributes by local name, ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementNode {
    tag: String,
    attrs: HashMap<String, String>,
    children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Parse a part into its root element.
    ///
    /// Text content is not retained; nothing in style resolution reads it.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut stack: Vec<ElementNode> = Vec::new();
        let mut root: Option<ElementNode> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(Self::from_start(e)?);
                },
                Ok(Event::Empty(ref e)) => {
                    let node = Self::from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None if root.is_none() => root = Some(node),
                        None => {},
                    }
                },
                Ok(Event::End(_)) => {
                    if let Some(node) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(node),
                            None if root.is_none() => root = Some(node),
                            None => {},
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        root.ok_or_else(|| OoxmlError::Xml("document has no root element".to_string()))
    }

    fn from_start(e: &BytesStart<'_>) -> Result<Self> {
        let tag = std::str::from_utf8(e.local_name().as_ref())
            .map_err(|e| OoxmlError::Xml(e.to_string()))?
            .to_string();

        let mut attrs = HashMap::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let name = std::str::from_utf8(attr.key.local_name().as_ref())
                .map_err(|e| OoxmlError::Xml(e.to_string()))?
                .to_string();
            let value = attr.unescape_value()?.into_owned();
            if attr.key.prefix().is_some() {
                // Prefixed attributes are also kept under their qualified name;
                // an unprefixed attribute owns the bare local name.
                let qualified = std::str::from_utf8(key)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?
                    .to_string();
                attrs.insert(qualified, value.clone());
                attrs.entry(name).or_insert(value);
            } else {
                attrs.insert(name, value);
            }
        }

        Ok(Self {
            tag,
            attrs,
            children: Vec::new(),
        })
    }

    /// Local tag name.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value by local name (`embed`), or by qualified name
    /// (`r:id`) where a local name is shared.
    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Integer attribute. Unparseable values are treated as absent.
    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name)
            .and_then(|v| atoi_simd::parse::<i64, false, false>(v.trim().as_bytes()).ok())
    }

    /// Non-negative integer attribute.
    pub fn attr_u32(&self, name: &str) -> Option<u32> {
        self.attr(name)
            .and_then(|v| atoi_simd::parse::<u32, false, false>(v.trim().as_bytes()).ok())
    }

    /// Boolean attribute (`1`/`true`/`on` and `0`/`false`/`off`).
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        match self.attr(name)? {
            "1" | "true" | "on" => Some(true),
            "0" | "false" | "off" => Some(false),
            _ => None,
        }
    }

    /// All children in document order.
    #[inline]
    pub fn children(&self) -> &[ElementNode] {
        &self.children
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&ElementNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ElementNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Follow a chain of first-matching children.
    pub fn descend(&self, tags: &[&str]) -> Option<&ElementNode> {
        tags.iter().try_fold(self, |node, tag| node.child(tag))
    }

    /// Depth-first search for every descendant with the given tag.
    pub fn descendants_named<'a>(&'a self, tag: &'a str) -> Vec<&'a ElementNode> {
        let mut found = Vec::new();
        let mut stack: Vec<&ElementNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.tag == tag {
                found.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_prefixes_and_keeps_order() {
        let xml = br#"<p:sld xmlns:p="urn:p" xmlns:a="urn:a" xmlns:r="urn:r">
            <p:cSld><p:bg><p:bgPr>
                <a:solidFill><a:srgbClr val="FF0000"/></a:solidFill>
                <a:effectLst/>
            </p:bgPr></p:bg></p:cSld>
            <a:blip r:embed="rId2"/>
        </p:sld>"#;

        let root = ElementNode::parse(xml).unwrap();
        assert_eq!(root.tag(), "sld");
        assert_eq!(root.attr("p"), None);

        let bg_pr = root.descend(&["cSld", "bg", "bgPr"]).unwrap();
        let tags: Vec<&str> = bg_pr.children().iter().map(|c| c.tag()).collect();
        assert_eq!(tags, ["solidFill", "effectLst"]);

        assert_eq!(root.child("blip").unwrap().attr("embed"), Some("rId2"));
    }

    #[test]
    fn test_unprefixed_attribute_owns_local_name() {
        let xml = br#"<p:sldIdLst xmlns:p="urn:p" xmlns:r="urn:r">
            <p:sldId r:id="rId2" id="256"/>
            <p:sldId id="257" r:id="rId3"/>
        </p:sldIdLst>"#;
        let root = ElementNode::parse(xml).unwrap();
        let ids: Vec<(Option<&str>, Option<&str>)> = root
            .children()
            .iter()
            .map(|n| (n.attr("id"), n.attr("r:id")))
            .collect();
        assert_eq!(ids, [(Some("256"), Some("rId2")), (Some("257"), Some("rId3"))]);
    }

    #[test]
    fn test_typed_attributes() {
        let node = ElementNode::new("gs")
            .with_attr("pos", "50000")
            .with_attr("neg", "-5400000")
            .with_attr("bad", "12x")
            .with_attr("b", "1");
        assert_eq!(node.attr_u32("pos"), Some(50000));
        assert_eq!(node.attr_i64("neg"), Some(-5_400_000));
        assert_eq!(node.attr_i64("bad"), None);
        assert_eq!(node.attr_bool("b"), Some(true));
        assert_eq!(node.attr_bool("missing"), None);
    }

    #[test]
    fn test_descendants_named() {
        let root = ElementNode::new("spTree")
            .with_child(ElementNode::new("sp").with_child(ElementNode::new("ph")))
            .with_child(
                ElementNode::new("grpSp").with_child(ElementNode::new("sp").with_attr("id", "2")),
            );
        assert_eq!(root.descendants_named("sp").len(), 2);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ElementNode::parse(b"").is_err());
        assert!(ElementNode::parse(b"<a><b></a>").is_err());
    }
}
