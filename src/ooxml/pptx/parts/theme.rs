//! Theme parts for PowerPoint presentations.
//!
//! A theme supplies the concrete colors behind scheme colors, the major and
//! minor fonts, and the background fill style list that `p:bgRef` indexes.
use crate::ooxml::dom::ElementNode;
use crate::ooxml::drawings::scheme::ThemeColorTable;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::{PackURI, RelationshipMap};

/// Font information from a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeFont {
    /// Font typeface name
    pub typeface: String,
    /// Font character set
    pub charset: Option<String>,
}

impl ThemeFont {
    fn from_font_collection(node: &ElementNode) -> Option<Self> {
        let latin = node.child("latin")?;
        Some(Self {
            typeface: latin.attr("typeface")?.to_string(),
            charset: latin.attr("charset").map(str::to_string),
        })
    }
}

/// Theme information extracted from a theme part.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// Major (heading) font
    pub major_font: Option<ThemeFont>,
    /// Minor (body) font
    pub minor_font: Option<ThemeFont>,
    /// Color scheme colors
    pub colors: ThemeColorTable,
    /// `a:bgFillStyleLst` entries in document order
    pub bg_fill_styles: Vec<ElementNode>,
}

impl Theme {
    /// Read a theme from its `a:theme` root element.
    pub fn from_node(root: &ElementNode) -> Result<Self> {
        if root.tag() != "theme" {
            return Err(OoxmlError::InvalidFormat(format!(
                "expected <a:theme>, found <{}>",
                root.tag()
            )));
        }

        let elements = root.child("themeElements");
        let colors = elements
            .and_then(|e| e.child("clrScheme"))
            .map(ThemeColorTable::from_node)
            .unwrap_or_default();

        let font_scheme = elements.and_then(|e| e.child("fontScheme"));
        let major_font = font_scheme
            .and_then(|f| f.child("majorFont"))
            .and_then(ThemeFont::from_font_collection);
        let minor_font = font_scheme
            .and_then(|f| f.child("minorFont"))
            .and_then(ThemeFont::from_font_collection);

        let bg_fill_styles = elements
            .and_then(|e| e.descend(&["fmtScheme", "bgFillStyleLst"]))
            .map(|list| list.children().to_vec())
            .unwrap_or_default();

        Ok(Self {
            name: root.attr("name").unwrap_or_default().to_string(),
            major_font,
            minor_font,
            colors,
            bg_fill_styles,
        })
    }

    /// Resolve a `+mj-lt` / `+mn-lt` style typeface reference.
    ///
    /// Returns `typeface` unchanged when it is not a theme reference, and
    /// `None` when it is one the theme cannot satisfy.
    pub fn resolve_typeface<'a>(&'a self, typeface: &'a str) -> Option<&'a str> {
        let font = if typeface.starts_with("+mj") {
            self.major_font.as_ref()
        } else if typeface.starts_with("+mn") {
            self.minor_font.as_ref()
        } else {
            return Some(typeface);
        };
        font.map(|f| f.typeface.as_str())
    }
}

/// Theme part - defines the visual styling of a presentation.
///
/// Corresponds to `/ppt/theme/themeN.xml` in the package. Parsed once per
/// package load and shared read-only by every slide that reaches it.
#[derive(Debug, Clone)]
pub struct ThemePart {
    partname: PackURI,
    rels: RelationshipMap,
    theme: Theme,
}

impl ThemePart {
    pub fn new(partname: PackURI, rels: RelationshipMap, theme: Theme) -> Self {
        Self {
            partname,
            rels,
            theme,
        }
    }

    /// Parse a theme part from its root element.
    pub fn from_node(partname: PackURI, rels: RelationshipMap, root: &ElementNode) -> Result<Self> {
        Ok(Self::new(partname, rels, Theme::from_node(root)?))
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Relationships of the theme part (images used by fill styles).
    #[inline]
    pub fn rels(&self) -> &RelationshipMap {
        &self.rels
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}
