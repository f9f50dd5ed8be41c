//! Placeholder identification and lookup.
//!
//! Placeholders are the typed content slots (title, body, footer, ...) a
//! slide inherits formatting through. A slide placeholder is matched to its
//! layout and master counterparts by index first, then by type.
use crate::ooxml::dom::ElementNode;
use std::collections::HashMap;

/// Placeholder size options (quarter, half, full).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderSize {
    /// Quarter size placeholder
    Quarter,
    /// Half size placeholder
    Half,
    /// Full size placeholder
    Full,
}

impl PlaceholderSize {
    pub fn from_ooxml(sz: &str) -> Option<Self> {
        match sz {
            "quarter" => Some(PlaceholderSize::Quarter),
            "half" => Some(PlaceholderSize::Half),
            "full" => Some(PlaceholderSize::Full),
            _ => None,
        }
    }
}

/// Types of placeholders in PowerPoint presentations.
///
/// `Shape` and `TextBox` are not `p:ph` types; they let ordinary shapes and
/// text boxes go through the same cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    /// Title placeholder
    Title,
    /// Body/content placeholder
    Body,
    /// Center title placeholder
    CenterTitle,
    /// Subtitle placeholder
    SubTitle,
    /// Date and time placeholder
    DateAndTime,
    /// Slide number placeholder
    SlideNumber,
    /// Footer placeholder
    Footer,
    /// Header placeholder
    Header,
    /// Object placeholder, the type of a `p:ph` without `type`
    Object,
    Chart,
    Table,
    ClipArt,
    Diagram,
    MediaClip,
    Picture,
    SlideImage,
    /// Non-placeholder shape
    Shape,
    /// Non-placeholder text box
    TextBox,
}

impl PlaceholderType {
    /// Parse a `p:ph/@type` value.
    pub fn from_ooxml(ty: &str) -> Option<Self> {
        Some(match ty {
            "title" => PlaceholderType::Title,
            "body" => PlaceholderType::Body,
            "ctrTitle" => PlaceholderType::CenterTitle,
            "subTitle" => PlaceholderType::SubTitle,
            "dt" => PlaceholderType::DateAndTime,
            "sldNum" => PlaceholderType::SlideNumber,
            "ftr" => PlaceholderType::Footer,
            "hdr" => PlaceholderType::Header,
            "obj" => PlaceholderType::Object,
            "chart" => PlaceholderType::Chart,
            "tbl" => PlaceholderType::Table,
            "clipArt" => PlaceholderType::ClipArt,
            "dgm" => PlaceholderType::Diagram,
            "media" => PlaceholderType::MediaClip,
            "pic" => PlaceholderType::Picture,
            "sldImg" => PlaceholderType::SlideImage,
            _ => return None,
        })
    }

    /// Types that share formatting with this one on layouts and masters.
    ///
    /// A slide's `ctrTitle` inherits from a master `title`, a `subTitle` or
    /// `obj` from the master `body`.
    pub(crate) fn fallback_types(self) -> &'static [PlaceholderType] {
        match self {
            PlaceholderType::CenterTitle => &[PlaceholderType::CenterTitle, PlaceholderType::Title],
            PlaceholderType::SubTitle => &[PlaceholderType::SubTitle, PlaceholderType::Body],
            PlaceholderType::Object => &[PlaceholderType::Object, PlaceholderType::Body],
            PlaceholderType::Title => &[PlaceholderType::Title],
            PlaceholderType::Body => &[PlaceholderType::Body],
            PlaceholderType::DateAndTime => &[PlaceholderType::DateAndTime],
            PlaceholderType::SlideNumber => &[PlaceholderType::SlideNumber],
            PlaceholderType::Footer => &[PlaceholderType::Footer],
            PlaceholderType::Header => &[PlaceholderType::Header],
            PlaceholderType::Chart => &[PlaceholderType::Chart],
            PlaceholderType::Table => &[PlaceholderType::Table],
            PlaceholderType::ClipArt => &[PlaceholderType::ClipArt],
            PlaceholderType::Diagram => &[PlaceholderType::Diagram],
            PlaceholderType::MediaClip => &[PlaceholderType::MediaClip],
            PlaceholderType::Picture => &[PlaceholderType::Picture],
            PlaceholderType::SlideImage => &[PlaceholderType::SlideImage],
            PlaceholderType::Shape => &[PlaceholderType::Shape],
            PlaceholderType::TextBox => &[PlaceholderType::TextBox],
        }
    }
}

/// How a shape identifies its placeholder: `p:ph` type, index and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlaceholderId {
    /// Declared type; `None` when `p:ph` has no `type`
    pub ty: Option<PlaceholderType>,
    pub idx: Option<u32>,
    /// Declared `sz`
    pub size: Option<PlaceholderSize>,
}

impl PlaceholderId {
    pub fn new(ty: PlaceholderType) -> Self {
        Self {
            ty: Some(ty),
            ..Self::default()
        }
    }

    pub fn with_idx(mut self, idx: u32) -> Self {
        self.idx = Some(idx);
        self
    }

    pub fn with_size(mut self, size: PlaceholderSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Read a `p:ph` element.
    pub fn from_ph(ph: &ElementNode) -> Self {
        Self {
            ty: ph.attr("type").and_then(PlaceholderType::from_ooxml),
            idx: ph.attr_u32("idx"),
            size: ph.attr("sz").and_then(PlaceholderSize::from_ooxml),
        }
    }

    /// Placeholder of a shape element (`p:sp`), if it has one.
    pub fn from_shape(sp: &ElementNode) -> Option<Self> {
        ph_of(sp).map(Self::from_ph)
    }

    /// Declared type, or `Object` for an untyped `p:ph`.
    #[inline]
    pub fn effective_type(&self) -> PlaceholderType {
        self.ty.unwrap_or(PlaceholderType::Object)
    }
}

fn ph_of(sp: &ElementNode) -> Option<&ElementNode> {
    sp.children()
        .iter()
        .find(|c| c.tag().starts_with("nv") && c.tag().ends_with("Pr"))
        .and_then(|nv| nv.descend(&["nvPr", "ph"]))
}

/// Placeholder shapes of one part, by index and by type.
///
/// When two placeholders share a key the first in document order wins.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderIndex {
    shapes: Vec<ElementNode>,
    by_idx: HashMap<u32, usize>,
    by_type: HashMap<PlaceholderType, usize>,
}

impl PlaceholderIndex {
    /// Index the placeholder shapes under a part's `p:cSld/p:spTree`.
    pub fn from_root(root: &ElementNode) -> Self {
        let mut index = Self::default();
        let Some(tree) = root.descend(&["cSld", "spTree"]) else {
            return index;
        };

        for sp in tree.descendants_named("sp") {
            let Some(id) = PlaceholderId::from_shape(sp) else {
                continue;
            };
            let pos = index.shapes.len();
            index.shapes.push(sp.clone());
            if let Some(idx) = id.idx {
                index.by_idx.entry(idx).or_insert(pos);
            }
            index.by_type.entry(id.effective_type()).or_insert(pos);
        }
        index
    }

    /// Placeholder shape with the given `idx`.
    pub fn by_idx(&self, idx: u32) -> Option<&ElementNode> {
        self.by_idx.get(&idx).map(|&pos| &self.shapes[pos])
    }

    /// Placeholder shape of the given type, trying related types in turn.
    pub fn by_type(&self, ty: PlaceholderType) -> Option<&ElementNode> {
        ty.fallback_types()
            .iter()
            .find_map(|t| self.by_type.get(t))
            .map(|&pos| &self.shapes[pos])
    }

    /// Match a slide placeholder: by index, then by type.
    pub fn find(&self, id: &PlaceholderId) -> Option<&ElementNode> {
        id.idx
            .and_then(|idx| self.by_idx(idx))
            .or_else(|| self.by_type(id.effective_type()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
