//! Scheme colors, color maps and theme color tables.
//!
//! A scheme color names a logical slot (`bg1`, `tx1`, `accent2`, ...). The
//! active [`ColorMap`] translates it to one of the twelve theme slots
//! (`lt1`, `dk1`, ...), and the [`ThemeColorTable`] supplies the RGB value.

use crate::common::Rgba;
use crate::ooxml::dom::ElementNode;
use crate::ooxml::drawings::preset::system_color;
use crate::ooxml::error::Fallback;

/// One of the twelve color slots defined by a theme's `a:clrScheme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeSlot {
    Dk1,
    Lt1,
    Dk2,
    Lt2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hlink,
    FolHlink,
}

impl ThemeSlot {
    /// All slots in `a:clrScheme` order.
    pub const ALL: [ThemeSlot; 12] = [
        ThemeSlot::Dk1,
        ThemeSlot::Lt1,
        ThemeSlot::Dk2,
        ThemeSlot::Lt2,
        ThemeSlot::Accent1,
        ThemeSlot::Accent2,
        ThemeSlot::Accent3,
        ThemeSlot::Accent4,
        ThemeSlot::Accent5,
        ThemeSlot::Accent6,
        ThemeSlot::Hlink,
        ThemeSlot::FolHlink,
    ];

    /// Parse an OOXML slot name (`dk1`, `accent3`, ...).
    pub fn from_ooxml(name: &str) -> Option<Self> {
        Some(match name {
            "dk1" => ThemeSlot::Dk1,
            "lt1" => ThemeSlot::Lt1,
            "dk2" => ThemeSlot::Dk2,
            "lt2" => ThemeSlot::Lt2,
            "accent1" => ThemeSlot::Accent1,
            "accent2" => ThemeSlot::Accent2,
            "accent3" => ThemeSlot::Accent3,
            "accent4" => ThemeSlot::Accent4,
            "accent5" => ThemeSlot::Accent5,
            "accent6" => ThemeSlot::Accent6,
            "hlink" => ThemeSlot::Hlink,
            "folHlink" => ThemeSlot::FolHlink,
            _ => return None,
        })
    }

    /// The OOXML element/attribute name of this slot.
    pub fn as_ooxml(self) -> &'static str {
        match self {
            ThemeSlot::Dk1 => "dk1",
            ThemeSlot::Lt1 => "lt1",
            ThemeSlot::Dk2 => "dk2",
            ThemeSlot::Lt2 => "lt2",
            ThemeSlot::Accent1 => "accent1",
            ThemeSlot::Accent2 => "accent2",
            ThemeSlot::Accent3 => "accent3",
            ThemeSlot::Accent4 => "accent4",
            ThemeSlot::Accent5 => "accent5",
            ThemeSlot::Accent6 => "accent6",
            ThemeSlot::Hlink => "hlink",
            ThemeSlot::FolHlink => "folHlink",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// A logical slot that goes through the color map (`bg1`, `tx1`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappedSlot {
    Bg1,
    Tx1,
    Bg2,
    Tx2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hlink,
    FolHlink,
}

impl MappedSlot {
    /// All slots in `p:clrMap` attribute order.
    pub const ALL: [MappedSlot; 12] = [
        MappedSlot::Bg1,
        MappedSlot::Tx1,
        MappedSlot::Bg2,
        MappedSlot::Tx2,
        MappedSlot::Accent1,
        MappedSlot::Accent2,
        MappedSlot::Accent3,
        MappedSlot::Accent4,
        MappedSlot::Accent5,
        MappedSlot::Accent6,
        MappedSlot::Hlink,
        MappedSlot::FolHlink,
    ];

    pub fn from_ooxml(name: &str) -> Option<Self> {
        Some(match name {
            "bg1" => MappedSlot::Bg1,
            "tx1" => MappedSlot::Tx1,
            "bg2" => MappedSlot::Bg2,
            "tx2" => MappedSlot::Tx2,
            "accent1" => MappedSlot::Accent1,
            "accent2" => MappedSlot::Accent2,
            "accent3" => MappedSlot::Accent3,
            "accent4" => MappedSlot::Accent4,
            "accent5" => MappedSlot::Accent5,
            "accent6" => MappedSlot::Accent6,
            "hlink" => MappedSlot::Hlink,
            "folHlink" => MappedSlot::FolHlink,
            _ => return None,
        })
    }

    pub fn as_ooxml(self) -> &'static str {
        match self {
            MappedSlot::Bg1 => "bg1",
            MappedSlot::Tx1 => "tx1",
            MappedSlot::Bg2 => "bg2",
            MappedSlot::Tx2 => "tx2",
            MappedSlot::Accent1 => "accent1",
            MappedSlot::Accent2 => "accent2",
            MappedSlot::Accent3 => "accent3",
            MappedSlot::Accent4 => "accent4",
            MappedSlot::Accent5 => "accent5",
            MappedSlot::Accent6 => "accent6",
            MappedSlot::Hlink => "hlink",
            MappedSlot::FolHlink => "folHlink",
        }
    }

    /// The theme slot this logical slot maps to in the default color map.
    pub fn default_target(self) -> ThemeSlot {
        match self {
            MappedSlot::Bg1 => ThemeSlot::Lt1,
            MappedSlot::Tx1 => ThemeSlot::Dk1,
            MappedSlot::Bg2 => ThemeSlot::Lt2,
            MappedSlot::Tx2 => ThemeSlot::Dk2,
            MappedSlot::Accent1 => ThemeSlot::Accent1,
            MappedSlot::Accent2 => ThemeSlot::Accent2,
            MappedSlot::Accent3 => ThemeSlot::Accent3,
            MappedSlot::Accent4 => ThemeSlot::Accent4,
            MappedSlot::Accent5 => ThemeSlot::Accent5,
            MappedSlot::Accent6 => ThemeSlot::Accent6,
            MappedSlot::Hlink => ThemeSlot::Hlink,
            MappedSlot::FolHlink => ThemeSlot::FolHlink,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Value of a `schemeClr/@val` other than `phClr`.
///
/// Logical slots are translated through the color map; theme slot names
/// (`dk1`, `lt2`, ...) address the theme directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeColor {
    Mapped(MappedSlot),
    Theme(ThemeSlot),
}

impl SchemeColor {
    pub fn from_ooxml(name: &str) -> Option<Self> {
        MappedSlot::from_ooxml(name)
            .map(SchemeColor::Mapped)
            .or_else(|| ThemeSlot::from_ooxml(name).map(SchemeColor::Theme))
    }
}

/// Mapping from the twelve logical slots to theme slots (`p:clrMap`,
/// `a:overrideClrMapping`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMap {
    slots: [ThemeSlot; 12],
}

impl Default for ColorMap {
    fn default() -> Self {
        let mut slots = [ThemeSlot::Dk1; 12];
        for slot in MappedSlot::ALL {
            slots[slot.index()] = slot.default_target();
        }
        Self { slots }
    }
}

impl ColorMap {
    /// Read a `clrMap`/`overrideClrMapping` element.
    ///
    /// Missing or unrecognized attributes keep the default mapping for that slot.
    pub fn from_node(node: &ElementNode) -> Self {
        let mut map = Self::default();
        for slot in MappedSlot::ALL {
            if let Some(value) = node.attr(slot.as_ooxml()) {
                match ThemeSlot::from_ooxml(value) {
                    Some(target) => map.slots[slot.index()] = target,
                    None => Fallback::MalformedColorValue(format!(
                        "clrMap {}=\"{}\"",
                        slot.as_ooxml(),
                        value
                    ))
                    .log(),
                }
            }
        }
        map
    }

    /// Builder: remap one logical slot.
    pub fn with(mut self, slot: MappedSlot, target: ThemeSlot) -> Self {
        self.slots[slot.index()] = target;
        self
    }

    /// Theme slot for a logical slot.
    #[inline]
    pub fn get(&self, slot: MappedSlot) -> ThemeSlot {
        self.slots[slot.index()]
    }

    /// Theme slot for any scheme color.
    #[inline]
    pub fn translate(&self, color: SchemeColor) -> ThemeSlot {
        match color {
            SchemeColor::Mapped(slot) => self.get(slot),
            SchemeColor::Theme(slot) => slot,
        }
    }
}

/// Concrete colors of a theme's `a:clrScheme`, parsed once per theme part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeColorTable {
    colors: [Option<Rgba>; 12],
}

impl ThemeColorTable {
    /// Read an `a:clrScheme` element.
    ///
    /// Each slot holds an `a:srgbClr/@val` or an `a:sysClr` (its `lastClr`, or
    /// the system-color table when `lastClr` is absent).
    pub fn from_node(clr_scheme: &ElementNode) -> Self {
        let mut table = Self::default();
        for slot in ThemeSlot::ALL {
            let Some(entry) = clr_scheme.child(slot.as_ooxml()) else {
                continue;
            };
            let color = if let Some(srgb) = entry.child("srgbClr") {
                srgb.attr("val").and_then(Rgba::from_hex)
            } else if let Some(sys) = entry.child("sysClr") {
                sys.attr("lastClr")
                    .and_then(Rgba::from_hex)
                    .or_else(|| sys.attr("val").and_then(system_color))
            } else {
                None
            };
            if color.is_none() {
                Fallback::MalformedColorValue(format!("theme slot {}", slot.as_ooxml())).log();
            }
            table.colors[slot.index()] = color;
        }
        table
    }

    /// Builder: set one slot.
    pub fn with(mut self, slot: ThemeSlot, color: Rgba) -> Self {
        self.colors[slot.index()] = Some(color);
        self
    }

    /// Color of a theme slot, if the theme defines it.
    #[inline]
    pub fn get(&self, slot: ThemeSlot) -> Option<Rgba> {
        self.colors[slot.index()]
    }
}

/// Resolve a scheme color through a color map and theme table.
///
/// `phClr` never reaches this function: it is parsed as
/// [`ColorToken::PlaceholderColor`](super::color::ColorToken::PlaceholderColor)
/// and substituted by the caller. An unresolvable slot yields `None`; the
/// pipeline then applies the configured default (`#FFFFFF`).
pub fn resolve_scheme_color(
    color: SchemeColor,
    color_map: &ColorMap,
    theme: Option<&ThemeColorTable>,
) -> Option<Rgba> {
    let slot = color_map.translate(color);
    let resolved = theme.and_then(|t| t.get(slot));
    if resolved.is_none() {
        Fallback::MissingScopePart(format!("theme color {}", slot.as_ooxml())).log();
    }
    resolved
}
