//! Preset hatch patterns (`a:pattFill/@prst`) and their CSS geometry.
//!
//! Each mapped preset expands to a stack of CSS gradient layers plus the
//! tile size (in px) they repeat at. Layers use `{fg}` and `{bg}` as color
//! slots, filled by [`PatternGeometry::css_layers`].

use crate::common::Rgba;
use crate::ooxml::error::Fallback;
use smallvec::SmallVec;

/// Pattern type for pattern fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternType {
    /// 5% dotted pattern
    Pct5,
    /// 10% dotted pattern
    Pct10,
    /// 20% dotted pattern
    Pct20,
    /// 25% dotted pattern
    Pct25,
    /// 30% dotted pattern
    Pct30,
    /// 40% dotted pattern
    Pct40,
    /// 50% dotted pattern
    Pct50,
    /// 60% dotted pattern
    Pct60,
    /// 70% dotted pattern
    Pct70,
    /// 75% dotted pattern
    Pct75,
    /// 80% dotted pattern
    Pct80,
    /// 90% dotted pattern
    Pct90,
    /// Horizontal lines
    Horizontal,
    /// Vertical lines
    Vertical,
    /// Light horizontal lines
    LightHorizontal,
    /// Light vertical lines
    LightVertical,
    /// Dark horizontal lines
    DarkHorizontal,
    /// Dark vertical lines
    DarkVertical,
    /// Narrow horizontal lines
    NarrowHorizontal,
    /// Narrow vertical lines
    NarrowVertical,
    /// Dashed horizontal lines
    DashedHorizontal,
    /// Dashed vertical lines
    DashedVertical,
    /// Diagonal lines (top-left to bottom-right)
    DownDiagonal,
    /// Diagonal lines (bottom-left to top-right)
    UpDiagonal,
    LightDownDiagonal,
    LightUpDiagonal,
    DarkDownDiagonal,
    DarkUpDiagonal,
    WideDownDiagonal,
    WideUpDiagonal,
    DashedDownDiagonal,
    DashedUpDiagonal,
    /// Crosshatch
    Cross,
    /// Diagonal crosshatch
    DiagonalCross,
    SmallCheck,
    LargeCheck,
    SmallGrid,
    LargeGrid,
    DottedGrid,
    SmallConfetti,
    LargeConfetti,
    HorizontalBrick,
    DiagonalBrick,
    SolidDiamond,
    OpenDiamond,
    DottedDiamond,
    Plaid,
    Sphere,
    Weave,
    Divot,
    Shingle,
    Wave,
    Trellis,
    ZigZag,
}

impl PatternType {
    /// Parse a `prst` attribute value.
    pub fn from_ooxml(prst: &str) -> Option<Self> {
        Some(match prst {
            "pct5" => PatternType::Pct5,
            "pct10" => PatternType::Pct10,
            "pct20" => PatternType::Pct20,
            "pct25" => PatternType::Pct25,
            "pct30" => PatternType::Pct30,
            "pct40" => PatternType::Pct40,
            "pct50" => PatternType::Pct50,
            "pct60" => PatternType::Pct60,
            "pct70" => PatternType::Pct70,
            "pct75" => PatternType::Pct75,
            "pct80" => PatternType::Pct80,
            "pct90" => PatternType::Pct90,
            "horz" => PatternType::Horizontal,
            "vert" => PatternType::Vertical,
            "ltHorz" => PatternType::LightHorizontal,
            "ltVert" => PatternType::LightVertical,
            "dkHorz" => PatternType::DarkHorizontal,
            "dkVert" => PatternType::DarkVertical,
            "narHorz" => PatternType::NarrowHorizontal,
            "narVert" => PatternType::NarrowVertical,
            "dashHorz" => PatternType::DashedHorizontal,
            "dashVert" => PatternType::DashedVertical,
            "cross" => PatternType::Cross,
            "dnDiag" => PatternType::DownDiagonal,
            "upDiag" => PatternType::UpDiagonal,
            "ltDnDiag" => PatternType::LightDownDiagonal,
            "ltUpDiag" => PatternType::LightUpDiagonal,
            "dkDnDiag" => PatternType::DarkDownDiagonal,
            "dkUpDiag" => PatternType::DarkUpDiagonal,
            "wdDnDiag" => PatternType::WideDownDiagonal,
            "wdUpDiag" => PatternType::WideUpDiagonal,
            "dashDnDiag" => PatternType::DashedDownDiagonal,
            "dashUpDiag" => PatternType::DashedUpDiagonal,
            "diagCross" => PatternType::DiagonalCross,
            "smCheck" => PatternType::SmallCheck,
            "lgCheck" => PatternType::LargeCheck,
            "smGrid" => PatternType::SmallGrid,
            "lgGrid" => PatternType::LargeGrid,
            "dotGrid" => PatternType::DottedGrid,
            "smConfetti" => PatternType::SmallConfetti,
            "lgConfetti" => PatternType::LargeConfetti,
            "horzBrick" => PatternType::HorizontalBrick,
            "diagBrick" => PatternType::DiagonalBrick,
            "solidDmnd" => PatternType::SolidDiamond,
            "openDmnd" => PatternType::OpenDiamond,
            "dotDmnd" => PatternType::DottedDiamond,
            "plaid" => PatternType::Plaid,
            "sphere" => PatternType::Sphere,
            "weave" => PatternType::Weave,
            "divot" => PatternType::Divot,
            "shingle" => PatternType::Shingle,
            "wave" => PatternType::Wave,
            "trellis" => PatternType::Trellis,
            "zigZag" => PatternType::ZigZag,
            _ => return None,
        })
    }

    /// CSS layers and tile size for this preset.
    ///
    /// Presets without a CSS rendering (`plaid`, `sphere`, `divot`,
    /// `shingle`) return the neutral geometry.
    pub fn geometry(self) -> PatternGeometry {
        const H1: &str = "linear-gradient(to bottom, {fg} 1px, transparent 1px)";
        const V1: &str = "linear-gradient(to right, {fg} 1px, transparent 1px)";
        const H2: &str = "linear-gradient(to bottom, {fg} 2px, transparent 2px)";
        const V2: &str = "linear-gradient(to right, {fg} 2px, transparent 2px)";
        const DN: &str = "linear-gradient(45deg, transparent 45%, {fg} 45%, {fg} 55%, transparent 55%)";
        const UP: &str = "linear-gradient(135deg, transparent 45%, {fg} 45%, {fg} 55%, transparent 55%)";
        const DN_DARK: &str = "linear-gradient(45deg, transparent 35%, {fg} 35%, {fg} 65%, transparent 65%)";
        const UP_DARK: &str = "linear-gradient(135deg, transparent 35%, {fg} 35%, {fg} 65%, transparent 65%)";
        const DASH_X: &str = "linear-gradient(to right, transparent 50%, {bg} 50%)";
        const DASH_Y: &str = "linear-gradient(to bottom, transparent 50%, {bg} 50%)";
        const CHECK: &str = "conic-gradient({fg} 25%, {bg} 0 50%, {fg} 0 75%, {bg} 0)";

        let (layers, tile_size): (&[&'static str], u32) = match self {
            PatternType::Pct5 => (&["radial-gradient({fg} 10%, transparent 10%)"], 8),
            PatternType::Pct10 => (&["radial-gradient({fg} 15%, transparent 15%)"], 8),
            PatternType::Pct20 => (&["radial-gradient({fg} 20%, transparent 20%)"], 6),
            PatternType::Pct25 => (&["radial-gradient({fg} 25%, transparent 25%)"], 6),
            PatternType::Pct30 => (&["radial-gradient({fg} 30%, transparent 30%)"], 4),
            PatternType::Pct40 => (&["radial-gradient({fg} 35%, transparent 35%)"], 4),
            PatternType::Pct50 => (&[CHECK], 2),
            PatternType::Pct60 => (&["radial-gradient({bg} 35%, {fg} 35%)"], 4),
            PatternType::Pct70 => (&["radial-gradient({bg} 30%, {fg} 30%)"], 4),
            PatternType::Pct75 => (&["radial-gradient({bg} 25%, {fg} 25%)"], 6),
            PatternType::Pct80 => (&["radial-gradient({bg} 20%, {fg} 20%)"], 6),
            PatternType::Pct90 => (&["radial-gradient({bg} 15%, {fg} 15%)"], 8),
            PatternType::Horizontal => (&[H1], 8),
            PatternType::Vertical => (&[V1], 8),
            PatternType::LightHorizontal => (&[H1], 4),
            PatternType::LightVertical => (&[V1], 4),
            PatternType::DarkHorizontal => (&[H2], 4),
            PatternType::DarkVertical => (&[V2], 4),
            PatternType::NarrowHorizontal => (&[H1], 2),
            PatternType::NarrowVertical => (&[V1], 2),
            PatternType::DashedHorizontal => (&[DASH_X, H1], 8),
            PatternType::DashedVertical => (&[DASH_Y, V1], 8),
            PatternType::DownDiagonal => (&[DN], 8),
            PatternType::UpDiagonal => (&[UP], 8),
            PatternType::LightDownDiagonal => (&[DN], 4),
            PatternType::LightUpDiagonal => (&[UP], 4),
            PatternType::DarkDownDiagonal => (&[DN_DARK], 4),
            PatternType::DarkUpDiagonal => (&[UP_DARK], 4),
            PatternType::WideDownDiagonal => (
                &["linear-gradient(45deg, transparent 25%, {fg} 25%, {fg} 75%, transparent 75%)"],
                8,
            ),
            PatternType::WideUpDiagonal => (
                &["linear-gradient(135deg, transparent 25%, {fg} 25%, {fg} 75%, transparent 75%)"],
                8,
            ),
            PatternType::DashedDownDiagonal => (&[DASH_Y, DN], 8),
            PatternType::DashedUpDiagonal => (&[DASH_Y, UP], 8),
            PatternType::Cross | PatternType::LargeGrid => (&[H1, V1], 8),
            PatternType::SmallGrid => (&[H1, V1], 4),
            PatternType::DiagonalCross | PatternType::OpenDiamond => (&[DN, UP], 8),
            PatternType::SmallCheck => (&[CHECK], 4),
            PatternType::LargeCheck => (&[CHECK], 8),
            PatternType::DottedGrid => (&["radial-gradient(circle at 0 0, {fg} 1px, transparent 1px)"], 4),
            PatternType::SmallConfetti => (
                &[
                    "radial-gradient(circle at 25% 25%, {fg} 10%, transparent 10%)",
                    "radial-gradient(circle at 75% 60%, {fg} 10%, transparent 10%)",
                ],
                8,
            ),
            PatternType::LargeConfetti => (
                &[
                    "radial-gradient(circle at 25% 25%, {fg} 10%, transparent 10%)",
                    "radial-gradient(circle at 75% 60%, {fg} 10%, transparent 10%)",
                ],
                16,
            ),
            PatternType::HorizontalBrick => (
                &[H1, "linear-gradient(to right, {fg} 1px, transparent 1px) 0 0 / 100% 50%"],
                8,
            ),
            PatternType::DiagonalBrick => (&[DN, "linear-gradient(135deg, transparent 95%, {fg} 95%)"], 8),
            PatternType::SolidDiamond => (
                &[
                    "linear-gradient(45deg, {fg} 25%, transparent 25%, transparent 75%, {fg} 75%)",
                    "linear-gradient(-45deg, {fg} 25%, transparent 25%, transparent 75%, {fg} 75%)",
                ],
                8,
            ),
            PatternType::DottedDiamond => (
                &[
                    "radial-gradient(circle, {fg} 10%, transparent 10%)",
                    "radial-gradient(circle at 0 0, {fg} 10%, transparent 10%)",
                ],
                8,
            ),
            PatternType::Weave => (
                &[
                    "linear-gradient(45deg, {fg} 12%, transparent 12%, transparent 88%, {fg} 88%)",
                    "linear-gradient(135deg, transparent 37%, {fg} 37%, {fg} 63%, transparent 63%)",
                ],
                8,
            ),
            PatternType::Trellis => (
                &[
                    "linear-gradient(45deg, {fg} 25%, transparent 25%, transparent 50%, {fg} 50%, {fg} 75%, transparent 75%)",
                    "linear-gradient(-45deg, {fg} 25%, transparent 25%, transparent 50%, {fg} 50%, {fg} 75%, transparent 75%)",
                ],
                4,
            ),
            PatternType::ZigZag => (
                &[
                    "linear-gradient(135deg, {fg} 25%, transparent 25%)",
                    "linear-gradient(225deg, {fg} 25%, transparent 25%)",
                ],
                8,
            ),
            PatternType::Wave => (
                &["radial-gradient(circle at 50% 100%, transparent 40%, {fg} 40%, {fg} 50%, transparent 50%)"],
                8,
            ),
            PatternType::Plaid | PatternType::Sphere | PatternType::Divot | PatternType::Shingle => (&[], 0),
        };

        PatternGeometry {
            layers: layers.iter().copied().collect(),
            tile_size,
        }
    }
}

/// CSS-expressible rendering of a preset pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternGeometry {
    /// Gradient layers, topmost first, with `{fg}`/`{bg}` slots
    pub layers: SmallVec<[&'static str; 2]>,
    /// Tile edge in px
    pub tile_size: u32,
}

impl PatternGeometry {
    /// The `(none, 0)` geometry used for unmapped presets.
    pub fn neutral() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.layers.is_empty()
    }

    /// Substitute resolved colors into the layer templates.
    pub fn css_layers(&self, fg: Rgba, bg: Rgba) -> Vec<String> {
        let (fg, bg) = (fg.to_string(), bg.to_string());
        self.layers
            .iter()
            .map(|layer| layer.replace("{fg}", &fg).replace("{bg}", &bg))
            .collect()
    }
}

/// Look up the geometry of a `prst` value; anything unmapped is neutral.
pub fn pattern_geometry(prst: &str) -> PatternGeometry {
    let geometry = PatternType::from_ooxml(prst)
        .map(PatternType::geometry)
        .unwrap_or_default();
    if geometry.is_neutral() {
        Fallback::UnsupportedFillOrPattern(format!("pattern preset \"{}\"", prst)).log();
    }
    geometry
}
