//! DrawingML color choices: a base token plus an ordered modifier list.
//!
//! Parsing decides the variant once; everything downstream matches on
//! [`ColorToken`] and [`ColorModifier`] exhaustively.

use crate::common::Rgba;
use crate::ooxml::dom::ElementNode;
use crate::ooxml::drawings::scheme::SchemeColor;
use crate::ooxml::error::Fallback;
use smallvec::SmallVec;

/// Base color before modifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorToken {
    /// `a:srgbClr` (and `a:scrgbClr`, converted on parse)
    Direct(Rgba),
    /// `a:schemeClr` other than `phClr`
    Scheme(SchemeColor),
    /// `a:hslClr`: hue in degrees, saturation and luminance as fractions
    Hsl { h: f64, s: f64, l: f64 },
    /// `a:prstClr` name
    Preset(String),
    /// `a:sysClr` name and its cached `lastClr`
    System { name: String, last: Option<Rgba> },
    /// `a:schemeClr val="phClr"`, substituted by the referencing context
    PlaceholderColor,
}

/// A color transform. Source order is irrelevant: the pipeline applies
/// modifiers in [`ColorModifier::EVALUATION_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorModifier {
    /// Absolute alpha, fraction
    Alpha(f64),
    /// Hue multiplier
    HueMod(f64),
    /// Hue offset as a fraction of a full turn
    HueOff(f64),
    /// Luminance multiplier
    LumMod(f64),
    /// Luminance offset, fraction
    LumOff(f64),
    /// Saturation multiplier
    SatMod(f64),
    /// Saturation offset, fraction
    SatOff(f64),
    /// Shade, fraction
    Shade(f64),
    /// Tint, fraction
    Tint(f64),
}

/// Discriminant of a [`ColorModifier`], in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierKind {
    Alpha,
    HueMod,
    HueOff,
    LumMod,
    LumOff,
    SatMod,
    SatOff,
    Shade,
    Tint,
}

impl ColorModifier {
    /// Fixed evaluation order of the pipeline.
    pub const EVALUATION_ORDER: [ModifierKind; 9] = [
        ModifierKind::Alpha,
        ModifierKind::HueMod,
        ModifierKind::HueOff,
        ModifierKind::LumMod,
        ModifierKind::LumOff,
        ModifierKind::SatMod,
        ModifierKind::SatOff,
        ModifierKind::Shade,
        ModifierKind::Tint,
    ];

    pub fn kind(&self) -> ModifierKind {
        match self {
            ColorModifier::Alpha(_) => ModifierKind::Alpha,
            ColorModifier::HueMod(_) => ModifierKind::HueMod,
            ColorModifier::HueOff(_) => ModifierKind::HueOff,
            ColorModifier::LumMod(_) => ModifierKind::LumMod,
            ColorModifier::LumOff(_) => ModifierKind::LumOff,
            ColorModifier::SatMod(_) => ModifierKind::SatMod,
            ColorModifier::SatOff(_) => ModifierKind::SatOff,
            ColorModifier::Shade(_) => ModifierKind::Shade,
            ColorModifier::Tint(_) => ModifierKind::Tint,
        }
    }

    /// Parse a modifier child element (`a:lumMod val="75000"`, ...).
    ///
    /// Percentages are in thousandths of a percent (or `"75%"` in strict
    /// files); `hueOff` is in 60000ths of a degree. Modifiers the pipeline
    /// does not implement (`gamma`, `comp`, ...) return `None`.
    pub fn from_node(node: &ElementNode) -> Option<Self> {
        let build: fn(f64) -> ColorModifier = match node.tag() {
            "alpha" => ColorModifier::Alpha,
            "hueMod" => ColorModifier::HueMod,
            "hueOff" => ColorModifier::HueOff,
            "lumMod" => ColorModifier::LumMod,
            "lumOff" => ColorModifier::LumOff,
            "satMod" => ColorModifier::SatMod,
            "satOff" => ColorModifier::SatOff,
            "shade" => ColorModifier::Shade,
            "tint" => ColorModifier::Tint,
            _ => return None,
        };

        let raw = node.attr("val")?;
        let value = if node.tag() == "hueOff" {
            parse_angle(raw).map(|deg| deg / 360.0)
        } else {
            parse_percentage(raw)
        };

        match value {
            Some(v) => Some(build(v)),
            None => {
                Fallback::MalformedColorValue(format!("{} val=\"{}\"", node.tag(), raw)).log();
                None
            },
        }
    }
}

/// A parsed color choice element.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSpec {
    pub token: ColorToken,
    /// Modifiers in source order
    pub modifiers: SmallVec<[ColorModifier; 4]>,
}

impl ColorSpec {
    /// An unmodified direct color.
    pub fn direct(color: Rgba) -> Self {
        Self::from_token(ColorToken::Direct(color))
    }

    /// An unmodified scheme color.
    pub fn scheme(color: SchemeColor) -> Self {
        Self::from_token(ColorToken::Scheme(color))
    }

    pub fn from_token(token: ColorToken) -> Self {
        Self {
            token,
            modifiers: SmallVec::new(),
        }
    }

    /// Builder: append a modifier.
    pub fn with_modifier(mut self, modifier: ColorModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Parse the first color choice child of `parent` (a `solidFill`, `gs`,
    /// `fgClr`, `bgRef`, ...).
    ///
    /// A malformed value is logged and treated as absent.
    pub fn from_parent(parent: &ElementNode) -> Option<Self> {
        parent.children().iter().find_map(Self::from_color_node)
    }

    /// Parse a color choice element itself (`a:srgbClr`, `a:schemeClr`, ...).
    pub fn from_color_node(node: &ElementNode) -> Option<Self> {
        let token = match node.tag() {
            "srgbClr" => ColorToken::Direct(parse_or_log(node, node.attr("val").and_then(Rgba::from_hex))?),
            "scrgbClr" => ColorToken::Direct(parse_or_log(node, scrgb(node))?),
            "schemeClr" => match node.attr("val") {
                Some("phClr") => ColorToken::PlaceholderColor,
                val => ColorToken::Scheme(parse_or_log(node, val.and_then(SchemeColor::from_ooxml))?),
            },
            "hslClr" => {
                let hsl = (|| {
                    Some((
                        parse_angle(node.attr("hue")?)?,
                        parse_percentage(node.attr("sat")?)?,
                        parse_percentage(node.attr("lum")?)?,
                    ))
                })();
                let (h, s, l) = parse_or_log(node, hsl)?;
                ColorToken::Hsl { h, s, l }
            },
            "prstClr" => ColorToken::Preset(parse_or_log(node, node.attr("val"))?.to_string()),
            "sysClr" => ColorToken::System {
                name: node.attr("val").unwrap_or_default().to_string(),
                last: node.attr("lastClr").and_then(Rgba::from_hex),
            },
            _ => return None,
        };

        Some(Self {
            token,
            modifiers: node.children().iter().filter_map(ColorModifier::from_node).collect(),
        })
    }
}

fn parse_or_log<T>(node: &ElementNode, value: Option<T>) -> Option<T> {
    if value.is_none() {
        Fallback::MalformedColorValue(format!("<{}> with unusable attributes", node.tag())).log();
    }
    value
}

/// `a:scrgbClr`: linear r/g/b percentages.
fn scrgb(node: &ElementNode) -> Option<Rgba> {
    let channel = |name: &str| -> Option<u8> {
        let pct = parse_percentage(node.attr(name)?)?;
        Some((pct.clamp(0.0, 1.0) * 255.0).round() as u8)
    };
    Some(Rgba::rgb(channel("r")?, channel("g")?, channel("b")?))
}

/// Thousandths of a percent (`"50000"`) or a percent literal (`"50%"`) as a fraction.
pub(crate) fn parse_percentage(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match raw.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok().map(|v| v / 100.0),
        None => atoi_simd::parse::<i64, false, false>(raw.as_bytes())
            .ok()
            .map(|v| v as f64 / 100_000.0),
    }
}

/// 60000ths of a degree as degrees.
pub(crate) fn parse_angle(raw: &str) -> Option<f64> {
    atoi_simd::parse::<i64, false, false>(raw.trim().as_bytes())
        .ok()
        .map(angle_to_degrees)
}

/// Convert a DrawingML angle (60000ths of a degree) to degrees.
#[inline]
pub fn angle_to_degrees(ang: i64) -> f64 {
    ang as f64 / 60_000.0
}
