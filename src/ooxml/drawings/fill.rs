//! DrawingML fills: `a:noFill`, `a:solidFill`, `a:gradFill`, `a:pattFill`
//! and `a:blipFill`.
//!
//! A fill element is classified once into a [`FillDescriptor`] with every
//! color already run through the transform pipeline. Which color map applies
//! is decided by the caller through [`FillContext`].

use crate::common::Rgba;
use crate::ooxml::dom::ElementNode;
use crate::ooxml::drawings::color::{ColorSpec, angle_to_degrees, parse_percentage};
use crate::ooxml::drawings::pattern::{PatternGeometry, pattern_geometry};
use crate::ooxml::drawings::transform::ColorContext;
use crate::ooxml::error::Fallback;
use crate::ooxml::opc::PackURI;
use std::sync::Arc;

/// Tags of the fill choice group, in schema order.
pub const FILL_TAGS: [&str; 6] = ["noFill", "solidFill", "gradFill", "blipFill", "pattFill", "grpFill"];

/// Gradient rotation when no `a:lin` is present, in degrees.
pub const DEFAULT_GRADIENT_ROTATION: f64 = 90.0;

/// A resolved fill.
#[derive(Debug, Clone, PartialEq)]
pub enum FillDescriptor {
    /// No fill (transparent)
    None,
    /// Solid color
    Solid {
        /// Color as written, before resolution
        spec: ColorSpec,
        color: Rgba,
    },
    /// Gradient fill
    Gradient {
        kind: GradientType,
        /// Stops in document order
        stops: Vec<GradientStop>,
        /// Rotation in degrees
        rotation: f64,
    },
    /// Preset hatch pattern
    Pattern {
        /// `prst` value as written
        preset: String,
        fg: Rgba,
        bg: Rgba,
        geometry: PatternGeometry,
    },
    /// Picture fill
    Picture(PictureFill),
}

impl FillDescriptor {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, FillDescriptor::None)
    }

    /// Solid color, if this is a solid fill.
    pub fn solid_color(&self) -> Option<Rgba> {
        match self {
            FillDescriptor::Solid { color, .. } => Some(*color),
            _ => None,
        }
    }
}

/// Gradient type for gradient fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientType {
    /// Linear gradient (`a:lin` or no shade element)
    Linear,
    /// Radial gradient (`a:path path="circle"`)
    Radial,
    /// Rectangular gradient (`a:path path="rect"`)
    Rectangular,
    /// Shape-following gradient (`a:path path="shape"`)
    Path,
}

/// A gradient stop.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub spec: ColorSpec,
    pub color: Rgba,
    /// Position as a percentage, `pos / 1000`
    pub position: f64,
}

/// Image behind a picture fill.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageRef {
    /// Internal image part
    Part(PackURI),
    /// Inline data URI
    DataUri(Arc<str>),
    /// External link target, never fetched
    External(String),
}

/// Picture fill details.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureFill {
    /// `a:blip/@r:embed` (or `@r:link`)
    pub r_id: Option<String>,
    /// Resolved image, `None` when the relationship does not resolve
    pub image: Option<ImageRef>,
    pub placement: PicturePlacement,
    /// `a:srcRect` insets
    pub crop: Option<RelativeRect>,
    /// `a:alphaModFix/@amt` as a fraction
    pub opacity: Option<f64>,
    /// `a:duotone` color pair
    pub duotone: Option<(Rgba, Rgba)>,
}

/// How a picture fills its area.
#[derive(Debug, Clone, PartialEq)]
pub enum PicturePlacement {
    /// `a:stretch`, optionally inset by `a:fillRect`
    Stretch { fill_rect: Option<RelativeRect> },
    /// `a:tile`; offsets and scales in percent, `align` as written
    Tile {
        tx: f64,
        ty: f64,
        sx: f64,
        sy: f64,
        align: Option<String>,
    },
}

impl Default for PicturePlacement {
    fn default() -> Self {
        PicturePlacement::Stretch { fill_rect: None }
    }
}

/// Edge insets in percent (`l`, `t`, `r`, `b` attributes divided by 1000).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelativeRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RelativeRect {
    /// Read `a:fillRect` / `a:srcRect`. Missing edges are zero.
    pub fn from_node(node: &ElementNode) -> Self {
        let edge = |name: &str| thousandths(node, name).unwrap_or(0.0);
        Self {
            left: edge("l"),
            top: edge("t"),
            right: edge("r"),
            bottom: edge("b"),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Integer attribute divided by 1000.
fn thousandths(node: &ElementNode, name: &str) -> Option<f64> {
    node.attr_i64(name).map(|v| v as f64 / 1000.0)
}

/// Looks up the image behind a blip relationship id.
pub type ImageLookup<'a> = &'a dyn Fn(&str) -> Option<ImageRef>;

/// Surroundings a fill is resolved in.
#[derive(Clone, Copy)]
pub struct FillContext<'a> {
    /// Solid, pattern and picture colors
    pub colors: ColorContext<'a>,
    /// Gradient stop colors
    pub gradient_colors: ColorContext<'a>,
    /// Substitute for colors that do not resolve
    pub fallback: Rgba,
    /// Image lookup for picture fills
    pub images: Option<ImageLookup<'a>>,
}

impl std::fmt::Debug for FillContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FillContext")
            .field("colors", &self.colors)
            .field("gradient_colors", &self.gradient_colors)
            .field("fallback", &self.fallback)
            .field("images", &self.images.is_some())
            .finish()
    }
}

impl<'a> FillContext<'a> {
    /// A context that resolves every color against the same map.
    pub fn new(colors: ColorContext<'a>, fallback: Rgba) -> Self {
        Self {
            colors,
            gradient_colors: colors,
            fallback,
            images: None,
        }
    }

    pub fn with_gradient_colors(mut self, gradient_colors: ColorContext<'a>) -> Self {
        self.gradient_colors = gradient_colors;
        self
    }

    pub fn with_images(mut self, images: ImageLookup<'a>) -> Self {
        self.images = Some(images);
        self
    }

    /// Substitute `color` for `phClr` in both color contexts.
    pub fn with_placeholder(mut self, color: Option<Rgba>) -> Self {
        self.colors = self.colors.with_placeholder(color);
        self.gradient_colors = self.gradient_colors.with_placeholder(color);
        self
    }

    fn color(&self, spec: &ColorSpec, ctx: &ColorContext<'_>) -> Rgba {
        spec.resolve(ctx).unwrap_or(self.fallback)
    }

    fn color_in(&self, parent: Option<&ElementNode>, default: Rgba) -> Rgba {
        parent
            .and_then(ColorSpec::from_parent)
            .map_or(default, |spec| self.color(&spec, &self.colors))
    }
}

/// First fill-choice child of `parent` (`spPr`, `bgPr`, a style-list entry).
pub fn find_fill(parent: &ElementNode) -> Option<&ElementNode> {
    parent
        .children()
        .iter()
        .find(|child| FILL_TAGS.contains(&child.tag()))
}

/// Resolve a fill element.
///
/// Returns `None` when `fill` is not a fill element at all.
pub fn resolve_fill(fill: &ElementNode, ctx: &FillContext<'_>) -> Option<FillDescriptor> {
    Some(match fill.tag() {
        "noFill" => FillDescriptor::None,
        "solidFill" => resolve_solid(fill, ctx),
        "gradFill" => resolve_gradient(fill, ctx),
        "pattFill" => resolve_pattern(fill, ctx),
        "blipFill" => FillDescriptor::Picture(resolve_picture(fill, ctx)),
        "grpFill" => {
            Fallback::UnsupportedFillOrPattern("grpFill".to_string()).log();
            FillDescriptor::None
        },
        _ => return None,
    })
}

fn resolve_solid(fill: &ElementNode, ctx: &FillContext<'_>) -> FillDescriptor {
    match ColorSpec::from_parent(fill) {
        Some(spec) => {
            let color = ctx.color(&spec, &ctx.colors);
            FillDescriptor::Solid { spec, color }
        },
        None => {
            Fallback::MalformedColorValue("solidFill without a usable color".to_string()).log();
            FillDescriptor::Solid {
                spec: ColorSpec::direct(ctx.fallback),
                color: ctx.fallback,
            }
        },
    }
}

fn resolve_gradient(fill: &ElementNode, ctx: &FillContext<'_>) -> FillDescriptor {
    let stops: Vec<GradientStop> = fill
        .child("gsLst")
        .map(|list| {
            list.children_named("gs")
                .map(|gs| {
                    let position = gs.attr_i64("pos").unwrap_or(0) as f64 / 1000.0;
                    let (spec, color) = match ColorSpec::from_parent(gs) {
                        Some(spec) => {
                            let color = ctx.color(&spec, &ctx.gradient_colors);
                            (spec, color)
                        },
                        None => {
                            Fallback::MalformedColorValue(format!("gradient stop at {position}%"))
                                .log();
                            (ColorSpec::direct(ctx.fallback), ctx.fallback)
                        },
                    };
                    GradientStop {
                        spec,
                        color,
                        position,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    if stops.is_empty() {
        Fallback::MalformedColorValue("gradFill without stops".to_string()).log();
        return FillDescriptor::None;
    }

    let kind = match fill.child("path").and_then(|p| p.attr("path")) {
        Some("circle") => GradientType::Radial,
        Some("rect") => GradientType::Rectangular,
        Some("shape") => GradientType::Path,
        _ => GradientType::Linear,
    };

    let rotation = match fill.child("lin") {
        Some(lin) => angle_to_degrees(lin.attr_i64("ang").unwrap_or(0)) + DEFAULT_GRADIENT_ROTATION,
        None => DEFAULT_GRADIENT_ROTATION,
    };

    FillDescriptor::Gradient {
        kind,
        stops,
        rotation,
    }
}

fn resolve_pattern(fill: &ElementNode, ctx: &FillContext<'_>) -> FillDescriptor {
    let preset = fill.attr("prst").unwrap_or_default().to_string();
    FillDescriptor::Pattern {
        fg: ctx.color_in(fill.child("fgClr"), Rgba::BLACK),
        bg: ctx.color_in(fill.child("bgClr"), Rgba::WHITE),
        geometry: pattern_geometry(&preset),
        preset,
    }
}

/// Relationship id of a `a:blip` (`r:embed`, else `r:link`).
pub fn blip_rel_id(blip: &ElementNode) -> Option<&str> {
    blip.attr("embed").or_else(|| blip.attr("link"))
}

fn resolve_picture(fill: &ElementNode, ctx: &FillContext<'_>) -> PictureFill {
    let blip = fill.child("blip");
    let r_id = blip.and_then(blip_rel_id).map(str::to_string);

    let image = match (&r_id, ctx.images) {
        (Some(r_id), Some(lookup)) => {
            let image = lookup(r_id);
            if image.is_none() {
                Fallback::CircularOrMissingRelationshipTarget(format!("image {}", r_id)).log();
            }
            image
        },
        _ => None,
    };

    let placement = if let Some(tile) = fill.child("tile") {
        PicturePlacement::Tile {
            tx: thousandths(tile, "tx").unwrap_or(0.0),
            ty: thousandths(tile, "ty").unwrap_or(0.0),
            sx: thousandths(tile, "sx").unwrap_or(100.0),
            sy: thousandths(tile, "sy").unwrap_or(100.0),
            align: tile.attr("algn").map(str::to_string),
        }
    } else if let Some(stretch) = fill.child("stretch") {
        PicturePlacement::Stretch {
            fill_rect: stretch.child("fillRect").map(RelativeRect::from_node),
        }
    } else {
        PicturePlacement::default()
    };

    let crop = fill
        .child("srcRect")
        .map(RelativeRect::from_node)
        .filter(|rect| !rect.is_empty());

    let opacity = blip
        .and_then(|b| b.child("alphaModFix"))
        .and_then(|a| a.attr("amt"))
        .and_then(parse_percentage);

    let duotone = blip.and_then(|b| b.child("duotone")).and_then(|duotone| {
        let mut colors = duotone
            .children()
            .iter()
            .filter_map(ColorSpec::from_color_node)
            .map(|spec| ctx.color(&spec, &ctx.colors));
        Some((colors.next()?, colors.next()?))
    });

    PictureFill {
        r_id,
        image,
        placement,
        crop,
        opacity,
        duotone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::drawings::scheme::{ColorMap, MappedSlot, ThemeColorTable, ThemeSlot};

    fn theme() -> ThemeColorTable {
        ThemeColorTable::default()
            .with(ThemeSlot::Lt1, Rgba::WHITE)
            .with(ThemeSlot::Dk1, Rgba::BLACK)
            .with(ThemeSlot::Accent1, Rgba::rgb(0x44, 0x72, 0xC4))
    }

    fn srgb(hex: &str) -> ElementNode {
        ElementNode::new("srgbClr").with_attr("val", hex)
    }

    fn scheme(val: &str) -> ElementNode {
        ElementNode::new("schemeClr").with_attr("val", val)
    }

    #[test]
    fn test_solid_fill() {
        let map = ColorMap::default();
        let theme = theme();
        let ctx = FillContext::new(ColorContext::new(&map, Some(&theme)), Rgba::WHITE);

        let fill = ElementNode::new("solidFill").with_child(scheme("accent1"));
        let resolved = resolve_fill(&fill, &ctx).unwrap();
        assert_eq!(resolved.solid_color(), Some(Rgba::rgb(0x44, 0x72, 0xC4)));
    }

    #[test]
    fn test_unresolved_color_uses_fallback() {
        let map = ColorMap::default();
        let ctx = FillContext::new(ColorContext::new(&map, None), Rgba::WHITE);
        let fill = ElementNode::new("solidFill").with_child(scheme("accent2"));
        assert_eq!(resolve_fill(&fill, &ctx).unwrap().solid_color(), Some(Rgba::WHITE));
    }

    #[test]
    fn test_gradient_rotation_and_positions() {
        let map = ColorMap::default();
        let ctx = FillContext::new(ColorContext::new(&map, None), Rgba::WHITE);
        let fill = ElementNode::new("gradFill")
            .with_child(
                ElementNode::new("gsLst")
                    .with_child(ElementNode::new("gs").with_attr("pos", "0").with_child(srgb("FF0000")))
                    .with_child(ElementNode::new("gs").with_attr("pos", "50000").with_child(srgb("00FF00")))
                    .with_child(ElementNode::new("gs").with_attr("pos", "100000").with_child(srgb("0000FF"))),
            )
            .with_child(ElementNode::new("lin").with_attr("ang", "5400000"));

        let FillDescriptor::Gradient { kind, stops, rotation } = resolve_fill(&fill, &ctx).unwrap() else {
            panic!("expected a gradient");
        };
        assert_eq!(kind, GradientType::Linear);
        assert_eq!(rotation, 180.0);
        let positions: Vec<f64> = stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, [0.0, 50.0, 100.0]);
        let colors: Vec<Rgba> = stops.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            [Rgba::rgb(255, 0, 0), Rgba::rgb(0, 255, 0), Rgba::rgb(0, 0, 255)]
        );
    }

    #[test]
    fn test_gradient_keeps_stop_with_malformed_color() {
        let map = ColorMap::default();
        let fallback = Rgba::rgb(0x12, 0x34, 0x56);
        let ctx = FillContext::new(ColorContext::new(&map, None), fallback);
        let fill = ElementNode::new("gradFill").with_child(
            ElementNode::new("gsLst")
                .with_child(ElementNode::new("gs").with_attr("pos", "0").with_child(srgb("FF0000")))
                .with_child(ElementNode::new("gs").with_attr("pos", "50000").with_child(srgb("ZZZZZZ")))
                .with_child(ElementNode::new("gs").with_attr("pos", "100000").with_child(srgb("0000FF"))),
        );

        let FillDescriptor::Gradient { stops, .. } = resolve_fill(&fill, &ctx).unwrap() else {
            panic!("expected a gradient");
        };
        let resolved: Vec<(f64, Rgba)> = stops.iter().map(|s| (s.position, s.color)).collect();
        assert_eq!(
            resolved,
            [
                (0.0, Rgba::rgb(255, 0, 0)),
                (50.0, fallback),
                (100.0, Rgba::rgb(0, 0, 255)),
            ]
        );
        assert_eq!(stops[1].spec, ColorSpec::direct(fallback));
    }

    #[test]
    fn test_gradient_default_rotation_and_path() {
        let map = ColorMap::default();
        let ctx = FillContext::new(ColorContext::new(&map, None), Rgba::WHITE);
        let fill = ElementNode::new("gradFill")
            .with_child(
                ElementNode::new("gsLst")
                    .with_child(ElementNode::new("gs").with_attr("pos", "0").with_child(srgb("FFFFFF"))),
            )
            .with_child(ElementNode::new("path").with_attr("path", "circle"));
        let FillDescriptor::Gradient { kind, rotation, .. } = resolve_fill(&fill, &ctx).unwrap() else {
            panic!("expected a gradient");
        };
        assert_eq!(kind, GradientType::Radial);
        assert_eq!(rotation, DEFAULT_GRADIENT_ROTATION);
    }

    #[test]
    fn test_gradient_stops_use_gradient_context() {
        let nearest = ColorMap::default().with(MappedSlot::Bg1, ThemeSlot::Dk1);
        let base = ColorMap::default();
        let theme = theme();
        let ctx = FillContext::new(ColorContext::new(&nearest, Some(&theme)), Rgba::WHITE)
            .with_gradient_colors(ColorContext::new(&base, Some(&theme)));

        let gradient = ElementNode::new("gradFill").with_child(
            ElementNode::new("gsLst")
                .with_child(ElementNode::new("gs").with_attr("pos", "0").with_child(scheme("bg1"))),
        );
        let FillDescriptor::Gradient { stops, .. } = resolve_fill(&gradient, &ctx).unwrap() else {
            panic!("expected a gradient");
        };
        assert_eq!(stops[0].color, Rgba::WHITE);

        let solid = ElementNode::new("solidFill").with_child(scheme("bg1"));
        assert_eq!(resolve_fill(&solid, &ctx).unwrap().solid_color(), Some(Rgba::BLACK));
    }

    #[test]
    fn test_pattern_fill() {
        let map = ColorMap::default();
        let theme = theme();
        let ctx = FillContext::new(ColorContext::new(&map, Some(&theme)), Rgba::WHITE);
        let fill = ElementNode::new("pattFill")
            .with_attr("prst", "smGrid")
            .with_child(ElementNode::new("fgClr").with_child(scheme("accent1")))
            .with_child(ElementNode::new("bgClr").with_child(srgb("FFFFFF")));

        let FillDescriptor::Pattern { preset, fg, bg, geometry } = resolve_fill(&fill, &ctx).unwrap() else {
            panic!("expected a pattern");
        };
        assert_eq!(preset, "smGrid");
        assert_eq!(fg, Rgba::rgb(0x44, 0x72, 0xC4));
        assert_eq!(bg, Rgba::WHITE);
        assert_eq!(geometry.tile_size, 4);
    }

    #[test]
    fn test_picture_fill_tile_and_crop() {
        let map = ColorMap::default();
        let ctx = FillContext::new(ColorContext::new(&map, None), Rgba::WHITE);
        let lookup = |r_id: &str| (r_id == "rId2").then(|| ImageRef::External("img.png".to_string()));
        let ctx = ctx.with_images(&lookup);

        let fill = ElementNode::new("blipFill")
            .with_child(
                ElementNode::new("blip")
                    .with_attr("embed", "rId2")
                    .with_child(ElementNode::new("alphaModFix").with_attr("amt", "40000")),
            )
            .with_child(ElementNode::new("srcRect").with_attr("l", "10000").with_attr("b", "5000"))
            .with_child(
                ElementNode::new("tile")
                    .with_attr("tx", "2000")
                    .with_attr("ty", "0")
                    .with_attr("sx", "50000")
                    .with_attr("sy", "50000")
                    .with_attr("algn", "tl"),
            );

        let FillDescriptor::Picture(picture) = resolve_fill(&fill, &ctx).unwrap() else {
            panic!("expected a picture");
        };
        assert_eq!(picture.r_id.as_deref(), Some("rId2"));
        assert_eq!(picture.image, Some(ImageRef::External("img.png".to_string())));
        assert_eq!(picture.opacity, Some(0.4));
        assert_eq!(
            picture.crop,
            Some(RelativeRect {
                left: 10.0,
                top: 0.0,
                right: 0.0,
                bottom: 5.0,
            })
        );
        assert_eq!(
            picture.placement,
            PicturePlacement::Tile {
                tx: 2.0,
                ty: 0.0,
                sx: 50.0,
                sy: 50.0,
                align: Some("tl".to_string()),
            }
        );
    }

    #[test]
    fn test_picture_fill_stretch_and_duotone() {
        let map = ColorMap::default();
        let theme = theme();
        let ctx = FillContext::new(ColorContext::new(&map, Some(&theme)), Rgba::WHITE)
            .with_placeholder(Some(Rgba::rgb(10, 20, 30)));

        let fill = ElementNode::new("blipFill")
            .with_child(
                ElementNode::new("blip").with_attr("embed", "rId9").with_child(
                    ElementNode::new("duotone")
                        .with_child(scheme("phClr"))
                        .with_child(srgb("000000")),
                ),
            )
            .with_child(
                ElementNode::new("stretch")
                    .with_child(ElementNode::new("fillRect").with_attr("l", "-5000")),
            );

        let FillDescriptor::Picture(picture) = resolve_fill(&fill, &ctx).unwrap() else {
            panic!("expected a picture");
        };
        assert_eq!(picture.image, None);
        assert_eq!(picture.duotone, Some((Rgba::rgb(10, 20, 30), Rgba::BLACK)));
        assert_eq!(
            picture.placement,
            PicturePlacement::Stretch {
                fill_rect: Some(RelativeRect {
                    left: -5.0,
                    ..Default::default()
                }),
            }
        );
        assert_eq!(picture.crop, None);
    }

    #[test]
    fn test_find_fill_and_no_fill() {
        let sp_pr = ElementNode::new("spPr")
            .with_child(ElementNode::new("xfrm"))
            .with_child(ElementNode::new("noFill"))
            .with_child(ElementNode::new("ln"));
        let fill = find_fill(&sp_pr).unwrap();
        assert_eq!(fill.tag(), "noFill");

        let map = ColorMap::default();
        let ctx = FillContext::new(ColorContext::new(&map, None), Rgba::WHITE);
        assert!(resolve_fill(fill, &ctx).unwrap().is_none());
        assert!(resolve_fill(&ElementNode::new("xfrm"), &ctx).is_none());
    }
}
