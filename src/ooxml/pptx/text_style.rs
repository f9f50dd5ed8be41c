//! Placeholder text style cascade.
//!
//! Text in a placeholder takes each property from the first source that sets
//! it: the run's own `a:rPr`, the matching layout placeholder, the master's
//! text styles, and finally a size default keyed by placeholder class.

use crate::common::Rgba;
use crate::ooxml::dom::ElementNode;
use crate::ooxml::drawings::color::ColorSpec;
use crate::ooxml::pptx::config::ResolverOptions;
use crate::ooxml::pptx::placeholder::{PlaceholderId, PlaceholderSize, PlaceholderType};
use crate::ooxml::pptx::scope::ScopeChain;
use std::fmt::Write;

/// Deepest paragraph level DrawingML list styles define.
pub const MAX_LEVEL: u8 = 9;

/// Paragraph alignment (`a:pPr/@algn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
    Distributed,
}

impl TextAlign {
    pub fn from_ooxml(algn: &str) -> Option<Self> {
        match algn {
            "l" => Some(TextAlign::Left),
            "ctr" => Some(TextAlign::Center),
            "r" => Some(TextAlign::Right),
            "just" | "justLow" => Some(TextAlign::Justify),
            "dist" | "thaiDist" => Some(TextAlign::Distributed),
            _ => None,
        }
    }

    /// CSS `text-align` value.
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify | TextAlign::Distributed => "justify",
        }
    }
}

/// Text formatting gathered from the cascade. Every field is optional until
/// the defaults are merged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTextStyle {
    /// Font size in px (`sz / 100`)
    pub font_size_px: Option<f64>,
    /// Color as written
    pub color: Option<ColorSpec>,
    /// `color` run through the transform pipeline
    pub resolved_color: Option<Rgba>,
    /// Latin typeface, theme references already substituted
    pub font_family: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strike: Option<bool>,
    pub align: Option<TextAlign>,
}

impl ResolvedTextStyle {
    /// Read run properties (`a:rPr`, `a:defRPr`, `a:endParaRPr`).
    pub fn from_run_properties(r_pr: &ElementNode) -> Self {
        Self {
            font_size_px: r_pr.attr_i64("sz").map(|sz| sz as f64 / 100.0),
            color: r_pr.child("solidFill").and_then(ColorSpec::from_parent),
            resolved_color: None,
            font_family: r_pr
                .child("latin")
                .and_then(|latin| latin.attr("typeface"))
                .map(str::to_string),
            bold: r_pr.attr_bool("b"),
            italic: r_pr.attr_bool("i"),
            underline: r_pr.attr("u").map(|u| u != "none"),
            strike: r_pr.attr("strike").map(|s| s != "noStrike"),
            align: None,
        }
    }

    /// Read paragraph properties (`a:pPr`, `a:lvlNpPr`): alignment plus the
    /// default run properties.
    pub fn from_paragraph_properties(p_pr: &ElementNode) -> Self {
        let mut style = p_pr
            .child("defRPr")
            .map(Self::from_run_properties)
            .unwrap_or_default();
        style.align = p_pr.attr("algn").and_then(TextAlign::from_ooxml);
        style
    }

    /// Fill every unset property from `other`, never overwriting.
    pub fn merge_missing(&mut self, other: &ResolvedTextStyle) {
        fn fill<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }

        if self.color.is_none() {
            self.color.clone_from(&other.color);
            self.resolved_color = other.resolved_color;
        }
        fill(&mut self.font_size_px, &other.font_size_px);
        fill(&mut self.font_family, &other.font_family);
        fill(&mut self.bold, &other.bold);
        fill(&mut self.italic, &other.italic);
        fill(&mut self.underline, &other.underline);
        fill(&mut self.strike, &other.strike);
        fill(&mut self.align, &other.align);
    }

    /// Builder form of [`ResolvedTextStyle::merge_missing`].
    pub fn or(mut self, other: &ResolvedTextStyle) -> Self {
        self.merge_missing(other);
        self
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// CSS declarations for the set properties, in a fixed order.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        if let Some(px) = self.font_size_px {
            let _ = write!(css, "font-size:{}px;", px);
        }
        if let Some(color) = self.resolved_color {
            let _ = write!(css, "color:{};", color);
        }
        if let Some(family) = &self.font_family {
            let _ = write!(css, "font-family:'{}';", family);
        }
        if let Some(bold) = self.bold {
            css.push_str(if bold { "font-weight:bold;" } else { "font-weight:normal;" });
        }
        if let Some(italic) = self.italic {
            css.push_str(if italic { "font-style:italic;" } else { "font-style:normal;" });
        }
        match (self.underline.unwrap_or(false), self.strike.unwrap_or(false)) {
            (true, true) => css.push_str("text-decoration:underline line-through;"),
            (true, false) => css.push_str("text-decoration:underline;"),
            (false, true) => css.push_str("text-decoration:line-through;"),
            (false, false) if self.underline.is_some() || self.strike.is_some() => {
                css.push_str("text-decoration:none;")
            },
            (false, false) => {},
        }
        if let Some(align) = self.align {
            let _ = write!(css, "text-align:{};", align.as_css());
        }
        css
    }
}

/// Level of a paragraph: `a:pPr/@lvl` plus one, 1 when absent.
pub fn paragraph_level(p_pr: Option<&ElementNode>) -> u8 {
    p_pr.and_then(|p| p.attr_u32("lvl"))
        .map_or(1, |lvl| (lvl.min(u32::from(MAX_LEVEL) - 1) as u8) + 1)
}

/// Resolve the inherited text style of a placeholder at paragraph level `lvl`.
///
/// Layout values win over master values, which win over the size defaults.
/// Missing layout or master parts only remove their contribution.
pub fn resolve_placeholder_style(ph: &PlaceholderId, lvl: u8, chain: &ScopeChain) -> ResolvedTextStyle {
    let lvl = lvl.clamp(1, MAX_LEVEL);
    let style = layout_style(ph, lvl, chain)
        .unwrap_or_default()
        .or(&master_style(ph, lvl, chain))
        .or(&default_style(ph, chain.options()));
    finish(style, chain)
}

/// Resolve a run: explicit `a:rPr` properties first, then the placeholder
/// cascade.
pub fn resolve_run_style(
    ph: &PlaceholderId,
    lvl: u8,
    r_pr: Option<&ElementNode>,
    chain: &ScopeChain,
) -> ResolvedTextStyle {
    let explicit = r_pr.map(ResolvedTextStyle::from_run_properties).unwrap_or_default();
    let explicit = finish(explicit, chain);
    explicit.or(&resolve_placeholder_style(ph, lvl, chain))
}

fn level_tag(lvl: u8) -> String {
    format!("lvl{}pPr", lvl)
}

/// Layout contribution: the placeholder matched by index, then by type.
fn layout_style(ph: &PlaceholderId, lvl: u8, chain: &ScopeChain) -> Option<ResolvedTextStyle> {
    let placeholders = chain.layout()?.placeholders();
    let tag = level_tag(lvl);

    let by_idx = ph
        .idx
        .and_then(|idx| placeholders.by_idx(idx))
        .and_then(|sp| indexed_paragraph_properties(sp, &tag, lvl))
        .map(ResolvedTextStyle::from_paragraph_properties)
        .filter(|style| !style.is_empty());
    if by_idx.is_some() {
        return by_idx;
    }

    ph.ty
        .and_then(|ty| placeholders.by_type(ty))
        .and_then(|sp| sp.descend(&["txBody", "lstStyle", tag.as_str()]))
        .map(ResolvedTextStyle::from_paragraph_properties)
}

/// `lstStyle/lvlNpPr`, else the first paragraph's `pPr`, else the `pPr` of
/// paragraph `lvl - 1`.
fn indexed_paragraph_properties<'a>(sp: &'a ElementNode, tag: &str, lvl: u8) -> Option<&'a ElementNode> {
    let body = sp.child("txBody")?;
    body.descend(&["lstStyle", tag])
        .or_else(|| body.child("p").and_then(|p| p.child("pPr")))
        .or_else(|| {
            body.children_named("p")
                .nth(usize::from(lvl) - 1)
                .and_then(|p| p.child("pPr"))
        })
}

/// Master contribution for the placeholder's class.
fn master_style(ph: &PlaceholderId, lvl: u8, chain: &ScopeChain) -> ResolvedTextStyle {
    let tag = level_tag(lvl);
    let text_style = |name: &str| {
        chain
            .master()
            .and_then(|m| m.text_styles())
            .and_then(|styles| styles.descend(&[name, tag.as_str()]))
    };

    let p_pr = match ph.effective_type() {
        PlaceholderType::Title | PlaceholderType::CenterTitle => text_style("titleStyle"),
        PlaceholderType::Body | PlaceholderType::Object | PlaceholderType::SubTitle => text_style("bodyStyle"),
        PlaceholderType::Shape | PlaceholderType::Diagram => text_style("otherStyle"),
        PlaceholderType::TextBox => chain.default_text_style().and_then(|d| d.child(&tag)),
        ty => chain
            .master()
            .and_then(|m| m.placeholders().by_type(ty))
            .and_then(|sp| sp.descend(&["txBody", "lstStyle", tag.as_str()])),
    };
    p_pr.map(ResolvedTextStyle::from_paragraph_properties)
        .unwrap_or_default()
}

/// Hardcoded size: the declared size if any, else by placeholder class.
fn default_style(ph: &PlaceholderId, options: &ResolverOptions) -> ResolvedTextStyle {
    let px = match ph.size {
        Some(PlaceholderSize::Quarter) => options.quarter_font_size,
        Some(PlaceholderSize::Half) => options.half_font_size,
        Some(PlaceholderSize::Full) => options.full_font_size,
        None => match ph.effective_type() {
            PlaceholderType::Title | PlaceholderType::CenterTitle => options.title_font_size,
            PlaceholderType::Body | PlaceholderType::Object | PlaceholderType::SubTitle => options.body_font_size,
            _ => options.other_font_size,
        },
    };
    ResolvedTextStyle {
        font_size_px: Some(px),
        ..ResolvedTextStyle::default()
    }
}

/// Substitute theme fonts and run the color through the pipeline.
fn finish(mut style: ResolvedTextStyle, chain: &ScopeChain) -> ResolvedTextStyle {
    if let Some(family) = style.font_family.take() {
        style.font_family = match chain.theme() {
            Some(theme) => theme.resolve_typeface(&family).map(str::to_string),
            None if family.starts_with('+') => None,
            None => Some(family),
        };
    }
    if style.resolved_color.is_none()
        && let Some(spec) = &style.color
    {
        style.resolved_color = Some(
            spec.resolve(&chain.color_context())
                .unwrap_or_else(|| chain.options().unresolved_color()),
        );
    }
    style
}
