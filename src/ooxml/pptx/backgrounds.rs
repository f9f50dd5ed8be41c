//! Slide background resolution.
//!
//! A slide's background comes from the innermost part of its scope chain that
//! declares a `p:bg`. `p:bgPr` carries the fill inline; `p:bgRef` points into
//! the theme's `a:bgFillStyleLst` and supplies the `phClr` substitute.

use crate::common::Rgba;
use crate::ooxml::dom::ElementNode;
use crate::ooxml::drawings::color::ColorSpec;
use crate::ooxml::drawings::fill::{FillContext, FillDescriptor, find_fill, resolve_fill};
use crate::ooxml::error::Fallback;
use crate::ooxml::pptx::config::ResolverOptions;
use crate::ooxml::pptx::image::{ImageResolver, PartImageResolver};
use crate::ooxml::pptx::scope::{ScopeChain, ScopeLevel, ScopePart};

/// `p:bgRef/@idx` values that select no fill.
const NO_FILL_INDICES: [u32; 2] = [0, 1000];

/// First `p:bgRef/@idx` that addresses `a:bgFillStyleLst`.
const BG_FILL_STYLE_BASE: u32 = 1001;

/// Resolve the background of the chain's innermost part.
///
/// Slide, layout and master are tried in that order; the first `p:bg` found
/// decides the result, even when it resolves to no fill.
pub fn resolve_background(chain: &ScopeChain) -> FillDescriptor {
    for level in [ScopeLevel::Slide, ScopeLevel::Layout, ScopeLevel::Master] {
        if let Some(bg) = chain.part(level).and_then(ScopePart::background) {
            return resolve_fill_node_in(bg, chain, level);
        }
    }

    tracing::debug!("no background in scope chain, using the default");
    default_background(chain.options())
}

/// Background used when no scope declares one.
pub fn default_background(options: &ResolverOptions) -> FillDescriptor {
    let color = options.default_background_color();
    FillDescriptor::Solid {
        spec: ColorSpec::direct(color),
        color,
    }
}

/// Resolve a fill-bearing node owned by the chain's innermost part.
///
/// `node` may be a `p:bg`, `p:bgPr`, `p:bgRef`, a shape's `p:spPr`, or a fill
/// element itself. Anything that holds no fill resolves to
/// [`FillDescriptor::None`].
pub fn resolve_fill_node(node: &ElementNode, chain: &ScopeChain) -> FillDescriptor {
    let owner = chain.innermost().map_or(ScopeLevel::Slide, ScopePart::level);
    resolve_fill_node_in(node, chain, owner)
}

/// Resolve a fill-bearing node owned by the part at `owner`.
///
/// The owner only decides which relationship map picture fills are looked
/// up in; colors always use the chain's effective color map.
pub fn resolve_fill_node_in(node: &ElementNode, chain: &ScopeChain, owner: ScopeLevel) -> FillDescriptor {
    match node.tag() {
        "bg" => {
            if let Some(bg_pr) = node.child("bgPr") {
                resolve_fill_node_in(bg_pr, chain, owner)
            } else if let Some(bg_ref) = node.child("bgRef") {
                resolve_bg_ref(bg_ref, chain)
            } else {
                FillDescriptor::None
            }
        },
        "bgRef" => resolve_bg_ref(node, chain),
        _ => {
            let fill = resolve_in_context(chain, owner, None, |ctx| {
                resolve_fill(node, ctx).or_else(|| find_fill(node).and_then(|fill| resolve_fill(fill, ctx)))
            });
            fill.unwrap_or(FillDescriptor::None)
        },
    }
}

/// `p:bgRef`: an index into the theme's background fill styles.
fn resolve_bg_ref(bg_ref: &ElementNode, chain: &ScopeChain) -> FillDescriptor {
    let idx = bg_ref.attr_u32("idx").unwrap_or(0);
    if NO_FILL_INDICES.contains(&idx) {
        return FillDescriptor::None;
    }
    if idx < BG_FILL_STYLE_BASE {
        Fallback::UnsupportedFillOrPattern(format!("bgRef idx {} into fillStyleLst", idx)).log();
        return FillDescriptor::None;
    }

    let position = (idx - BG_FILL_STYLE_BASE) as usize;
    let Some(entry) = chain.theme().and_then(|theme| theme.bg_fill_styles.get(position)) else {
        Fallback::MissingScopePart(format!("bgFillStyleLst entry {} for bgRef idx {}", position + 1, idx)).log();
        return FillDescriptor::None;
    };

    let placeholder = ColorSpec::from_parent(bg_ref).and_then(|spec| spec.resolve(&chain.color_context()));
    resolve_in_context(chain, ScopeLevel::Theme, placeholder, |ctx| resolve_fill(entry, ctx))
        .unwrap_or(FillDescriptor::None)
}

/// Run `f` with a fill context for content owned by the part at `owner`.
///
/// Solid, pattern and picture colors use the effective color map, gradient
/// stops the master's base map.
fn resolve_in_context<R>(
    chain: &ScopeChain,
    owner: ScopeLevel,
    placeholder: Option<Rgba>,
    f: impl FnOnce(&FillContext<'_>) -> R,
) -> R {
    let rels = chain.rels(owner);
    let images: &dyn ImageResolver = chain.image_resolver().unwrap_or(&PartImageResolver);
    let lookup = |r_id: &str| rels.and_then(|rels| images.resolve_image(r_id, rels));

    let ctx = FillContext::new(chain.color_context(), chain.options().unresolved_color())
        .with_gradient_colors(chain.base_color_context())
        .with_images(&lookup)
        .with_placeholder(placeholder);
    f(&ctx)
}
