//! The color transform pipeline.
//!
//! A base [`ColorToken`] is resolved to RGBA, converted to HSLA, run through
//! the modifiers in [`ColorModifier::EVALUATION_ORDER`] (at most one of each
//! kind, first occurrence wins), then converted back.

use crate::common::{Hsla, Rgba};
use crate::ooxml::drawings::color::{ColorModifier, ColorSpec, ColorToken};
use crate::ooxml::drawings::preset::{preset_color, system_color};
use crate::ooxml::drawings::scheme::{ColorMap, ThemeColorTable, resolve_scheme_color};
use crate::ooxml::error::Fallback;

/// Everything a color needs from its surroundings.
#[derive(Debug, Clone, Copy)]
pub struct ColorContext<'a> {
    /// Color map of the scope the color is evaluated in
    pub color_map: &'a ColorMap,
    /// Theme colors, if the scope chain reached a theme
    pub theme: Option<&'a ThemeColorTable>,
    /// Substitution value for `phClr`
    pub placeholder: Option<Rgba>,
}

impl<'a> ColorContext<'a> {
    pub fn new(color_map: &'a ColorMap, theme: Option<&'a ThemeColorTable>) -> Self {
        Self {
            color_map,
            theme,
            placeholder: None,
        }
    }

    /// Builder: set the `phClr` substitution value.
    pub fn with_placeholder(mut self, placeholder: Option<Rgba>) -> Self {
        self.placeholder = placeholder;
        self
    }
}

impl ColorModifier {
    fn value(&self) -> f64 {
        match *self {
            ColorModifier::Alpha(v)
            | ColorModifier::HueMod(v)
            | ColorModifier::HueOff(v)
            | ColorModifier::LumMod(v)
            | ColorModifier::LumOff(v)
            | ColorModifier::SatMod(v)
            | ColorModifier::SatOff(v)
            | ColorModifier::Shade(v)
            | ColorModifier::Tint(v) => v,
        }
    }
}

/// Resolve a base token to RGBA, without modifiers.
pub fn resolve_token(token: &ColorToken, ctx: &ColorContext<'_>) -> Option<Rgba> {
    match token {
        ColorToken::Direct(rgba) => Some(*rgba),
        ColorToken::Scheme(color) => resolve_scheme_color(*color, ctx.color_map, ctx.theme),
        ColorToken::Hsl { h, s, l } => Some(
            Hsla {
                h: *h,
                s: *s,
                l: *l,
                a: 1.0,
            }
            .to_rgba(false),
        ),
        ColorToken::Preset(name) => {
            let color = preset_color(name);
            if color.is_none() {
                Fallback::MalformedColorValue(format!("preset color \"{}\"", name)).log();
            }
            color
        },
        ColorToken::System { name, last } => last.or_else(|| system_color(name)),
        ColorToken::PlaceholderColor => {
            if ctx.placeholder.is_none() {
                Fallback::MalformedColorValue("phClr outside a style reference".to_string()).log();
            }
            ctx.placeholder
        },
    }
}

/// Apply modifiers to an HSLA color in the fixed evaluation order.
///
/// Returns the transformed color and whether an alpha modifier was applied.
pub fn apply_modifiers(mut color: Hsla, modifiers: &[ColorModifier]) -> (Hsla, bool) {
    let mut first = [None::<f64>; 9];
    for modifier in modifiers {
        let slot = &mut first[modifier.kind() as usize];
        if slot.is_none() {
            *slot = Some(modifier.value());
        }
    }

    let mut has_alpha = false;
    for kind in ColorModifier::EVALUATION_ORDER {
        let Some(v) = first[kind as usize] else {
            continue;
        };
        use crate::ooxml::drawings::color::ModifierKind as K;
        match kind {
            K::Alpha => {
                color.a = v;
                has_alpha = true;
            },
            K::HueMod => color.h = (color.h * v).rem_euclid(360.0),
            K::HueOff => color.h = (color.h + v * 360.0).rem_euclid(360.0),
            K::LumMod => color.l = (color.l * v).min(1.0),
            K::LumOff => color.l = (color.l + v).min(1.0),
            K::SatMod => color.s = (color.s * v).min(1.0),
            K::SatOff => color.s = (color.s + v).clamp(0.0, 1.0),
            // Same formula as LumMod, not a blend toward black.
            K::Shade => color.l = (color.l * v).min(1.0),
            K::Tint => color.l = color.l * v + (1.0 - v),
        }
    }

    (color, has_alpha)
}

/// Run the full pipeline: resolve `token`, then apply `modifiers`.
///
/// Returns `None` when the base token cannot be resolved; callers substitute
/// their contextual default.
pub fn apply(token: &ColorToken, modifiers: &[ColorModifier], ctx: &ColorContext<'_>) -> Option<Rgba> {
    let base = resolve_token(token, ctx)?;
    if modifiers.is_empty() {
        return Some(base);
    }

    let (color, has_alpha) = apply_modifiers(base.to_hsla(), modifiers);
    Some(color.to_rgba(has_alpha || base.explicit_alpha))
}

impl ColorSpec {
    /// Run this color through the pipeline.
    pub fn resolve(&self, ctx: &ColorContext<'_>) -> Option<Rgba> {
        apply(&self.token, &self.modifiers, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::dom::ElementNode;
    use crate::ooxml::drawings::scheme::{MappedSlot, SchemeColor, ThemeSlot};
    use proptest::prelude::*;

    fn theme() -> ThemeColorTable {
        ThemeColorTable::default()
            .with(ThemeSlot::Lt1, Rgba::WHITE)
            .with(ThemeSlot::Dk1, Rgba::BLACK)
            .with(ThemeSlot::Accent1, Rgba::rgb(0x44, 0x72, 0xC4))
    }

    fn hsla(l: f64) -> Hsla {
        Hsla {
            h: 210.0,
            s: 0.5,
            l,
            a: 1.0,
        }
    }

    #[test]
    fn test_tint_blends_toward_white() {
        let (out, _) = apply_modifiers(hsla(0.4), &[ColorModifier::Tint(0.5)]);
        assert!((out.l - (0.4 * 0.5 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_shade_scales_lightness() {
        let (out, _) = apply_modifiers(hsla(0.4), &[ColorModifier::Shade(0.5)]);
        assert!((out.l - 0.2).abs() < 1e-12);

        let (out, _) = apply_modifiers(hsla(0.8), &[ColorModifier::Shade(1.5)]);
        assert_eq!(out.l, 1.0);
    }

    #[test]
    fn test_order_is_fixed() {
        let a = apply_modifiers(hsla(0.3), &[ColorModifier::Tint(0.6), ColorModifier::Shade(0.5)]);
        let b = apply_modifiers(hsla(0.3), &[ColorModifier::Shade(0.5), ColorModifier::Tint(0.6)]);
        assert_eq!(a, b);
        // Shade runs before Tint.
        assert!((a.0.l - (0.3 * 0.5 * 0.6 + 0.4)).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_kind_uses_first_occurrence() {
        let (out, _) = apply_modifiers(hsla(0.5), &[ColorModifier::LumMod(0.5), ColorModifier::LumMod(0.1)]);
        assert!((out.l - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_hue_and_saturation() {
        let (out, _) = apply_modifiers(hsla(0.5), &[ColorModifier::HueMod(2.0)]);
        assert!((out.h - 60.0).abs() < 1e-9);

        let (out, _) = apply_modifiers(hsla(0.5), &[ColorModifier::HueOff(0.5)]);
        assert!((out.h - 30.0).abs() < 1e-9);

        let (out, _) = apply_modifiers(hsla(0.5), &[ColorModifier::SatMod(3.0)]);
        assert_eq!(out.s, 1.0);

        let (out, _) = apply_modifiers(hsla(0.5), &[ColorModifier::SatOff(-0.8)]);
        assert_eq!(out.s, 0.0);

        let (out, _) = apply_modifiers(hsla(0.7), &[ColorModifier::LumOff(0.5)]);
        assert_eq!(out.l, 1.0);
    }

    #[test]
    fn test_hue_offset_wraps_below_zero() {
        let base = Hsla {
            h: 10.0,
            ..hsla(0.5)
        };
        // -20 degrees in 60000ths
        let node = ElementNode::new("hueOff").with_attr("val", "-1200000");
        let modifier = ColorModifier::from_node(&node).unwrap();
        let (out, _) = apply_modifiers(base, &[modifier]);
        assert!((out.h - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_alpha_sets_flag_and_value() {
        let map = ColorMap::default();
        let theme = theme();
        let ctx = ColorContext::new(&map, Some(&theme));
        let out = apply(
            &ColorToken::Direct(Rgba::rgb(255, 0, 0)),
            &[ColorModifier::Alpha(0.5)],
            &ctx,
        )
        .unwrap();
        assert!(out.explicit_alpha);
        assert_eq!(out.a, 128);
        assert_eq!(out.to_hex(), "FF000080");

        let opaque = apply(&ColorToken::Direct(Rgba::rgb(255, 0, 0)), &[], &ctx).unwrap();
        assert_eq!(opaque.to_hex(), "FF0000");
    }

    #[test]
    fn test_lum_mod_on_scheme_color() {
        let map = ColorMap::default();
        let theme = theme();
        let ctx = ColorContext::new(&map, Some(&theme));
        let out = apply(
            &ColorToken::Scheme(SchemeColor::Mapped(MappedSlot::Bg1)),
            &[ColorModifier::LumMod(0.5)],
            &ctx,
        )
        .unwrap();
        assert_eq!(out, Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_placeholder_substitution() {
        let map = ColorMap::default();
        let ctx = ColorContext::new(&map, None);
        assert_eq!(apply(&ColorToken::PlaceholderColor, &[], &ctx), None);

        let ctx = ctx.with_placeholder(Some(Rgba::rgb(1, 2, 3)));
        assert_eq!(apply(&ColorToken::PlaceholderColor, &[], &ctx), Some(Rgba::rgb(1, 2, 3)));
    }

    #[test]
    fn test_preset_and_system_tokens() {
        let map = ColorMap::default();
        let ctx = ColorContext::new(&map, None);
        assert_eq!(
            apply(&ColorToken::Preset("red".to_string()), &[], &ctx),
            Some(Rgba::rgb(255, 0, 0))
        );
        assert_eq!(apply(&ColorToken::Preset("nope".to_string()), &[], &ctx), None);
        assert_eq!(
            apply(
                &ColorToken::System {
                    name: "windowText".to_string(),
                    last: Some(Rgba::rgb(9, 9, 9)),
                },
                &[],
                &ctx
            ),
            Some(Rgba::rgb(9, 9, 9))
        );
    }

    fn modifier_strategy() -> impl Strategy<Value = ColorModifier> {
        prop_oneof![
            (0.0f64..1.0).prop_map(ColorModifier::Alpha),
            (0.0f64..3.0).prop_map(ColorModifier::HueMod),
            (-1.0f64..1.0).prop_map(ColorModifier::HueOff),
            (0.0f64..2.0).prop_map(ColorModifier::LumMod),
            (-1.0f64..1.0).prop_map(ColorModifier::LumOff),
            (0.0f64..2.0).prop_map(ColorModifier::SatMod),
            (-1.0f64..1.0).prop_map(ColorModifier::SatOff),
            (0.0f64..1.0).prop_map(ColorModifier::Shade),
            (0.0f64..1.0).prop_map(ColorModifier::Tint),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_pipeline_is_pure(
            rgb in (any::<u8>(), any::<u8>(), any::<u8>()),
            mods in prop::collection::vec(modifier_strategy(), 0..6),
        ) {
            let map = ColorMap::default();
            let theme = theme();
            let ctx = ColorContext::new(&map, Some(&theme));
            let token = ColorToken::Direct(Rgba::rgb(rgb.0, rgb.1, rgb.2));
            prop_assert_eq!(apply(&token, &mods, &ctx), apply(&token, &mods, &ctx));
        }

        #[test]
        fn prop_distinct_kinds_commute(
            rgb in (any::<u8>(), any::<u8>(), any::<u8>()),
            mods in prop::collection::vec(modifier_strategy(), 0..9),
        ) {
            let mut seen = std::collections::HashSet::new();
            let distinct: Vec<ColorModifier> =
                mods.into_iter().filter(|m| seen.insert(m.kind())).collect();
            let mut reversed = distinct.clone();
            reversed.reverse();

            let map = ColorMap::default();
            let ctx = ColorContext::new(&map, None);
            let token = ColorToken::Direct(Rgba::rgb(rgb.0, rgb.1, rgb.2));
            prop_assert_eq!(apply(&token, &distinct, &ctx), apply(&token, &reversed, &ctx));
        }
    }
}
