//! Scope chains: the slide, layout, master and theme a slide inherits from.
//!
//! [`ScopeResolver`] follows relationships slide → layout → master → theme,
//! parsing each part once and caching it, and produces an immutable
//! [`ScopeChain`] per slide together with its [`ColorMapChain`].

use crate::common::Rgba;
use crate::ooxml::dom::ElementNode;
use crate::ooxml::drawings::color::{ColorModifier, ColorToken};
use crate::ooxml::drawings::scheme::{ColorMap, ThemeColorTable};
use crate::ooxml::drawings::transform::{self, ColorContext};
use crate::ooxml::error::{Fallback, OoxmlError, Result};
use crate::ooxml::opc::packuri::PRESENTATION_URI;
use crate::ooxml::opc::{PackURI, PartSource, RelationshipMap};
use crate::ooxml::pptx::config::ResolverOptions;
use crate::ooxml::pptx::image::ImageResolver;
use crate::ooxml::pptx::parts::theme::{Theme, ThemePart};
use crate::ooxml::pptx::placeholder::PlaceholderIndex;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

/// Position of a part in the inheritance chain, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeLevel {
    Slide,
    Layout,
    Master,
    Theme,
}

impl ScopeLevel {
    /// Level of a presentation part by its root element.
    pub fn from_root_tag(tag: &str) -> Option<Self> {
        match tag {
            "sld" => Some(ScopeLevel::Slide),
            "sldLayout" => Some(ScopeLevel::Layout),
            "sldMaster" => Some(ScopeLevel::Master),
            "theme" => Some(ScopeLevel::Theme),
            _ => None,
        }
    }

    /// Relationship type suffix leading to the next level down.
    fn next(self) -> Option<(&'static str, ScopeLevel)> {
        match self {
            ScopeLevel::Slide => Some(("slideLayout", ScopeLevel::Layout)),
            ScopeLevel::Layout => Some(("slideMaster", ScopeLevel::Master)),
            ScopeLevel::Master => Some(("theme", ScopeLevel::Theme)),
            ScopeLevel::Theme => None,
        }
    }
}

/// A parsed slide, layout or master part.
#[derive(Debug, Clone)]
pub struct ScopePart {
    level: ScopeLevel,
    partname: PackURI,
    root: ElementNode,
    rels: RelationshipMap,
    placeholders: PlaceholderIndex,
}

impl ScopePart {
    /// Wrap a parsed part. The level is taken from the root element.
    pub fn from_node(partname: PackURI, rels: RelationshipMap, root: ElementNode) -> Result<Self> {
        let level = match ScopeLevel::from_root_tag(root.tag()) {
            Some(ScopeLevel::Theme) | None => {
                return Err(OoxmlError::InvalidFormat(format!(
                    "{} has root <{}>, expected a slide, layout or master",
                    partname,
                    root.tag()
                )));
            },
            Some(level) => level,
        };
        let placeholders = PlaceholderIndex::from_root(&root);
        Ok(Self {
            level,
            partname,
            root,
            rels,
            placeholders,
        })
    }

    #[inline]
    pub fn level(&self) -> ScopeLevel {
        self.level
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn root(&self) -> &ElementNode {
        &self.root
    }

    #[inline]
    pub fn rels(&self) -> &RelationshipMap {
        &self.rels
    }

    #[inline]
    pub fn placeholders(&self) -> &PlaceholderIndex {
        &self.placeholders
    }

    /// The part's own `p:cSld/p:bg`.
    pub fn background(&self) -> Option<&ElementNode> {
        self.root.descend(&["cSld", "bg"])
    }

    /// `p:clrMapOvr/a:overrideClrMapping` of a slide or layout.
    ///
    /// `a:masterClrMapping` means "no override" and yields `None`.
    pub fn color_map_override(&self) -> Option<ColorMap> {
        self.root
            .descend(&["clrMapOvr", "overrideClrMapping"])
            .map(ColorMap::from_node)
    }

    /// A master's base `p:clrMap`.
    pub fn base_color_map(&self) -> Option<ColorMap> {
        self.root.child("clrMap").map(ColorMap::from_node)
    }

    /// A master's `p:txStyles`.
    pub fn text_styles(&self) -> Option<&ElementNode> {
        self.root.child("txStyles")
    }
}

/// Color maps of a chain by precedence: slide override, layout override,
/// master base map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorMapChain {
    pub slide: Option<ColorMap>,
    pub layout: Option<ColorMap>,
    /// Always present; the default mapping when the master is missing
    pub master: ColorMap,
}

impl ColorMapChain {
    /// The map in force for the chain's innermost part.
    #[inline]
    pub fn effective(&self) -> &ColorMap {
        self.slide.as_ref().or(self.layout.as_ref()).unwrap_or(&self.master)
    }

    /// The master's base map.
    #[inline]
    pub fn base(&self) -> &ColorMap {
        &self.master
    }

    /// The map in force for content owned by `level`.
    pub fn for_level(&self, level: ScopeLevel) -> &ColorMap {
        match level {
            ScopeLevel::Slide => self.effective(),
            ScopeLevel::Layout => self.layout.as_ref().unwrap_or(&self.master),
            ScopeLevel::Master | ScopeLevel::Theme => &self.master,
        }
    }
}

/// Everything one slide inherits from. Immutable once built.
#[derive(Clone)]
pub struct ScopeChain {
    slide: Option<Arc<ScopePart>>,
    layout: Option<Arc<ScopePart>>,
    master: Option<Arc<ScopePart>>,
    theme: Option<Arc<ThemePart>>,
    color_maps: ColorMapChain,
    default_text_style: Option<Arc<ElementNode>>,
    options: Arc<ResolverOptions>,
    images: Option<Arc<dyn ImageResolver>>,
}

impl std::fmt::Debug for ScopeChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = |part: &Option<Arc<ScopePart>>| part.as_ref().map(|p| p.partname().to_string());
        f.debug_struct("ScopeChain")
            .field("slide", &name(&self.slide))
            .field("layout", &name(&self.layout))
            .field("master", &name(&self.master))
            .field("theme", &self.theme.as_ref().map(|t| t.partname().to_string()))
            .field("color_maps", &self.color_maps)
            .finish()
    }
}

impl ScopeChain {
    /// A chain with no parts at all: every lookup falls to the defaults.
    pub fn detached(options: Arc<ResolverOptions>) -> Self {
        Self {
            slide: None,
            layout: None,
            master: None,
            theme: None,
            color_maps: ColorMapChain::default(),
            default_text_style: None,
            options,
            images: None,
        }
    }

    #[inline]
    pub fn slide(&self) -> Option<&ScopePart> {
        self.slide.as_deref()
    }

    #[inline]
    pub fn layout(&self) -> Option<&ScopePart> {
        self.layout.as_deref()
    }

    #[inline]
    pub fn master(&self) -> Option<&ScopePart> {
        self.master.as_deref()
    }

    /// Part at a slide, layout or master level.
    pub fn part(&self, level: ScopeLevel) -> Option<&ScopePart> {
        match level {
            ScopeLevel::Slide => self.slide(),
            ScopeLevel::Layout => self.layout(),
            ScopeLevel::Master => self.master(),
            ScopeLevel::Theme => None,
        }
    }

    /// Innermost part present.
    pub fn innermost(&self) -> Option<&ScopePart> {
        self.slide().or(self.layout()).or(self.master())
    }

    #[inline]
    pub fn theme_part(&self) -> Option<&ThemePart> {
        self.theme.as_deref()
    }

    #[inline]
    pub fn theme(&self) -> Option<&Theme> {
        self.theme_part().map(ThemePart::theme)
    }

    #[inline]
    pub fn theme_colors(&self) -> Option<&ThemeColorTable> {
        self.theme().map(|t| &t.colors)
    }

    #[inline]
    pub fn color_maps(&self) -> &ColorMapChain {
        &self.color_maps
    }

    /// `p:defaultTextStyle` of the presentation.
    #[inline]
    pub fn default_text_style(&self) -> Option<&ElementNode> {
        self.default_text_style.as_deref()
    }

    #[inline]
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    #[inline]
    pub fn image_resolver(&self) -> Option<&dyn ImageResolver> {
        self.images.as_deref()
    }

    /// Relationships of the part at `level`.
    pub fn rels(&self, level: ScopeLevel) -> Option<&RelationshipMap> {
        match level {
            ScopeLevel::Theme => self.theme_part().map(ThemePart::rels),
            level => self.part(level).map(ScopePart::rels),
        }
    }

    /// Color context for the chain's innermost part.
    pub fn color_context(&self) -> ColorContext<'_> {
        ColorContext::new(self.color_maps.effective(), self.theme_colors())
    }

    /// Color context using the master's base map.
    pub fn base_color_context(&self) -> ColorContext<'_> {
        ColorContext::new(self.color_maps.base(), self.theme_colors())
    }

    /// Run a color through the transform pipeline against the effective
    /// color map. A color that does not resolve becomes the configured
    /// substitute.
    pub fn apply_color_pipeline(&self, token: &ColorToken, modifiers: &[ColorModifier]) -> Rgba {
        transform::apply(token, modifiers, &self.color_context()).unwrap_or_else(|| self.options.unresolved_color())
    }

    /// Whether `partname` is one of this chain's parts.
    pub fn contains(&self, partname: &PackURI) -> bool {
        [&self.slide, &self.layout, &self.master]
            .into_iter()
            .flatten()
            .any(|p| p.partname() == partname)
            || self.theme.as_ref().is_some_and(|t| t.partname() == partname)
    }
}

/// Builds and caches scope chains for the parts of one package.
///
/// Parsed parts, themes and chains are cached behind `RwLock`s and shared as
/// `Arc`s, so one resolver can serve many slides concurrently.
pub struct ScopeResolver<S: PartSource> {
    package: Arc<S>,
    options: Arc<ResolverOptions>,
    images: Option<Arc<dyn ImageResolver>>,
    parts: RwLock<HashMap<PackURI, Arc<ScopePart>>>,
    themes: RwLock<HashMap<PackURI, Arc<ThemePart>>>,
    chains: RwLock<HashMap<PackURI, Arc<ScopeChain>>>,
    default_text_style: OnceLock<Option<Arc<ElementNode>>>,
}

impl<S: PartSource> ScopeResolver<S> {
    pub fn new(package: Arc<S>, options: ResolverOptions) -> Self {
        Self {
            package,
            options: Arc::new(options),
            images: None,
            parts: RwLock::new(HashMap::new()),
            themes: RwLock::new(HashMap::new()),
            chains: RwLock::new(HashMap::new()),
            default_text_style: OnceLock::new(),
        }
    }

    /// Builder: resolve picture fills through `images`.
    pub fn with_image_resolver(mut self, images: Arc<dyn ImageResolver>) -> Self {
        self.images = Some(images);
        self
    }

    #[inline]
    pub fn package(&self) -> &Arc<S> {
        &self.package
    }

    #[inline]
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Scope chain of a slide, layout or master part.
    ///
    /// Only the starting part must exist. A missing, unreadable or circular
    /// link further down stops the walk at that depth; the chain then holds
    /// what was reached and lookups fall back to defaults.
    #[tracing::instrument(level = "debug", skip(self, partname), fields(part = %partname))]
    pub fn resolve(&self, partname: &PackURI) -> Result<Arc<ScopeChain>> {
        if let Some(chain) = self.chains.read().get(partname) {
            return Ok(Arc::clone(chain));
        }

        let start = self.load_part(partname)?;
        let mut visited = HashSet::from([partname.clone()]);
        let mut slots: [Option<Arc<ScopePart>>; 3] = [None, None, None];
        let mut current = Some(start);
        let mut theme = None;

        while let Some(part) = current.take() {
            let level = part.level();
            let next = level.next();
            slots[level as usize] = Some(Arc::clone(&part));

            let Some((suffix, next_level)) = next else {
                break;
            };
            let Some(target) = self.follow(&part, suffix, &mut visited) else {
                break;
            };
            if next_level == ScopeLevel::Theme {
                theme = self.load_theme(&target).map_err(|e| log_missing(&target, &e)).ok();
                break;
            }
            current = match self.load_part(&target) {
                Ok(next) if next.level() == next_level => Some(next),
                Ok(next) => {
                    Fallback::MissingScopePart(format!(
                        "{} is a {:?}, expected a {:?}",
                        target,
                        next.level(),
                        next_level
                    ))
                    .log();
                    None
                },
                Err(e) => {
                    log_missing(&target, &e);
                    None
                },
            };
        }

        let [slide, layout, master] = slots;
        let color_maps = ColorMapChain {
            slide: slide.as_ref().and_then(|s| s.color_map_override()),
            layout: layout.as_ref().and_then(|l| l.color_map_override()),
            master: match master.as_ref().and_then(|m| m.base_color_map()) {
                Some(map) => map,
                None => {
                    Fallback::MissingScopePart(format!("base color map for {}", partname)).log();
                    ColorMap::default()
                },
            },
        };

        let chain = Arc::new(ScopeChain {
            slide,
            layout,
            master,
            theme,
            color_maps,
            default_text_style: self.default_text_style(),
            options: Arc::clone(&self.options),
            images: self.images.clone(),
        });
        self.chains.write().insert(partname.clone(), Arc::clone(&chain));
        Ok(chain)
    }

    /// Drop cached state for a re-parsed part, and every chain that used it.
    pub fn invalidate(&self, partname: &PackURI) {
        self.parts.write().remove(partname);
        self.themes.write().remove(partname);
        self.chains
            .write()
            .retain(|key, chain| key != partname && !chain.contains(partname));
    }

    /// Parse (or fetch from cache) a slide, layout or master part.
    pub fn load_part(&self, partname: &PackURI) -> Result<Arc<ScopePart>> {
        if let Some(part) = self.parts.read().get(partname) {
            return Ok(Arc::clone(part));
        }

        let root = self.parse_part(partname)?;
        let rels = RelationshipMap::load(self.package.as_ref(), partname)?;
        let part = Arc::new(ScopePart::from_node(partname.clone(), rels, root)?);
        self.parts.write().insert(partname.clone(), Arc::clone(&part));
        Ok(part)
    }

    /// Parse (or fetch from cache) a theme part.
    pub fn load_theme(&self, partname: &PackURI) -> Result<Arc<ThemePart>> {
        if let Some(theme) = self.themes.read().get(partname) {
            return Ok(Arc::clone(theme));
        }

        let root = self.parse_part(partname)?;
        let rels = RelationshipMap::load(self.package.as_ref(), partname)?;
        let theme = Arc::new(ThemePart::from_node(partname.clone(), rels, &root)?);
        self.themes.write().insert(partname.clone(), Arc::clone(&theme));
        Ok(theme)
    }

    fn parse_part(&self, partname: &PackURI) -> Result<ElementNode> {
        let bytes = self
            .package
            .read_part(partname)
            .ok_or_else(|| OoxmlError::PartNotFound(partname.to_string()))?;
        ElementNode::parse(bytes)
    }

    /// Target of `from`'s first relationship of type `suffix`, unless it was
    /// already visited.
    fn follow(&self, from: &ScopePart, suffix: &str, visited: &mut HashSet<PackURI>) -> Option<PackURI> {
        let Some(target) = from.rels().first_target_of_type(suffix) else {
            Fallback::MissingScopePart(format!("{} has no {} relationship", from.partname(), suffix)).log();
            return None;
        };
        if !visited.insert(target.clone()) {
            Fallback::CircularOrMissingRelationshipTarget(format!("{} -> {}", from.partname(), target)).log();
            return None;
        }
        Some(target.clone())
    }

    fn default_text_style(&self) -> Option<Arc<ElementNode>> {
        self.default_text_style
            .get_or_init(|| {
                let presentation = PackURI::new(PRESENTATION_URI).ok()?;
                let root = self
                    .parse_part(&presentation)
                    .map_err(|e| log_missing(&presentation, &e))
                    .ok()?;
                root.child("defaultTextStyle").cloned().map(Arc::new)
            })
            .clone()
    }
}

fn log_missing(partname: &PackURI, err: &OoxmlError) {
    Fallback::MissingScopePart(format!("{}: {}", partname, err)).log();
}
