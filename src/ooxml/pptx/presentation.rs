//! Deck-level entry point: slide order plus per-slide fan-out.
use crate::ooxml::dom::ElementNode;
use crate::ooxml::drawings::fill::FillDescriptor;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::reltype_suffix;
use crate::ooxml::opc::packuri::PRESENTATION_URI;
use crate::ooxml::opc::{PackURI, PartSource, RelationshipMap};
use crate::ooxml::pptx::backgrounds;
use crate::ooxml::pptx::config::ResolverOptions;
use crate::ooxml::pptx::image::ImageResolver;
use crate::ooxml::pptx::scope::{ScopeChain, ScopeResolver};
use rayon::prelude::*;
use std::sync::Arc;

/// A presentation whose parts are all loaded in memory.
///
/// Slides share one [`ScopeResolver`], so layouts, masters and themes are
/// parsed once per deck however many slides use them.
///
/// # Examples
///
/// ```rust,no_run
/// use pptx_cascade::ooxml::opc::MemoryPackage;
/// use pptx_cascade::ooxml::pptx::{Presentation, ResolverOptions};
///
/// # let package = MemoryPackage::new();
/// let pres = Presentation::open(package, ResolverOptions::default())?;
/// for (slide, background) in pres.slides().iter().zip(pres.resolve_all()) {
///     println!("{}: {:?}", slide, background?);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Presentation<S: PartSource> {
    resolver: ScopeResolver<S>,
    rels: RelationshipMap,
    /// Slide part names in presentation order
    slides: Vec<PackURI>,
    /// `p:sldSz` in EMUs
    slide_size: Option<(i64, i64)>,
}

impl<S: PartSource> Presentation<S> {
    /// Read `/ppt/presentation.xml` and its relationships.
    pub fn open(package: S, options: ResolverOptions) -> Result<Self> {
        Self::from_shared(Arc::new(package), options)
    }

    /// Like [`Presentation::open`], for a package shared with other readers.
    pub fn from_shared(package: Arc<S>, options: ResolverOptions) -> Result<Self> {
        let partname = PackURI::new(PRESENTATION_URI).map_err(OoxmlError::InvalidFormat)?;
        let bytes = package
            .read_part(&partname)
            .ok_or_else(|| OoxmlError::PartNotFound(partname.to_string()))?;
        let root = ElementNode::parse(bytes)?;
        if root.tag() != "presentation" {
            return Err(OoxmlError::InvalidFormat(format!(
                "expected <p:presentation>, found <{}>",
                root.tag()
            )));
        }

        let rels = RelationshipMap::load(package.as_ref(), &partname)?;
        let slides = slide_order(&root, &rels);
        let slide_size = root
            .child("sldSz")
            .and_then(|sz| Some((sz.attr_i64("cx")?, sz.attr_i64("cy")?)));

        tracing::debug!(slides = slides.len(), "opened presentation");
        Ok(Self {
            resolver: ScopeResolver::new(package, options),
            rels,
            slides,
            slide_size,
        })
    }

    /// Builder: resolve picture fills through `images`.
    pub fn with_image_resolver(mut self, images: Arc<dyn ImageResolver>) -> Self {
        self.resolver = self.resolver.with_image_resolver(images);
        self
    }

    #[inline]
    pub fn slides(&self) -> &[PackURI] {
        &self.slides
    }

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide size in EMUs, when declared.
    #[inline]
    pub fn slide_size(&self) -> Option<(i64, i64)> {
        self.slide_size
    }

    /// Relationships of the presentation part.
    #[inline]
    pub fn rels(&self) -> &RelationshipMap {
        &self.rels
    }

    #[inline]
    pub fn resolver(&self) -> &ScopeResolver<S> {
        &self.resolver
    }

    #[inline]
    pub fn options(&self) -> &ResolverOptions {
        self.resolver.options()
    }

    /// Scope chain of a slide, layout or master.
    pub fn chain(&self, partname: &PackURI) -> Result<Arc<ScopeChain>> {
        self.resolver.resolve(partname)
    }

    /// Background of a slide.
    pub fn resolve_background(&self, slide: &PackURI) -> Result<FillDescriptor> {
        let chain = self.chain(slide)?;
        Ok(backgrounds::resolve_background(&chain))
    }

    /// Backgrounds of every slide, in presentation order.
    pub fn resolve_all(&self) -> Vec<Result<FillDescriptor>> {
        self.map_slides(backgrounds::resolve_background)
    }

    /// Run `f` on the scope chain of every slide, in presentation order.
    ///
    /// Each slide gets its own slot; a slide whose chain cannot be built
    /// yields an `Err` there without affecting the others. Decks at or above
    /// the configured threshold are resolved on the rayon pool.
    pub fn map_slides<T, F>(&self, f: F) -> Vec<Result<T>>
    where
        T: Send,
        F: Fn(&ScopeChain) -> T + Sync,
    {
        let options = self.options();
        let run = |slide: &PackURI| self.chain(slide).map(|chain| f(&chain));

        if options.use_parallel && self.slides.len() >= options.parallel_threshold {
            tracing::debug!(slides = self.slides.len(), "resolving slides in parallel");
            self.slides.par_iter().map(run).collect()
        } else {
            self.slides.iter().map(run).collect()
        }
    }

    /// Forget cached state for a re-parsed part.
    pub fn invalidate(&self, partname: &PackURI) {
        self.resolver.invalidate(partname);
    }
}

impl<S: PartSource> std::fmt::Debug for Presentation<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presentation")
            .field("slides", &self.slides)
            .field("slide_size", &self.slide_size)
            .finish()
    }
}

/// Slides listed in `p:sldIdLst`, or every `slide` relationship in document
/// order when the list is absent.
fn slide_order(root: &ElementNode, rels: &RelationshipMap) -> Vec<PackURI> {
    let listed: Vec<PackURI> = root
        .child("sldIdLst")
        .map(|list| {
            list.children_named("sldId")
                .filter_map(|id| {
                    let r_id = id.attr("r:id")?;
                    let target = rels.target_of(r_id);
                    if target.is_none() {
                        tracing::debug!(r_id, "slide id with no relationship target");
                    }
                    target.cloned()
                })
                .collect()
        })
        .unwrap_or_default();
    if !listed.is_empty() {
        return listed;
    }

    rels.iter()
        .filter(|rel| reltype_suffix(rel.reltype()) == "slide")
        .filter_map(|rel| rel.target().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Rgba;
    use crate::ooxml::opc::MemoryPackage;
    use crate::ooxml::pptx::fixtures::*;

    const SLIDE2: &str = "/ppt/slides/slide2.xml";

    fn deck_package(sld_id_lst: &str) -> MemoryPackage {
        let deck = Deck {
            slide: Some(slide(&solid_bg("FF0000"), "", "")),
            master: Some(master(&solid_bg("00FF00"), DEFAULT_CLR_MAP, "", "")),
            ..Deck::plain()
        };
        deck.package()
            .with_part(SLIDE2, slide("", "", ""))
            .with_part(
                "ppt/slides/_rels/slide2.xml.rels",
                rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            )
            .with_part(
                PRESENTATION_URI,
                format!(
                    r#"<p:presentation {NS}><p:sldIdLst>{sld_id_lst}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#
                ),
            )
            .with_part(
                "ppt/_rels/presentation.xml.rels",
                rels(&[
                    ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
                    ("rId2", "slide", "slides/slide1.xml"),
                    ("rId3", "slide", "slides/slide2.xml"),
                    ("rId4", "slide", "slides/slide3.xml"),
                ]),
            )
    }

    #[test]
    fn test_slide_order_follows_id_list() {
        let package = deck_package(r#"<p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId2"/>"#);
        let pres = Presentation::open(package, ResolverOptions::default()).unwrap();
        let names: Vec<&str> = pres.slides().iter().map(PackURI::as_str).collect();
        assert_eq!(names, [SLIDE2, SLIDE]);
        assert_eq!(pres.slide_size(), Some((12_192_000, 6_858_000)));
    }

    #[test]
    fn test_slide_order_falls_back_to_rels() {
        let pres = Presentation::open(deck_package(""), ResolverOptions::default()).unwrap();
        let names: Vec<&str> = pres.slides().iter().map(PackURI::as_str).collect();
        assert_eq!(names, [SLIDE, SLIDE2, "/ppt/slides/slide3.xml"]);
    }

    #[test]
    fn test_resolve_all_isolates_failures() {
        let ids = r#"<p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId4"/><p:sldId id="258" r:id="rId3"/>"#;
        for options in [
            ResolverOptions::default().with_parallel(false),
            ResolverOptions::default().with_parallel_threshold(1),
        ] {
            let pres = Presentation::open(deck_package(ids), options).unwrap();
            let results = pres.resolve_all();
            assert_eq!(results.len(), 3);
            assert_eq!(
                results[0].as_ref().unwrap().solid_color(),
                Rgba::from_hex("FF0000")
            );
            assert!(matches!(results[1], Err(OoxmlError::PartNotFound(_))));
            // Slide 2 has no background of its own and inherits the master's.
            assert_eq!(
                results[2].as_ref().unwrap().solid_color(),
                Rgba::from_hex("00FF00")
            );
        }
    }

    #[test]
    fn test_layouts_are_shared_between_slides() {
        let ids = r#"<p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/>"#;
        let pres = Presentation::open(deck_package(ids), ResolverOptions::default()).unwrap();
        let first = pres.chain(&pres.slides()[0]).unwrap();
        let second = pres.chain(&pres.slides()[1]).unwrap();
        assert!(std::ptr::eq(first.layout().unwrap(), second.layout().unwrap()));
    }

    #[test]
    fn test_invalidate_rebuilds_chain() {
        let pres = Presentation::open(deck_package(""), ResolverOptions::default()).unwrap();
        let slide = pres.slides()[0].clone();
        let before = pres.chain(&slide).unwrap();
        pres.invalidate(&slide);
        let after = pres.chain(&slide).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(
            pres.resolve_background(&slide).unwrap().solid_color(),
            Rgba::from_hex("FF0000")
        );
    }

    #[test]
    fn test_open_requires_presentation_part() {
        assert!(matches!(
            Presentation::open(MemoryPackage::new(), ResolverOptions::default()),
            Err(OoxmlError::PartNotFound(_))
        ));

        let wrong_root = MemoryPackage::new().with_part(PRESENTATION_URI, "<sld/>");
        assert!(matches!(
            Presentation::open(wrong_root, ResolverOptions::default()),
            Err(OoxmlError::InvalidFormat(_))
        ));
    }
}
