//! PowerPoint (.pptx) style and fill resolution.
//!
//! A slide inherits formatting from its layout, the layout's master and the
//! master's theme. This module walks that chain and resolves what a slide
//! actually shows:
//!
//! - `scope`: the slide → layout → master → theme walk and color map chain
//! - `backgrounds`: slide backgrounds and fill-bearing nodes
//! - `text_style`: the placeholder text style cascade
//! - `presentation`: slide order and deck-wide fan-out
//!
//! # Example
//!
//! ```rust,no_run
//! use pptx_cascade::ooxml::opc::MemoryPackage;
//! use pptx_cascade::ooxml::pptx::{
//!     PlaceholderId, PlaceholderType, Presentation, ResolverOptions, StyleTable,
//!     resolve_placeholder_style,
//! };
//!
//! # let package = MemoryPackage::new();
//! let pres = Presentation::open(package, ResolverOptions::default())?;
//! let mut styles = StyleTable::new();
//! for slide in pres.slides() {
//!     let chain = pres.chain(slide)?;
//!     let title = resolve_placeholder_style(&PlaceholderId::new(PlaceholderType::Title), 1, &chain);
//!     println!("{} -> {:?}", slide, styles.class_for_style(&title));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backgrounds;
pub mod config;
pub mod image;
pub mod parts;
pub mod placeholder;
pub mod presentation;
pub mod scope;
pub mod style_table;
pub mod text_style;

#[cfg(test)]
pub(crate) mod fixtures;

pub use backgrounds::{default_background, resolve_background, resolve_fill_node, resolve_fill_node_in};
pub use config::ResolverOptions;
pub use image::{DataUriImageResolver, ImageFormat, ImageResolver, PartImageResolver};
pub use parts::{Theme, ThemeFont, ThemePart};
pub use placeholder::{PlaceholderId, PlaceholderIndex, PlaceholderSize, PlaceholderType};
pub use presentation::Presentation;
pub use scope::{ColorMapChain, ScopeChain, ScopeLevel, ScopePart, ScopeResolver};
pub use style_table::StyleTable;
pub use text_style::{ResolvedTextStyle, TextAlign, paragraph_level, resolve_placeholder_style, resolve_run_style};
