//! pptx-cascade - style and fill resolution for PowerPoint presentations
//!
//! Every visual property of a slide may come from the slide itself, its
//! layout, the layout's master or the master's theme. This library resolves
//! which scope supplies the final value, for backgrounds, fills, colors and
//! placeholder text styles.
//!
//! # Features
//!
//! - **Scope chains**: slide → layout → master → theme, with color map overrides
//! - **Color pipeline**: scheme, preset, system and HSL colors with ordered
//!   alpha/hue/luminance/saturation/shade/tint modifiers
//! - **Fills**: solid, gradient, pattern and picture fills, including theme
//!   background fill style references
//! - **Text styles**: the placeholder cascade from layout and master list styles
//! - **Deck fan-out**: slides resolved concurrently over shared, parsed-once parts
//!
//! Package I/O is out of scope: callers hand in pre-loaded parts through
//! [`ooxml::opc::PartSource`].
//!
//! # Example
//!
//! ```no_run
//! use pptx_cascade::ooxml::opc::MemoryPackage;
//! use pptx_cascade::ooxml::pptx::{Presentation, ResolverOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let package = MemoryPackage::new();
//! let pres = Presentation::open(package, ResolverOptions::default())?;
//! for background in pres.resolve_all() {
//!     println!("{:?}", background?);
//! }
//! # Ok(())
//! # }
//! ```

/// Color value types shared by every resolver
pub mod common;

/// OOXML (Office Open XML) parsing and style resolution
///
/// This module provides the package, DrawingML and PresentationML layers.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use common::{Hsla, Rgba};
pub use ooxml::{OoxmlError, Result};
