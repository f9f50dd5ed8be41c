//! Common types shared across the resolvers.
//!
//! This module provides the color value types used by the DrawingML color
//! pipeline and every PresentationML resolver built on top of it.

// Submodule declarations
pub mod style;

// Re-exports for convenience
pub use style::{Hsla, Rgba};
