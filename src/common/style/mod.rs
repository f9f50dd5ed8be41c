//! Common style and formatting types.
//!
//! This module provides the color value types shared by every resolver.

// Submodule declarations
pub mod color;

// Re-exports
pub use color::{Hsla, Rgba};
