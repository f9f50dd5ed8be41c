//! DrawingML (DML) support for OOXML documents.
//!
//! DrawingML defines the color and fill vocabulary shared by slides,
//! layouts, masters and themes. This module provides:
//!
//! - Color choices and modifiers (`color`), preset and system colors (`preset`)
//! - Scheme colors, color maps and theme color tables (`scheme`)
//! - The color transform pipeline (`transform`)
//! - Fill classification and resolution (`fill`, `pattern`)

pub mod color;
pub mod fill;
pub mod pattern;
pub mod preset;
pub mod scheme;
pub mod transform;

pub use color::{ColorModifier, ColorSpec, ColorToken, ModifierKind};
pub use fill::{
    FillContext, FillDescriptor, GradientStop, GradientType, ImageRef, PictureFill, PicturePlacement,
    RelativeRect,
};
pub use pattern::{PatternGeometry, PatternType};
pub use scheme::{ColorMap, MappedSlot, SchemeColor, ThemeColorTable, ThemeSlot};
pub use transform::{ColorContext, apply_modifiers};
