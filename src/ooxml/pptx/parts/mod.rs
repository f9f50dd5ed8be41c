//! Parts for PowerPoint presentation documents.
//!
//! Slides, layouts and masters are wrapped generically by
//! [`ScopePart`](crate::ooxml::pptx::scope::ScopePart); only the theme has a
//! dedicated part type.
pub mod theme;

pub use theme::{Theme, ThemeFont, ThemePart};
