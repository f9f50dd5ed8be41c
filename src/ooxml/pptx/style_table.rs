//! Caller-owned CSS class registry.
//!
//! Each deck load owns one [`StyleTable`]. Identical declaration blocks share
//! a class name, and names are only unique within their table.

use crate::ooxml::pptx::text_style::ResolvedTextStyle;
use std::collections::HashMap;

/// Prefix of generated class names.
pub const CLASS_PREFIX: &str = "_css_";

/// Interns CSS declaration blocks as stable class names (`_css_0`, `_css_1`, ...).
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    /// Declaration block to position in `entries`
    index: HashMap<String, usize>,
    /// `(class name, declarations)` in first-use order
    entries: Vec<(String, String)>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Class name for a declaration block, registering it on first use.
    ///
    /// Returns `None` for an empty block.
    pub fn class_for(&mut self, declarations: &str) -> Option<&str> {
        let declarations = declarations.trim();
        if declarations.is_empty() {
            return None;
        }

        let pos = match self.index.get(declarations) {
            Some(&pos) => pos,
            None => {
                let pos = self.entries.len();
                self.entries
                    .push((format!("{}{}", CLASS_PREFIX, pos), declarations.to_string()));
                self.index.insert(declarations.to_string(), pos);
                pos
            },
        };
        Some(self.entries[pos].0.as_str())
    }

    /// Class name for a resolved text style.
    pub fn class_for_style(&mut self, style: &ResolvedTextStyle) -> Option<&str> {
        self.class_for(&style.to_css())
    }

    /// Declarations registered under `class`.
    pub fn declarations(&self, class: &str) -> Option<&str> {
        let pos: usize = class.strip_prefix(CLASS_PREFIX)?.parse().ok()?;
        self.entries
            .get(pos)
            .filter(|(name, _)| name == class)
            .map(|(_, declarations)| declarations.as_str())
    }

    /// `(class name, declarations)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, css)| (name.as_str(), css.as_str()))
    }

    /// Render every class as a stylesheet, one rule per line.
    pub fn to_stylesheet(&self) -> String {
        let mut sheet = String::new();
        for (name, css) in self.iter() {
            sheet.push('.');
            sheet.push_str(name);
            sheet.push('{');
            sheet.push_str(css);
            sheet.push_str("}\n");
        }
        sheet
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
