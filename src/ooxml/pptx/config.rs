//! Options that control style and fill resolution.
//!
//! Every default a resolver falls back to lives here, so callers can change
//! them without touching resolution code.
use crate::common::Rgba;
use crate::ooxml::error::{OoxmlError, Result};
use serde::{Deserialize, Serialize};

/// Resolver configuration.
///
/// Colors are written as hex strings (`"FFFFFF"` or `"#FFFFFF"`), font sizes
/// in px.
///
/// # Examples
///
/// ```rust
/// use pptx_cascade::ooxml::pptx::ResolverOptions;
///
/// let options = ResolverOptions::new()
///     .with_title_font_size(40.0)
///     .with_parallel_threshold(4);
/// assert_eq!(options.body_font_size, 18.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Background when no scope defines one
    pub default_background: String,
    /// Substitute for scheme colors that do not resolve
    pub unresolved_scheme_color: String,
    /// Font size for title-class placeholders
    pub title_font_size: f64,
    /// Font size for body-class placeholders
    pub body_font_size: f64,
    /// Font size for everything else
    pub other_font_size: f64,
    /// Font size for placeholders declared `sz="quarter"`
    pub quarter_font_size: f64,
    /// Font size for placeholders declared `sz="half"`
    pub half_font_size: f64,
    /// Font size for placeholders declared `sz="full"`
    pub full_font_size: f64,
    /// Whether decks may resolve slides on the rayon pool
    pub use_parallel: bool,
    /// Minimum slide count before resolution goes parallel
    pub parallel_threshold: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            default_background: "FFFFFF".to_string(),
            unresolved_scheme_color: "FFFFFF".to_string(),
            title_font_size: 44.0,
            body_font_size: 18.0,
            other_font_size: 14.0,
            quarter_font_size: 40.0,
            half_font_size: 32.0,
            full_font_size: 24.0,
            use_parallel: true,
            parallel_threshold: 10,
        }
    }
}

impl ResolverOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from YAML. Missing keys keep their defaults.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pptx_cascade::ooxml::pptx::ResolverOptions;
    ///
    /// let options = ResolverOptions::from_yaml("title_font_size: 40\n").unwrap();
    /// assert_eq!(options.title_font_size, 40.0);
    /// assert_eq!(options.other_font_size, 14.0);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let options: Self =
            serde_saphyr::from_str(yaml).map_err(|e| OoxmlError::InvalidOptions(e.to_string()))?;
        for (name, value) in [
            ("default_background", &options.default_background),
            ("unresolved_scheme_color", &options.unresolved_scheme_color),
        ] {
            if Rgba::from_hex(value).is_none() {
                return Err(OoxmlError::InvalidOptions(format!("{name}: \"{value}\" is not a hex color")));
            }
        }
        Ok(options)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| OoxmlError::InvalidOptions(e.to_string()))
    }

    /// Set the default background color.
    #[inline]
    pub fn with_default_background(mut self, color: Rgba) -> Self {
        self.default_background = color.to_hex();
        self
    }

    /// Set the substitute for unresolvable scheme colors.
    #[inline]
    pub fn with_unresolved_scheme_color(mut self, color: Rgba) -> Self {
        self.unresolved_scheme_color = color.to_hex();
        self
    }

    #[inline]
    pub fn with_title_font_size(mut self, px: f64) -> Self {
        self.title_font_size = px;
        self
    }

    #[inline]
    pub fn with_body_font_size(mut self, px: f64) -> Self {
        self.body_font_size = px;
        self
    }

    #[inline]
    pub fn with_other_font_size(mut self, px: f64) -> Self {
        self.other_font_size = px;
        self
    }

    /// Set the quarter/half/full declared-size font sizes.
    #[inline]
    pub fn with_declared_sizes(mut self, quarter: f64, half: f64, full: f64) -> Self {
        self.quarter_font_size = quarter;
        self.half_font_size = half;
        self.full_font_size = full;
        self
    }

    #[inline]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.use_parallel = enabled;
        self
    }

    #[inline]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Default background as a color. Invalid values read as white.
    pub fn default_background_color(&self) -> Rgba {
        Rgba::from_hex(&self.default_background).unwrap_or(Rgba::WHITE)
    }

    /// Unresolved scheme color substitute. Invalid values read as white.
    pub fn unresolved_color(&self) -> Rgba {
        Rgba::from_hex(&self.unresolved_scheme_color).unwrap_or(Rgba::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ResolverOptions::default();
        assert_eq!(options.default_background_color(), Rgba::WHITE);
        assert_eq!(options.unresolved_color(), Rgba::WHITE);
        assert_eq!(
            (options.title_font_size, options.body_font_size, options.other_font_size),
            (44.0, 18.0, 14.0)
        );
        assert_eq!(
            (options.quarter_font_size, options.half_font_size, options.full_font_size),
            (40.0, 32.0, 24.0)
        );
    }

    #[test]
    fn test_builders() {
        let options = ResolverOptions::new()
            .with_default_background(Rgba::BLACK)
            .with_declared_sizes(30.0, 20.0, 10.0)
            .with_parallel(false);
        assert_eq!(options.default_background, "000000");
        assert_eq!(options.default_background_color(), Rgba::BLACK);
        assert_eq!(options.half_font_size, 20.0);
        assert!(!options.use_parallel);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = "default_background: \"#102030\"\nbody_font_size: 20\nparallel_threshold: 2\n";
        let options = ResolverOptions::from_yaml(yaml).unwrap();
        assert_eq!(options.default_background_color(), Rgba::rgb(0x10, 0x20, 0x30));
        assert_eq!(options.body_font_size, 20.0);
        assert_eq!(options.parallel_threshold, 2);
        assert_eq!(options.title_font_size, 44.0);
    }

    #[test]
    fn test_from_yaml_rejects_bad_color() {
        assert!(matches!(
            ResolverOptions::from_yaml("unresolved_scheme_color: nope\n"),
            Err(OoxmlError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let options = ResolverOptions::new().with_other_font_size(12.0);
        let yaml = options.to_yaml().unwrap();
        assert_eq!(ResolverOptions::from_yaml(&yaml).unwrap(), options);
    }
}
