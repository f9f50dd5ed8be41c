//! Image references for picture fills.
//!
//! Picture fills name their image by relationship id. An [`ImageResolver`]
//! turns that id, together with the relationship map of the part that owns
//! the fill, into an [`ImageRef`]. Resolution never decodes image bytes.

use crate::ooxml::drawings::fill::ImageRef;
use crate::ooxml::opc::constants::content_type;
use crate::ooxml::opc::{PackURI, PartSource, RelationshipMap};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Image format types found in presentation packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Svg,
    Emf,
    Wmf,
}

impl ImageFormat {
    /// Get the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => content_type::PNG,
            Self::Jpeg => content_type::JPEG,
            Self::Gif => content_type::GIF,
            Self::Bmp => content_type::BMP,
            Self::Tiff => content_type::TIFF,
            Self::Svg => content_type::SVG,
            Self::Emf => content_type::X_EMF,
            Self::Wmf => content_type::X_WMF,
        }
    }

    /// Detect image format from bytes (magic number detection).
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF: 47 49 46 38 (GIF8)
        if bytes.starts_with(b"GIF8") {
            return Some(Self::Gif);
        }

        // BMP: 42 4D (BM)
        if bytes.starts_with(b"BM") {
            return Some(Self::Bmp);
        }

        // TIFF: little- or big-endian byte order mark
        if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) {
            return Some(Self::Tiff);
        }

        // EMF: record type 1 followed by " EMF" at offset 40
        if bytes.len() >= 44 && bytes.starts_with(&[0x01, 0x00, 0x00, 0x00]) && &bytes[40..44] == b" EMF" {
            return Some(Self::Emf);
        }

        // Placeable WMF
        if bytes.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
            return Some(Self::Wmf);
        }

        None
    }

    /// Guess the format from a part's extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" | "jpe" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" | "dib" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "svg" => Some(Self::Svg),
            "emf" => Some(Self::Emf),
            "wmf" => Some(Self::Wmf),
            _ => None,
        }
    }
}

/// Turns a blip relationship id into a displayable image reference.
///
/// `rels` is the relationship map of the part that owns the fill. Implementations
/// are shared across the slides of a deck and must tolerate concurrent calls.
pub trait ImageResolver: Send + Sync {
    fn resolve_image(&self, r_id: &str, rels: &RelationshipMap) -> Option<ImageRef>;
}

/// Resolves to the target part name, or the external target as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartImageResolver;

impl ImageResolver for PartImageResolver {
    fn resolve_image(&self, r_id: &str, rels: &RelationshipMap) -> Option<ImageRef> {
        let rel = rels.get(r_id)?;
        Some(match rel.target() {
            Some(target) => ImageRef::Part(target.clone()),
            None => ImageRef::External(rel.target_ref().to_string()),
        })
    }
}

/// Inlines image parts as base64 data URIs.
///
/// Results are cached per (owning part, relationship id) for the lifetime of
/// the resolver, so an image referenced from many slides of one layout is
/// encoded once.
pub struct DataUriImageResolver<S: PartSource> {
    package: Arc<S>,
    cache: RwLock<HashMap<(PackURI, String), Option<ImageRef>>>,
}

impl<S: PartSource> DataUriImageResolver<S> {
    pub fn new(package: Arc<S>) -> Self {
        Self {
            package,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached lookups.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    fn encode(&self, target: &PackURI) -> Option<ImageRef> {
        let bytes = self.package.read_part(target)?;
        let format = ImageFormat::detect_from_bytes(bytes).or_else(|| ImageFormat::from_extension(target.ext()));
        let mime = format.map_or(content_type::OCTET_STREAM, |f| f.mime_type());
        let uri = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
        Some(ImageRef::DataUri(Arc::from(uri)))
    }
}

impl<S: PartSource> ImageResolver for DataUriImageResolver<S> {
    fn resolve_image(&self, r_id: &str, rels: &RelationshipMap) -> Option<ImageRef> {
        let key = (rels.source().clone(), r_id.to_string());
        if let Some(cached) = self.cache.read().get(&key) {
            return cached.clone();
        }

        let rel = rels.get(r_id)?;
        let resolved = match rel.target() {
            Some(target) => self.encode(target),
            None => Some(ImageRef::External(rel.target_ref().to_string())),
        };

        self.cache.write().insert(key, resolved.clone());
        resolved
    }
}

impl<S: PartSource> std::fmt::Debug for DataUriImageResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataUriImageResolver")
            .field("cached", &self.cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::MemoryPackage;

    const SLIDE_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="https://example.com/a.png" TargetMode="External"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/missing.png"/>
</Relationships>"#;

    fn rels() -> RelationshipMap {
        RelationshipMap::from_xml(SLIDE_RELS.as_bytes(), PackURI::new("/ppt/slides/slide1.xml").unwrap()).unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect_from_bytes(b"xx"), None);
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn test_part_resolver() {
        let rels = rels();
        assert_eq!(
            PartImageResolver.resolve_image("rId2", &rels),
            Some(ImageRef::Part(PackURI::new("/ppt/media/image1.png").unwrap()))
        );
        assert_eq!(
            PartImageResolver.resolve_image("rId3", &rels),
            Some(ImageRef::External("https://example.com/a.png".to_string()))
        );
        assert_eq!(PartImageResolver.resolve_image("rId9", &rels), None);
    }

    #[test]
    fn test_data_uri_resolver_caches() {
        let package = MemoryPackage::new().with_part("ppt/media/image1.png", vec![0x89, 0x50, 0x4E, 0x47]);
        let resolver = DataUriImageResolver::new(Arc::new(package));
        let rels = rels();

        let first = resolver.resolve_image("rId2", &rels);
        assert_eq!(
            first,
            Some(ImageRef::DataUri(Arc::from("data:image/png;base64,iVBORw==")))
        );
        assert_eq!(resolver.resolve_image("rId2", &rels), first);
        assert_eq!(resolver.cached(), 1);

        assert_eq!(resolver.resolve_image("rId4", &rels), None);
        assert_eq!(resolver.cached(), 2);
    }
}
