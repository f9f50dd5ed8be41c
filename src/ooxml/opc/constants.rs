//! Constant values related to the Open Packaging Convention.
//!
//! This module contains the target modes, relationship types and image content
//! types the scope walk and image resolution depend on.

/// Image content types, keyed by what the `ImageResolver` emits in data URIs
pub mod content_type {
    pub const BMP: &str = "image/bmp";
    pub const GIF: &str = "image/gif";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";
    pub const SVG: &str = "image/svg+xml";
    pub const TIFF: &str = "image/tiff";
    pub const X_EMF: &str = "image/x-emf";
    pub const X_WMF: &str = "image/x-wmf";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Target mode values for relationships
pub mod target_mode {
    pub const INTERNAL: &str = "Internal";
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs used in presentation packages.
///
/// Lookups compare only the final path segment (see [`reltype_suffix`]) so the
/// strict (`purl.oclc.org`) namespace variants resolve the same way.
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// Final path segment of a relationship type URI (`slideLayout` for the layout type).
#[inline]
pub fn reltype_suffix(reltype: &str) -> &str {
    reltype.rsplit('/').next().unwrap_or(reltype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reltype_suffix() {
        assert_eq!(reltype_suffix(relationship_type::SLIDE_LAYOUT), "slideLayout");
        assert_eq!(
            reltype_suffix("http://purl.oclc.org/ooxml/officeDocument/relationships/theme"),
            "theme"
        );
        assert_eq!(reltype_suffix("theme"), "theme");
    }
}
