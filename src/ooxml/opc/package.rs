//! Read-only access to pre-loaded package parts.
//!
//! The resolvers never perform I/O themselves. Container traversal and ZIP
//! decompression happen elsewhere; by the time slides are resolved every part
//! is an immutable in-memory buffer reachable through [`PartSource`].

use crate::ooxml::opc::packuri::PackURI;
use std::collections::HashMap;

/// Source of raw part bytes, keyed by partname.
///
/// Implementations must be safe for concurrent reads: a deck fans its slides
/// out across threads once all parts are loaded.
pub trait PartSource: Send + Sync {
    /// Raw bytes of a part, or `None` if the package has no such part.
    fn read_part(&self, partname: &PackURI) -> Option<&[u8]>;
}

/// In-memory package: a map from membername to part bytes.
///
/// # Examples
///
/// ```rust
/// use pptx_cascade::ooxml::opc::{MemoryPackage, PackURI, PartSource};
///
/// let package = MemoryPackage::new()
///     .with_part("ppt/slides/slide1.xml", b"<p:sld/>".to_vec());
/// let uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();
/// assert!(package.read_part(&uri).is_some());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryPackage {
    /// Part bytes keyed by membername (no leading slash)
    parts: HashMap<String, Vec<u8>>,
}

impl MemoryPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a part. A leading slash on `name` is optional.
    pub fn insert(&mut self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.parts
            .insert(name.trim_start_matches('/').to_string(), bytes.into());
    }

    /// Builder form of [`MemoryPackage::insert`].
    pub fn with_part(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Remove a part, returning its bytes.
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.parts.remove(name.trim_start_matches('/'))
    }

    /// Number of parts.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the package has no parts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl PartSource for MemoryPackage {
    fn read_part(&self, partname: &PackURI) -> Option<&[u8]> {
        self.parts.get(partname.membername()).map(Vec::as_slice)
    }
}

impl From<HashMap<String, Vec<u8>>> for MemoryPackage {
    fn from(files: HashMap<String, Vec<u8>>) -> Self {
        let mut package = Self::new();
        for (name, bytes) in files {
            package.insert(&name, bytes);
        }
        package
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_slash_is_optional() {
        let mut package = MemoryPackage::new();
        package.insert("/ppt/theme/theme1.xml", b"<a:theme/>".to_vec());
        let uri = PackURI::new("/ppt/theme/theme1.xml").unwrap();
        assert_eq!(package.read_part(&uri), Some(&b"<a:theme/>"[..]));
        assert_eq!(package.len(), 1);

        assert!(package.remove("ppt/theme/theme1.xml").is_some());
        assert!(package.read_part(&uri).is_none());
    }
}
