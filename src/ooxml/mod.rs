//! Office Open XML (OOXML) style resolution for presentations.
//!
//! The module is organized into several layers:
//!
//! 1. **OPC Layer** (`opc`): part names, relationships and part access
//! 2. **Element tree** (`dom`): parsed XML parts with typed accessors
//! 3. **DrawingML** (`drawings`): colors, color transforms and fills
//! 4. **PresentationML** (`pptx`): scope chains, backgrounds, text styles
//!
//! # Example
//!
//! ```rust
//! use pptx_cascade::ooxml::opc::{MemoryPackage, PackURI};
//! use pptx_cascade::ooxml::pptx::{ResolverOptions, ScopeResolver, resolve_background};
//! use std::sync::Arc;
//!
//! let package = MemoryPackage::new().with_part(
//!     "ppt/slides/slide1.xml",
//!     r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"
//!               xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
//!          <p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></p:bgPr></p:bg></p:cSld>
//!        </p:sld>"#,
//! );
//! let resolver = ScopeResolver::new(Arc::new(package), ResolverOptions::default());
//! let chain = resolver.resolve(&PackURI::new("/ppt/slides/slide1.xml")?)?;
//! assert_eq!(resolve_background(&chain).solid_color().map(|c| c.to_hex()), Some("FF0000".into()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod dom;
pub mod drawings;
pub mod error;
pub mod opc;
pub mod pptx;

// Re-export commonly used types from OPC layer
pub use opc::{MemoryPackage, PackURI, PartSource};

// Re-export error types
pub use error::{Fallback, OoxmlError, Result};
