//! Open Packaging Conventions (OPC) support.
//!
//! This module provides the package-level pieces the style resolvers need:
//!
//! - Part names and relative-reference resolution (`PackURI`)
//! - Relationship type constants
//! - Per-part relationship registries (`RelationshipMap`)
//! - Read-only access to pre-loaded parts (`PartSource`, `MemoryPackage`)
//!
//! # Performance Features
//!
//! - Uses `quick-xml` for efficient streaming parsing of `.rels` files
//! - Relationship lookups are O(1) by id and keep document order

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod rel;

// Re-export commonly used types
pub use package::{MemoryPackage, PartSource};
pub use packuri::PackURI;
pub use rel::{RelationshipEntry, RelationshipMap};
