//! Error types for OOXML operations.
use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for OOXML operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Part has an unexpected root element
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Options could not be loaded
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OoxmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

/// Degraded-resolution taxonomy.
///
/// None of these ever escape a public resolver entry point. Each one is
/// logged through [`Fallback::log`] and replaced by the next-lower default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// A layout, master or theme part is absent or unreadable
    #[error("missing scope part: {0}")]
    MissingScopePart(String),

    /// A hex/HSL/preset value could not be parsed
    #[error("malformed color value: {0}")]
    MalformedColorValue(String),

    /// A recognized fill type or pattern that has no implementation
    #[error("unsupported fill or pattern: {0}")]
    UnsupportedFillOrPattern(String),

    /// A relationship points nowhere, or back to a part already visited
    #[error("circular or missing relationship target: {0}")]
    CircularOrMissingRelationshipTarget(String),
}

impl Fallback {
    /// Emit the fallback as a `tracing` debug event.
    pub fn log(&self) {
        tracing::debug!(reason = %self, "style resolution fell back to a default");
    }
}
