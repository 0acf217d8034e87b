//! Core types for compose generation
//!
//! This crate holds the error taxonomy, the nested-value helpers used to
//! read inspect payloads, the document model and the `Inspector` seam.
//! It does not talk to a container engine itself.

mod document;
mod error;
mod inspector;
mod value;

pub use document::{
    ComposeDocument, ComposeVersion, FieldMapping, NetworkDefinition, ServiceDefinition,
};
pub use error::{ComposeError, InspectError, MappingError};
pub use inspector::{Inspector, NetworkSummary};
pub use value::{is_valid, strip_separator, Mapping, RawAttributes, ValueExt, SENTINELS};

/// Result type for compose operations
pub type Result<T> = std::result::Result<T, ComposeError>;
