//! Compose generation runtime
//!
//! This crate turns inspect payloads into compose documents: the field
//! table, the attribute mapper, the document assembler, the YAML emitter
//! and the [`Composer`] pipeline that drives an [`composecore::Inspector`].

mod assembler;
mod emitter;
mod mapper;
mod registry;
mod runtime;
mod transform;

pub use assembler::{resolve_networks, DocumentAssembler};
pub use emitter::{to_yaml, EmitterConfig};
pub use mapper::{map_attributes, AttributeMapper, REQUIRED_SECTIONS};
pub use registry::{FieldRegistry, FieldSpec};
pub use runtime::{Composer, ComposerConfig};
pub use transform::{format_binding, parse_link, port_fields, PortFields, Transform};
