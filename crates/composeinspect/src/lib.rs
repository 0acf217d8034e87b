//! Inspector implementations
//!
//! [`DockerCli`] drives the `docker` binary; [`MemoryInspector`] serves
//! payloads held in memory.

mod docker;
mod matching;
mod memory;

pub use docker::DockerCli;
pub use matching::{select_container, select_index, ContainerSummary, SHORT_ID_LEN};
pub use memory::MemoryInspector;
