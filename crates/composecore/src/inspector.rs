use crate::{InspectError, RawAttributes};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read-only view of a container engine
#[async_trait]
pub trait Inspector: Send + Sync {
    /// Look up a live container by name or id and return its inspect payload.
    ///
    /// Fails with [`InspectError::NotFound`] naming `identifier` when nothing
    /// matches.
    async fn find_container(&self, identifier: &str) -> Result<RawAttributes, InspectError>;

    /// Every network the engine knows about.
    async fn list_networks(&self) -> Result<Vec<NetworkSummary>, InspectError>;
}

/// Network as listed by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Internal", default)]
    pub internal: bool,
}

impl NetworkSummary {
    pub fn new(name: impl Into<String>, internal: bool) -> Self {
        Self {
            name: name.into(),
            internal,
        }
    }
}
