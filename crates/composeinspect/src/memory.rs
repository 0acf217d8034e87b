use crate::matching::{select_index, ContainerSummary};
use async_trait::async_trait;
use composecore::{InspectError, Inspector, NetworkSummary, RawAttributes};

/// Inspector serving inspect payloads held in memory.
///
/// Containers are matched by their `Name` and `Id` attributes with the same
/// rules as [`crate::DockerCli`].
#[derive(Debug, Clone, Default)]
pub struct MemoryInspector {
    containers: Vec<RawAttributes>,
    networks: Vec<NetworkSummary>,
}

impl MemoryInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, attributes: impl Into<RawAttributes>) -> Self {
        self.containers.push(attributes.into());
        self
    }

    pub fn with_network(mut self, name: impl Into<String>, internal: bool) -> Self {
        self.networks.push(NetworkSummary::new(name, internal));
        self
    }

    fn summaries(&self) -> Vec<ContainerSummary> {
        self.containers
            .iter()
            .map(|attributes| {
                ContainerSummary::new(
                    attributes.id().unwrap_or_default(),
                    attributes.name().map(str::to_string).into_iter().collect(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl Inspector for MemoryInspector {
    async fn find_container(&self, identifier: &str) -> Result<RawAttributes, InspectError> {
        let summaries = self.summaries();
        let index = select_index(identifier, &summaries)
            .ok_or_else(|| InspectError::NotFound(identifier.to_string()))?;
        Ok(self.containers[index].clone())
    }

    async fn list_networks(&self) -> Result<Vec<NetworkSummary>, InspectError> {
        Ok(self.networks.clone())
    }
}
