use crate::matching::{select_container, ContainerSummary};
use async_trait::async_trait;
use composecore::{InspectError, Inspector, NetworkSummary, RawAttributes};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Inspector backed by the `docker` command line client
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
}

impl DockerCli {
    pub fn new() -> Self {
        Self::with_binary("docker")
    }

    /// Use a specific client binary instead of `docker` from `PATH`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run the client and return stdout, failing on a non-zero exit.
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, InspectError> {
        let command = format!("{} {}", self.binary.display(), args.join(" "));
        tracing::debug!("Running {}", command);

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(InspectError::Engine { command, stderr });
        }
        Ok(output.stdout)
    }

    /// Running containers with their full ids and names.
    pub async fn list_containers(&self) -> Result<Vec<ContainerSummary>, InspectError> {
        let stdout = self
            .run(&["ps", "--no-trunc", "--format", "{{.ID}}\t{{.Names}}"])
            .await?;
        Ok(parse_container_list(&String::from_utf8_lossy(&stdout)))
    }

    /// Inspect payload of a single container id.
    pub async fn inspect(&self, id: &str) -> Result<RawAttributes, InspectError> {
        let stdout = self.run(&["inspect", "--type", "container", id]).await?;
        let mut payloads: Vec<RawAttributes> = serde_json::from_slice(&stdout)?;
        if payloads.is_empty() {
            return Err(InspectError::Malformed(format!("empty inspect result for {id}")));
        }
        Ok(payloads.swap_remove(0))
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Inspector for DockerCli {
    async fn find_container(&self, identifier: &str) -> Result<RawAttributes, InspectError> {
        let containers = self.list_containers().await?;
        let container = select_container(identifier, &containers)
            .ok_or_else(|| InspectError::NotFound(identifier.to_string()))?;

        tracing::debug!("'{}' resolved to {}", identifier, container.short_id());
        self.inspect(&container.id).await
    }

    async fn list_networks(&self) -> Result<Vec<NetworkSummary>, InspectError> {
        let stdout = self.run(&["network", "ls", "-q", "--no-trunc"]).await?;
        let listing = String::from_utf8_lossy(&stdout);
        let ids: Vec<&str> = listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec!["network", "inspect"];
        args.extend(ids);
        let stdout = self.run(&args).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }
}

/// Parse `ID<TAB>name1,name2` lines from `docker ps`.
pub(crate) fn parse_container_list(output: &str) -> Vec<ContainerSummary> {
    output
        .lines()
        .filter_map(|line| {
            let (id, names) = line.trim().split_once('\t')?;
            let names = names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            Some(ContainerSummary::new(id.trim(), names))
        })
        .collect()
}
