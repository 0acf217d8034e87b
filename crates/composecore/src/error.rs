use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error(transparent)]
    Inspect(#[from] InspectError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("Unsupported compose version: {0} (expected 1 or 3)")]
    UnsupportedVersion(String),

    #[error("Failed to render YAML: {0}")]
    Render(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("No running container matches '{0}'")]
    NotFound(String),

    #[error("`{command}` failed: {stderr}")]
    Engine { command: String, stderr: String },

    #[error("Unexpected engine output: {0}")]
    Malformed(String),

    #[error("Engine call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse engine output: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Missing required attribute: {0}")]
    MissingPath(String),
}
