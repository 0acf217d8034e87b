use crate::{to_yaml, AttributeMapper, DocumentAssembler, EmitterConfig, FieldRegistry};
use composecore::{ComposeDocument, ComposeError, ComposeVersion, InspectError, Inspector};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout, Duration};

/// Drives an [`Inspector`] through mapping, assembly and rendering
pub struct Composer {
    inspector: Arc<dyn Inspector>,
    mapper: AttributeMapper,
    config: ComposerConfig,
}

impl Composer {
    /// Create a composer with default settings
    pub fn new(inspector: Arc<dyn Inspector>) -> Self {
        Self::with_config(inspector, ComposerConfig::default())
    }

    pub fn with_config(inspector: Arc<dyn Inspector>, config: ComposerConfig) -> Self {
        Self::with_registry(inspector, FieldRegistry::standard(), config)
    }

    /// Create a composer with a custom field table
    pub fn with_registry(
        inspector: Arc<dyn Inspector>,
        registry: FieldRegistry,
        config: ComposerConfig,
    ) -> Self {
        Self {
            inspector,
            mapper: AttributeMapper::new(registry),
            config,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Inspect every identifier in turn and assemble one document.
    ///
    /// The first failed lookup aborts the whole batch.
    pub async fn compose<S: AsRef<str>>(
        &self,
        identifiers: &[S],
    ) -> Result<ComposeDocument, ComposeError> {
        let mut assembler = DocumentAssembler::new(self.config.version);

        for identifier in identifiers {
            let identifier = identifier.as_ref();
            tracing::info!("Inspecting container: {}", identifier);

            let raw = self
                .bounded(self.inspector.find_container(identifier))
                .await?;
            let service = self.mapper.service(&raw)?;
            assembler.add_service(service);
        }

        let networks = if self.config.version == ComposeVersion::V3
            && !assembler.referenced_networks().is_empty()
        {
            self.bounded(self.inspector.list_networks()).await?
        } else {
            Vec::new()
        };

        let document = assembler.finish(&networks);
        tracing::info!(
            "Assembled {} service(s), {} network(s)",
            document.services.len(),
            document.networks.len()
        );
        Ok(document)
    }

    /// Compose and serialize in one step.
    pub async fn render<S: AsRef<str>>(&self, identifiers: &[S]) -> Result<String, ComposeError> {
        let document = self.compose(identifiers).await?;
        Ok(to_yaml(&document.to_value(), &self.config.emitter)?)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, InspectError>>,
    ) -> Result<T, InspectError> {
        timeout(self.config.inspect_timeout, call)
            .await
            .map_err(|_| InspectError::Timeout {
                seconds: self.config.inspect_timeout.as_secs(),
            })?
    }
}

/// Configuration for the composer
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    pub version: ComposeVersion,
    pub emitter: EmitterConfig,
    /// Upper bound for each engine call.
    pub inspect_timeout: Duration,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            version: ComposeVersion::V3,
            emitter: EmitterConfig::default(),
            inspect_timeout: Duration::from_secs(30),
        }
    }
}
