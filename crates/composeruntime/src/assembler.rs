use composecore::{
    ComposeDocument, ComposeVersion, NetworkDefinition, NetworkSummary, ServiceDefinition,
};
use std::collections::{BTreeMap, BTreeSet};

/// Accumulates services across a batch and builds the final document.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    document: ComposeDocument,
    referenced_networks: BTreeSet<String>,
}

impl DocumentAssembler {
    pub fn new(version: ComposeVersion) -> Self {
        Self {
            document: ComposeDocument::new(version),
            referenced_networks: BTreeSet::new(),
        }
    }

    /// Add a service. A later service with the same name replaces the earlier
    /// one entirely.
    pub fn add_service(&mut self, service: ServiceDefinition) {
        self.referenced_networks
            .extend(service.network_names().map(str::to_string));

        let name = service.name.clone();
        if self.document.add_service(service).is_some() {
            tracing::warn!(service = %name, "Duplicate service name, keeping the later container");
        }
    }

    /// Network names referenced by any service added so far, sorted.
    pub fn referenced_networks(&self) -> &BTreeSet<String> {
        &self.referenced_networks
    }

    pub fn service_count(&self) -> usize {
        self.document.services.len()
    }

    /// Resolve the referenced networks against `available` and return the
    /// finished document.
    pub fn finish(mut self, available: &[NetworkSummary]) -> ComposeDocument {
        self.document.networks = resolve_networks(&self.referenced_networks, available);
        self.document
    }
}

/// Keep the engine networks whose names are referenced. Referenced names the
/// engine does not know are dropped.
pub fn resolve_networks(
    referenced: &BTreeSet<String>,
    available: &[NetworkSummary],
) -> BTreeMap<String, NetworkDefinition> {
    let resolved: BTreeMap<String, NetworkDefinition> = available
        .iter()
        .filter(|network| referenced.contains(&network.name))
        .map(|network| (network.name.clone(), NetworkDefinition::from(network)))
        .collect();

    for missing in referenced.iter().filter(|name| !resolved.contains_key(*name)) {
        tracing::debug!(network = %missing, "Referenced network not known to the engine, dropping");
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use composecore::FieldMapping;
    use serde_json::{json, Value};

    fn service(name: &str, fields: Value) -> ServiceDefinition {
        let mut mapping = FieldMapping::new();
        for (key, value) in fields.as_object().unwrap() {
            mapping.insert(key.clone(), value.clone());
        }
        ServiceDefinition::from_mapping(name, mapping)
    }

    #[test]
    fn test_networks_are_union_of_references() {
        let mut assembler = DocumentAssembler::new(ComposeVersion::V3);
        assembler.add_service(service("web", json!({"networks": {"front": {"aliases": ["web"]}}})));
        assembler.add_service(service("db", json!({"networks": {"back": {"aliases": ["db"]}}})));

        let referenced: Vec<&String> = assembler.referenced_networks().iter().collect();
        assert_eq!(referenced, ["back", "front"]);
    }

    #[test]
    fn test_unknown_networks_are_dropped() {
        let referenced: BTreeSet<String> = ["front", "ghost"].iter().map(|s| s.to_string()).collect();
        let available = vec![
            NetworkSummary::new("front", false),
            NetworkSummary::new("back", true),
            NetworkSummary::new("bridge", false),
        ];

        let resolved = resolve_networks(&referenced, &available);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved["front"], NetworkDefinition { external: true });
    }

    #[test]
    fn test_duplicate_service_keeps_later_definition() {
        let mut assembler = DocumentAssembler::new(ComposeVersion::V3);
        assembler.add_service(service("web", json!({"image": "nginx:1", "tty": true})));
        assembler.add_service(service("web", json!({"image": "nginx:2"})));

        assert_eq!(assembler.service_count(), 1);
        let document = assembler.finish(&[]);
        assert_eq!(
            Value::Object(document.service("web").unwrap().clone()),
            json!({"image": "nginx:2"})
        );
    }
}
