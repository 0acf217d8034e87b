use crate::value::{is_valid, Mapping};
use crate::{ComposeError, NetworkSummary};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Compose file layout to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeVersion {
    /// Services at the document root, no networks section.
    V1,
    /// `version`, `services` and `networks` sections.
    #[default]
    V3,
}

impl FromStr for ComposeVersion {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(ComposeVersion::V1),
            "3" => Ok(ComposeVersion::V3),
            other => Err(ComposeError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl TryFrom<u32> for ComposeVersion {
    type Error = ComposeError;

    fn try_from(version: u32) -> Result<Self, Self::Error> {
        version.to_string().parse()
    }
}

impl fmt::Display for ComposeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeVersion::V1 => write!(f, "1"),
            ComposeVersion::V3 => write!(f, "3"),
        }
    }
}

/// Declarative fields derived from one container, in field-table order.
///
/// Values are kept even when invalid; filtering happens when the mapping is
/// turned into a [`ServiceDefinition`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMapping {
    fields: Mapping,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One entry of the `services` section
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    pub name: String,
    pub fields: Mapping,
}

impl ServiceDefinition {
    /// Keep only the fields whose values pass [`is_valid`].
    pub fn from_mapping(name: impl Into<String>, mapping: FieldMapping) -> Self {
        let fields = mapping
            .fields
            .into_iter()
            .filter(|(_, value)| is_valid(value))
            .collect();

        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Names of the networks this service attaches to.
    pub fn network_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .get("networks")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|networks| networks.keys().map(String::as_str))
    }
}

/// One entry of the `networks` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDefinition {
    pub external: bool,
}

impl NetworkDefinition {
    pub fn to_value(self) -> Value {
        let mut map = Mapping::new();
        map.insert("external".to_string(), Value::Bool(self.external));
        Value::Object(map)
    }
}

impl From<&NetworkSummary> for NetworkDefinition {
    fn from(summary: &NetworkSummary) -> Self {
        Self {
            external: !summary.internal,
        }
    }
}

/// The generated compose file, before serialization
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeDocument {
    pub version: ComposeVersion,
    pub services: Mapping,
    pub networks: BTreeMap<String, NetworkDefinition>,
}

impl ComposeDocument {
    pub fn new(version: ComposeVersion) -> Self {
        Self {
            version,
            services: Mapping::new(),
            networks: BTreeMap::new(),
        }
    }

    /// Insert a service, replacing any previous service with the same name.
    ///
    /// The replaced definition is returned; its position in the services
    /// section is reused.
    pub fn add_service(&mut self, service: ServiceDefinition) -> Option<Value> {
        self.services
            .insert(service.name, Value::Object(service.fields))
    }

    pub fn service(&self, name: &str) -> Option<&Mapping> {
        self.services.get(name).and_then(Value::as_object)
    }

    /// Build the tree that gets serialized.
    pub fn to_value(&self) -> Value {
        match self.version {
            ComposeVersion::V1 => Value::Object(self.services.clone()),
            ComposeVersion::V3 => {
                let mut root = Mapping::new();
                root.insert("version".to_string(), Value::String(self.version.to_string()));
                root.insert("services".to_string(), Value::Object(self.services.clone()));
                if !self.networks.is_empty() {
                    let networks = self
                        .networks
                        .iter()
                        .map(|(name, network)| (name.clone(), network.to_value()))
                        .collect();
                    root.insert("networks".to_string(), Value::Object(networks));
                }
                Value::Object(root)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(fields: Value) -> FieldMapping {
        let mut mapping = FieldMapping::new();
        for (name, value) in fields.as_object().unwrap() {
            mapping.insert(name.clone(), value.clone());
        }
        mapping
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!("1".parse::<ComposeVersion>().unwrap(), ComposeVersion::V1);
        assert_eq!("3".parse::<ComposeVersion>().unwrap(), ComposeVersion::V3);
        assert_eq!(ComposeVersion::try_from(3).unwrap(), ComposeVersion::V3);
        assert_eq!(ComposeVersion::default(), ComposeVersion::V3);

        let err = "2".parse::<ComposeVersion>().unwrap_err();
        assert!(matches!(err, ComposeError::UnsupportedVersion(ref v) if v == "2"));
    }

    #[test]
    fn test_service_keeps_valid_fields_in_order() {
        let service = ServiceDefinition::from_mapping(
            "db",
            mapping(json!({
                "image": "postgres:14",
                "restart": "no",
                "cpuset": ",",
                "environment": ["PGDATA=/data"],
                "labels": {},
            })),
        );

        let keys: Vec<&String> = service.fields.keys().collect();
        assert_eq!(keys, ["image", "environment"]);
    }

    #[test]
    fn test_add_service_overwrites_in_place() {
        let mut document = ComposeDocument::new(ComposeVersion::V3);
        document.add_service(ServiceDefinition::from_mapping("web", mapping(json!({"image": "nginx:1"}))));
        document.add_service(ServiceDefinition::from_mapping("db", mapping(json!({"image": "postgres"}))));
        let replaced = document.add_service(ServiceDefinition::from_mapping(
            "web",
            mapping(json!({"image": "nginx:2"})),
        ));

        assert_eq!(replaced, Some(json!({"image": "nginx:1"})));
        assert_eq!(document.services.len(), 2);
        assert_eq!(document.services.keys().next().map(String::as_str), Some("web"));
        assert_eq!(document.service("web").unwrap()["image"], json!("nginx:2"));
    }

    #[test]
    fn test_v3_omits_empty_networks() {
        let document = ComposeDocument::new(ComposeVersion::V3);

        assert_eq!(document.to_value(), json!({"version": "3", "services": {}}));
    }

    #[test]
    fn test_v1_is_services_only() {
        let mut document = ComposeDocument::new(ComposeVersion::V1);
        document.add_service(ServiceDefinition::from_mapping("web", mapping(json!({"image": "nginx"}))));
        document
            .networks
            .insert("front".to_string(), NetworkDefinition { external: true });

        assert_eq!(document.to_value(), json!({"web": {"image": "nginx"}}));
    }

    #[test]
    fn test_network_definition_negates_internal() {
        let summary = NetworkSummary {
            name: "backend".to_string(),
            internal: true,
        };

        assert_eq!(NetworkDefinition::from(&summary), NetworkDefinition { external: false });
    }
}
