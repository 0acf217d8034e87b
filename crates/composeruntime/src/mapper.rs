use crate::registry::FieldRegistry;
use crate::transform::port_fields;
use composecore::{strip_separator, FieldMapping, MappingError, RawAttributes, ServiceDefinition};

/// Top-level sections every inspect payload must carry.
pub const REQUIRED_SECTIONS: [&str; 4] = ["Name", "Config", "HostConfig", "NetworkSettings"];

/// Turns inspect payloads into field mappings using a [`FieldRegistry`].
#[derive(Debug, Clone, Default)]
pub struct AttributeMapper {
    registry: FieldRegistry,
}

impl AttributeMapper {
    pub fn new(registry: FieldRegistry) -> Self {
        Self { registry }
    }

    /// Map every table field, then apply the port policy.
    pub fn map(&self, raw: &RawAttributes) -> Result<FieldMapping, MappingError> {
        for section in REQUIRED_SECTIONS {
            raw.require(&[section])?;
        }

        let mut mapping = FieldMapping::new();
        for spec in self.registry.iter() {
            mapping.insert(spec.name, spec.extract(raw));
        }

        let ports = port_fields(raw);
        mapping.insert(ports.field_name(), ports.into_value());

        Ok(mapping)
    }

    /// Service key for a container: its name without the leading `/`.
    pub fn service_name(raw: &RawAttributes) -> Result<String, MappingError> {
        raw.require(&["Name"])?
            .as_str()
            .map(|name| strip_separator(name, '/').to_string())
            .ok_or_else(|| MappingError::MissingPath("Name".to_string()))
    }

    /// Map `raw` and keep only the valid fields.
    pub fn service(&self, raw: &RawAttributes) -> Result<ServiceDefinition, MappingError> {
        let name = Self::service_name(raw)?;
        let mapping = self.map(raw)?;
        tracing::debug!(
            service = %name,
            fields = mapping.iter().filter(|(_, v)| !v.is_null()).count(),
            "Mapped container attributes"
        );
        Ok(ServiceDefinition::from_mapping(name, mapping))
    }
}

/// Convenience wrapper over the standard table.
pub fn map_attributes(raw: &RawAttributes) -> Result<FieldMapping, MappingError> {
    AttributeMapper::default().map(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "Name": "/web",
            "Config": {"Image": "nginx:1.25"},
            "HostConfig": {},
            "NetworkSettings": {},
        })
    }

    #[test]
    fn test_missing_section_is_fatal() {
        for section in REQUIRED_SECTIONS {
            let mut value = minimal();
            value.as_object_mut().unwrap().remove(section);

            let err = map_attributes(&RawAttributes::new(value)).unwrap_err();
            assert_eq!(err, MappingError::MissingPath(section.to_string()));
        }
    }

    #[test]
    fn test_missing_leaves_are_tolerated() {
        let mapping = map_attributes(&RawAttributes::new(minimal())).unwrap();

        assert_eq!(mapping.get("image"), Some(&json!("nginx:1.25")));
        assert_eq!(mapping.get("restart"), Some(&serde_json::Value::Null));
        assert_eq!(mapping.get("expose"), Some(&json!([])));
        assert!(mapping.get("ports").is_none());
    }

    #[test]
    fn test_service_name_strips_leading_slash() {
        let raw = RawAttributes::new(minimal());

        assert_eq!(AttributeMapper::service_name(&raw).unwrap(), "web");
        let service = AttributeMapper::default().service(&raw).unwrap();
        assert_eq!(service.name, "web");
        assert_eq!(service.get("container_name"), Some(&json!("web")));
    }
}
