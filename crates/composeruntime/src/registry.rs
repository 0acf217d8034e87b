use crate::transform::Transform;
use composecore::RawAttributes;
use serde_json::Value;

/// One row of the field table: where a declarative field comes from and how
/// it is reshaped.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub sources: Vec<&'static [&'static str]>,
    pub transform: Transform,
}

impl FieldSpec {
    pub fn new(name: &'static str, source: &'static [&'static str]) -> Self {
        Self {
            name,
            sources: vec![source],
            transform: Transform::Identity,
        }
    }

    pub fn with_source(mut self, source: &'static [&'static str]) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Extract this field's sources from `raw` and apply the transform.
    pub fn extract(&self, raw: &RawAttributes) -> Value {
        let sources: Vec<Option<&Value>> = self
            .sources
            .iter()
            .map(|path| raw.get(path))
            .collect();
        self.transform.apply(&sources)
    }
}

/// Ordered table of field specs; table order is the emitted key order.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    specs: Vec<FieldSpec>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// The service fields derived from a docker inspect payload.
    pub fn standard() -> Self {
        use Transform::*;

        let mut registry = Self::new();
        for spec in [
            FieldSpec::new("cap_add", &["HostConfig", "CapAdd"]),
            FieldSpec::new("cap_drop", &["HostConfig", "CapDrop"]),
            FieldSpec::new("cgroup_parent", &["HostConfig", "CgroupParent"]),
            FieldSpec::new("container_name", &["Name"]).with_transform(StripName),
            FieldSpec::new("devices", &["HostConfig", "Devices"]).with_transform(Devices),
            FieldSpec::new("dns", &["HostConfig", "Dns"]),
            FieldSpec::new("dns_search", &["HostConfig", "DnsSearch"]),
            FieldSpec::new("environment", &["Config", "Env"]),
            FieldSpec::new("extra_hosts", &["HostConfig", "ExtraHosts"]),
            FieldSpec::new("image", &["Config", "Image"]),
            FieldSpec::new("labels", &["Config", "Labels"]),
            FieldSpec::new("links", &["HostConfig", "Links"]).with_transform(Links),
            FieldSpec::new("logging", &["HostConfig", "LogConfig"]).with_transform(Logging),
            FieldSpec::new("networks", &["NetworkSettings", "Networks"]).with_transform(Networks),
            FieldSpec::new("security_opt", &["HostConfig", "SecurityOpt"]),
            FieldSpec::new("ulimits", &["HostConfig", "Ulimits"]).with_transform(Ulimits),
            FieldSpec::new("volumes", &["HostConfig", "Binds"]),
            FieldSpec::new("volume_driver", &["HostConfig", "VolumeDriver"]),
            FieldSpec::new("volumes_from", &["HostConfig", "VolumesFrom"]),
            FieldSpec::new("cpu_shares", &["HostConfig", "CpuShares"]),
            FieldSpec::new("cpuset", &["HostConfig", "CpusetCpus"])
                .with_source(&["HostConfig", "CpusetMems"])
                .with_transform(JoinComma),
            FieldSpec::new("entrypoint", &["Config", "Entrypoint"]),
            FieldSpec::new("command", &["Config", "Cmd"]),
            FieldSpec::new("user", &["Config", "User"]),
            FieldSpec::new("working_dir", &["Config", "WorkingDir"]),
            FieldSpec::new("domainname", &["Config", "Domainname"]),
            FieldSpec::new("hostname", &["Config", "Hostname"]),
            FieldSpec::new("ipc", &["HostConfig", "IpcMode"]),
            FieldSpec::new("mac_address", &["NetworkSettings", "MacAddress"]),
            FieldSpec::new("mem_limit", &["HostConfig", "Memory"]),
            FieldSpec::new("memswap_limit", &["HostConfig", "MemorySwap"]),
            FieldSpec::new("privileged", &["HostConfig", "Privileged"]),
            FieldSpec::new("restart", &["HostConfig", "RestartPolicy", "Name"]),
            FieldSpec::new("read_only", &["HostConfig", "ReadonlyRootfs"]),
            FieldSpec::new("stdin_open", &["Config", "OpenStdin"]),
            FieldSpec::new("tty", &["Config", "Tty"]),
        ] {
            registry.register(spec);
        }
        registry
    }

    /// Add a field, replacing an existing spec with the same name in place.
    pub fn register(&mut self, spec: FieldSpec) {
        tracing::trace!("Registering field: {}", spec.name);
        match self.specs.iter_mut().find(|existing| existing.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.name).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
