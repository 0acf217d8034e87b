use composecore::{strip_separator, Mapping, RawAttributes, ValueExt};
use serde_json::Value;

/// Named reshaping rules applied to the values extracted for a field.
///
/// Each rule receives the values found at the field's source paths, in
/// order, with `None` for paths that are absent from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    /// Drop the engine's leading `/` from a container name.
    StripName,
    /// Join all sources as strings with a comma.
    JoinComma,
    Devices,
    Links,
    Logging,
    Networks,
    Ulimits,
}

impl Transform {
    pub fn apply(self, sources: &[Option<&Value>]) -> Value {
        let first = sources.first().copied().flatten();
        match self {
            Transform::Identity => first.cloned().unwrap_or(Value::Null),
            Transform::StripName => first
                .and_then(Value::as_str)
                .map(|name| Value::String(strip_separator(name, '/').to_string()))
                .unwrap_or(Value::Null),
            Transform::JoinComma => Value::String(
                sources
                    .iter()
                    .copied()
                    .map(|source| source.and_then(Value::as_str).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Transform::Devices => devices(first),
            Transform::Links => links(first),
            Transform::Logging => logging(first),
            Transform::Networks => networks(first),
            Transform::Ulimits => ulimits(first),
        }
    }
}

fn strings(items: impl IntoIterator<Item = String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

/// `{PathOnHost, PathInContainer}` entries become `host:container`.
fn devices(source: Option<&Value>) -> Value {
    let Some(entries) = source.and_then(Value::as_array) else {
        return Value::Null;
    };
    strings(entries.iter().filter_map(|device| {
        let host = device.str_at(&["PathOnHost"])?;
        let container = device.str_at(&["PathInContainer"])?;
        Some(format!("{host}:{container}"))
    }))
}

/// Engine links look like `/db:/web/database`; compose wants `db:database`.
pub fn parse_link(link: &str) -> Option<String> {
    let (target, link_path) = link.split_once(':')?;
    let target = strip_separator(target, '/');
    let alias = link_path.rsplit('/').next()?;
    if target.is_empty() || alias.is_empty() {
        return None;
    }
    Some(format!("{target}:{alias}"))
}

fn links(source: Option<&Value>) -> Value {
    let Some(entries) = source.and_then(Value::as_array) else {
        return Value::Null;
    };
    strings(
        entries
            .iter()
            .filter_map(Value::as_str)
            .filter_map(parse_link),
    )
}

fn logging(source: Option<&Value>) -> Value {
    let Some(driver) = source.and_then(|config| config.at(&["Type"])) else {
        return Value::Null;
    };
    let mut logging = Mapping::new();
    logging.insert("driver".to_string(), driver.clone());
    if let Some(options) = source
        .and_then(|config| config.at(&["Config"]))
        .filter(|options| options.as_object().is_some_and(|map| !map.is_empty()))
    {
        logging.insert("options".to_string(), options.clone());
    }
    Value::Object(logging)
}

/// Attached networks become `name: {aliases: [...]}`, sorted by name.
/// Networks without aliases are left out.
fn networks(source: Option<&Value>) -> Value {
    let Some(attached) = source.and_then(Value::as_object) else {
        return Value::Null;
    };
    let mut names: Vec<&String> = attached.keys().collect();
    names.sort();

    let mut networks = Mapping::new();
    for name in names {
        let Some(aliases) = attached[name]
            .at(&["Aliases"])
            .filter(|aliases| aliases.as_array().is_some_and(|list| !list.is_empty()))
        else {
            continue;
        };
        let mut entry = Mapping::new();
        entry.insert("aliases".to_string(), aliases.clone());
        networks.insert(name.clone(), Value::Object(entry));
    }
    Value::Object(networks)
}

/// `{Name, Soft, Hard}` entries become `name: {soft, hard}`.
fn ulimits(source: Option<&Value>) -> Value {
    let Some(entries) = source.and_then(Value::as_array) else {
        return Value::Null;
    };
    let mut limits = Mapping::new();
    for entry in entries {
        let (Some(name), Some(soft), Some(hard)) = (
            entry.str_at(&["Name"]),
            entry.at(&["Soft"]),
            entry.at(&["Hard"]),
        ) else {
            continue;
        };
        let mut limit = Mapping::new();
        limit.insert("soft".to_string(), soft.clone());
        limit.insert("hard".to_string(), hard.clone());
        limits.insert(name.to_string(), Value::Object(limit));
    }
    Value::Object(limits)
}

/// Outcome of the port policy: bound ports win over exposed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortFields {
    Bound(Vec<String>),
    Exposed(Vec<String>),
}

impl PortFields {
    pub fn field_name(&self) -> &'static str {
        match self {
            PortFields::Bound(_) => "ports",
            PortFields::Exposed(_) => "expose",
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            PortFields::Bound(ports) | PortFields::Exposed(ports) => strings(ports),
        }
    }
}

pub fn port_fields(raw: &RawAttributes) -> PortFields {
    match bound_ports(raw.get(&["HostConfig", "PortBindings"])) {
        Some(ports) if !ports.is_empty() => PortFields::Bound(ports),
        _ => PortFields::Exposed(exposed_ports(raw.get(&["Config", "ExposedPorts"]))),
    }
}

/// `None` when the binding data is absent or malformed.
fn bound_ports(source: Option<&Value>) -> Option<Vec<String>> {
    let bindings = source?.as_object()?;
    let mut keys: Vec<&String> = bindings.keys().collect();
    keys.sort();

    let mut ports = Vec::new();
    for key in keys {
        let entries = match &bindings[key] {
            Value::Null => continue,
            Value::Array(entries) => entries,
            _ => return None,
        };
        for entry in entries {
            let host_ip = entry.str_at(&["HostIp"])?;
            let host_port = entry.str_at(&["HostPort"])?;
            let port = format_binding(host_ip, host_port, key);
            if !ports.contains(&port) {
                ports.push(port);
            }
        }
    }
    Some(ports)
}

fn exposed_ports(source: Option<&Value>) -> Vec<String> {
    let mut ports: Vec<String> = source
        .and_then(Value::as_object)
        .map(|exposed| exposed.keys().cloned().collect())
        .unwrap_or_default();
    ports.sort();
    ports
}

/// Render one binding as `hostIP:hostPort:containerPort`, dropping the
/// empty leading parts. IPv6 host addresses are bracketed.
pub fn format_binding(host_ip: &str, host_port: &str, container_port: &str) -> String {
    let host_ip = if host_ip.contains(':') {
        format!("[{host_ip}]")
    } else {
        host_ip.to_string()
    };
    let full = format!("{host_ip}:{host_port}:{container_port}");
    let trimmed = strip_separator(&full, ':');
    if host_ip.is_empty() && host_port.is_empty() {
        strip_separator(trimmed, ':').to_string()
    } else {
        trimmed.to_string()
    }
}
