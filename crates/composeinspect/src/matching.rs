/// Number of id characters the engine shows as the short id.
pub const SHORT_ID_LEN: usize = 12;

/// A running container as listed by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub names: Vec<String>,
}

impl ContainerSummary {
    pub fn new(id: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            id: id.into(),
            names,
        }
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..SHORT_ID_LEN).unwrap_or(&self.id)
    }

    fn has_name(&self, wanted: &str) -> bool {
        self.names
            .iter()
            .any(|name| name.strip_prefix('/').unwrap_or(name) == wanted)
    }

    /// `identifier` is a prefix of our id, or a longer id starting with our
    /// short id.
    fn has_id(&self, identifier: &str) -> bool {
        !self.id.is_empty()
            && (self.id.starts_with(identifier) || identifier.starts_with(self.short_id()))
    }
}

/// Pick the container `identifier` refers to. Exact name matches win over
/// id matches.
pub fn select_container<'a>(
    identifier: &str,
    containers: &'a [ContainerSummary],
) -> Option<&'a ContainerSummary> {
    select_index(identifier, containers).map(|index| &containers[index])
}

/// Position of the container `identifier` refers to.
///
/// When several ids match, the first one is used and a warning is logged.
pub fn select_index(identifier: &str, containers: &[ContainerSummary]) -> Option<usize> {
    if identifier.is_empty() {
        return None;
    }
    let wanted = identifier.strip_prefix('/').unwrap_or(identifier);

    if let Some(index) = containers.iter().position(|c| c.has_name(wanted)) {
        return Some(index);
    }

    let mut matches = containers
        .iter()
        .enumerate()
        .filter(|(_, container)| container.has_id(identifier))
        .map(|(index, _)| index);
    let first = matches.next()?;
    let others = matches.count();
    if others > 0 {
        tracing::warn!(
            identifier,
            candidates = others + 1,
            chosen = containers[first].short_id(),
            "Ambiguous container id, using the first match"
        );
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn containers() -> Vec<ContainerSummary> {
        vec![
            ContainerSummary::new(
                "3f2a9b1c0d4e5f60718293a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4",
                vec!["web".to_string()],
            ),
            ContainerSummary::new(
                "9c8b7a6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e0f9a8b",
                vec!["/db".to_string(), "/web/database".to_string()],
            ),
        ]
    }

    #[test]
    fn test_select_by_name() {
        let containers = containers();

        assert_eq!(select_container("web", &containers).unwrap().short_id(), "3f2a9b1c0d4e");
        assert_eq!(select_container("/db", &containers).unwrap().short_id(), "9c8b7a6d5e4f");
    }

    #[test]
    fn test_select_by_id_prefix_and_full_id() {
        let containers = containers();

        assert_eq!(select_container("9c8b", &containers).unwrap().names[0], "/db");
        assert_eq!(
            select_container(&containers[0].id.clone(), &containers).unwrap().names[0],
            "web"
        );
    }

    #[test]
    fn test_name_match_wins_over_id_prefix() {
        let mut containers = containers();
        containers.push(ContainerSummary::new("abc123", vec!["3f2a".to_string()]));

        assert_eq!(select_container("3f2a", &containers).unwrap().id, "abc123");
    }

    #[test]
    fn test_no_match() {
        let containers = containers();

        assert!(select_container("cache", &containers).is_none());
        assert!(select_container("", &containers).is_none());
    }

    #[test]
    fn test_ambiguous_id_prefix_warns() {
        let mut containers = containers();
        containers.push(ContainerSummary::new("3aaa000000000000", vec!["cache".to_string()]));
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let selected =
            tracing::subscriber::with_default(subscriber, || select_index("3", &containers));

        assert_eq!(selected, Some(0));
        let logs = captured.contents();
        assert!(logs.contains("Ambiguous container id"), "{logs}");
        assert!(logs.contains("candidates=2"), "{logs}");
    }

    #[test]
    fn test_unique_id_prefix_is_quiet() {
        let containers = containers();
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let selected =
            tracing::subscriber::with_default(subscriber, || select_index("9c8b", &containers));

        assert_eq!(selected, Some(1));
        assert!(captured.contents().is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_short_id_of_short_ids() {
        assert_eq!(ContainerSummary::new("abc", Vec::new()).short_id(), "abc");
    }
}
