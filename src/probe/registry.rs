//! The ordered catalogue of probes.
//!
//! The registry is supplied by the caller, either built in code or loaded
//! from a manifest. Order is preserved: probes launch in registration order.

use super::definition::{ProbeDefinition, ProbeProcedure};

/// An ordered sequence of probe definitions.
#[derive(Debug, Clone, Default)]
pub struct ProbeRegistry {
    probes: Vec<ProbeDefinition>,
}

impl ProbeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe definition.
    pub fn register(&mut self, probe: ProbeDefinition) -> &mut Self {
        self.probes.push(probe);
        self
    }

    /// Append a probe with a procedure and aliases.
    pub fn add<I, S>(&mut self, name: &str, aliases: I, procedure: ProbeProcedure) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(ProbeDefinition::new(name, procedure).with_aliases(aliases))
    }

    /// Append a probe that is declared but has no procedure yet.
    pub fn declare<I, S>(&mut self, name: &str, aliases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(ProbeDefinition::unimplemented(name).with_aliases(aliases))
    }

    /// Look up a probe by name (first match).
    pub fn get(&self, name: &str) -> Option<&ProbeDefinition> {
        self.probes.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProbeDefinition> {
        self.probes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.probes.iter().map(|p| p.name.as_str())
    }

    /// Total number of declared probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Number of probes that carry a procedure.
    pub fn implemented_count(&self) -> usize {
        self.probes.iter().filter(|p| p.is_implemented()).count()
    }
}

impl IntoIterator for ProbeRegistry {
    type Item = ProbeDefinition;
    type IntoIter = std::vec::IntoIter<ProbeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.probes.into_iter()
    }
}

impl FromIterator<ProbeDefinition> for ProbeRegistry {
    fn from_iter<T: IntoIterator<Item = ProbeDefinition>>(iter: T) -> Self {
        Self {
            probes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok() -> ProbeProcedure {
        ProbeProcedure::sync(|_| Ok(None))
    }

    #[test]
    fn preserves_registration_order() {
        let mut registry = ProbeRegistry::new();
        registry
            .add("b", Vec::<String>::new(), ok())
            .declare("a", ["alpha"])
            .add("c", ["see"], ok());
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn counts_implemented_probes() {
        let mut registry = ProbeRegistry::new();
        registry
            .add("x", Vec::<String>::new(), ok())
            .declare("y", Vec::<String>::new());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.implemented_count(), 1);
    }

    #[test]
    fn get_finds_by_name() {
        let mut registry = ProbeRegistry::new();
        registry.declare("fs.read", ["readFile"]);
        assert_eq!(registry.get("fs.read").unwrap().aliases, vec!["readFile"]);
        assert!(registry.get("fs.write").is_none());
    }

    #[test]
    fn collects_from_definitions() {
        let registry: ProbeRegistry = ["a", "b"]
            .into_iter()
            .map(ProbeDefinition::unimplemented)
            .collect();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }
}
