//! Named template registry
//!
//! One generic implementation backs the three registries the tool keeps
//! (cluster definitions, step templates, bootstrap actions). A registry is
//! populated once at process start from the built-in documents and is
//! read-only afterwards; re-registering a name is a packaging bug and
//! fails immediately.

use crate::error::{Result, TemplateError};
use crate::node::Node;
use crate::params::parse_params;
use crate::resolve::resolve;

/// Ordered name → document store.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    entries: Vec<(String, Node)>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template document.
    ///
    /// The document root must be a mapping carrying a string `Name` field,
    /// unique within this registry.
    pub fn register(&mut self, doc: Node) -> Result<()> {
        let name = doc.name().ok_or(TemplateError::Unnamed)?.to_string();
        if self.entries.iter().any(|(n, _)| *n == name) {
            return Err(TemplateError::Duplicate(name));
        }
        self.entries.push((name, doc));
        Ok(())
    }

    /// Registered template names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Fetch a template and resolve it against raw `key=value` parameters.
    ///
    /// The returned document is an independent copy; the stored template is
    /// never mutated.
    pub fn get(&self, name: &str, raw_params: &[String]) -> Result<Node> {
        let doc = self
            .entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, doc)| doc)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;

        let params = parse_params(raw_params)?;
        resolve(doc, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(name: &str) -> Node {
        Node::from(json!({"Name": name, "Args": ["{x}"]}))
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = TemplateRegistry::new();
        registry.register(doc("crunch")).unwrap();
        registry.register(doc("cheap")).unwrap();

        let err = registry.register(doc("crunch")).unwrap_err();
        assert!(matches!(err, TemplateError::Duplicate(name) if name == "crunch"));
        assert_eq!(registry.names(), ["crunch", "cheap"]);
    }

    #[test]
    fn test_unnamed_document_rejected() {
        let mut registry = TemplateRegistry::new();
        let err = registry.register(Node::from(json!({"Args": []}))).unwrap_err();
        assert!(matches!(err, TemplateError::Unnamed));
    }

    #[test]
    fn test_names_in_registration_order() {
        let mut registry = TemplateRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(doc(name)).unwrap();
        }
        assert_eq!(registry.names(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_get_resolves_parameters() {
        let mut registry = TemplateRegistry::new();
        registry.register(doc("crunch")).unwrap();

        let resolved = registry.get("crunch", &["x=v".to_string()]).unwrap();
        assert_eq!(resolved, Node::from(json!({"Name": "crunch", "Args": ["v"]})));
    }

    #[test]
    fn test_get_unknown_template() {
        let registry = TemplateRegistry::new();
        let err = registry.get("nope", &[]).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn test_stored_template_unaffected_by_resolution() {
        let mut registry = TemplateRegistry::new();
        registry.register(doc("crunch")).unwrap();

        let mut resolved = registry.get("crunch", &["x=one".to_string()]).unwrap();
        resolved.insert("Args", Node::Seq(vec![]));

        // A later resolution still sees the registered placeholder.
        let again = registry.get("crunch", &["x=two".to_string()]).unwrap();
        assert_eq!(again.get("Args").unwrap().as_seq().unwrap()[0], Node::from("two"));
    }
}
