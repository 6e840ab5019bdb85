//! Recursive template resolution
//!
//! `resolve` walks a document and produces a brand-new tree: mapping values
//! and sequence elements are resolved recursively, string scalars go
//! through placeholder substitution, generator nodes are invoked with the
//! parameter mapping. The input document is never touched, so resolving the
//! same template twice can never leak one resolution's substitutions into
//! the other.

use crate::error::{Result, TemplateError};
use crate::node::Node;
use crate::params::{ParamValue, Params};

/// Resolve a template document against a parameter mapping.
///
/// Mapping keys are never substituted, only values. A generator's output
/// is substituted verbatim: the placeholder pass does not re-walk it, even
/// when it returns a nested mapping or sequence.
pub fn resolve(node: &Node, params: &Params) -> Result<Node> {
    match node {
        Node::Map(pairs) => {
            let mut resolved = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                resolved.push((key.clone(), resolve(value, params)?));
            }
            Ok(Node::Map(resolved))
        }
        Node::Seq(items) => Ok(Node::Seq(
            items
                .iter()
                .map(|item| resolve(item, params))
                .collect::<Result<Vec<_>>>()?,
        )),
        Node::Str(s) => Ok(Node::Str(substitute(s, params)?)),
        Node::Generator(generator) => generator.produce(params),
        Node::Int(_) | Node::Bool(_) | Node::Null => Ok(node.clone()),
    }
}

/// Replace `{name}` placeholders with parameter values.
///
/// `{name:0N}` zero-pads an integer parameter to width N. `{{` and `}}`
/// escape literal braces.
fn substitute(input: &str, params: &Params) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut body = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => body.push(c),
                        None => {
                            return Err(TemplateError::UnclosedPlaceholder(input.to_string()));
                        }
                    }
                }
                out.push_str(&expand(&body, params)?);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Expand a single placeholder body, `name` or `name:spec`.
fn expand(body: &str, params: &Params) -> Result<String> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };

    let value = params
        .get(name)
        .ok_or_else(|| TemplateError::MissingParameter(name.to_string()))?;

    match spec {
        None => Ok(value.to_string()),
        Some(spec) => {
            // Only zero-padded widths are supported, and only for integers.
            let width = spec
                .strip_prefix('0')
                .and_then(|w| w.parse::<usize>().ok())
                .filter(|w| *w > 0);
            match (width, value) {
                (Some(width), ParamValue::Int(n)) => Ok(format!("{n:0width$}")),
                _ => Err(TemplateError::BadFormatSpec {
                    name: name.to_string(),
                    spec: spec.to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Generator;
    use crate::params::parse_params;
    use serde_json::json;
    use std::sync::Arc;

    fn params(raw: &[&str]) -> Params {
        parse_params(&raw.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_placeholder_round_trip() {
        let doc = Node::from(json!({"Name": "demo", "Args": ["{x}"]}));
        let resolved = resolve(&doc, &params(&["x=hello"])).unwrap();
        assert_eq!(
            resolved,
            Node::from(json!({"Name": "demo", "Args": ["hello"]}))
        );
    }

    #[test]
    fn test_missing_parameter_fails_loudly() {
        let doc = Node::from(json!("{missing}"));
        let err = resolve(&doc, &Params::new()).unwrap_err();
        assert!(matches!(err, TemplateError::MissingParameter(name) if name == "missing"));
    }

    #[test]
    fn test_keys_are_never_substituted() {
        let doc = Node::from(json!({"{x}": "{x}"}));
        let resolved = resolve(&doc, &params(&["x=v"])).unwrap();
        assert_eq!(resolved, Node::from(json!({"{x}": "v"})));
    }

    #[test]
    fn test_non_string_scalars_unchanged() {
        let doc = Node::from(json!({"Count": 8, "Keep": true, "Uri": null}));
        let resolved = resolve(&doc, &Params::new()).unwrap();
        assert_eq!(resolved, doc);
    }

    #[test]
    fn test_zero_padding_uses_coerced_integer() {
        let doc = Node::from(json!("day-{d:02}"));
        assert_eq!(
            resolve(&doc, &params(&["d=7"])).unwrap(),
            Node::from(json!("day-07"))
        );
        // "007" coerces to the integer 7 before formatting
        assert_eq!(
            resolve(&doc, &params(&["d=007"])).unwrap(),
            Node::from(json!("day-07"))
        );
    }

    #[test]
    fn test_format_spec_rejected_for_strings() {
        let doc = Node::from(json!("{d:02}"));
        let err = resolve(&doc, &params(&["d=x"])).unwrap_err();
        assert!(matches!(err, TemplateError::BadFormatSpec { .. }));
    }

    #[test]
    fn test_brace_escapes() {
        let doc = Node::from(json!("{{literal}} {x}"));
        assert_eq!(
            resolve(&doc, &params(&["x=v"])).unwrap(),
            Node::from(json!("{literal} v"))
        );
    }

    #[test]
    fn test_unclosed_placeholder() {
        let doc = Node::from(json!("{x"));
        assert!(matches!(
            resolve(&doc, &params(&["x=v"])).unwrap_err(),
            TemplateError::UnclosedPlaceholder(_)
        ));
    }

    struct LiteralPlaceholder;

    impl Generator for LiteralPlaceholder {
        fn produce(&self, _params: &Params) -> crate::Result<Node> {
            Ok(Node::from("{y}"))
        }
    }

    #[test]
    fn test_generator_output_is_verbatim() {
        // The generator's return value must not go through a second
        // substitution pass, even when it looks like a placeholder.
        let doc = Node::Seq(vec![Node::Generator(Arc::new(LiteralPlaceholder))]);
        let resolved = resolve(&doc, &params(&["y=boom"])).unwrap();
        assert_eq!(resolved, Node::Seq(vec![Node::from("{y}")]));
    }

    struct EchoCount;

    impl Generator for EchoCount {
        fn produce(&self, params: &Params) -> crate::Result<Node> {
            match params.get("count") {
                Some(ParamValue::Int(n)) => Ok(Node::Int(*n)),
                _ => Err(TemplateError::Generator("count required".to_string())),
            }
        }
    }

    #[test]
    fn test_generator_receives_parameter_mapping() {
        let doc = Node::Generator(Arc::new(EchoCount));
        assert_eq!(resolve(&doc, &params(&["count=8"])).unwrap(), Node::Int(8));
        assert!(matches!(
            resolve(&doc, &Params::new()).unwrap_err(),
            TemplateError::Generator(_)
        ));
    }

    #[test]
    fn test_resolution_is_copy_safe() {
        let doc = Node::from(json!({"Name": "demo", "Tags": [{"Value": "{x}"}]}));
        let first = resolve(&doc, &params(&["x=one"])).unwrap();
        let mut second = resolve(&doc, &params(&["x=two"])).unwrap();

        // Mutating one resolution must not affect the other or the source.
        second.insert("Name", Node::from("mutated"));
        assert_eq!(first.name(), Some("demo"));
        assert_eq!(doc.name(), Some("demo"));
        assert_eq!(
            first.get("Tags").unwrap().as_seq().unwrap()[0].get("Value"),
            Some(&Node::from("one"))
        );

        let third = resolve(&doc, &params(&["x=three"])).unwrap();
        assert_eq!(
            third.get("Tags").unwrap().as_seq().unwrap()[0].get("Value"),
            Some(&Node::from("three"))
        );
    }
}
