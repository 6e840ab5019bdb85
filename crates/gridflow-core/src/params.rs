//! Parameter coercion
//!
//! CLI parameters arrive as `key=value` strings. Values that parse as
//! base-10 integers are stored as integers so numeric format specs
//! (zero padding) work in templates; anything else stays a string.

use crate::error::{Result, TemplateError};
use std::collections::BTreeMap;
use tracing::info;

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Str(s) => write!(f, "{s}"),
            ParamValue::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Parameter mapping built fresh per resolution call.
pub type Params = BTreeMap<String, ParamValue>;

/// Coerce raw `key=value` entries into a typed parameter mapping.
///
/// Splits each entry on the first `=`; the value may contain further `=`
/// characters. An entry without `=` is malformed.
pub fn parse_params(raw: &[String]) -> Result<Params> {
    let mut params = Params::new();

    for entry in raw {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| TemplateError::MalformedParameter(entry.clone()))?;

        let value = match value.parse::<i64>() {
            Ok(n) => ParamValue::Int(n),
            Err(_) => ParamValue::Str(value.to_string()),
        };
        params.insert(key.to_string(), value);
    }

    if !params.is_empty() {
        info!(?params, "Template parameters");
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion() {
        let params = parse_params(&["n=007".to_string(), "k=abc".to_string()]).unwrap();
        assert_eq!(params.get("n"), Some(&ParamValue::Int(7)));
        assert_eq!(params.get("k"), Some(&ParamValue::Str("abc".to_string())));
    }

    #[test]
    fn test_split_on_first_equals() {
        let params = parse_params(&["uri=s3://bucket/key=value".to_string()]).unwrap();
        assert_eq!(
            params.get("uri"),
            Some(&ParamValue::Str("s3://bucket/key=value".to_string()))
        );
    }

    #[test]
    fn test_negative_integer() {
        let params = parse_params(&["offset=-3".to_string()]).unwrap();
        assert_eq!(params.get("offset"), Some(&ParamValue::Int(-3)));
    }

    #[test]
    fn test_missing_equals_is_malformed() {
        let err = parse_params(&["date".to_string()]).unwrap_err();
        assert!(matches!(err, TemplateError::MalformedParameter(e) if e == "date"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_params(&[]).unwrap().is_empty());
    }
}
