//! String utility functions.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::utilities::errors::CrewError;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)\}").expect("valid regex"));

/// Interpolate `{key}` placeholders while leaving JSON-looking text untouched.
///
/// Only placeholders whose name starts with a letter or underscore and
/// contains alphanumerics, underscores and hyphens are considered, so a
/// literal `{"a": 1}` passes through unchanged.
///
/// # Errors
///
/// Returns `CrewError::MissingInput` for the first placeholder that has no
/// value in `inputs`.
pub fn interpolate_only(input: &str, inputs: &HashMap<String, String>) -> Result<String, CrewError> {
    if !input.contains('{') {
        return Ok(input.to_string());
    }

    if let Some(missing) = VARIABLE_PATTERN
        .captures_iter(input)
        .map(|cap| cap[1].to_string())
        .find(|name| !inputs.contains_key(name))
    {
        return Err(CrewError::MissingInput { key: missing });
    }

    let result = VARIABLE_PATTERN.replace_all(input, |cap: &Captures<'_>| {
        inputs.get(&cap[1]).cloned().unwrap_or_default()
    });
    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_interpolate_only_basic() {
        let result = interpolate_only("Hello {name}!", &inputs(&[("name", "Alice")])).unwrap();
        assert_eq!(result, "Hello Alice!");
    }

    #[test]
    fn test_interpolate_only_repeated_placeholder() {
        let result =
            interpolate_only("{topic} and more {topic}", &inputs(&[("topic", "Rust")])).unwrap();
        assert_eq!(result, "Rust and more Rust");
    }

    #[test]
    fn test_interpolate_only_missing_var() {
        let err = interpolate_only("Hello {name}!", &inputs(&[("other", "x")])).unwrap_err();
        assert!(matches!(err, CrewError::MissingInput { ref key } if key == "name"));
    }

    #[test]
    fn test_interpolate_only_leaves_json_alone() {
        let text = r#"Return {"score": 1} for {topic}"#;
        let result = interpolate_only(text, &inputs(&[("topic", "AI")])).unwrap();
        assert_eq!(result, r#"Return {"score": 1} for AI"#);
    }

    #[test]
    fn test_interpolate_only_without_braces() {
        let result = interpolate_only("plain text", &HashMap::new()).unwrap();
        assert_eq!(result, "plain text");
    }
}
