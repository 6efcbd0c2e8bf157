//! YAML parsing with error handling

use serde::de::DeserializeOwned;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse YAML content into a typed value with source-pointing errors
pub fn parse_yaml<T: DeserializeOwned + 'static>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename))
    })
}

/// Parse YAML from a file path
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &std::path::Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();
    parse_yaml(&content, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Bounds {
        min: f64,
        max: f64,
    }

    #[test]
    fn test_parse_valid_yaml() {
        let yaml = "min: 250\nmax: 300.5";
        let result: Bounds = parse_yaml(yaml, "bounds.yaml").unwrap();
        assert_eq!(
            result,
            Bounds {
                min: 250.0,
                max: 300.5
            }
        );
    }

    #[test]
    fn test_parse_invalid_yaml_returns_syntax_error() {
        let yaml = "min: 250\n  max: [300";
        let result: Result<Bounds, _> = parse_yaml(yaml, "bounds.yaml");
        match result {
            Err(YamlError::Syntax(err)) => {
                assert_eq!(err.filename, "bounds.yaml");
                assert!(err.offset().is_some_and(|o| o <= yaml.len()));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result: Result<Bounds, _> =
            parse_yaml_file(std::path::Path::new("/nonexistent/qid/bounds.yaml"));
        assert!(matches!(result, Err(YamlError::Io(_))));
    }
}
