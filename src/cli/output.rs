//! Output formatting utilities

use chrono::{DateTime, Utc};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::OutputFormat;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_list {
                OutputFormat::Table
            } else {
                OutputFormat::Pretty
            }
        }
        other => other,
    }
}

/// Structured report envelope for JSON/YAML output
#[derive(Debug, Serialize)]
pub struct Report<'a, T: Serialize> {
    pub generated_at: DateTime<Utc>,
    pub dataset: &'a str,
    #[serde(flatten)]
    pub body: T,
}

impl<'a, T: Serialize> Report<'a, T> {
    pub fn new(dataset: &'a str, body: T) -> Self {
        Self {
            generated_at: Utc::now(),
            dataset,
            body,
        }
    }
}

/// Print a serializable value as JSON or YAML
///
/// Returns `false` (and prints nothing) for other formats.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Render rows as a table, CSV or Markdown
pub fn render_rows<R: Tabled + Serialize>(format: OutputFormat, rows: &[R]) -> Result<String> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            if rows.is_empty() {
                writer
                    .write_record(R::headers().iter().map(|h| h.to_string()))
                    .into_diagnostic()?;
            }
            for row in rows {
                writer.serialize(row).into_diagnostic()?;
            }
            let bytes = writer.into_inner().into_diagnostic()?;
            String::from_utf8(bytes).into_diagnostic()
        }
        OutputFormat::Md => Ok(Table::new(rows).with(Style::markdown()).to_string()),
        _ => Ok(Table::new(rows).with(Style::rounded()).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled, Serialize)]
    struct Row {
        parameter: &'static str,
        failures: usize,
    }

    #[test]
    fn test_effective_format() {
        assert_eq!(effective_format(OutputFormat::Auto, true), OutputFormat::Table);
        assert_eq!(effective_format(OutputFormat::Auto, false), OutputFormat::Pretty);
        assert_eq!(effective_format(OutputFormat::Json, true), OutputFormat::Json);
    }

    #[test]
    fn test_render_csv() {
        let rows = [Row {
            parameter: "CALIPER",
            failures: 3,
        }];
        let out = render_rows(OutputFormat::Csv, &rows).unwrap();
        assert_eq!(out, "parameter,failures\nCALIPER,3\n");
    }

    #[test]
    fn test_render_empty_csv_keeps_header() {
        let rows: [Row; 0] = [];
        let out = render_rows(OutputFormat::Csv, &rows).unwrap();
        assert_eq!(out, "parameter,failures\n");
    }

    #[test]
    fn test_render_markdown() {
        let rows = [Row {
            parameter: "GLOSS",
            failures: 1,
        }];
        let out = render_rows(OutputFormat::Md, &rows).unwrap();
        assert!(out.contains("| parameter | failures |"));
        assert!(out.contains("| GLOSS"));
    }
}
