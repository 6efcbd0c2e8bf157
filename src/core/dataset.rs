//! Dataset - production records loaded from a CSV export
//!
//! Each row is one track/jumbo roll. Range definitions travel inside the same
//! table: a row's `Process_Parameters` names a parameter and its `Min`, `Max`
//! and `Average` columns hold that parameter's acceptable range.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::core::value::Cell;
use crate::schema::columns;

/// Errors that make a dataset unavailable
#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}")]
    #[diagnostic(code(qid::dataset::io), help("Check the --data path or the `data` key in .qid.yaml"))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    #[diagnostic(code(qid::dataset::csv))]
    Csv(#[from] csv::Error),

    #[error("Dataset has no '{0}' column")]
    #[diagnostic(
        code(qid::dataset::missing_column),
        help("The export must contain Quality and at least one of Track / Jumbo_ID")
    )]
    MissingColumn(String),
}

/// One production record (row)
#[derive(Debug, Clone, Default, Serialize)]
pub struct Record {
    /// Numeric track identifier, kept as trimmed text
    pub track: String,

    /// Alphanumeric jumbo identifier
    pub jumbo_id: String,

    pub kit: String,

    /// Declared quality grade as written in the source
    pub quality: String,

    /// Parameter this row's Min/Max/Average applies to
    pub process_parameter: Option<String>,

    pub min: Cell,
    pub max: Cell,
    pub average: Cell,

    /// All other columns, in dataset column order
    pub fields: Vec<(String, Cell)>,
}

impl Record {
    /// Identifier used for grouping: track if present, else jumbo id
    pub fn id(&self) -> &str {
        if self.track.is_empty() {
            &self.jumbo_id
        } else {
            &self.track
        }
    }

    /// Whether the declared quality is case-insensitively "OK"
    pub fn is_declared_ok(&self) -> bool {
        self.quality.trim().eq_ignore_ascii_case("OK")
    }

    /// Look up a cell by column name
    ///
    /// Identity and range columns are served from the fixed fields; all
    /// other names go to the catch-all.
    pub fn get(&self, column: &str) -> Option<Cell> {
        let text = |s: &str| {
            if s.is_empty() {
                Cell::Missing
            } else {
                Cell::parse(s)
            }
        };
        match column {
            columns::TRACK => Some(text(&self.track)),
            columns::JUMBO_ID => Some(text(&self.jumbo_id)),
            columns::KIT => Some(text(&self.kit)),
            columns::QUALITY => Some(text(&self.quality)),
            columns::PROCESS_PARAMETERS => Some(
                self.process_parameter
                    .as_deref()
                    .map(|p| Cell::Text(p.to_string()))
                    .unwrap_or(Cell::Missing),
            ),
            columns::MIN => Some(self.min.clone()),
            columns::MAX => Some(self.max.clone()),
            columns::AVERAGE => Some(self.average.clone()),
            other => self.field(other).cloned(),
        }
    }

    /// Borrow a catch-all cell by column name
    pub fn field(&self, column: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    /// Text value of a catch-all column, if it holds text
    pub fn text(&self, column: &str) -> Option<&str> {
        self.field(column).and_then(Cell::as_text)
    }

    /// Set a catch-all cell, replacing an existing value of the same column
    pub fn set_field(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Builder-style helper for constructing records in code and tests
    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.set_field(column, value);
        self
    }
}

/// An immutable, ordered collection of records
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
    numeric_columns: HashSet<String>,
    metadata_columns: HashSet<String>,
}

impl Dataset {
    /// Build a dataset from column names and records
    ///
    /// `extra_metadata` names additional non-measurement columns (the
    /// configured grade column, for example).
    pub fn new(column_names: Vec<String>, records: Vec<Record>, extra_metadata: &[&str]) -> Self {
        let metadata_columns: HashSet<String> = column_names
            .iter()
            .filter(|c| columns::is_metadata(c) || extra_metadata.contains(&c.as_str()))
            .cloned()
            .collect();

        let numeric_columns = column_names
            .iter()
            .filter(|c| {
                let mut any_number = false;
                for record in &records {
                    match record.get(c) {
                        Some(Cell::Number(_)) => any_number = true,
                        Some(Cell::Text(_)) => return false,
                        _ => {}
                    }
                }
                any_number
            })
            .cloned()
            .collect();

        Self {
            columns: column_names,
            records,
            numeric_columns,
            metadata_columns,
        }
    }

    /// Load a dataset from a CSV file
    pub fn from_path(path: &Path, extra_metadata: &[&str]) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_reader(file, extra_metadata)?;
        tracing::info!(
            path = %path.display(),
            records = dataset.len(),
            columns = dataset.columns.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Load a dataset from CSV text with a header row
    pub fn from_reader<R: Read>(reader: R, extra_metadata: &[&str]) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if !headers.iter().any(|h| h == columns::QUALITY) {
            return Err(DatasetError::MissingColumn(columns::QUALITY.to_string()));
        }
        if !headers
            .iter()
            .any(|h| h == columns::TRACK || h == columns::JUMBO_ID)
        {
            return Err(DatasetError::MissingColumn(format!(
                "{} / {}",
                columns::TRACK,
                columns::JUMBO_ID
            )));
        }

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let mut record = Record::default();
            for (header, raw) in headers.iter().zip(row.iter()) {
                let raw = raw.trim();
                match header.as_str() {
                    columns::TRACK => record.track = raw.to_string(),
                    columns::JUMBO_ID => record.jumbo_id = raw.to_string(),
                    columns::KIT => record.kit = raw.to_string(),
                    columns::QUALITY => record.quality = raw.to_string(),
                    columns::PROCESS_PARAMETERS => {
                        record.process_parameter =
                            (!raw.is_empty()).then(|| raw.to_string())
                    }
                    columns::MIN => record.min = Cell::parse(raw),
                    columns::MAX => record.max = Cell::parse(raw),
                    columns::AVERAGE => record.average = Cell::parse(raw),
                    other => record.fields.push((other.to_string(), Cell::parse(raw))),
                }
            }
            records.push(record);
        }

        Ok(Self::new(headers, records, extra_metadata))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_numeric_column(&self, column: &str) -> bool {
        self.numeric_columns.contains(column)
    }

    pub fn is_metadata_column(&self, column: &str) -> bool {
        self.metadata_columns.contains(column)
    }

    /// Non-metadata columns, in dataset order
    pub fn measurement_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !self.is_metadata_column(c))
    }

    /// Numeric non-metadata columns, in dataset order
    pub fn numeric_measurement_columns(&self) -> impl Iterator<Item = &str> {
        self.measurement_columns()
            .filter(|c| self.is_numeric_column(c))
    }

    /// First record with the given identifier
    pub fn first_with_id(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Unique record identifiers in first-seen order
    pub fn unique_ids(&self) -> Vec<&str> {
        unique_ids(self.records.iter())
    }
}

/// Unique identifiers of the given records in first-seen order
pub(crate) fn unique_ids<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    records
        .map(Record::id)
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Track,Jumbo_ID,KIT,Quality,Process_Parameters,Min,Max,Average,M_C,CALIPER,MOISTURE,REMARK
1001,JB1001,K1,OK,CALIPER,250,300,275,PM7,260,6.5,fine
1002,JB1002,K2,NOT OK,MOISTURE,5,8,6.5,PM7,310,,re-check
1003,JB1003,K3,ok,CALIPER,bad,300,275,PM8,280,7.1,
";

    #[test]
    fn test_from_reader_parses_identity_and_ranges() {
        let ds = Dataset::from_reader(CSV.as_bytes(), &[]).unwrap();
        assert_eq!(ds.len(), 3);

        let first = &ds.records()[0];
        assert_eq!(first.track, "1001");
        assert_eq!(first.jumbo_id, "JB1001");
        assert_eq!(first.kit, "K1");
        assert_eq!(first.process_parameter.as_deref(), Some("CALIPER"));
        assert_eq!(first.min, Cell::Number(250.0));
        assert_eq!(first.field("CALIPER"), Some(&Cell::Number(260.0)));

        let third = &ds.records()[2];
        assert_eq!(third.min, Cell::Text("bad".to_string()));
    }

    #[test]
    fn test_declared_quality_is_case_insensitive() {
        let ds = Dataset::from_reader(CSV.as_bytes(), &[]).unwrap();
        assert!(ds.records()[0].is_declared_ok());
        assert!(!ds.records()[1].is_declared_ok());
        assert!(ds.records()[2].is_declared_ok());
    }

    #[test]
    fn test_numeric_and_metadata_columns() {
        let ds = Dataset::from_reader(CSV.as_bytes(), &[]).unwrap();
        assert!(ds.is_numeric_column("CALIPER"));
        // Missing cells do not make a column non-numeric
        assert!(ds.is_numeric_column("MOISTURE"));
        assert!(!ds.is_numeric_column("REMARK"));
        // Min has one text cell
        assert!(!ds.is_numeric_column("Min"));

        let measurements: Vec<&str> = ds.numeric_measurement_columns().collect();
        assert_eq!(measurements, vec!["CALIPER", "MOISTURE"]);
    }

    #[test]
    fn test_extra_metadata_columns() {
        let ds = Dataset::from_reader(CSV.as_bytes(), &["REMARK"]).unwrap();
        assert!(ds.is_metadata_column("REMARK"));
        assert!(!ds.measurement_columns().any(|c| c == "REMARK"));
    }

    #[test]
    fn test_missing_quality_column_is_error() {
        let csv = "Track,CALIPER\n1,2\n";
        let err = Dataset::from_reader(csv.as_bytes(), &[]).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "Quality"));
    }

    #[test]
    fn test_missing_identifier_columns_is_error() {
        let csv = "Quality,CALIPER\nOK,2\n";
        let err = Dataset::from_reader(csv.as_bytes(), &[]).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(_)));
    }

    #[test]
    fn test_header_only_dataset_is_empty_not_error() {
        let csv = "Track,Jumbo_ID,Quality\n";
        let ds = Dataset::from_reader(csv.as_bytes(), &[]).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_record_id_falls_back_to_jumbo() {
        let record = Record {
            jumbo_id: "JB9".to_string(),
            ..Default::default()
        };
        assert_eq!(record.id(), "JB9");
    }

    #[test]
    fn test_unique_ids_first_seen_order() {
        let csv = "Track,Quality\n3,OK\n1,OK\n3,NOT OK\n2,OK\n";
        let ds = Dataset::from_reader(csv.as_bytes(), &[]).unwrap();
        assert_eq!(ds.unique_ids(), vec!["3", "1", "2"]);
    }
}
