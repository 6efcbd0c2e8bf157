//! Column names of the production dataset
//!
//! Identity and range columns are fixed. Grade and machine columns vary
//! between plants and are configurable (see [`crate::core::config::ColumnConfig`]).

/// Numeric track identifier of a jumbo roll
pub const TRACK: &str = "Track";

/// Alphanumeric jumbo roll identifier
pub const JUMBO_ID: &str = "Jumbo_ID";

/// Kit number
pub const KIT: &str = "KIT";

/// Declared quality grade ("OK" / "NOT OK")
pub const QUALITY: &str = "Quality";

/// Name of the parameter the row's Min/Max/Average applies to
pub const PROCESS_PARAMETERS: &str = "Process_Parameters";

/// Lower range bound for the row's process parameter
pub const MIN: &str = "Min";

/// Upper range bound for the row's process parameter
pub const MAX: &str = "Max";

/// Target value for the row's process parameter
pub const AVERAGE: &str = "Average";

/// Default machine column
pub const MACHINE: &str = "M_C";

/// Default canonical grade column
pub const GRADE: &str = "Grade";

/// Columns that are never treated as measurements
pub const METADATA: &[&str] = &[
    TRACK,
    JUMBO_ID,
    KIT,
    QUALITY,
    PROCESS_PARAMETERS,
    MIN,
    MAX,
    AVERAGE,
    MACHINE,
    GRADE,
];

/// Check whether a column is an identity/metadata column
pub fn is_metadata(column: &str) -> bool {
    METADATA.contains(&column)
}
