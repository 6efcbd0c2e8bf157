//! QID: Quality Inspection Toolkit
//!
//! Evaluates jumbo roll production records against per-parameter ranges,
//! finds the parameters behind NOT-OK records and compares value
//! distributions across grades and machines.

pub mod cli;
pub mod core;
pub mod schema;
pub mod yaml;
