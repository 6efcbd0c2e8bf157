//! CLI command implementations

pub mod compare;
pub mod completions;
pub mod failures;
pub mod inspect;
pub mod ranges;
pub mod summary;
pub mod utils;
