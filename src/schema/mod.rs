//! Dataset schema - well-known column names and static parameter classification

pub mod columns;
pub mod groups;

pub use groups::{ParameterGroup, ParameterGroups, OTHER_GROUP};
