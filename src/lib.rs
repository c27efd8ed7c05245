//! wageprep: Feature Preprocessing Library
//!
//! Two preprocessing pipelines for player wage regression datasets. Both
//! clean a free-text nationality column and reduce its cardinality, either
//! by keeping the most frequent labels or by mapping to continents, then
//! standardize numeric columns and one-hot encode categorical columns.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
