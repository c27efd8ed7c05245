//! Report module - summarizing preprocessing results

pub mod summary;
pub mod transformer_export;

pub use summary::*;
pub use transformer_export::*;
