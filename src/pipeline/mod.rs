//! Pipeline module - nationality reduction and feature transformation

pub mod columns;
pub mod config;
pub mod continent;
pub mod countries;
pub mod encoder;
pub mod error;
pub mod loader;
pub mod nationality;
pub mod preprocess;
pub mod scaler;
pub mod transformer;

pub use columns::*;
pub use config::*;
pub use continent::{
    map_continents, ContinentMapper, ContinentOutcome, ContinentResolver, CountryTable,
    Resolution, ResolveError,
};
pub use encoder::*;
pub use error::{PrepError, Result};
pub use loader::*;
pub use nationality::*;
pub use preprocess::*;
pub use scaler::*;
pub use transformer::*;
