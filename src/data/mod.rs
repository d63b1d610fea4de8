//! Raw data stages
//!
//! - [`DataIngestion`]: read the configured delimited file
//! - [`DataValidation`]: assert the required column set is present
//! - [`DataContract`]: target range and duplicate-row checks on raw data

mod ingestion;
mod validation;
pub mod quality;

pub use ingestion::DataIngestion;
pub use quality::{ContractReport, ContractViolation, DataContract};
pub use validation::DataValidation;
