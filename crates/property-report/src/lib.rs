//! Command-line portfolio report over the property backend.

pub mod args;
pub mod config;
pub mod report;

pub use args::{ReportArgs, USAGE};
pub use config::ReportConfig;
pub use report::{CategoryTotal, PortfolioReport, PropertyReport};
