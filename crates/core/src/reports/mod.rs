//! Report generation: filters, aggregators, assemblers, and export.
//!
//! The pipeline mirrors the request flow: a [`filter::ReportFilter`] narrows
//! what the store fetches, the [`aggregate`] folds turn fetched rows into
//! summary statistics, and [`service::ReportService`] composes one report
//! object per report type. [`export`] serializes an assembled report to JSON
//! or CSV without further computation.

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod service;
pub mod types;

pub use aggregate::{BoundingBox, WeightedEntry};
pub use filter::{DEFAULT_ITEM_LIMIT, ReportFilter, ReportFilterBuilder};
pub use service::ReportService;
pub use types::ReportKind;

#[cfg(test)]
mod tests;
