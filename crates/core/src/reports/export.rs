//! Report export.
//!
//! JSON export is a direct serialization of the assembled report and is
//! lossless; parsing the output yields a deep-equal object. CSV export
//! flattens the itemized rows of one report type into a table, so it is a
//! projection, not a round-trip format.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::types::{
    ContractorReport, FinancialReport, GpsReport, OverviewReport, ProgressReport, ProvinceReport,
};

/// Errors that can occur during report export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV rendering failed.
    #[error("CSV rendering failed: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the CSV buffer failed.
    #[error("CSV buffer error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serializes a report to a pretty JSON string.
///
/// # Errors
///
/// Returns `ExportError::Serialize` if serialization fails.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// CSV of the overview report's per-project rows.
///
/// # Errors
///
/// Returns `ExportError::Csv` if rendering fails.
pub fn overview_csv(report: &OverviewReport) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "project_id",
        "name",
        "province",
        "status",
        "section_count",
        "progress_pct",
        "budget_allocated",
        "budget_spent",
    ])?;
    for item in &report.items {
        writer.write_record([
            item.project_id.to_string(),
            item.name.clone(),
            item.province.clone(),
            item.status.clone(),
            item.section_count.to_string(),
            item.progress_pct.to_string(),
            item.budget_allocated.to_string(),
            item.budget_spent.to_string(),
        ])?;
    }
    finish(writer)
}

/// CSV of the progress report's rows.
///
/// # Errors
///
/// Returns `ExportError::Csv` if rendering fails.
pub fn progress_csv(report: &ProgressReport) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "project",
        "section",
        "report_date",
        "current_progress_pct",
        "previous_progress_pct",
        "planned_progress_pct",
        "progress_delta_pct",
        "variance_vs_plan_pct",
        "schedule_status",
    ])?;
    for item in &report.items {
        writer.write_record([
            item.id.to_string(),
            item.project.clone(),
            item.section.clone().unwrap_or_default(),
            item.report_date.to_string(),
            item.current_progress_pct.to_string(),
            item.previous_progress_pct.to_string(),
            item.planned_progress_pct.to_string(),
            item.progress_delta_pct.to_string(),
            item.variance_vs_plan_pct.to_string(),
            item.schedule_status.clone(),
        ])?;
    }
    finish(writer)
}

/// CSV of the contractor report's rows.
///
/// # Errors
///
/// Returns `ExportError::Csv` if rendering fails.
pub fn contractor_csv(report: &ContractorReport) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "contractor_id",
        "name",
        "license_number",
        "certification_level",
        "is_active",
        "projects_assigned",
        "total_contract_value",
        "average_rating",
    ])?;
    for item in &report.items {
        writer.write_record([
            item.contractor_id.to_string(),
            item.name.clone(),
            item.license_number.clone(),
            item.certification_level.clone(),
            item.is_active.to_string(),
            item.projects_assigned.to_string(),
            item.total_contract_value.to_string(),
            optional_decimal(item.average_rating),
        ])?;
    }
    finish(writer)
}

/// CSV of the province report's rows.
///
/// # Errors
///
/// Returns `ExportError::Csv` if rendering fails.
pub fn province_csv(report: &ProvinceReport) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "province",
        "project_count",
        "total_distance_km",
        "overall_progress_pct",
    ])?;
    for item in &report.items {
        writer.write_record([
            item.province.clone(),
            item.project_count.to_string(),
            item.total_distance_km.to_string(),
            item.overall_progress_pct.to_string(),
        ])?;
    }
    finish(writer)
}

/// CSV of the GPS report's itemized points.
///
/// # Errors
///
/// Returns `ExportError::Csv` if rendering fails.
pub fn gps_csv(report: &GpsReport) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "project_id",
        "latitude",
        "longitude",
        "phase",
        "road_side",
        "status",
        "distance_m",
        "recorded_at",
    ])?;
    for item in &report.items {
        writer.write_record([
            item.id.to_string(),
            item.project_id.to_string(),
            item.latitude.to_string(),
            item.longitude.to_string(),
            item.phase.clone(),
            item.road_side.clone(),
            item.status.clone(),
            optional_decimal(item.distance_m),
            item.recorded_at.to_rfc3339(),
        ])?;
    }
    finish(writer)
}

/// CSV of the financial report's rows.
///
/// # Errors
///
/// Returns `ExportError::Csv` if rendering fails.
pub fn financial_csv(report: &FinancialReport) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "project",
        "funding_source",
        "budget_allocated",
        "funds_released",
        "funds_utilized",
        "funds_committed",
        "utilization_rate_pct",
        "status",
    ])?;
    for item in &report.items {
        writer.write_record([
            item.id.to_string(),
            item.project.clone(),
            item.funding_source.clone(),
            item.budget_allocated.to_string(),
            item.funds_released.to_string(),
            item.funds_utilized.to_string(),
            item.funds_committed.to_string(),
            item.utilization_rate_pct.to_string(),
            item.status.clone(),
        ])?;
    }
    finish(writer)
}

fn optional_decimal(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    // The writer only ever receives UTF-8 strings.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
