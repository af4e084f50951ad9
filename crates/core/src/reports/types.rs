//! Report data types.
//!
//! Input rows are plain snapshots of fetched entities; the assembled reports
//! all share the `{summary, breakdowns, items}` top-level shape.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::BoundingBox;

// ============================================================================
// Report Kinds
// ============================================================================

/// The six report types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Cross-entity program overview.
    Overview,
    /// Section/progress-report trend.
    Progress,
    /// Contractor roster and assignments.
    Contractor,
    /// Per-province rollup.
    Province,
    /// GPS field-log analysis.
    Gps,
    /// Funding and utilization.
    Financial,
}

impl ReportKind {
    /// Wire name of the report type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Progress => "progress",
            Self::Contractor => "contractor",
            Self::Province => "province",
            Self::Gps => "gps",
            Self::Financial => "financial",
        }
    }

    /// All report kinds, in wire order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Overview,
            Self::Progress,
            Self::Contractor,
            Self::Province,
            Self::Gps,
            Self::Financial,
        ]
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(Self::Overview),
            "progress" => Ok(Self::Progress),
            "contractor" => Ok(Self::Contractor),
            "province" => Ok(Self::Province),
            "gps" => Ok(Self::Gps),
            "financial" => Ok(Self::Financial),
            other => Err(format!("unknown report type: {other}")),
        }
    }
}

// ============================================================================
// Input Rows
// ============================================================================

/// Project snapshot used by the overview and province reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRow {
    /// Project ID.
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// Province name.
    pub province: String,
    /// Project status (wire vocabulary, e.g. `in_progress`).
    pub status: String,
    /// Total road distance in metres.
    pub total_distance_m: Decimal,
}

/// Section snapshot used for weighted progress and budget rollups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRow {
    /// Section ID.
    pub id: Uuid,
    /// Owning project ID.
    pub project_id: Uuid,
    /// Section name.
    pub name: String,
    /// Section length in metres.
    pub length_m: Decimal,
    /// Physical progress percentage (0-100).
    pub progress_pct: Decimal,
    /// Budget allocated to this section.
    pub budget_allocated: Decimal,
    /// Budget spent on this section.
    pub budget_spent: Decimal,
}

/// Contractor snapshot for the contractor report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractorRow {
    /// Contractor ID.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Unique license number.
    pub license_number: String,
    /// Certification level (wire vocabulary).
    pub certification_level: String,
    /// Whether the contractor is active.
    pub is_active: bool,
}

/// Contractor-project assignment snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRow {
    /// Contractor ID.
    pub contractor_id: Uuid,
    /// Project ID.
    pub project_id: Uuid,
    /// Contract value.
    pub contract_value: Decimal,
    /// Contract status (wire vocabulary).
    pub contract_status: String,
    /// Performance rating (0-5), if rated.
    pub performance_rating: Option<Decimal>,
}

/// GPS point snapshot for the GPS report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpsPointRow {
    /// Point ID.
    pub id: Uuid,
    /// Owning project ID.
    pub project_id: Uuid,
    /// Latitude in decimal degrees.
    pub latitude: Decimal,
    /// Longitude in decimal degrees.
    pub longitude: Decimal,
    /// Work phase (`drain`, `basket`, `sealing`).
    pub phase: String,
    /// Road side (`left`, `right`, `both`).
    pub road_side: String,
    /// Point status.
    pub status: String,
    /// Chainage distance in metres, if measured.
    pub distance_m: Option<Decimal>,
    /// When the point was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Progress-report snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRow {
    /// Report ID.
    pub id: Uuid,
    /// Owning project ID.
    pub project_id: Uuid,
    /// Owning project name.
    pub project: String,
    /// Section name, if section-scoped.
    pub section: Option<String>,
    /// Reporting date.
    pub report_date: NaiveDate,
    /// Progress at the reporting date (0-100).
    pub current_progress: Decimal,
    /// Progress at the previous report (0-100).
    pub previous_progress: Decimal,
    /// Planned progress at the reporting date (0-100).
    pub planned_progress: Decimal,
    /// Schedule status (wire vocabulary).
    pub schedule_status: String,
}

/// Quality-report snapshot feeding the overview pass rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityRow {
    /// Report ID.
    pub id: Uuid,
    /// Owning project ID.
    pub project_id: Uuid,
    /// Report type (wire vocabulary).
    pub report_type: String,
    /// Test/inspection date.
    pub test_date: NaiveDate,
    /// QA/QC gate outcome (`pass`, `fail`, `conditional_pass`,
    /// `rework_required`).
    pub qa_qc_status: String,
}

/// Funding record snapshot for the financial report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingRow {
    /// Funding record ID.
    pub id: Uuid,
    /// Owning project ID.
    pub project_id: Uuid,
    /// Owning project name.
    pub project: String,
    /// Funding source.
    pub funding_source: String,
    /// Budget allocated.
    pub budget_allocated: Decimal,
    /// Funds released to date.
    pub funds_released: Decimal,
    /// Funds utilized to date.
    pub funds_utilized: Decimal,
    /// Funds committed to date.
    pub funds_committed: Decimal,
    /// Record status (wire vocabulary).
    pub status: String,
}

// ============================================================================
// Overview Report
// ============================================================================

/// Cross-entity program overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewReport {
    /// Headline statistics.
    pub summary: OverviewSummary,
    /// Category breakdowns.
    pub breakdowns: OverviewBreakdowns,
    /// Per-project rows.
    pub items: Vec<OverviewItem>,
}

/// Overview headline statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewSummary {
    /// Number of projects in scope.
    pub total_projects: u64,
    /// Total road distance in kilometres.
    pub total_distance_km: Decimal,
    /// Length-weighted overall progress percentage.
    pub overall_progress_pct: Decimal,
    /// Number of active contractors.
    pub active_contractors: u64,
    /// QA/QC pass rate percentage.
    pub quality_pass_rate_pct: Decimal,
    /// Total budget allocated across sections.
    pub budget_allocated: Decimal,
    /// Total budget spent across sections.
    pub budget_spent: Decimal,
    /// Budget utilization percentage.
    pub budget_utilization_pct: Decimal,
}

/// Overview category breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewBreakdowns {
    /// Project count per status.
    pub projects_by_status: BTreeMap<String, u64>,
    /// Project count per province.
    pub projects_by_province: BTreeMap<String, u64>,
}

/// One overview row per project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewItem {
    /// Project ID.
    pub project_id: Uuid,
    /// Project name.
    pub name: String,
    /// Province name.
    pub province: String,
    /// Project status.
    pub status: String,
    /// Number of sections.
    pub section_count: u64,
    /// Length-weighted progress percentage over the project's sections.
    pub progress_pct: Decimal,
    /// Budget allocated across the project's sections.
    pub budget_allocated: Decimal,
    /// Budget spent across the project's sections.
    pub budget_spent: Decimal,
}

// ============================================================================
// Progress Report
// ============================================================================

/// Progress-trend report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Headline statistics.
    pub summary: ProgressSummary,
    /// Category breakdowns.
    pub breakdowns: ProgressBreakdowns,
    /// Per-report rows.
    pub items: Vec<ProgressItem>,
}

/// Progress headline statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Number of progress reports in scope.
    pub report_count: u64,
    /// Length-weighted overall progress percentage over sections.
    pub overall_progress_pct: Decimal,
    /// Share of reports that are on track or ahead, as a percentage.
    pub on_track_rate_pct: Decimal,
    /// Number of reports behind schedule or at risk.
    pub behind_count: u64,
}

/// Progress category breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressBreakdowns {
    /// Report count per schedule status.
    pub by_schedule_status: BTreeMap<String, u64>,
    /// Report count per project.
    pub reports_by_project: BTreeMap<String, u64>,
}

/// One row per progress report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressItem {
    /// Report ID.
    pub id: Uuid,
    /// Project name.
    pub project: String,
    /// Section name, if section-scoped.
    pub section: Option<String>,
    /// Reporting date.
    pub report_date: NaiveDate,
    /// Current progress percentage.
    pub current_progress_pct: Decimal,
    /// Previous progress percentage.
    pub previous_progress_pct: Decimal,
    /// Planned progress percentage.
    pub planned_progress_pct: Decimal,
    /// `current − previous`.
    pub progress_delta_pct: Decimal,
    /// `current − planned`.
    pub variance_vs_plan_pct: Decimal,
    /// Schedule status.
    pub schedule_status: String,
}

// ============================================================================
// Contractor Report
// ============================================================================

/// Contractor roster report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorReport {
    /// Headline statistics.
    pub summary: ContractorSummary,
    /// Category breakdowns.
    pub breakdowns: ContractorBreakdowns,
    /// Per-contractor rows.
    pub items: Vec<ContractorItem>,
}

/// Contractor headline statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorSummary {
    /// Number of contractors in scope.
    pub total_contractors: u64,
    /// Number of active contractors.
    pub active_contractors: u64,
    /// Active share as a percentage.
    pub active_rate_pct: Decimal,
    /// Total contract value across assignments.
    pub total_contract_value: Decimal,
    /// Mean performance rating over rated assignments.
    pub average_performance_rating: Decimal,
}

/// Contractor category breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorBreakdowns {
    /// Contractor count per certification level.
    pub by_certification_level: BTreeMap<String, u64>,
    /// Assignment count per contract status.
    pub assignments_by_status: BTreeMap<String, u64>,
}

/// One row per contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorItem {
    /// Contractor ID.
    pub contractor_id: Uuid,
    /// Company name.
    pub name: String,
    /// License number.
    pub license_number: String,
    /// Certification level.
    pub certification_level: String,
    /// Whether the contractor is active.
    pub is_active: bool,
    /// Number of project assignments.
    pub projects_assigned: u64,
    /// Total contract value across assignments.
    pub total_contract_value: Decimal,
    /// Mean rating over this contractor's rated assignments.
    pub average_rating: Option<Decimal>,
}

// ============================================================================
// Province Report
// ============================================================================

/// Per-province rollup report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceReport {
    /// Headline statistics.
    pub summary: ProvinceSummary,
    /// Category breakdowns.
    pub breakdowns: ProvinceBreakdowns,
    /// Per-province rows.
    pub items: Vec<ProvinceItem>,
}

/// Province headline statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceSummary {
    /// Number of provinces with projects in scope.
    pub province_count: u64,
    /// Number of projects in scope.
    pub project_count: u64,
    /// Total road distance in kilometres.
    pub total_distance_km: Decimal,
}

/// Province category breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceBreakdowns {
    /// Project count per status, program-wide.
    pub projects_by_status: BTreeMap<String, u64>,
}

/// One row per province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceItem {
    /// Province name.
    pub province: String,
    /// Number of projects.
    pub project_count: u64,
    /// Total road distance in kilometres.
    pub total_distance_km: Decimal,
    /// Length-weighted progress over the province's sections.
    pub overall_progress_pct: Decimal,
}

// ============================================================================
// GPS Report
// ============================================================================

/// GPS field-log report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsReport {
    /// Headline statistics.
    pub summary: GpsSummary,
    /// Category breakdowns.
    pub breakdowns: GpsBreakdowns,
    /// Itemized points (capped by the filter's limit).
    pub items: Vec<GpsItem>,
}

/// GPS headline statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsSummary {
    /// Number of points in scope.
    pub total_points: u64,
    /// Number of distinct projects with points.
    pub projects_covered: u64,
    /// Bounding box over all points; `None` when the set is empty.
    pub bounding_box: Option<BoundingBox>,
}

/// GPS category breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsBreakdowns {
    /// Point count per work phase.
    pub by_phase: BTreeMap<String, u64>,
    /// Point count per status.
    pub by_status: BTreeMap<String, u64>,
    /// Point count per UTC calendar day.
    pub daily_activity: BTreeMap<NaiveDate, u64>,
}

/// One itemized GPS point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsItem {
    /// Point ID.
    pub id: Uuid,
    /// Owning project ID.
    pub project_id: Uuid,
    /// Latitude in decimal degrees.
    pub latitude: Decimal,
    /// Longitude in decimal degrees.
    pub longitude: Decimal,
    /// Work phase.
    pub phase: String,
    /// Road side.
    pub road_side: String,
    /// Point status.
    pub status: String,
    /// Chainage distance in metres, if measured.
    pub distance_m: Option<Decimal>,
    /// When the point was recorded.
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// Financial Report
// ============================================================================

/// Funding and utilization report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Headline statistics.
    pub summary: FinancialSummary,
    /// Category breakdowns.
    pub breakdowns: FinancialBreakdowns,
    /// Per-record rows.
    pub items: Vec<FinancialItem>,
}

/// Financial headline statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Number of funding records in scope.
    pub record_count: u64,
    /// Total budget allocated.
    pub total_allocated: Decimal,
    /// Total funds released.
    pub total_released: Decimal,
    /// Total funds utilized.
    pub total_utilized: Decimal,
    /// Total funds committed.
    pub total_committed: Decimal,
    /// `utilized / allocated × 100`.
    pub utilization_rate_pct: Decimal,
    /// `released / allocated × 100`.
    pub release_rate_pct: Decimal,
}

/// Financial category breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialBreakdowns {
    /// Record count per status.
    pub records_by_status: BTreeMap<String, u64>,
    /// Allocated amount per funding source.
    pub allocated_by_source: BTreeMap<String, Decimal>,
}

/// One row per funding record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialItem {
    /// Funding record ID.
    pub id: Uuid,
    /// Project name.
    pub project: String,
    /// Funding source.
    pub funding_source: String,
    /// Budget allocated.
    pub budget_allocated: Decimal,
    /// Funds released.
    pub funds_released: Decimal,
    /// Funds utilized.
    pub funds_utilized: Decimal,
    /// Funds committed.
    pub funds_committed: Decimal,
    /// Utilization percentage for this record.
    pub utilization_rate_pct: Decimal,
    /// Record status.
    pub status: String,
}
