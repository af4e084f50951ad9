//! `SeaORM` active enums mirroring the PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System-wide user role.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including user management and setup.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Oversees the road program across provinces.
    #[sea_orm(string_value = "program_manager")]
    ProgramManager,
    /// Manages projects, contractors, and funding.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Supervises field works.
    #[sea_orm(string_value = "supervisor")]
    Supervisor,
    /// Office engineer.
    #[sea_orm(string_value = "engineer")]
    Engineer,
    /// Field engineer.
    #[sea_orm(string_value = "site_engineer")]
    SiteEngineer,
    /// Quality/HSE officer.
    #[sea_orm(string_value = "qa_qc_officer")]
    QaQcOfficer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use sea_orm::ActiveEnum;
        write!(f, "{}", self.to_value())
    }
}

/// Per-project access level.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "access_level")]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// View project data.
    #[sea_orm(string_value = "read")]
    Read,
    /// Create and edit project data.
    #[sea_orm(string_value = "write")]
    Write,
    /// Full project control including grants.
    #[sea_orm(string_value = "manage")]
    Manage,
}

/// Project lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_status")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Scoping and design.
    #[sea_orm(string_value = "planning")]
    Planning,
    /// Out for tender.
    #[sea_orm(string_value = "tendering")]
    Tendering,
    /// Works underway.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Suspended.
    #[sea_orm(string_value = "on_hold")]
    OnHold,
    /// Works complete.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Abandoned.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Section work status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "section_status")]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// No works started.
    #[sea_orm(string_value = "not_started")]
    NotStarted,
    /// Works underway.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Works complete.
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// Contractor certification level.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "certification_level")]
#[serde(rename_all = "snake_case")]
pub enum CertificationLevel {
    /// Licensed for provincial works.
    #[sea_orm(string_value = "provincial")]
    Provincial,
    /// Licensed for national works.
    #[sea_orm(string_value = "national")]
    National,
    /// Internationally certified.
    #[sea_orm(string_value = "international")]
    International,
}

/// Contract lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_status")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Not yet signed.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// In force.
    #[sea_orm(string_value = "active")]
    Active,
    /// Temporarily suspended.
    #[sea_orm(string_value = "suspended")]
    Suspended,
    /// Delivered and closed.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Terminated before completion.
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

/// Road-works phase for a GPS observation.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "work_phase")]
#[serde(rename_all = "snake_case")]
pub enum WorkPhase {
    /// Drainage works.
    #[sea_orm(string_value = "drain")]
    Drain,
    /// Gabion basket works.
    #[sea_orm(string_value = "basket")]
    Basket,
    /// Surface sealing.
    #[sea_orm(string_value = "sealing")]
    Sealing,
}

/// Which side of the road an observation covers.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "road_side")]
#[serde(rename_all = "snake_case")]
pub enum RoadSide {
    /// Left carriageway.
    #[sea_orm(string_value = "left")]
    Left,
    /// Right carriageway.
    #[sea_orm(string_value = "right")]
    Right,
    /// Full width.
    #[sea_orm(string_value = "both")]
    Both,
}

/// GPS point status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "point_status")]
#[serde(rename_all = "snake_case")]
pub enum PointStatus {
    /// Planned works location.
    #[sea_orm(string_value = "planned")]
    Planned,
    /// Works underway at the point.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Works complete at the point.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Verified by a supervisor.
    #[sea_orm(string_value = "verified")]
    Verified,
}

/// Quality report type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "quality_report_type")]
#[serde(rename_all = "snake_case")]
pub enum QualityReportType {
    /// Laboratory material test.
    #[sea_orm(string_value = "material_test")]
    MaterialTest,
    /// Site workmanship inspection.
    #[sea_orm(string_value = "site_inspection")]
    SiteInspection,
    /// Environmental compliance audit.
    #[sea_orm(string_value = "environmental_audit")]
    EnvironmentalAudit,
    /// Social safeguard review.
    #[sea_orm(string_value = "social_safeguard")]
    SocialSafeguard,
    /// Health, safety, and environment audit.
    #[sea_orm(string_value = "hse_audit")]
    HseAudit,
}

/// Compliance outcome for a single dimension.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "compliance_status")]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Fully compliant.
    #[sea_orm(string_value = "compliant")]
    Compliant,
    /// Compliant with observations.
    #[sea_orm(string_value = "partially_compliant")]
    PartiallyCompliant,
    /// Non-compliant.
    #[sea_orm(string_value = "non_compliant")]
    NonCompliant,
    /// Dimension does not apply.
    #[sea_orm(string_value = "not_applicable")]
    NotApplicable,
}

/// Quality-gate outcome.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "qa_qc_status")]
#[serde(rename_all = "snake_case")]
pub enum QaQcStatus {
    /// Passed.
    #[sea_orm(string_value = "pass")]
    Pass,
    /// Failed.
    #[sea_orm(string_value = "fail")]
    Fail,
    /// Passed subject to conditions.
    #[sea_orm(string_value = "conditional_pass")]
    ConditionalPass,
    /// Rework required before re-inspection.
    #[sea_orm(string_value = "rework_required")]
    ReworkRequired,
}

/// Milestone category.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "milestone_category")]
#[serde(rename_all = "snake_case")]
pub enum MilestoneCategory {
    /// Contractor mobilization.
    #[sea_orm(string_value = "mobilization")]
    Mobilization,
    /// Earthworks.
    #[sea_orm(string_value = "earthworks")]
    Earthworks,
    /// Drainage structures.
    #[sea_orm(string_value = "drainage")]
    Drainage,
    /// Pavement layers.
    #[sea_orm(string_value = "pavement")]
    Pavement,
    /// Surface sealing.
    #[sea_orm(string_value = "sealing")]
    Sealing,
    /// Practical completion.
    #[sea_orm(string_value = "completion")]
    Completion,
}

/// Milestone status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "milestone_status")]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    /// Not yet started.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Works towards the milestone underway.
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Achieved.
    #[sea_orm(string_value = "achieved")]
    Achieved,
    /// Past its planned date.
    #[sea_orm(string_value = "delayed")]
    Delayed,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Schedule status for a progress report.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "schedule_status")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// On schedule.
    #[sea_orm(string_value = "on_track")]
    OnTrack,
    /// Ahead of schedule.
    #[sea_orm(string_value = "ahead")]
    Ahead,
    /// Behind schedule.
    #[sea_orm(string_value = "behind")]
    Behind,
    /// Behind with a recovery plan required.
    #[sea_orm(string_value = "at_risk")]
    AtRisk,
}

/// Funding record status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "funding_status")]
#[serde(rename_all = "snake_case")]
pub enum FundingStatus {
    /// Awaiting appropriation.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Appropriated and drawable.
    #[sea_orm(string_value = "active")]
    Active,
    /// Fully drawn down.
    #[sea_orm(string_value = "fully_utilized")]
    FullyUtilized,
    /// Closed out.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Funding transaction type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "funding_transaction_type")]
#[serde(rename_all = "snake_case")]
pub enum FundingTransactionType {
    /// Funds released to the project.
    #[sea_orm(string_value = "release")]
    Release,
    /// Funds spent.
    #[sea_orm(string_value = "expenditure")]
    Expenditure,
    /// Funds committed to a contract.
    #[sea_orm(string_value = "commitment")]
    Commitment,
    /// Manual correction.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}
