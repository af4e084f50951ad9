//! Tests for report filter helpers.

use chrono::NaiveDate;

use super::{ReportError, day_start, parse_status};
use crate::entities::sea_orm_active_enums::{
    FundingStatus, PointStatus, ProjectStatus, QaQcStatus, ScheduleStatus,
};

#[test]
fn parse_status_accepts_each_entity_vocabulary() {
    let project: ProjectStatus = parse_status("in_progress", "project").unwrap();
    assert_eq!(project, ProjectStatus::InProgress);

    let point: PointStatus = parse_status("verified", "gps point").unwrap();
    assert_eq!(point, PointStatus::Verified);

    let schedule: ScheduleStatus = parse_status("at_risk", "schedule").unwrap();
    assert_eq!(schedule, ScheduleStatus::AtRisk);

    let qa: QaQcStatus = parse_status("conditional_pass", "qa/qc").unwrap();
    assert_eq!(qa, QaQcStatus::ConditionalPass);

    let funding: FundingStatus = parse_status("fully_utilized", "funding").unwrap();
    assert_eq!(funding, FundingStatus::FullyUtilized);
}

#[test]
fn parse_status_rejects_foreign_vocabulary() {
    // A valid project status is not a valid point status
    let result: Result<PointStatus, ReportError> = parse_status("tendering", "gps point");
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ReportError::InvalidStatus { entity: "gps point", .. }
    ));
    assert!(err.to_string().contains("tendering"));
}

#[test]
fn day_start_is_utc_midnight() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let start = day_start(date);
    assert_eq!(start.to_rfc3339(), "2024-06-15T00:00:00+00:00");
}
