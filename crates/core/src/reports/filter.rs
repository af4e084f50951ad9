//! Typed report filters.
//!
//! The filter is an explicit struct with one optional field per recognized
//! key: unrecognized keys cannot be expressed, and an absent field imposes no
//! restriction. Which timestamp column a date range applies to is decided by
//! the entity being queried (`test_date` for quality reports, `recorded_at`
//! for GPS points, `report_date` for progress reports, `created_at`
//! elsewhere); the filter itself only carries the bounds.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Default cap on itemized rows in a report.
pub const DEFAULT_ITEM_LIMIT: u64 = 50;

/// Constraints for a report query. Construct via [`ReportFilter::builder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportFilter {
    /// Restrict to one project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    /// Restrict to one project section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<Uuid>,
    /// Restrict to projects in one province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_id: Option<Uuid>,
    /// Restrict to one contractor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor_id: Option<Uuid>,
    /// Restrict to one status value (entity-specific vocabulary).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Inclusive lower bound on the entity's date field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the entity's date field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Cap on itemized rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl ReportFilter {
    /// Starts building a filter.
    #[must_use]
    pub fn builder() -> ReportFilterBuilder {
        ReportFilterBuilder::default()
    }

    /// Returns the itemized-row cap, falling back to [`DEFAULT_ITEM_LIMIT`].
    #[must_use]
    pub fn item_limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_ITEM_LIMIT)
    }

    /// Returns true if `date` falls inside the (inclusive) date window.
    ///
    /// An absent bound imposes no restriction on that side.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        in_date_range(date, self.start_date, self.end_date)
    }
}

/// Inclusive date-window check; `None` bounds match everything.
#[must_use]
pub fn in_date_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

/// Builder for [`ReportFilter`].
#[derive(Debug, Clone, Default)]
pub struct ReportFilterBuilder {
    filter: ReportFilter,
}

impl ReportFilterBuilder {
    /// Restricts to one project.
    #[must_use]
    pub const fn project_id(mut self, id: Uuid) -> Self {
        self.filter.project_id = Some(id);
        self
    }

    /// Restricts to one section.
    #[must_use]
    pub const fn section_id(mut self, id: Uuid) -> Self {
        self.filter.section_id = Some(id);
        self
    }

    /// Restricts to one province.
    #[must_use]
    pub const fn province_id(mut self, id: Uuid) -> Self {
        self.filter.province_id = Some(id);
        self
    }

    /// Restricts to one contractor.
    #[must_use]
    pub const fn contractor_id(mut self, id: Uuid) -> Self {
        self.filter.contractor_id = Some(id);
        self
    }

    /// Restricts to one status value.
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.filter.status = Some(status.into());
        self
    }

    /// Sets the inclusive start of the date window.
    #[must_use]
    pub const fn start_date(mut self, date: NaiveDate) -> Self {
        self.filter.start_date = Some(date);
        self
    }

    /// Sets the inclusive end of the date window.
    #[must_use]
    pub const fn end_date(mut self, date: NaiveDate) -> Self {
        self.filter.end_date = Some(date);
        self
    }

    /// Caps the itemized rows.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.filter.limit = Some(limit);
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> ReportFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_filter_matches_all_dates() {
        let filter = ReportFilter::builder().build();
        assert!(filter.contains_date(d(1990, 1, 1)));
        assert!(filter.contains_date(d(2124, 12, 31)));
        assert_eq!(filter.item_limit(), DEFAULT_ITEM_LIMIT);
    }

    #[test]
    fn date_window_bounds_are_inclusive() {
        let filter = ReportFilter::builder()
            .start_date(d(2024, 6, 1))
            .end_date(d(2024, 6, 30))
            .build();

        assert!(filter.contains_date(d(2024, 6, 15)));
        assert!(filter.contains_date(d(2024, 6, 1)));
        assert!(filter.contains_date(d(2024, 6, 30)));
        assert!(!filter.contains_date(d(2024, 5, 31)));
        assert!(!filter.contains_date(d(2024, 7, 1)));
    }

    #[test]
    fn narrower_end_excludes_record() {
        // test_date 2024-06-15 is excluded once the window ends 2024-06-10
        let filter = ReportFilter::builder()
            .start_date(d(2024, 6, 1))
            .end_date(d(2024, 6, 10))
            .build();

        assert!(!filter.contains_date(d(2024, 6, 15)));
    }

    #[test]
    fn builder_sets_only_named_fields() {
        let id = Uuid::new_v4();
        let filter = ReportFilter::builder().project_id(id).limit(10).build();

        assert_eq!(filter.project_id, Some(id));
        assert_eq!(filter.item_limit(), 10);
        assert!(filter.contractor_id.is_none());
        assert!(filter.province_id.is_none());
        assert!(filter.status.is_none());
    }

    #[test]
    fn absent_fields_serialize_to_nothing() {
        let filter = ReportFilter::builder().limit(50).build();
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json, serde_json::json!({ "limit": 50 }));
    }
}
