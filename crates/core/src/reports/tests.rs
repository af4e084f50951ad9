//! Property and unit tests for the report pipeline.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::aggregate::{
    WeightedEntry, bounding_box, count_by, daily_activity, rate, safe_ratio, weighted_mean,
};
use super::export;
use super::service::ReportService;
use super::types::{
    AssignmentRow, ContractorRow, FundingRow, GpsPointRow, ProgressRow, ProjectRow, QualityRow,
    SectionRow,
};

// ============================================================================
// Row builders
// ============================================================================

fn section(project_id: Uuid, length_m: Decimal, progress_pct: Decimal) -> SectionRow {
    SectionRow {
        id: Uuid::new_v4(),
        project_id,
        name: "CH 0+000 - CH 5+000".to_string(),
        length_m,
        progress_pct,
        budget_allocated: dec!(1_000_000),
        budget_spent: dec!(250_000),
    }
}

fn quality(status: &str) -> QualityRow {
    QualityRow {
        id: Uuid::new_v4(),
        project_id: Uuid::new_v4(),
        report_type: "material_test".to_string(),
        test_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        qa_qc_status: status.to_string(),
    }
}

fn gps_point(project_id: Uuid, lat: Decimal, lng: Decimal, phase: &str, day: u32) -> GpsPointRow {
    GpsPointRow {
        id: Uuid::new_v4(),
        project_id,
        latitude: lat,
        longitude: lng,
        phase: phase.to_string(),
        road_side: "left".to_string(),
        status: "completed".to_string(),
        distance_m: Some(dec!(120)),
        recorded_at: Utc.with_ymd_and_hms(2024, 6, day, 9, 30, 0).unwrap(),
    }
}

fn funding(source: &str, allocated: Decimal, utilized: Decimal) -> FundingRow {
    FundingRow {
        id: Uuid::new_v4(),
        project_id: Uuid::new_v4(),
        project: "Highlands Highway Upgrade".to_string(),
        funding_source: source.to_string(),
        budget_allocated: allocated,
        funds_released: allocated / dec!(2),
        funds_utilized: utilized,
        funds_committed: Decimal::ZERO,
        status: "active".to_string(),
    }
}

// ============================================================================
// Aggregator properties
// ============================================================================

proptest! {
    /// The sum of per-category counts always equals the total row count.
    #[test]
    fn prop_breakdown_counts_sum_to_total(
        statuses in prop::collection::vec("(planning|tendering|in_progress|completed)", 0..60),
    ) {
        let counts = count_by(&statuses, Clone::clone);
        let total: u64 = counts.values().sum();
        prop_assert_eq!(total, statuses.len() as u64);
    }

    /// Rates are always in [0, 100] and never divide by zero.
    #[test]
    fn prop_rate_bounded(matching in 0u64..10_000, extra in 0u64..10_000) {
        let total = matching + extra;
        let value = rate(matching, total);
        prop_assert!(value >= Decimal::ZERO);
        prop_assert!(value <= dec!(100));
        if total > 0 {
            prop_assert_eq!(value, Decimal::from(matching) * dec!(100) / Decimal::from(total));
        } else {
            prop_assert_eq!(value, Decimal::ZERO);
        }
    }

    /// Weighted means of in-range values stay in [0, 100] and match the
    /// Σ(value·weight)/Σ(weight) formula.
    #[test]
    fn prop_weighted_mean_bounded(
        raw in prop::collection::vec((1i64..100_000, 0i64..=100), 1..30),
    ) {
        let entries: Vec<WeightedEntry> = raw
            .iter()
            .map(|&(w, v)| WeightedEntry {
                weight: Decimal::from(w),
                value: Decimal::from(v),
            })
            .collect();

        let mean = weighted_mean(&entries);
        prop_assert!(mean >= Decimal::ZERO);
        prop_assert!(mean <= dec!(100));

        let total_weight: Decimal = entries.iter().map(|e| e.weight).sum();
        let weighted_sum: Decimal = entries.iter().map(|e| e.value * e.weight).sum();
        prop_assert_eq!(mean, weighted_sum / total_weight);
    }

    /// A bounding box contains every point it was computed from.
    #[test]
    fn prop_bounding_box_contains_all_points(
        raw in prop::collection::vec((-12_000i64..0, 140_000i64..156_000), 1..40),
    ) {
        // PNG-ish coordinates scaled by 1000
        let coords: Vec<(Decimal, Decimal)> = raw
            .iter()
            .map(|&(lat, lng)| (Decimal::new(lat, 3), Decimal::new(lng, 3)))
            .collect();

        let bbox = bounding_box(&coords).unwrap();
        for (lat, lng) in coords {
            prop_assert!(lat <= bbox.north && lat >= bbox.south);
            prop_assert!(lng <= bbox.east && lng >= bbox.west);
        }
        prop_assert!(bbox.north >= bbox.south);
        prop_assert!(bbox.east >= bbox.west);
    }

    /// Daily activity buckets preserve the total number of entries.
    #[test]
    fn prop_daily_activity_preserves_count(days in prop::collection::vec(1u32..28, 0..50)) {
        let timestamps: Vec<_> = days
            .iter()
            .map(|&d| Utc.with_ymd_and_hms(2024, 6, d, 12, 0, 0).unwrap())
            .collect();
        let histogram = daily_activity(&timestamps);
        let total: u64 = histogram.values().sum();
        prop_assert_eq!(total, timestamps.len() as u64);
    }
}

// ============================================================================
// Aggregator unit tests
// ============================================================================

#[test]
fn safe_ratio_handles_zero_and_negative_denominators() {
    assert_eq!(safe_ratio(dec!(10), dec!(4)), dec!(2.5));
    assert_eq!(safe_ratio(dec!(10), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(safe_ratio(dec!(10), dec!(-5)), Decimal::ZERO);
}

#[test]
fn rate_of_empty_set_is_zero() {
    assert_eq!(rate(0, 0), Decimal::ZERO);
}

#[test]
fn pass_rate_six_of_ten_is_sixty() {
    let reports: Vec<QualityRow> = (0..10)
        .map(|i| quality(if i < 6 { "pass" } else { "fail" }))
        .collect();
    let passes = reports.iter().filter(|q| q.qa_qc_status == "pass").count() as u64;
    assert_eq!(rate(passes, reports.len() as u64), dec!(60.0));
}

#[test]
fn weighted_mean_of_empty_list_is_zero() {
    assert_eq!(weighted_mean(&[]), Decimal::ZERO);
}

#[test]
fn weighted_mean_ignores_nothing_when_weights_differ() {
    let entries = [
        WeightedEntry {
            weight: dec!(5000),
            value: dec!(40),
        },
        WeightedEntry {
            weight: dec!(3000),
            value: dec!(0),
        },
    ];
    // (5000*40 + 3000*0) / 8000 = 25
    assert_eq!(weighted_mean(&entries), dec!(25));
}

#[test]
fn bounding_box_matches_reference_example() {
    let coords = [
        (dec!(-6.3), dec!(143.9)),
        (dec!(-5.0), dec!(144.5)),
    ];
    let bbox = bounding_box(&coords).unwrap();
    assert_eq!(bbox.north, dec!(-5.0));
    assert_eq!(bbox.south, dec!(-6.3));
    assert_eq!(bbox.east, dec!(144.5));
    assert_eq!(bbox.west, dec!(143.9));
}

#[test]
fn bounding_box_of_empty_set_is_none() {
    assert!(bounding_box(&[]).is_none());
}

// ============================================================================
// Assembler tests
// ============================================================================

#[test]
fn overview_seed_scenario_weighted_progress_is_25() {
    let project_id = Uuid::new_v4();
    let projects = vec![ProjectRow {
        id: project_id,
        name: "Mendi Town Roads".to_string(),
        province: "Southern Highlands".to_string(),
        status: "in_progress".to_string(),
        total_distance_m: dec!(8000),
    }];
    let sections = vec![
        section(project_id, dec!(5000), dec!(40)),
        section(project_id, dec!(3000), dec!(0)),
    ];

    let report = ReportService::generate_overview(projects, &sections, &[], &[], 50);

    assert_eq!(report.summary.overall_progress_pct, dec!(25));
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].progress_pct, dec!(25));
    assert_eq!(report.items[0].section_count, 2);
    assert_eq!(report.summary.total_distance_km, dec!(8));
}

#[test]
fn overview_breakdown_counts_sum_to_project_total() {
    let projects: Vec<ProjectRow> = ["planning", "in_progress", "in_progress", "completed"]
        .iter()
        .map(|status| ProjectRow {
            id: Uuid::new_v4(),
            name: "P".to_string(),
            province: "Morobe".to_string(),
            status: (*status).to_string(),
            total_distance_m: dec!(1000),
        })
        .collect();

    let report = ReportService::generate_overview(projects, &[], &[], &[], 50);

    let by_status_total: u64 = report.breakdowns.projects_by_status.values().sum();
    let by_province_total: u64 = report.breakdowns.projects_by_province.values().sum();
    assert_eq!(by_status_total, report.summary.total_projects);
    assert_eq!(by_province_total, report.summary.total_projects);
    assert_eq!(report.breakdowns.projects_by_status["in_progress"], 2);
}

#[test]
fn overview_of_nothing_has_zero_rates() {
    let report = ReportService::generate_overview(vec![], &[], &[], &[], 50);
    assert_eq!(report.summary.overall_progress_pct, Decimal::ZERO);
    assert_eq!(report.summary.quality_pass_rate_pct, Decimal::ZERO);
    assert_eq!(report.summary.budget_utilization_pct, Decimal::ZERO);
    assert!(report.items.is_empty());
}

#[test]
fn progress_delta_is_current_minus_previous() {
    let reports = vec![ProgressRow {
        id: Uuid::new_v4(),
        project_id: Uuid::new_v4(),
        project: "Kokopo Coastal Road".to_string(),
        section: None,
        report_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        current_progress: dec!(55),
        previous_progress: dec!(42.5),
        planned_progress: dec!(60),
        schedule_status: "behind".to_string(),
    }];

    let report = ReportService::generate_progress(&[], reports, 50);

    assert_eq!(report.items[0].progress_delta_pct, dec!(12.5));
    assert_eq!(report.items[0].variance_vs_plan_pct, dec!(-5));
    assert_eq!(report.summary.behind_count, 1);
    assert_eq!(report.summary.on_track_rate_pct, Decimal::ZERO);
}

#[test]
fn contractor_report_averages_only_rated_assignments() {
    let contractor_id = Uuid::new_v4();
    let contractors = vec![ContractorRow {
        id: contractor_id,
        name: "Lagaip Constructions Ltd".to_string(),
        license_number: "CL-0042".to_string(),
        certification_level: "national".to_string(),
        is_active: true,
    }];
    let assignments = vec![
        AssignmentRow {
            contractor_id,
            project_id: Uuid::new_v4(),
            contract_value: dec!(4_000_000),
            contract_status: "active".to_string(),
            performance_rating: Some(dec!(4)),
        },
        AssignmentRow {
            contractor_id,
            project_id: Uuid::new_v4(),
            contract_value: dec!(1_500_000),
            contract_status: "completed".to_string(),
            performance_rating: None,
        },
    ];

    let report = ReportService::generate_contractor(contractors, &assignments, 50);

    assert_eq!(report.summary.total_contract_value, dec!(5_500_000));
    assert_eq!(report.summary.average_performance_rating, dec!(4));
    assert_eq!(report.items[0].projects_assigned, 2);
    assert_eq!(report.items[0].average_rating, Some(dec!(4)));
    let assignment_total: u64 = report.breakdowns.assignments_by_status.values().sum();
    assert_eq!(assignment_total, 2);
}

#[test]
fn province_rollup_weights_progress_by_section_length() {
    let p1 = Uuid::new_v4();
    let p2 = Uuid::new_v4();
    let projects = vec![
        ProjectRow {
            id: p1,
            name: "A".to_string(),
            province: "Enga".to_string(),
            status: "in_progress".to_string(),
            total_distance_m: dec!(5000),
        },
        ProjectRow {
            id: p2,
            name: "B".to_string(),
            province: "Enga".to_string(),
            status: "planning".to_string(),
            total_distance_m: dec!(3000),
        },
    ];
    let sections = vec![
        section(p1, dec!(5000), dec!(40)),
        section(p2, dec!(3000), dec!(0)),
    ];

    let report = ReportService::generate_province(&projects, &sections, 50);

    assert_eq!(report.summary.province_count, 1);
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].province, "Enga");
    assert_eq!(report.items[0].project_count, 2);
    assert_eq!(report.items[0].overall_progress_pct, dec!(25));
}

#[test]
fn gps_report_covers_all_points_but_caps_items() {
    let project_id = Uuid::new_v4();
    let points: Vec<GpsPointRow> = (1..=10)
        .map(|day| {
            gps_point(
                project_id,
                dec!(-6.3) + Decimal::new(i64::from(day), 2),
                dec!(143.9),
                if day % 2 == 0 { "drain" } else { "sealing" },
                day,
            )
        })
        .collect();

    let report = ReportService::generate_gps(points, 3);

    assert_eq!(report.summary.total_points, 10);
    assert_eq!(report.summary.projects_covered, 1);
    assert!(report.summary.bounding_box.is_some());
    assert_eq!(report.items.len(), 3);

    let phase_total: u64 = report.breakdowns.by_phase.values().sum();
    assert_eq!(phase_total, report.summary.total_points);
    let day_total: u64 = report.breakdowns.daily_activity.values().sum();
    assert_eq!(day_total, report.summary.total_points);
}

#[test]
fn gps_report_of_no_points_has_no_bounding_box() {
    let report = ReportService::generate_gps(vec![], 50);
    assert_eq!(report.summary.total_points, 0);
    assert!(report.summary.bounding_box.is_none());
}

#[test]
fn financial_utilization_is_guarded_against_zero_allocation() {
    let records = vec![
        funding("GoPNG", dec!(10_000_000), dec!(2_500_000)),
        funding("ADB", Decimal::ZERO, Decimal::ZERO),
    ];

    let report = ReportService::generate_financial(records, 50);

    assert_eq!(report.summary.utilization_rate_pct, dec!(25));
    assert_eq!(report.items[0].utilization_rate_pct, dec!(25));
    assert_eq!(report.items[1].utilization_rate_pct, Decimal::ZERO);
    assert_eq!(report.breakdowns.allocated_by_source["GoPNG"], dec!(10_000_000));
}

// ============================================================================
// Export and determinism
// ============================================================================

#[test]
fn json_export_round_trips_deep_equal() {
    let project_id = Uuid::new_v4();
    let points = vec![
        gps_point(project_id, dec!(-6.3), dec!(143.9), "drain", 5),
        gps_point(project_id, dec!(-5.0), dec!(144.5), "basket", 6),
    ];
    let report = ReportService::generate_gps(points, 50);

    let json = export::to_json(&report).unwrap();
    let parsed: super::types::GpsReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn assemblers_are_deterministic_for_identical_inputs() {
    let project_id = Uuid::new_v4();
    let projects = vec![ProjectRow {
        id: project_id,
        name: "Sepik Link".to_string(),
        province: "East Sepik".to_string(),
        status: "in_progress".to_string(),
        total_distance_m: dec!(12000),
    }];
    let sections = vec![section(project_id, dec!(12000), dec!(33))];
    let quality_rows = vec![quality("pass"), quality("rework_required")];

    let first =
        ReportService::generate_overview(projects.clone(), &sections, &[], &quality_rows, 50);
    let second = ReportService::generate_overview(projects, &sections, &[], &quality_rows, 50);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn csv_export_lists_itemized_rows() {
    let records = vec![funding("GoPNG", dec!(1000), dec!(100))];
    let report = ReportService::generate_financial(records, 50);

    let csv_text = export::financial_csv(&report).unwrap();
    let mut lines = csv_text.lines();
    assert!(lines.next().unwrap().starts_with("id,project,funding_source"));
    assert_eq!(lines.count(), 1);
    assert!(csv_text.contains("GoPNG"));
    assert!(csv_text.contains("Highlands Highway Upgrade"));
}

#[test]
fn csv_export_of_empty_report_is_header_only() {
    let report = ReportService::generate_gps(vec![], 50);
    let csv_text = export::gps_csv(&report).unwrap();
    assert_eq!(csv_text.lines().count(), 1);
}
