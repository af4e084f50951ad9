//! Report assembly.
//!
//! One function per report type; each takes already-fetched rows, folds them
//! through the aggregators, and returns a `{summary, breakdowns, items}`
//! object. There is no shared assembler trait; the six reports are composed
//! independently and only reuse the aggregator functions.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use uuid::Uuid;

use super::aggregate::{
    WeightedEntry, bounding_box, count_by, daily_activity, percentage, rate, safe_ratio, sum_by,
    weighted_mean,
};
use super::types::{
    AssignmentRow, ContractorBreakdowns, ContractorItem, ContractorReport, ContractorRow,
    ContractorSummary, FinancialBreakdowns, FinancialItem, FinancialReport, FinancialSummary,
    FundingRow, GpsBreakdowns, GpsItem, GpsPointRow, GpsReport, GpsSummary, OverviewBreakdowns,
    OverviewItem, OverviewReport, OverviewSummary, ProgressBreakdowns, ProgressItem,
    ProgressReport, ProgressRow, ProgressSummary, ProjectRow, ProvinceBreakdowns, ProvinceItem,
    ProvinceReport, ProvinceSummary, QualityRow, SectionRow,
};

/// QA/QC statuses counted as passing for the pass rate.
const PASSING_STATUS: &str = "pass";

/// Schedule statuses counted as on track.
const ON_TRACK_STATUSES: [&str; 2] = ["on_track", "ahead"];

const METRES_PER_KM: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Service for assembling reports from fetched rows.
pub struct ReportService;

impl ReportService {
    /// Assembles the cross-entity overview report.
    #[must_use]
    pub fn generate_overview(
        projects: Vec<ProjectRow>,
        sections: &[SectionRow],
        contractors: &[ContractorRow],
        quality: &[QualityRow],
        item_limit: u64,
    ) -> OverviewReport {
        let sections_by_project = group_sections(sections);

        let total_distance_m: Decimal = projects.iter().map(|p| p.total_distance_m).sum();
        let budget_allocated: Decimal = sections.iter().map(|s| s.budget_allocated).sum();
        let budget_spent: Decimal = sections.iter().map(|s| s.budget_spent).sum();

        let passes = quality
            .iter()
            .filter(|q| q.qa_qc_status == PASSING_STATUS)
            .count() as u64;

        let summary = OverviewSummary {
            total_projects: projects.len() as u64,
            total_distance_km: total_distance_m / METRES_PER_KM,
            overall_progress_pct: section_weighted_progress(sections.iter()),
            active_contractors: contractors.iter().filter(|c| c.is_active).count() as u64,
            quality_pass_rate_pct: rate(passes, quality.len() as u64),
            budget_allocated,
            budget_spent,
            budget_utilization_pct: percentage(budget_spent, budget_allocated),
        };

        let breakdowns = OverviewBreakdowns {
            projects_by_status: count_by(&projects, |p| p.status.clone()),
            projects_by_province: count_by(&projects, |p| p.province.clone()),
        };

        let mut items: Vec<OverviewItem> = projects
            .into_iter()
            .map(|project| {
                let own = sections_by_project
                    .get(&project.id)
                    .map_or(&[][..], Vec::as_slice);
                OverviewItem {
                    project_id: project.id,
                    name: project.name,
                    province: project.province,
                    status: project.status,
                    section_count: own.len() as u64,
                    progress_pct: section_weighted_progress(own.iter().copied()),
                    budget_allocated: own.iter().map(|s| s.budget_allocated).sum(),
                    budget_spent: own.iter().map(|s| s.budget_spent).sum(),
                }
            })
            .collect();
        truncate_items(&mut items, item_limit);

        OverviewReport {
            summary,
            breakdowns,
            items,
        }
    }

    /// Assembles the progress-trend report.
    #[must_use]
    pub fn generate_progress(
        sections: &[SectionRow],
        reports: Vec<ProgressRow>,
        item_limit: u64,
    ) -> ProgressReport {
        let on_track = reports
            .iter()
            .filter(|r| ON_TRACK_STATUSES.contains(&r.schedule_status.as_str()))
            .count() as u64;
        let total = reports.len() as u64;

        let summary = ProgressSummary {
            report_count: total,
            overall_progress_pct: section_weighted_progress(sections.iter()),
            on_track_rate_pct: rate(on_track, total),
            behind_count: total - on_track,
        };

        let breakdowns = ProgressBreakdowns {
            by_schedule_status: count_by(&reports, |r| r.schedule_status.clone()),
            reports_by_project: count_by(&reports, |r| r.project.clone()),
        };

        let mut items: Vec<ProgressItem> = reports
            .into_iter()
            .map(|report| ProgressItem {
                id: report.id,
                project: report.project,
                section: report.section,
                report_date: report.report_date,
                current_progress_pct: report.current_progress,
                previous_progress_pct: report.previous_progress,
                planned_progress_pct: report.planned_progress,
                progress_delta_pct: report.current_progress - report.previous_progress,
                variance_vs_plan_pct: report.current_progress - report.planned_progress,
                schedule_status: report.schedule_status,
            })
            .collect();
        truncate_items(&mut items, item_limit);

        ProgressReport {
            summary,
            breakdowns,
            items,
        }
    }

    /// Assembles the contractor roster report.
    #[must_use]
    pub fn generate_contractor(
        contractors: Vec<ContractorRow>,
        assignments: &[AssignmentRow],
        item_limit: u64,
    ) -> ContractorReport {
        let active = contractors.iter().filter(|c| c.is_active).count() as u64;
        let total = contractors.len() as u64;

        let rated: Vec<Decimal> = assignments
            .iter()
            .filter_map(|a| a.performance_rating)
            .collect();
        let average_rating = safe_ratio(rated.iter().sum(), Decimal::from(rated.len()));

        let summary = ContractorSummary {
            total_contractors: total,
            active_contractors: active,
            active_rate_pct: rate(active, total),
            total_contract_value: assignments.iter().map(|a| a.contract_value).sum(),
            average_performance_rating: average_rating,
        };

        let breakdowns = ContractorBreakdowns {
            by_certification_level: count_by(&contractors, |c| c.certification_level.clone()),
            assignments_by_status: count_by(assignments, |a| a.contract_status.clone()),
        };

        let mut items: Vec<ContractorItem> = contractors
            .into_iter()
            .map(|contractor| {
                let own: Vec<&AssignmentRow> = assignments
                    .iter()
                    .filter(|a| a.contractor_id == contractor.id)
                    .collect();
                let own_rated: Vec<Decimal> =
                    own.iter().filter_map(|a| a.performance_rating).collect();

                ContractorItem {
                    contractor_id: contractor.id,
                    name: contractor.name,
                    license_number: contractor.license_number,
                    certification_level: contractor.certification_level,
                    is_active: contractor.is_active,
                    projects_assigned: own.len() as u64,
                    total_contract_value: own.iter().map(|a| a.contract_value).sum(),
                    average_rating: if own_rated.is_empty() {
                        None
                    } else {
                        Some(safe_ratio(
                            own_rated.iter().sum(),
                            Decimal::from(own_rated.len()),
                        ))
                    },
                }
            })
            .collect();
        truncate_items(&mut items, item_limit);

        ContractorReport {
            summary,
            breakdowns,
            items,
        }
    }

    /// Assembles the per-province rollup report.
    #[must_use]
    pub fn generate_province(
        projects: &[ProjectRow],
        sections: &[SectionRow],
        item_limit: u64,
    ) -> ProvinceReport {
        let sections_by_project = group_sections(sections);

        // province -> (project count, total distance, weighted entries)
        let mut rollup: HashMap<&str, (u64, Decimal, Vec<WeightedEntry>)> = HashMap::new();
        for project in projects {
            let entry = rollup.entry(project.province.as_str()).or_insert((
                0,
                Decimal::ZERO,
                Vec::new(),
            ));
            entry.0 += 1;
            entry.1 += project.total_distance_m;
            if let Some(own) = sections_by_project.get(&project.id) {
                entry.2.extend(own.iter().map(|s| WeightedEntry {
                    weight: s.length_m,
                    value: s.progress_pct,
                }));
            }
        }

        let total_distance_m: Decimal = projects.iter().map(|p| p.total_distance_m).sum();

        let summary = ProvinceSummary {
            province_count: rollup.len() as u64,
            project_count: projects.len() as u64,
            total_distance_km: total_distance_m / METRES_PER_KM,
        };

        let breakdowns = ProvinceBreakdowns {
            projects_by_status: count_by(projects, |p| p.status.clone()),
        };

        let mut items: Vec<ProvinceItem> = rollup
            .into_iter()
            .map(|(province, (count, distance_m, entries))| ProvinceItem {
                province: province.to_string(),
                project_count: count,
                total_distance_km: distance_m / METRES_PER_KM,
                overall_progress_pct: weighted_mean(&entries),
            })
            .collect();
        items.sort_by(|a, b| a.province.cmp(&b.province));
        truncate_items(&mut items, item_limit);

        ProvinceReport {
            summary,
            breakdowns,
            items,
        }
    }

    /// Assembles the GPS field-log report.
    ///
    /// Summary and breakdowns cover every point in scope; only the itemized
    /// list is capped by the filter's limit.
    #[must_use]
    pub fn generate_gps(points: Vec<GpsPointRow>, item_limit: u64) -> GpsReport {
        let coordinates: Vec<(Decimal, Decimal)> =
            points.iter().map(|p| (p.latitude, p.longitude)).collect();
        let timestamps: Vec<_> = points.iter().map(|p| p.recorded_at).collect();
        let projects: BTreeSet<Uuid> = points.iter().map(|p| p.project_id).collect();

        let summary = GpsSummary {
            total_points: points.len() as u64,
            projects_covered: projects.len() as u64,
            bounding_box: bounding_box(&coordinates),
        };

        let breakdowns = GpsBreakdowns {
            by_phase: count_by(&points, |p| p.phase.clone()),
            by_status: count_by(&points, |p| p.status.clone()),
            daily_activity: daily_activity(&timestamps),
        };

        let mut items: Vec<GpsItem> = points
            .into_iter()
            .map(|point| GpsItem {
                id: point.id,
                project_id: point.project_id,
                latitude: point.latitude,
                longitude: point.longitude,
                phase: point.phase,
                road_side: point.road_side,
                status: point.status,
                distance_m: point.distance_m,
                recorded_at: point.recorded_at,
            })
            .collect();
        truncate_items(&mut items, item_limit);

        GpsReport {
            summary,
            breakdowns,
            items,
        }
    }

    /// Assembles the funding/utilization report.
    #[must_use]
    pub fn generate_financial(records: Vec<FundingRow>, item_limit: u64) -> FinancialReport {
        let total_allocated: Decimal = records.iter().map(|r| r.budget_allocated).sum();
        let total_released: Decimal = records.iter().map(|r| r.funds_released).sum();
        let total_utilized: Decimal = records.iter().map(|r| r.funds_utilized).sum();
        let total_committed: Decimal = records.iter().map(|r| r.funds_committed).sum();

        let summary = FinancialSummary {
            record_count: records.len() as u64,
            total_allocated,
            total_released,
            total_utilized,
            total_committed,
            utilization_rate_pct: percentage(total_utilized, total_allocated),
            release_rate_pct: percentage(total_released, total_allocated),
        };

        let breakdowns = FinancialBreakdowns {
            records_by_status: count_by(&records, |r| r.status.clone()),
            allocated_by_source: sum_by(
                &records,
                |r| r.funding_source.clone(),
                |r| r.budget_allocated,
            ),
        };

        let mut items: Vec<FinancialItem> = records
            .into_iter()
            .map(|record| FinancialItem {
                id: record.id,
                project: record.project,
                funding_source: record.funding_source,
                utilization_rate_pct: percentage(record.funds_utilized, record.budget_allocated),
                budget_allocated: record.budget_allocated,
                funds_released: record.funds_released,
                funds_utilized: record.funds_utilized,
                funds_committed: record.funds_committed,
                status: record.status,
            })
            .collect();
        truncate_items(&mut items, item_limit);

        FinancialReport {
            summary,
            breakdowns,
            items,
        }
    }
}

/// Groups sections by owning project.
fn group_sections(sections: &[SectionRow]) -> HashMap<Uuid, Vec<&SectionRow>> {
    let mut map: HashMap<Uuid, Vec<&SectionRow>> = HashMap::new();
    for section in sections {
        map.entry(section.project_id).or_default().push(section);
    }
    map
}

/// Length-weighted progress over sections; zero when total length is zero.
fn section_weighted_progress<'a>(sections: impl Iterator<Item = &'a SectionRow>) -> Decimal {
    let entries: Vec<WeightedEntry> = sections
        .map(|s| WeightedEntry {
            weight: s.length_m,
            value: s.progress_pct,
        })
        .collect();
    weighted_mean(&entries)
}

/// Caps an itemized list at the filter's limit.
fn truncate_items<T>(items: &mut Vec<T>, limit: u64) {
    items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
}
