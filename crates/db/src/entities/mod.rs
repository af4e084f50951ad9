//! `SeaORM` entity definitions.

pub mod sea_orm_active_enums;

pub mod contractor_projects;
pub mod contractors;
pub mod funding_transactions;
pub mod gps_points;
pub mod milestone_updates;
pub mod milestones;
pub mod progress_reports;
pub mod project_funding;
pub mod project_sections;
pub mod projects;
pub mod provinces;
pub mod quality_reports;
pub mod sessions;
pub mod user_project_access;
pub mod users;
