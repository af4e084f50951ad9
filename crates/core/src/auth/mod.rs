//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - User role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// System-wide user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including user management and setup.
    Admin,
    /// Oversees the whole road program across provinces.
    ProgramManager,
    /// Manages projects, contractors, and funding.
    Manager,
    /// Supervises field works on assigned projects.
    Supervisor,
    /// Office engineer on assigned projects.
    Engineer,
    /// Field engineer logging GPS points and progress.
    SiteEngineer,
    /// Files and signs off quality/HSE reports.
    QaQcOfficer,
}

impl UserRole {
    /// Roles allowed to create and amend quality reports.
    #[must_use]
    pub const fn can_file_quality_reports(self) -> bool {
        matches!(
            self,
            Self::Admin | Self::QaQcOfficer | Self::SiteEngineer | Self::ProgramManager
        )
    }

    /// Roles allowed to delete quality reports.
    #[must_use]
    pub const fn can_delete_quality_reports(self) -> bool {
        matches!(self, Self::Admin | Self::QaQcOfficer)
    }

    /// Roles allowed to log GPS points from the field.
    #[must_use]
    pub const fn can_log_gps_points(self) -> bool {
        matches!(
            self,
            Self::Admin
                | Self::ProgramManager
                | Self::SiteEngineer
                | Self::Engineer
                | Self::Supervisor
        )
    }

    /// Roles allowed to create/update projects, sections, contractors,
    /// milestones, and funding records.
    #[must_use]
    pub const fn can_manage_projects(self) -> bool {
        matches!(self, Self::Admin | Self::ProgramManager | Self::Manager)
    }

    /// Roles allowed to file progress reports.
    #[must_use]
    pub const fn can_file_progress_reports(self) -> bool {
        self.can_manage_projects() || matches!(self, Self::SiteEngineer | Self::Supervisor)
    }

    /// Roles that see every project without an explicit access grant.
    #[must_use]
    pub const fn has_global_project_access(self) -> bool {
        matches!(self, Self::Admin | Self::ProgramManager)
    }

    /// Roles allowed to manage users and refresh reference data.
    #[must_use]
    pub const fn can_administer(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// All roles, in display order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Admin,
            Self::ProgramManager,
            Self::Manager,
            Self::Supervisor,
            Self::Engineer,
            Self::SiteEngineer,
            Self::QaQcOfficer,
        ]
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::ProgramManager => write!(f, "program_manager"),
            Self::Manager => write!(f, "manager"),
            Self::Supervisor => write!(f, "supervisor"),
            Self::Engineer => write!(f, "engineer"),
            Self::SiteEngineer => write!(f, "site_engineer"),
            Self::QaQcOfficer => write!(f, "qa_qc_officer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "program_manager" => Ok(Self::ProgramManager),
            "manager" => Ok(Self::Manager),
            "supervisor" => Ok(Self::Supervisor),
            "engineer" => Ok(Self::Engineer),
            "site_engineer" => Ok(Self::SiteEngineer),
            "qa_qc_officer" => Ok(Self::QaQcOfficer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_display() {
        for role in UserRole::all() {
            let parsed = UserRole::from_str(&role.to_string()).unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn quality_report_roles_match_policy() {
        assert!(UserRole::Admin.can_file_quality_reports());
        assert!(UserRole::QaQcOfficer.can_file_quality_reports());
        assert!(UserRole::SiteEngineer.can_file_quality_reports());
        assert!(UserRole::ProgramManager.can_file_quality_reports());
        assert!(!UserRole::Manager.can_file_quality_reports());
        assert!(!UserRole::Engineer.can_file_quality_reports());
        assert!(!UserRole::Supervisor.can_file_quality_reports());

        assert!(UserRole::Admin.can_delete_quality_reports());
        assert!(UserRole::QaQcOfficer.can_delete_quality_reports());
        assert!(!UserRole::SiteEngineer.can_delete_quality_reports());
        assert!(!UserRole::ProgramManager.can_delete_quality_reports());
    }

    #[test]
    fn only_admin_and_program_manager_have_global_access() {
        for role in UserRole::all() {
            let expected = matches!(role, UserRole::Admin | UserRole::ProgramManager);
            assert_eq!(role.has_global_project_access(), expected);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(UserRole::from_str("superuser").is_err());
    }
}
