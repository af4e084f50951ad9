//! Initial database migration.
//!
//! Creates all enums and core tables with their foreign keys and indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: REFERENCE DATA AND USERS
        // ============================================================
        db.execute_unprepared(PROVINCES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: PROJECTS AND SECTIONS
        // ============================================================
        db.execute_unprepared(PROJECTS_SQL).await?;
        db.execute_unprepared(CONTRACTORS_SQL).await?;
        db.execute_unprepared(PROJECT_SECTIONS_SQL).await?;
        db.execute_unprepared(CONTRACTOR_PROJECTS_SQL).await?;
        db.execute_unprepared(USER_PROJECT_ACCESS_SQL).await?;

        // ============================================================
        // PART 4: FIELD DATA
        // ============================================================
        db.execute_unprepared(GPS_POINTS_SQL).await?;
        db.execute_unprepared(QUALITY_REPORTS_SQL).await?;
        db.execute_unprepared(MILESTONES_SQL).await?;
        db.execute_unprepared(MILESTONE_UPDATES_SQL).await?;
        db.execute_unprepared(PROGRESS_REPORTS_SQL).await?;

        // ============================================================
        // PART 5: FUNDING
        // ============================================================
        db.execute_unprepared(PROJECT_FUNDING_SQL).await?;
        db.execute_unprepared(FUNDING_TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM (
    'admin', 'program_manager', 'manager', 'supervisor',
    'engineer', 'site_engineer', 'qa_qc_officer'
);
CREATE TYPE access_level AS ENUM ('read', 'write', 'manage');
CREATE TYPE project_status AS ENUM (
    'planning', 'tendering', 'in_progress', 'on_hold', 'completed', 'cancelled'
);
CREATE TYPE section_status AS ENUM ('not_started', 'in_progress', 'completed');
CREATE TYPE certification_level AS ENUM ('provincial', 'national', 'international');
CREATE TYPE contract_status AS ENUM (
    'draft', 'active', 'suspended', 'completed', 'terminated'
);
CREATE TYPE work_phase AS ENUM ('drain', 'basket', 'sealing');
CREATE TYPE road_side AS ENUM ('left', 'right', 'both');
CREATE TYPE point_status AS ENUM ('planned', 'in_progress', 'completed', 'verified');
CREATE TYPE quality_report_type AS ENUM (
    'material_test', 'site_inspection', 'environmental_audit',
    'social_safeguard', 'hse_audit'
);
CREATE TYPE compliance_status AS ENUM (
    'compliant', 'partially_compliant', 'non_compliant', 'not_applicable'
);
CREATE TYPE qa_qc_status AS ENUM ('pass', 'fail', 'conditional_pass', 'rework_required');
CREATE TYPE milestone_category AS ENUM (
    'mobilization', 'earthworks', 'drainage', 'pavement', 'sealing', 'completion'
);
CREATE TYPE milestone_status AS ENUM (
    'pending', 'in_progress', 'achieved', 'delayed', 'cancelled'
);
CREATE TYPE schedule_status AS ENUM ('on_track', 'ahead', 'behind', 'at_risk');
CREATE TYPE funding_status AS ENUM ('pending', 'active', 'fully_utilized', 'closed');
CREATE TYPE funding_transaction_type AS ENUM (
    'release', 'expenditure', 'commitment', 'adjustment'
);
";

const PROVINCES_SQL: &str = r"
CREATE TABLE provinces (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL UNIQUE,
    code VARCHAR(10) NOT NULL UNIQUE,
    region VARCHAR(50) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PROJECTS_SQL: &str = r"
CREATE TABLE projects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    province_id UUID NOT NULL REFERENCES provinces(id),
    status project_status NOT NULL DEFAULT 'planning',
    total_distance_m NUMERIC(14, 2) NOT NULL DEFAULT 0,
    start_latitude NUMERIC(10, 7),
    start_longitude NUMERIC(10, 7),
    end_latitude NUMERIC(10, 7),
    end_longitude NUMERIC(10, 7),
    sponsor VARCHAR(255),
    team_lead VARCHAR(255),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_projects_province ON projects(province_id);
CREATE INDEX idx_projects_status ON projects(status);
CREATE INDEX idx_projects_created ON projects(created_at);
";

const CONTRACTORS_SQL: &str = r"
CREATE TABLE contractors (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    license_number VARCHAR(50) NOT NULL UNIQUE,
    certification_level certification_level NOT NULL,
    specializations JSONB NOT NULL DEFAULT '[]',
    contact_email VARCHAR(255),
    contact_phone VARCHAR(50),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PROJECT_SECTIONS_SQL: &str = r"
CREATE TABLE project_sections (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    start_km NUMERIC(10, 3) NOT NULL,
    end_km NUMERIC(10, 3) NOT NULL,
    length_m NUMERIC(14, 2) NOT NULL,
    progress_pct NUMERIC(5, 2) NOT NULL DEFAULT 0,
    budget_allocated NUMERIC(16, 2) NOT NULL DEFAULT 0,
    budget_spent NUMERIC(16, 2) NOT NULL DEFAULT 0,
    contractor_id UUID REFERENCES contractors(id) ON DELETE SET NULL,
    status section_status NOT NULL DEFAULT 'not_started',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_progress_pct CHECK (progress_pct >= 0 AND progress_pct <= 100),
    CONSTRAINT chk_chainage CHECK (end_km >= start_km)
);

CREATE INDEX idx_sections_project ON project_sections(project_id);
CREATE INDEX idx_sections_contractor ON project_sections(contractor_id);
";

const CONTRACTOR_PROJECTS_SQL: &str = r"
CREATE TABLE contractor_projects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    contractor_id UUID NOT NULL REFERENCES contractors(id) ON DELETE CASCADE,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    contract_value NUMERIC(16, 2) NOT NULL DEFAULT 0,
    contract_status contract_status NOT NULL DEFAULT 'draft',
    performance_rating NUMERIC(3, 2),
    start_date DATE,
    end_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_contractor_project UNIQUE (contractor_id, project_id),
    CONSTRAINT chk_rating CHECK (
        performance_rating IS NULL
        OR (performance_rating >= 0 AND performance_rating <= 5)
    )
);

CREATE INDEX idx_assignments_project ON contractor_projects(project_id);
";

const USER_PROJECT_ACCESS_SQL: &str = r"
CREATE TABLE user_project_access (
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    access_level access_level NOT NULL DEFAULT 'read',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (user_id, project_id)
);

CREATE INDEX idx_access_project ON user_project_access(project_id);
";

const GPS_POINTS_SQL: &str = r"
CREATE TABLE gps_points (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    section_id UUID REFERENCES project_sections(id) ON DELETE SET NULL,
    contractor_id UUID REFERENCES contractors(id) ON DELETE SET NULL,
    recorded_by UUID REFERENCES users(id) ON DELETE SET NULL,
    latitude NUMERIC(10, 7) NOT NULL,
    longitude NUMERIC(10, 7) NOT NULL,
    phase work_phase NOT NULL,
    road_side road_side NOT NULL DEFAULT 'both',
    distance_m NUMERIC(12, 2),
    status point_status NOT NULL DEFAULT 'planned',
    note TEXT,
    recorded_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_latitude CHECK (latitude >= -90 AND latitude <= 90),
    CONSTRAINT chk_longitude CHECK (longitude >= -180 AND longitude <= 180)
);

CREATE INDEX idx_gps_project_recorded ON gps_points(project_id, recorded_at);
CREATE INDEX idx_gps_phase ON gps_points(phase);
";

const QUALITY_REPORTS_SQL: &str = r"
CREATE TABLE quality_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    section_id UUID REFERENCES project_sections(id) ON DELETE SET NULL,
    report_type quality_report_type NOT NULL,
    test_date DATE NOT NULL,
    spec_compliance compliance_status NOT NULL DEFAULT 'not_applicable',
    environmental_compliance compliance_status NOT NULL DEFAULT 'not_applicable',
    social_compliance compliance_status NOT NULL DEFAULT 'not_applicable',
    qa_qc_status qa_qc_status NOT NULL,
    deficiencies JSONB NOT NULL DEFAULT '[]',
    corrective_actions JSONB NOT NULL DEFAULT '[]',
    follow_up_required BOOLEAN NOT NULL DEFAULT false,
    follow_up_date DATE,
    inspector_id UUID REFERENCES users(id) ON DELETE SET NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_quality_project_date ON quality_reports(project_id, test_date);
CREATE INDEX idx_quality_status ON quality_reports(qa_qc_status);
";

const MILESTONES_SQL: &str = r"
CREATE TABLE milestones (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    category milestone_category NOT NULL,
    planned_date DATE NOT NULL,
    actual_date DATE,
    status milestone_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_milestones_project ON milestones(project_id);
";

const MILESTONE_UPDATES_SQL: &str = r"
CREATE TABLE milestone_updates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    milestone_id UUID NOT NULL REFERENCES milestones(id) ON DELETE CASCADE,
    status milestone_status NOT NULL,
    note TEXT,
    updated_by UUID REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_milestone_updates_milestone ON milestone_updates(milestone_id, created_at);
";

const PROGRESS_REPORTS_SQL: &str = r"
CREATE TABLE progress_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    section_id UUID REFERENCES project_sections(id) ON DELETE SET NULL,
    report_date DATE NOT NULL,
    current_progress NUMERIC(5, 2) NOT NULL,
    previous_progress NUMERIC(5, 2) NOT NULL DEFAULT 0,
    planned_progress NUMERIC(5, 2) NOT NULL DEFAULT 0,
    schedule_status schedule_status NOT NULL DEFAULT 'on_track',
    works_completed JSONB NOT NULL DEFAULT '[]',
    issues TEXT,
    reported_by UUID REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_current_progress CHECK (current_progress >= 0 AND current_progress <= 100)
);

CREATE INDEX idx_progress_project_date ON progress_reports(project_id, report_date);
";

const PROJECT_FUNDING_SQL: &str = r"
CREATE TABLE project_funding (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    funding_source VARCHAR(255) NOT NULL,
    budget_allocated NUMERIC(16, 2) NOT NULL DEFAULT 0,
    funds_released NUMERIC(16, 2) NOT NULL DEFAULT 0,
    funds_utilized NUMERIC(16, 2) NOT NULL DEFAULT 0,
    funds_committed NUMERIC(16, 2) NOT NULL DEFAULT 0,
    status funding_status NOT NULL DEFAULT 'pending',
    fiscal_year INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_funding_project ON project_funding(project_id);
";

const FUNDING_TRANSACTIONS_SQL: &str = r"
CREATE TABLE funding_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    funding_id UUID NOT NULL REFERENCES project_funding(id) ON DELETE CASCADE,
    transaction_type funding_transaction_type NOT NULL,
    amount NUMERIC(16, 2) NOT NULL,
    transaction_date DATE NOT NULL,
    reference VARCHAR(100),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_funding_tx_funding ON funding_transactions(funding_id, transaction_date);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS funding_transactions CASCADE;
DROP TABLE IF EXISTS project_funding CASCADE;
DROP TABLE IF EXISTS progress_reports CASCADE;
DROP TABLE IF EXISTS milestone_updates CASCADE;
DROP TABLE IF EXISTS milestones CASCADE;
DROP TABLE IF EXISTS quality_reports CASCADE;
DROP TABLE IF EXISTS gps_points CASCADE;
DROP TABLE IF EXISTS user_project_access CASCADE;
DROP TABLE IF EXISTS contractor_projects CASCADE;
DROP TABLE IF EXISTS project_sections CASCADE;
DROP TABLE IF EXISTS contractors CASCADE;
DROP TABLE IF EXISTS projects CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS provinces CASCADE;
DROP TYPE IF EXISTS funding_transaction_type;
DROP TYPE IF EXISTS funding_status;
DROP TYPE IF EXISTS schedule_status;
DROP TYPE IF EXISTS milestone_status;
DROP TYPE IF EXISTS milestone_category;
DROP TYPE IF EXISTS qa_qc_status;
DROP TYPE IF EXISTS compliance_status;
DROP TYPE IF EXISTS quality_report_type;
DROP TYPE IF EXISTS point_status;
DROP TYPE IF EXISTS road_side;
DROP TYPE IF EXISTS work_phase;
DROP TYPE IF EXISTS contract_status;
DROP TYPE IF EXISTS certification_level;
DROP TYPE IF EXISTS section_status;
DROP TYPE IF EXISTS project_status;
DROP TYPE IF EXISTS access_level;
DROP TYPE IF EXISTS user_role;
";
