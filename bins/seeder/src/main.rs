//! Database seeder for Trakim development and testing.
//!
//! Seeds provinces, an admin user, and a demo project with sections, a
//! contractor, GPS points, a quality report, and a funding record.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use trakim_core::auth::hash_password;
use trakim_db::entities::{
    contractor_projects, contractors, gps_points, project_funding, project_sections, projects,
    provinces, quality_reports,
    sea_orm_active_enums::{
        CertificationLevel, ComplianceStatus, ContractStatus, FundingStatus, PointStatus,
        ProjectStatus, QaQcStatus, QualityReportType, RoadSide, SectionStatus, UserRole,
        WorkPhase,
    },
    users,
};

/// Demo admin ID (consistent for all seeds)
const ADMIN_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo province ID
const PROVINCE_ID: &str = "00000000-0000-0000-0000-000000000010";
/// Demo project ID
const PROJECT_ID: &str = "00000000-0000-0000-0000-000000000020";
/// Demo section IDs
const SECTION_A_ID: &str = "00000000-0000-0000-0000-000000000021";
const SECTION_B_ID: &str = "00000000-0000-0000-0000-000000000022";
/// Demo contractor ID
const CONTRACTOR_ID: &str = "00000000-0000-0000-0000-000000000030";

/// The 22 provinces would be too much noise for a dev seed; these cover
/// every region.
const PROVINCES: &[(&str, &str, &str)] = &[
    ("Southern Highlands", "SHP", "Highlands"),
    ("Enga", "EPG", "Highlands"),
    ("Western Highlands", "WHP", "Highlands"),
    ("Morobe", "MPL", "Momase"),
    ("East Sepik", "ESP", "Momase"),
    ("Central", "CPM", "Papua"),
    ("East New Britain", "EBR", "Islands"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = trakim_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding provinces...");
    seed_provinces(&db).await;

    println!("Seeding admin user...");
    seed_admin(&db).await;

    println!("Seeding demo contractor...");
    seed_contractor(&db).await;

    println!("Seeding demo project...");
    seed_project(&db).await;

    println!("Seeding complete!");
}

fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

/// Seeds a representative set of provinces.
async fn seed_provinces(db: &DatabaseConnection) {
    let now = Utc::now().into();

    for (index, (name, code, region)) in PROVINCES.iter().enumerate() {
        let province_id = if index == 0 {
            id(PROVINCE_ID)
        } else {
            Uuid::new_v4()
        };

        let exists = provinces::Entity::find()
            .all(db)
            .await
            .unwrap_or_default()
            .iter()
            .any(|p| p.code == *code);
        if exists {
            continue;
        }

        let province = provinces::ActiveModel {
            id: Set(province_id),
            name: Set((*name).to_string()),
            code: Set((*code).to_string()),
            region: Set((*region).to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let Err(e) = province.insert(db).await {
            eprintln!("Failed to insert province {name}: {e}");
        } else {
            println!("  Created province: {name}");
        }
    }
}

/// Seeds the development admin account.
async fn seed_admin(db: &DatabaseConnection) {
    if users::Entity::find_by_id(id(ADMIN_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let password_hash = hash_password("trakim-dev-password").expect("Failed to hash password");

    let admin = users::ActiveModel {
        id: Set(id(ADMIN_ID)),
        email: Set("admin@trakim.dev".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Development Admin".to_string()),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = admin.insert(db).await {
        eprintln!("Failed to insert admin: {e}");
    } else {
        println!("  Created admin: admin@trakim.dev");
    }
}

/// Seeds a demo contractor.
async fn seed_contractor(db: &DatabaseConnection) {
    if contractors::Entity::find_by_id(id(CONTRACTOR_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Contractor already exists, skipping...");
        return;
    }

    let now = Utc::now().into();

    let contractor = contractors::ActiveModel {
        id: Set(id(CONTRACTOR_ID)),
        name: Set("Lagaip Constructions Ltd".to_string()),
        license_number: Set("CL-0042".to_string()),
        certification_level: Set(CertificationLevel::National),
        specializations: Set(serde_json::json!(["sealing", "drainage", "earthworks"])),
        contact_email: Set(Some("office@lagaip.example".to_string())),
        contact_phone: Set(Some("+675 7000 0000".to_string())),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = contractor.insert(db).await {
        eprintln!("Failed to insert contractor: {e}");
    } else {
        println!("  Created contractor: Lagaip Constructions Ltd");
    }
}

/// Seeds the demo project with two sections, an assignment, GPS points, a
/// quality report, and a funding record.
#[allow(clippy::too_many_lines)]
async fn seed_project(db: &DatabaseConnection) {
    if projects::Entity::find_by_id(id(PROJECT_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo project already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let today = Utc::now().date_naive();

    let project = projects::ActiveModel {
        id: Set(id(PROJECT_ID)),
        name: Set("Mendi Town Roads Upgrade".to_string()),
        province_id: Set(id(PROVINCE_ID)),
        status: Set(ProjectStatus::InProgress),
        total_distance_m: Set(dec!(8000)),
        start_latitude: Set(Some(dec!(-6.1478))),
        start_longitude: Set(Some(dec!(143.6568))),
        end_latitude: Set(Some(dec!(-6.1103))),
        end_longitude: Set(Some(dec!(143.7021))),
        sponsor: Set(Some("Department of Works and Highways".to_string())),
        team_lead: Set(Some("K. Pomat".to_string())),
        description: Set(Some("Sealing and drainage upgrade of town roads".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = project.insert(db).await {
        eprintln!("Failed to insert project: {e}");
        return;
    }
    println!("  Created project: Mendi Town Roads Upgrade");

    // Two sections matching the canonical worked example:
    // (5000 m at 40%) + (3000 m at 0%) -> 25% overall
    let sections = [
        (SECTION_A_ID, "CH 0+000 - CH 5+000", dec!(0), dec!(5), dec!(5000), dec!(40)),
        (SECTION_B_ID, "CH 5+000 - CH 8+000", dec!(5), dec!(8), dec!(3000), dec!(0)),
    ];

    for (section_id, name, start_km, end_km, length_m, progress) in sections {
        let section = project_sections::ActiveModel {
            id: Set(id(section_id)),
            project_id: Set(id(PROJECT_ID)),
            name: Set(name.to_string()),
            start_km: Set(start_km),
            end_km: Set(end_km),
            length_m: Set(length_m),
            progress_pct: Set(progress),
            budget_allocated: Set(dec!(2_000_000)),
            budget_spent: Set(dec!(500_000)),
            contractor_id: Set(Some(id(CONTRACTOR_ID))),
            status: Set(if progress > dec!(0) {
                SectionStatus::InProgress
            } else {
                SectionStatus::NotStarted
            }),
            created_at: Set(now),
            updated_at: Set(now),
        };
        if let Err(e) = section.insert(db).await {
            eprintln!("Failed to insert section {name}: {e}");
        }
    }
    println!("  Created 2 sections");

    let assignment = contractor_projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        contractor_id: Set(id(CONTRACTOR_ID)),
        project_id: Set(id(PROJECT_ID)),
        contract_value: Set(dec!(4_000_000)),
        contract_status: Set(ContractStatus::Active),
        performance_rating: Set(None),
        start_date: Set(Some(today)),
        end_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    if let Err(e) = assignment.insert(db).await {
        eprintln!("Failed to insert assignment: {e}");
    }

    let demo_points = [
        (dec!(-6.1478), dec!(143.6568), WorkPhase::Drain),
        (dec!(-6.1390), dec!(143.6701), WorkPhase::Basket),
        (dec!(-6.1280), dec!(143.6850), WorkPhase::Sealing),
    ];
    for (latitude, longitude, phase) in demo_points {
        let point = gps_points::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(id(PROJECT_ID)),
            section_id: Set(Some(id(SECTION_A_ID))),
            contractor_id: Set(Some(id(CONTRACTOR_ID))),
            recorded_by: Set(Some(id(ADMIN_ID))),
            latitude: Set(latitude),
            longitude: Set(longitude),
            phase: Set(phase),
            road_side: Set(RoadSide::Both),
            distance_m: Set(Some(dec!(250))),
            status: Set(PointStatus::Completed),
            note: Set(None),
            recorded_at: Set(now),
            created_at: Set(now),
        };
        if let Err(e) = point.insert(db).await {
            eprintln!("Failed to insert GPS point: {e}");
        }
    }
    println!("  Created 3 GPS points");

    let quality = quality_reports::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(id(PROJECT_ID)),
        section_id: Set(Some(id(SECTION_A_ID))),
        report_type: Set(QualityReportType::SiteInspection),
        test_date: Set(today),
        spec_compliance: Set(ComplianceStatus::Compliant),
        environmental_compliance: Set(ComplianceStatus::Compliant),
        social_compliance: Set(ComplianceStatus::NotApplicable),
        qa_qc_status: Set(QaQcStatus::Pass),
        deficiencies: Set(serde_json::json!([])),
        corrective_actions: Set(serde_json::json!([])),
        follow_up_required: Set(false),
        follow_up_date: Set(None),
        inspector_id: Set(Some(id(ADMIN_ID))),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    if let Err(e) = quality.insert(db).await {
        eprintln!("Failed to insert quality report: {e}");
    }

    let funding = project_funding::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(id(PROJECT_ID)),
        funding_source: Set("GoPNG".to_string()),
        budget_allocated: Set(dec!(10_000_000)),
        funds_released: Set(dec!(4_000_000)),
        funds_utilized: Set(dec!(2_500_000)),
        funds_committed: Set(dec!(1_000_000)),
        status: Set(FundingStatus::Active),
        fiscal_year: Set(2026),
        created_at: Set(now),
        updated_at: Set(now),
    };
    if let Err(e) = funding.insert(db).await {
        eprintln!("Failed to insert funding record: {e}");
    }

    println!("  Created quality report and funding record");
}
