//! Integration tests for the repository layer against a real database:
//! - Create full hierarchy (project -> cabinet -> segment -> work entry)
//! - Crew deletion removes member rows (referential cleanup)
//! - Approval is race-safe (second approve returns None)
//! - Unique and check constraint violations

use cometa_db::models::cabinet::CreateCabinet;
use cometa_db::models::crew::CreateCrew;
use cometa_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use cometa_db::models::segment::CreateSegment;
use cometa_db::models::user::NewUser;
use cometa_db::models::work_entry::CreateWorkEntry;
use cometa_db::repositories::{
    CabinetRepo, CrewRepo, ProjectRepo, SegmentRepo, UserRepo, WorkEntryRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(first: &str, email: &str) -> NewUser {
    NewUser {
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        email: Some(email.to_string()),
        phone: None,
        lang_pref: "de".to_string(),
        role: "worker".to_string(),
        skills: None,
        pin_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAA".to_string(),
    }
}

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        customer: Some("Stadtwerke".to_string()),
        city: Some("Berlin".to_string()),
        address: None,
        contact_24h: None,
        start_date: None,
        end_date_plan: None,
        total_length_m: 1000.0,
        base_rate_per_m: 25.0,
        pm_user_id: None,
        language_default: None,
    }
}

fn new_segment(length: f64) -> CreateSegment {
    CreateSegment {
        name: Some("S-1".to_string()),
        length_planned_m: length,
        surface: None,
        area: None,
        depth_req_m: None,
        width_req_m: None,
    }
}

fn new_work_entry(project_id: i64, meters: f64) -> CreateWorkEntry {
    CreateWorkEntry {
        project_id,
        cabinet_id: None,
        segment_id: None,
        crew_id: None,
        work_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        stage_code: "stage_2_excavation".to_string(),
        meters_done_m: meters,
        method: Some("excavator".to_string()),
        width_m: Some(0.4),
        depth_m: Some(0.6),
        cables_count: None,
        has_protection_pipe: Some(true),
        soil_type: None,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Hierarchy CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_full_hierarchy(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Anna", "anna@example.com"))
        .await
        .expect("user create");

    let project = ProjectRepo::create(&pool, &new_project("Nord Ausbau"))
        .await
        .expect("project create");
    assert_eq!(project.name, "Nord Ausbau");
    assert_eq!(project.budget(), 25000.0);

    let cabinet = CabinetRepo::create(
        &pool,
        project.id,
        &CreateCabinet {
            code: Some("NVT-01".to_string()),
            name: None,
            address: None,
            gps_lat: Some(52.52),
            gps_lon: Some(13.40),
        },
    )
    .await
    .expect("cabinet create");

    let segment = SegmentRepo::create(&pool, cabinet.id, &new_segment(120.0))
        .await
        .expect("segment create");
    assert_eq!(segment.surface, "asphalt");
    assert_eq!(segment.status, "open");

    let entry = WorkEntryRepo::create(&pool, user.id, &new_work_entry(project.id, 85.5))
        .await
        .expect("work entry create");
    assert_eq!(entry.meters_done_m, 85.5);
    assert!(!entry.is_approved());
    assert_eq!(entry.user_name.as_deref(), Some("Anna Tester"));
}

#[sqlx::test(migrations = "./migrations")]
async fn project_update_and_filtered_list(pool: PgPool) {
    let a = ProjectRepo::create(&pool, &new_project("Alpha")).await.unwrap();
    ProjectRepo::create(&pool, &new_project("Beta")).await.unwrap();

    let updated = ProjectRepo::update(
        &pool,
        a.id,
        &UpdateProject {
            status: Some("active".to_string()),
            name: None,
            customer: None,
            city: None,
            address: None,
            contact_24h: None,
            start_date: None,
            end_date_plan: None,
            total_length_m: None,
            base_rate_per_m: None,
            pm_user_id: None,
            language_default: None,
        },
    )
    .await
    .expect("update should succeed")
    .expect("project exists");
    assert_eq!(updated.status, "active");

    let filter = ProjectFilter {
        status: Some("active".to_string()),
        ..Default::default()
    };
    let active = ProjectRepo::list(&pool, &filter, 20, 0).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Alpha");
    assert_eq!(ProjectRepo::count(&pool, &filter).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_project_returns_none(pool: PgPool) {
    let found = ProjectRepo::find_by_id(&pool, 999_999).await.unwrap();
    assert!(found.is_none());
}

// ---------------------------------------------------------------------------
// Approval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn approve_twice_second_returns_none(pool: PgPool) {
    let worker = UserRepo::create(&pool, &new_user("Ben", "ben@example.com"))
        .await
        .unwrap();
    let approver = UserRepo::create(&pool, &new_user("Paula", "paula@example.com"))
        .await
        .unwrap();
    let project = ProjectRepo::create(&pool, &new_project("Approvals")).await.unwrap();
    let entry = WorkEntryRepo::create(&pool, worker.id, &new_work_entry(project.id, 10.0))
        .await
        .unwrap();

    let first = WorkEntryRepo::approve(&pool, entry.id, approver.id)
        .await
        .unwrap();
    assert!(first.is_some(), "first approval succeeds");
    assert_eq!(
        first.unwrap().approver_name.as_deref(),
        Some("Paula Tester")
    );

    let second = WorkEntryRepo::approve(&pool, entry.id, approver.id)
        .await
        .unwrap();
    assert!(second.is_none(), "second approval must be rejected");
}

#[sqlx::test(migrations = "./migrations")]
async fn approved_entry_cannot_be_updated_or_deleted(pool: PgPool) {
    let worker = UserRepo::create(&pool, &new_user("Cara", "cara@example.com"))
        .await
        .unwrap();
    let project = ProjectRepo::create(&pool, &new_project("Locked")).await.unwrap();
    let entry = WorkEntryRepo::create(&pool, worker.id, &new_work_entry(project.id, 5.0))
        .await
        .unwrap();
    WorkEntryRepo::approve(&pool, entry.id, worker.id)
        .await
        .unwrap();

    let update = cometa_db::models::work_entry::UpdateWorkEntry {
        meters_done_m: Some(7.0),
        cabinet_id: None,
        segment_id: None,
        crew_id: None,
        work_date: None,
        stage_code: None,
        method: None,
        width_m: None,
        depth_m: None,
        cables_count: None,
        has_protection_pipe: None,
        soil_type: None,
        notes: None,
    };
    let updated = WorkEntryRepo::update(&pool, entry.id, &update).await.unwrap();
    assert!(updated.is_none(), "approved entries are immutable");

    let deleted = WorkEntryRepo::delete(&pool, entry.id).await.unwrap();
    assert!(!deleted, "approved entries are not deletable");
}

// ---------------------------------------------------------------------------
// Crews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn deleting_crew_removes_member_rows(pool: PgPool) {
    let u1 = UserRepo::create(&pool, &new_user("Dan", "dan@example.com"))
        .await
        .unwrap();
    let u2 = UserRepo::create(&pool, &new_user("Eva", "eva@example.com"))
        .await
        .unwrap();

    let crew = CrewRepo::create(
        &pool,
        &CreateCrew {
            name: "Kolonne 3".to_string(),
            project_id: None,
            foreman_user_id: Some(u1.id),
        },
    )
    .await
    .unwrap();

    CrewRepo::add_member(&pool, crew.id, u1.id).await.unwrap();
    CrewRepo::add_member(&pool, crew.id, u2.id).await.unwrap();
    assert_eq!(CrewRepo::member_count(&pool, crew.id).await.unwrap(), 2);

    let deleted = CrewRepo::delete(&pool, crew.id).await.unwrap();
    assert!(deleted);
    assert_eq!(CrewRepo::member_count(&pool, crew.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_crew_member_violates_unique_constraint(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Finn", "finn@example.com"))
        .await
        .unwrap();
    let crew = CrewRepo::create(
        &pool,
        &CreateCrew {
            name: "Kolonne 4".to_string(),
            project_id: None,
            foreman_user_id: None,
        },
    )
    .await
    .unwrap();

    CrewRepo::add_member(&pool, crew.id, user.id).await.unwrap();
    let err = CrewRepo::add_member(&pool, crew.id, user.id)
        .await
        .expect_err("duplicate membership must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_crew_members_crew_user"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_user_email_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("Gina", "dup@example.com"))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("Hank", "dup@example.com"))
        .await
        .expect_err("duplicate email must fail");

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn negative_meters_violates_check_constraint(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("Ivo", "ivo@example.com"))
        .await
        .unwrap();
    let project = ProjectRepo::create(&pool, &new_project("Checks")).await.unwrap();

    let err = WorkEntryRepo::create(&pool, user.id, &new_work_entry(project.id, -1.0))
        .await
        .expect_err("negative meters must fail");
    match err {
        sqlx::Error::Database(db_err) => {
            // 23514 = check_violation
            assert_eq!(db_err.code().as_deref(), Some("23514"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}
