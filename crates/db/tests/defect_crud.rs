//! Integration tests for the defect repository.
//!
//! Exercises creation, lifecycle transitions (including the conditional
//! write that rejects stale editors), partial updates and deletion against
//! a real database.

use chrono::{Duration, Utc};
use pulse_core::defect::{DefectStatus, PointCloud, SensorSummary, Severity};
use pulse_core::lifecycle::{advance, DEFAULT_REPAIR_LEAD_DAYS};
use pulse_db::models::defect::{CreateDefect, UpdateDefect};
use pulse_db::repositories::DefectRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_defect(severity: &str) -> CreateDefect {
    CreateDefect {
        road_id: Some("R-101".to_string()),
        address: None,
        latitude: 40.7128,
        longitude: -74.006,
        severity: severity.to_string(),
        detection_accuracy: 0.92,
        report_date: None,
        images: vec!["/img/ph-001.jpg".to_string()],
        description: Some("Large pothole causing slowdowns".to_string()),
        reported_by: None,
        sensor_summary: None,
    }
}

fn lead() -> Duration {
    Duration::days(DEFAULT_REPAIR_LEAD_DAYS)
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_starts_reported_and_round_trips(pool: PgPool) {
    let mut input = new_defect("high");
    input.sensor_summary = Some(SensorSummary {
        point_cloud: Some(PointCloud {
            points: 12_000,
            density: 380.0,
            accuracy: 0.96,
        }),
        surface: None,
        classification: None,
    });

    let row = DefectRepo::create(&pool, &input).await.unwrap();
    assert_eq!(row.status, "reported");
    assert!(row.scheduled_repair_date.is_none());

    let found = DefectRepo::find_by_id(&pool, row.id).await.unwrap().unwrap();
    let defect = found.into_domain().unwrap();
    assert_eq!(defect.severity, Severity::High);
    assert_eq!(defect.status, DefectStatus::Reported);
    assert_eq!(defect.location.address.as_deref(), Some("Road ID: R-101"));
    assert_eq!(
        defect.sensor_summary.unwrap().point_cloud.unwrap().points,
        12_000
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_missing_returns_none(pool: PgPool) {
    assert!(DefectRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_severity_violates_check_constraint(pool: PgPool) {
    let result = DefectRepo::create(&pool, &new_defect("extreme")).await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_all_orders_newest_report_first(pool: PgPool) {
    let mut older = new_defect("low");
    older.report_date = Some(Utc::now() - Duration::days(3));
    let older = DefectRepo::create(&pool, &older).await.unwrap();
    let newer = DefectRepo::create(&pool, &new_defect("medium")).await.unwrap();

    let rows = DefectRepo::list_all(&pool).await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn walking_the_chain_stamps_dates(pool: PgPool) {
    let row = DefectRepo::create(&pool, &new_defect("critical")).await.unwrap();
    let mut status = DefectStatus::Reported;

    while let Ok(t) = advance(status, Utc::now(), lead()) {
        let updated = DefectRepo::transition(&pool, row.id, &t)
            .await
            .unwrap()
            .expect("transition should apply");
        status = DefectStatus::from_str_db(&updated.status).unwrap();
    }

    let done = DefectRepo::find_by_id(&pool, row.id).await.unwrap().unwrap();
    assert_eq!(done.status, "completed");
    assert!(done.scheduled_repair_date.is_some());
    assert!(done.completion_date.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_transition_is_not_applied(pool: PgPool) {
    let row = DefectRepo::create(&pool, &new_defect("medium")).await.unwrap();

    let first = advance(DefectStatus::Reported, Utc::now(), lead()).unwrap();
    let stale = first.clone();

    assert!(DefectRepo::transition(&pool, row.id, &first)
        .await
        .unwrap()
        .is_some());
    // A second editor still believes the defect is `reported`.
    assert!(DefectRepo::transition(&pool, row.id, &stale)
        .await
        .unwrap()
        .is_none());

    let current = DefectRepo::find_by_id(&pool, row.id).await.unwrap().unwrap();
    assert_eq!(current.status, "inspected");
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_patches_only_given_fields(pool: PgPool) {
    let row = DefectRepo::create(&pool, &new_defect("low")).await.unwrap();

    let patch = UpdateDefect {
        severity: Some("critical".to_string()),
        address: Some(Some("55 Water St".to_string())),
        ..Default::default()
    };
    let updated = DefectRepo::update(&pool, row.id, &patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.severity, "critical");
    assert_eq!(updated.address.as_deref(), Some("55 Water St"));
    assert_eq!(updated.description, row.description);
    assert_eq!(updated.image_urls, row.image_urls);
    assert_eq!(updated.status, "reported");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_with_explicit_null_clears_nullable_columns(pool: PgPool) {
    let mut input = new_defect("medium");
    input.address = Some("12 Canal St".to_string());
    input.sensor_summary = Some(SensorSummary {
        point_cloud: Some(PointCloud {
            points: 9000,
            density: 300.0,
            accuracy: 0.9,
        }),
        ..Default::default()
    });
    let row = DefectRepo::create(&pool, &input).await.unwrap();
    assert!(row.sensor_data.is_some());

    let patch = UpdateDefect {
        address: Some(None),
        description: Some(None),
        sensor_summary: Some(None),
        ..Default::default()
    };
    let updated = DefectRepo::update(&pool, row.id, &patch)
        .await
        .unwrap()
        .unwrap();

    assert!(updated.address.is_none());
    assert!(updated.description.is_none());
    assert!(updated.sensor_data.is_none());
    assert_eq!(updated.road_id.as_deref(), Some("R-101"));
    assert_eq!(updated.severity, "medium");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_row(pool: PgPool) {
    let row = DefectRepo::create(&pool, &new_defect("low")).await.unwrap();
    assert!(DefectRepo::delete(&pool, row.id).await.unwrap());
    assert!(!DefectRepo::delete(&pool, row.id).await.unwrap());
    assert!(DefectRepo::find_by_id(&pool, row.id).await.unwrap().is_none());
}
