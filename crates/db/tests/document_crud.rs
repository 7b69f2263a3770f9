//! Integration tests for the document and user repositories.

use chrono::NaiveDate;
use pulse_db::models::defect::CreateDefect;
use pulse_db::models::document::{CreateDocument, DocumentListParams, UpdateDocument};
use pulse_db::models::user::CreateUser;
use pulse_db::repositories::{DefectRepo, DocumentRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn due(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
}

fn new_document(title: &str, doc_type: &str, due_date: NaiveDate) -> CreateDocument {
    CreateDocument {
        title: title.to_string(),
        doc_type: doc_type.to_string(),
        status: None,
        priority: None,
        due_date,
        assigned_to: "Maintenance Crew".to_string(),
        defect_id: None,
    }
}

async fn seed_defect(pool: &PgPool) -> i64 {
    let input = CreateDefect {
        road_id: None,
        address: Some("230 Park Ave".to_string()),
        latitude: 40.7527,
        longitude: -73.9772,
        severity: "medium".to_string(),
        detection_accuracy: 0.84,
        report_date: None,
        images: vec![],
        description: None,
        reported_by: None,
        sensor_summary: None,
    };
    DefectRepo::create(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults(pool: PgPool) {
    let doc = DocumentRepo::create(&pool, &new_document("  Work order  ", "work_order", due(10)))
        .await
        .unwrap();
    assert_eq!(doc.title, "Work order");
    assert_eq!(doc.status, "pending");
    assert_eq!(doc.priority, "medium");
    assert!(doc.defect_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filtered_combines_conditions(pool: PgPool) {
    let defect_id = seed_defect(&pool).await;

    let mut linked = new_document("Permit", "permit", due(12));
    linked.defect_id = Some(defect_id);
    linked.priority = Some("urgent".to_string());
    DocumentRepo::create(&pool, &linked).await.unwrap();

    DocumentRepo::create(&pool, &new_document("Invoice", "invoice", due(5)))
        .await
        .unwrap();
    DocumentRepo::create(&pool, &new_document("Estimate", "repair_estimate", due(1)))
        .await
        .unwrap();

    let all = DocumentRepo::list_filtered(&pool, &DocumentListParams::default(), 50, 0)
        .await
        .unwrap();
    let titles: Vec<&str> = all.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["Estimate", "Invoice", "Permit"]);

    let params = DocumentListParams {
        priority: Some("urgent".to_string()),
        defect_id: Some(defect_id),
        ..Default::default()
    };
    let filtered = DocumentRepo::list_filtered(&pool, &params, 50, 0)
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title, "Permit");

    let page = DocumentRepo::list_filtered(&pool, &DocumentListParams::default(), 1, 1)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "Invoice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_defect_unlinks_documents(pool: PgPool) {
    let defect_id = seed_defect(&pool).await;
    let mut input = new_document("Inspection", "inspection_report", due(3));
    input.defect_id = Some(defect_id);
    let doc = DocumentRepo::create(&pool, &input).await.unwrap();

    assert_eq!(
        DocumentRepo::list_for_defect(&pool, defect_id).await.unwrap().len(),
        1
    );

    DefectRepo::delete(&pool, defect_id).await.unwrap();
    let after = DocumentRepo::find_by_id(&pool, doc.id).await.unwrap().unwrap();
    assert!(after.defect_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_can_unlink_and_relink_document(pool: PgPool) {
    let defect_id = seed_defect(&pool).await;
    let mut input = new_document("Permit", "permit", due(5));
    input.defect_id = Some(defect_id);
    let doc = DocumentRepo::create(&pool, &input).await.unwrap();

    let untouched = UpdateDocument {
        priority: Some("urgent".to_string()),
        ..Default::default()
    };
    let kept = DocumentRepo::update(&pool, doc.id, &untouched)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.defect_id, Some(defect_id));

    let unlink = UpdateDocument {
        defect_id: Some(None),
        ..Default::default()
    };
    let unlinked = DocumentRepo::update(&pool, doc.id, &unlink)
        .await
        .unwrap()
        .unwrap();
    assert!(unlinked.defect_id.is_none());
    assert_eq!(unlinked.priority, "urgent");
    assert!(DocumentRepo::list_for_defect(&pool, defect_id)
        .await
        .unwrap()
        .is_empty());

    let relink = UpdateDocument {
        defect_id: Some(Some(defect_id)),
        ..Default::default()
    };
    let relinked = DocumentRepo::update(&pool, doc.id, &relink)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(relinked.defect_id, Some(defect_id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete_document(pool: PgPool) {
    let doc = DocumentRepo::create(&pool, &new_document("Cover page", "work_order", due(8)))
        .await
        .unwrap();

    let patch = UpdateDocument {
        status: Some("done".to_string()),
        ..Default::default()
    };
    let updated = DocumentRepo::update(&pool, doc.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "done");
    assert_eq!(updated.title, "Cover page");

    assert!(DocumentRepo::delete(&pool, doc.id).await.unwrap());
    assert!(DocumentRepo::find_by_id(&pool, doc.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_email_is_unique_case_insensitively(pool: PgPool) {
    let input = CreateUser {
        name: "Road Inspector".to_string(),
        email: "inspector@potholepulse.com".to_string(),
        role: Some("inspector".to_string()),
        avatar_url: None,
    };
    let user = UserRepo::create(&pool, &input).await.unwrap();
    assert_eq!(user.role, "inspector");

    let found = UserRepo::find_by_email(&pool, "INSPECTOR@potholepulse.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);

    let dup = CreateUser {
        name: "Someone Else".to_string(),
        email: "Inspector@PotholePulse.com".to_string(),
        role: None,
        avatar_url: None,
    };
    assert!(UserRepo::create(&pool, &dup).await.is_err());
    assert_eq!(UserRepo::list(&pool).await.unwrap().len(), 1);
}
