//! HTTP-level integration tests for document endpoints.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_document(app: Router, body: Value) -> Value {
    let response = post_json(app, "/api/v1/documents", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn document(title: &str, doc_type: &str, due_date: &str) -> Value {
    json!({
        "title": title,
        "doc_type": doc_type,
        "due_date": due_date,
        "assigned_to": "Maintenance Crew 3"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_document_applies_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = document("  Permit for Main St  ", "permit", "2030-06-01");
    let data = create_document(app, body).await;

    assert_eq!(data["title"], "Permit for Main St");
    assert_eq!(data["status"], "pending");
    assert_eq!(data["priority"], "medium");
    assert_eq!(data["due_date"], "2030-06-01");
    assert_eq!(data["overdue"], false);
    assert!(data["defect_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn past_due_open_document_is_overdue(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let data = create_document(app, document("Invoice #88", "invoice", "2020-01-01")).await;
    assert_eq!(data["overdue"], true);
    let id = data["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/documents/{id}"),
        json!({ "status": "done" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "done");
    assert_eq!(json["data"]["overdue"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_document_rejects_invalid_input(pool: PgPool) {
    let cases = [
        document("   ", "permit", "2030-06-01"),
        document("Estimate", "quote", "2030-06-01"),
        {
            let mut body = document("Estimate", "repair_estimate", "2030-06-01");
            body["priority"] = json!("critical");
            body
        },
        {
            let mut body = document("Estimate", "repair_estimate", "2030-06-01");
            body["assigned_to"] = json!(" ");
            body
        },
    ];

    for body in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/documents", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_document_for_missing_defect_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = document("Work order", "work_order", "2030-06-01");
    body["defect_id"] = json!(999_999);

    let response = post_json(app, "/api/v1/documents", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_documents_filters_and_orders_by_due_date(pool: PgPool) {
    for (title, doc_type, due) in [
        ("Late permit", "permit", "2030-03-01"),
        ("Early order", "work_order", "2030-01-01"),
        ("Middle order", "work_order", "2030-02-01"),
    ] {
        create_document(common::build_test_app(pool.clone()), document(title, doc_type, due)).await;
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/documents").await).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Early order", "Middle order", "Late permit"]);

    let app = common::build_test_app(pool.clone());
    let uri = "/api/v1/documents?doc_type=work_order&limit=1&offset=1";
    let json = body_json(get(app, uri).await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Middle order");

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/documents?status=archived").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_update_delete_document(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = document("Inspection", "inspection_report", "2030-04-01");
    let id = create_document(app, body).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/documents/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/documents/{id}"),
        json!({ "priority": "urgent", "status": "in_process" }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["priority"], "urgent");
    assert_eq!(json["data"]["status"], "in_process");
    assert_eq!(json["data"]["title"], "Inspection");

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/documents/{id}"),
        json!({ "status": "closed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/documents/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/documents/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
