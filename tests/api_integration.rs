//! End-to-end HTTP tests
//!
//! These tests drive the full actix application (routing, extractors,
//! validation, handlers and error mapping) against the in-memory repository.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{test, web, App};
use employee_service::configure;
use employee_service::repository::{EmployeeRepository, InMemoryEmployeeRepository};
use serde_json::{json, Value};

/// Build the test application around the given repository
macro_rules! setup_app {
    ($repo:expr) => {{
        let repo: Arc<dyn EmployeeRepository> = $repo;
        test::init_service(
            App::new()
                .app_data(web::Data::from(repo))
                .wrap(NormalizePath::new(TrailingSlash::Trim))
                .configure(configure),
        )
        .await
    }};
}

fn ana() -> Value {
    json!({
        "employee_id": "E100",
        "first_name": "Ana",
        "last_name": "Lee",
        "date_of_birth": "1990-01-01",
        "contacts": [{ "email_id": "ana@x.com" }]
    })
}

fn full_payload() -> Value {
    json!({
        "employee_id": "E200",
        "first_name": "Ravi",
        "middle_name": "K",
        "last_name": "Shah",
        "date_of_birth": "1985-06-15",
        "gender": "male",
        "blood_group": "O+",
        "nationality": "Indian",
        "marital_status": "married",
        "marriage_date": "2012-02-14",
        "career_ambition": "Lead the platform team",
        "strengths": ["focus", "mentoring"],
        "weaknesses": ["delegation"],
        "referred_by_employee": true,
        "referrer_name": "Meera",
        "referrer_contact_no": "5550199",
        "contacts": [
            { "email_id": "ravi@x.com", "mobile_phone_no": "5550100" },
            { "email_id": "ravi.home@x.com", "telephone_no": "0201234" }
        ],
        "addresses": [
            { "address_type": "current", "city": "Pune", "district": "Pune", "state": "MH", "pin_code": "411001" },
            { "address_type": "permanent", "city": "Surat", "district": "Surat", "state": "GJ", "pin_code": "395003" }
        ]
    })
}

macro_rules! call {
    ($app:expr, $req:expr) => {{
        let response = test::call_service(&$app, $req.to_request()).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_health_check() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (status, body) = call!(app, test::TestRequest::get().uri("/"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_create_returns_hydrated_aggregate() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(ana())
    );

    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_str().is_some());
    assert_eq!(body["employee_id"], "E100");
    assert_eq!(body["referred_by_employee"], false);
    assert_eq!(body["contacts"].as_array().unwrap().len(), 1);
    assert_eq!(body["contacts"][0]["email_id"], "ana@x.com");
    assert!(body["contacts"][0]["id"].as_str().is_some());
    assert!(body["addresses"].as_array().unwrap().is_empty());
    assert!(body["created_at"].as_str().is_some());
    assert!(body["updated_at"].as_str().is_some());
}

#[actix_web::test]
async fn test_duplicate_employee_id_is_rejected_without_side_effects() {
    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let app = setup_app!(repo.clone());

    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(ana())
    );
    assert_eq!(status, StatusCode::OK);

    let mut second = ana();
    second["contacts"] = json!([{ "email_id": "other@x.com" }]);
    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(second)
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("E100"));
    assert_eq!(repo.len().await, 1);

    let existing = repo.find_by_employee_id("E100").await.unwrap().unwrap();
    assert_eq!(existing.contacts.len(), 1);
    assert_eq!(existing.contacts[0].email_id.as_deref(), Some("ana@x.com"));
}

#[actix_web::test]
async fn test_duplicate_contact_email_is_a_conflict() {
    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let app = setup_app!(repo.clone());

    call!(app, test::TestRequest::post().uri("/api/v1/employees").set_json(ana()));

    let mut other = ana();
    other["employee_id"] = json!("E101");
    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(other)
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(repo.len().await, 1);
    assert!(repo.find_by_employee_id("E101").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_create_validation_failures_are_unprocessable() {
    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let app = setup_app!(repo.clone());

    let mut bad_email = ana();
    bad_email["contacts"] = json!([{ "email_id": "nope" }]);
    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(bad_email)
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("email"));

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/employees")
            .set_json(json!({ "employee_id": "E1", "first_name": "Ana" }))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut wrong_type = ana();
    wrong_type["date_of_birth"] = json!(19900101);
    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(wrong_type)
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert!(repo.is_empty().await);
}

#[actix_web::test]
async fn test_get_returns_what_was_created() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (_, created) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(full_payload())
    );
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/employees/{}", id))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    let input = full_payload();
    for field in [
        "employee_id",
        "first_name",
        "middle_name",
        "last_name",
        "date_of_birth",
        "gender",
        "blood_group",
        "nationality",
        "marital_status",
        "marriage_date",
        "career_ambition",
        "strengths",
        "weaknesses",
        "referred_by_employee",
        "referrer_name",
        "referrer_contact_no",
    ] {
        assert_eq!(fetched[field], input[field], "field {} should round-trip", field);
    }
    assert_eq!(fetched["contacts"].as_array().unwrap().len(), 2);
    assert_eq!(fetched["addresses"].as_array().unwrap().len(), 2);
    assert_eq!(fetched["addresses"][1]["address_type"], "permanent");
}

#[actix_web::test]
async fn test_list_applies_skip_and_limit() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    for n in 0..3 {
        let payload = json!({
            "employee_id": format!("E{}", n),
            "first_name": "Test",
            "last_name": "User",
            "date_of_birth": "1990-01-01"
        });
        call!(app, test::TestRequest::post().uri("/api/v1/employees").set_json(payload));
    }

    let (status, all) = call!(app, test::TestRequest::get().uri("/api/v1/employees"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, page) = call!(
        app,
        test::TestRequest::get().uri("/api/v1/employees/?skip=1&limit=1")
    );
    assert_eq!(page.as_array().unwrap().len(), 1);

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri("/api/v1/employees?limit=-5")
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_partial_update_touches_only_supplied_fields() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (_, created) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(full_payload())
    );
    let id = created["id"].as_str().unwrap();

    let (status, updated) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/employees/{}", id))
            .set_json(json!({ "nationality": "X" }))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["nationality"], "X");

    let mut expected = created.clone();
    expected["nationality"] = json!("X");
    expected["updated_at"] = updated["updated_at"].clone();
    assert_eq!(updated, expected);

    let before: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(created["updated_at"].clone()).unwrap();
    let after: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(updated["updated_at"].clone()).unwrap();
    assert!(after > before);
}

#[actix_web::test]
async fn test_update_clears_nullable_fields_and_rejects_required_nulls() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (_, created) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(full_payload())
    );
    let uri = format!("/api/v1/employees/{}", created["id"].as_str().unwrap());

    let (status, updated) = call!(
        app,
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "middle_name": null, "strengths": [] }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["middle_name"], Value::Null);
    assert_eq!(updated["strengths"], json!([]));
    assert_eq!(updated["first_name"], "Ravi");

    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "last_name": null }))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_update_accepts_read_body_and_ignores_immutable_keys() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (_, created) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(full_payload())
    );
    let uri = format!("/api/v1/employees/{}", created["id"].as_str().unwrap());

    let (_, mut body) = call!(app, test::TestRequest::get().uri(&uri));
    body["nationality"] = json!("X");
    body["employee_id"] = json!("E999");
    body["contacts"] = json!([{ "email_id": "swapped@x.com" }]);
    body["addresses"] = json!([]);

    let (status, updated) = call!(app, test::TestRequest::put().uri(&uri).set_json(body));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["nationality"], "X");
    assert_eq!(updated["employee_id"], "E200");
    assert_eq!(updated["contacts"], created["contacts"]);
    assert_eq!(updated["addresses"], created["addresses"]);
}

#[actix_web::test]
async fn test_empty_update_leaves_timestamp_alone() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (_, created) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(full_payload())
    );
    let uri = format!("/api/v1/employees/{}", created["id"].as_str().unwrap());

    let (status, updated) = call!(app, test::TestRequest::put().uri(&uri).set_json(json!({})));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, created);
    assert_eq!(updated["updated_at"], created["updated_at"]);
}

#[actix_web::test]
async fn test_child_additions_keep_timestamps_ordered() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (_, created) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(full_payload())
    );

    let created_at: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(created["created_at"].clone()).unwrap();
    let updated_at: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(created["updated_at"].clone()).unwrap();
    assert!(updated_at >= created_at);
}

#[actix_web::test]
async fn test_delete_removes_aggregate() {
    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let app = setup_app!(repo.clone());

    let (_, created) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(full_payload())
    );
    let uri = format!("/api/v1/employees/{}", created["id"].as_str().unwrap());

    let (status, deleted) = call!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, created);

    let (status, _) = call!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = call!(app, test::TestRequest::get().uri("/api/v1/employees"));
    assert!(all.as_array().unwrap().is_empty());

    // The deleted employee's email is free again.
    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/api/v1/employees").set_json(full_payload())
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_unknown_ids_are_not_found() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));
    let uri = format!("/api/v1/employees/{}", uuid::Uuid::new_v4());

    let (status, body) = call!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Employee not found");

    let (status, _) = call!(
        app,
        test::TestRequest::put().uri(&uri).set_json(json!({ "nationality": "X" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_id_is_unprocessable() {
    let app = setup_app!(Arc::new(InMemoryEmployeeRepository::new()));

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri("/api/v1/employees/not-a-uuid")
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
