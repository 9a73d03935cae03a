//! API Integration Tests
//!
//! Each test starts its own server on an ephemeral port with the in-memory
//! store and the ward seed in `fixtures/wards.json`; no external services
//! are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use grievance_core::Actor;
use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

async fn file_grievance(server: &TestServer, citizen: &Actor) -> GrievanceBody {
    let response = server
        .post_as(citizen, "/api/v1/grievances", &NewGrievance::pothole())
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn change_status(
    server: &TestServer,
    actor: &Actor,
    grievance_id: &str,
    change: &StatusChange,
) -> reqwest::Response {
    server
        .put_as(actor, &format!("/api/v1/grievances/{grievance_id}/status"), change)
        .await
        .unwrap()
}

async fn history(server: &TestServer, actor: &Actor, grievance_id: &str) -> Vec<StatusUpdateBody> {
    let response = server
        .get_as(actor, &format!("/api/v1/grievances/{grievance_id}/history"))
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["storage"], "healthy");
}

#[tokio::test]
async fn test_request_id_header_returned() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/grievances").await.unwrap();
    let body = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .client
        .get(format!("{}/api/v1/wards", server.base_url()))
        .bearer_auth("not.a.token")
        .send()
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let server = TestServer::start().await.unwrap();
    let other = TestServer::start_with(&[("IDP_JWT_SECRET", "some-other-secret-entirely")])
        .await
        .unwrap();

    let response = server
        .client
        .get(format!("{}/api/v1/wards", server.base_url()))
        .bearer_auth(other.token(&citizen_u1()))
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_file_and_resolve_scenario() {
    let server = TestServer::start().await.unwrap();
    let (u1, w1, w2) = (citizen_u1(), ward_rep_w1(), ward_rep_w2());

    let created = file_grievance(&server, &u1).await;
    assert_eq!(created.status, "open");
    assert_eq!(created.ward_id, 5);
    assert_eq!(created.created_by, "u1");
    assert_eq!(created.category, "pothole");
    assert_eq!(created.version, 1);
    assert_eq!(created.latitude, Some(18.5204));
    assert!(created.resolved_at.is_none());

    let entries = history(&server, &u1, &created.id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].old_status, None);
    assert_eq!(entries[0].new_status, "open");
    assert_eq!(entries[0].updated_by, "u1");

    let response = change_status(
        &server,
        &w1,
        &created.id,
        &StatusChange::to("in_progress", "Team dispatched"),
    )
    .await;
    let change: StatusChangeBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(change.grievance.status, "in_progress");
    assert_eq!(change.status_update.old_status.as_deref(), Some("open"));
    assert_eq!(change.status_update.remarks.as_deref(), Some("Team dispatched"));
    assert_eq!(change.status_update.grievance_id, created.id);
    assert_eq!(history(&server, &u1, &created.id).await.len(), 2);

    let response = change_status(&server, &w1, &created.id, &StatusChange::to("resolved", "Fixed")).await;
    let change: StatusChangeBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(change.grievance.status, "resolved");
    assert_eq!(change.grievance.resolution_remarks.as_deref(), Some("Fixed"));
    assert!(change.grievance.resolved_at.is_some());
    assert_eq!(change.grievance.version, 3);

    let entries = history(&server, &u1, &created.id).await;
    assert_eq!(entries.len(), 3);
    let statuses: Vec<&str> = entries.iter().map(|e| e.new_status.as_str()).collect();
    assert_eq!(statuses, vec!["open", "in_progress", "resolved"]);

    // Another ward's representative cannot see it at all
    let response = change_status(&server, &w2, &created.id, &StatusChange::to("open", "Reopen")).await;
    let body = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_GRIEVANCE");
    assert_eq!(history(&server, &u1, &created.id).await.len(), 3);
}

#[tokio::test]
async fn test_reopen_clears_resolved_at() {
    let server = TestServer::start().await.unwrap();
    let (u1, w1) = (citizen_u1(), ward_rep_w1());
    let created = file_grievance(&server, &u1).await;

    let response = change_status(&server, &w1, &created.id, &StatusChange::to("resolved", "Filled")).await;
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = change_status(&server, &w1, &created.id, &StatusChange::to("open", "Sinking again")).await;
    let change: StatusChangeBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(change.grievance.status, "open");
    assert!(change.grievance.resolved_at.is_none());
    assert_eq!(change.grievance.resolution_remarks.as_deref(), Some("Filled"));
}

#[tokio::test]
async fn test_created_grievance_reads_back_identical() {
    let server = TestServer::start().await.unwrap();

    let request = NewGrievance {
        photo_url: Some("https://img.example.org/pothole.jpg".to_string()),
        latitude: Some(18.5204),
        longitude: Some(73.8567),
        ..NewGrievance::pothole()
    };
    let response = server
        .post_as(&citizen_u1(), "/api/v1/grievances", &request)
        .await
        .unwrap();
    let created: serde_json::Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let response = server
        .get_as(&citizen_u1(), &format!("/api/v1/grievances/{id}"))
        .await
        .unwrap();
    let fetched: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_reports_all_violations() {
    let server = TestServer::start().await.unwrap();

    let request = NewGrievance {
        title: "Pit".to_string(),
        description: "short".to_string(),
        category: "noise".to_string(),
        photo_url: None,
        latitude: Some(120.0),
        longitude: None,
    };
    let response = server
        .post_as(&citizen_u1(), "/api/v1/grievances", &request)
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");

    let fields = body.error.fields();
    for field in ["title", "description", "category"] {
        assert!(fields.iter().any(|f| f == field), "missing {field} in {fields:?}");
    }
}

#[tokio::test]
async fn test_create_requires_citizen() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_as(&ward_rep_w1(), "/api/v1/grievances", &NewGrievance::pothole())
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "FORBIDDEN");
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .client
        .post(format!("{}/api/v1/grievances", server.base_url()))
        .bearer_auth(server.token(&citizen_u1()))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_BODY");
}

#[tokio::test]
async fn test_status_change_rules() {
    let server = TestServer::start().await.unwrap();
    let (u1, w1) = (citizen_u1(), ward_rep_w1());
    let created = file_grievance(&server, &u1).await;

    // Citizens may not change status, whatever the body says
    let response = change_status(&server, &u1, &created.id, &StatusChange::to("resolved", "Done")).await;
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // A real change needs remarks
    let change = StatusChange {
        status: "in_progress".to_string(),
        remarks: None,
    };
    let response = change_status(&server, &w1, &created.id, &change).await;
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.fields(), vec!["remarks".to_string()]);

    // Unknown status
    let response = change_status(&server, &w1, &created.id, &StatusChange::to("closed", "Done")).await;
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.fields(), vec!["status".to_string()]);

    // Same status without remarks is not a change
    let change = StatusChange {
        status: "open".to_string(),
        remarks: None,
    };
    let response = change_status(&server, &w1, &created.id, &change).await;
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Nothing above touched the history
    assert_eq!(history(&server, &u1, &created.id).await.len(), 1);
}

#[tokio::test]
async fn test_same_status_remarks_can_be_rejected() {
    let server = TestServer::start_with(&[("SAME_STATUS_POLICY", "reject")])
        .await
        .unwrap();
    let (u1, w1) = (citizen_u1(), ward_rep_w1());
    let created = file_grievance(&server, &u1).await;

    let response = change_status(&server, &w1, &created.id, &StatusChange::to("open", "Still open")).await;
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.fields(), vec!["status".to_string()]);
}

#[tokio::test]
async fn test_same_status_remarks_accepted_by_default() {
    let server = TestServer::start().await.unwrap();
    let (u1, w1) = (citizen_u1(), ward_rep_w1());
    let created = file_grievance(&server, &u1).await;

    let response = change_status(&server, &w1, &created.id, &StatusChange::to("open", "Inspection booked")).await;
    let change: StatusChangeBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(change.status_update.old_status.as_deref(), Some("open"));
    assert_eq!(change.status_update.new_status, "open");
    assert_eq!(history(&server, &u1, &created.id).await.len(), 2);
}

#[tokio::test]
async fn test_malformed_grievance_id() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get_as(&citizen_u1(), "/api/v1/grievances/not-a-number")
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Read Scope Tests
// ============================================================================

#[tokio::test]
async fn test_reads_are_scoped() {
    let server = TestServer::start().await.unwrap();
    let u1 = citizen_u1();
    let u2 = Actor::citizen("u2", 5);
    let created = file_grievance(&server, &u1).await;
    let path = format!("/api/v1/grievances/{}", created.id);

    let response = server.get_as(&u1, &path).await.unwrap();
    let fetched: GrievanceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);

    let response = server.get_as(&ward_rep_w1(), &path).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    for outsider in [u2, ward_rep_w2()] {
        let response = server.get_as(&outsider, &path).await.unwrap();
        let body = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
        assert_eq!(body.error.code, "UNKNOWN_GRIEVANCE");
    }
}

#[tokio::test]
async fn test_list_paging_and_filters() {
    let server = TestServer::start().await.unwrap();
    let (u1, w1) = (citizen_u1(), ward_rep_w1());

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(file_grievance(&server, &u1).await.id);
    }
    let response = change_status(&server, &w1, &ids[0], &StatusChange::to("in_progress", "On it")).await;
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_as(&u1, "/api/v1/grievances?limit=2&sort=oldest")
        .await
        .unwrap();
    let page: PageBody<GrievanceBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.limit, 2);
    assert_eq!(page.offset, 0);
    assert!(page.has_more);
    assert_eq!((page.first, page.last), (1, 2));
    assert_eq!(page.items[0].id, ids[0]);

    let response = server
        .get_as(&u1, "/api/v1/grievances?limit=2&offset=2&sort=oldest")
        .await
        .unwrap();
    let page: PageBody<GrievanceBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert!(!page.has_more);
    assert_eq!(page.items[0].id, ids[2]);

    let response = server
        .get_as(&w1, "/api/v1/grievances?status=in_progress")
        .await
        .unwrap();
    let page: PageBody<GrievanceBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, ids[0]);

    let response = server.get_as(&ward_rep_w2(), "/api/v1/grievances").await.unwrap();
    let page: PageBody<GrievanceBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
    assert_eq!((page.first, page.last), (0, 0));
}

#[tokio::test]
async fn test_list_search_by_text() {
    let server = TestServer::start().await.unwrap();
    let u1 = citizen_u1();

    let mut request = NewGrievance::pothole();
    request.title = "Streetlight flickering at Gandhi Chowk".to_string();
    request.category = "street_light".to_string();
    let response = server.post_as(&u1, "/api/v1/grievances", &request).await.unwrap();
    let lamp: GrievanceBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    file_grievance(&server, &u1).await;

    let response = server
        .get_as(&u1, "/api/v1/grievances?q=gandhi")
        .await
        .unwrap();
    let page: PageBody<GrievanceBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, lamp.id);

    let response = server
        .get_as(&u1, "/api/v1/grievances?category=street_light")
        .await
        .unwrap();
    let page: PageBody<GrievanceBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_list_rejects_bad_query() {
    let server = TestServer::start().await.unwrap();
    let u1 = citizen_u1();

    let response = server
        .get_as(&u1, "/api/v1/grievances?status=closed&sort=loudest")
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    let fields = body.error.fields();
    assert!(fields.contains(&"status".to_string()));
    assert!(fields.contains(&"sort".to_string()));

    let response = server
        .get_as(&u1, "/api/v1/grievances?limit=ten")
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_QUERY_PARAMETER");
}

// ============================================================================
// Priority & Stats Tests
// ============================================================================

#[tokio::test]
async fn test_set_and_clear_priority() {
    let server = TestServer::start().await.unwrap();
    let (u1, w1) = (citizen_u1(), ward_rep_w1());
    let created = file_grievance(&server, &u1).await;
    let path = format!("/api/v1/grievances/{}/priority", created.id);

    let response = server
        .put_as(&w1, &path, &PriorityChange { priority: Some("high".to_string()) })
        .await
        .unwrap();
    let updated: GrievanceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.priority.as_deref(), Some("high"));
    assert_eq!(updated.version, 2);

    let response = server
        .put_as(&w1, &path, &PriorityChange { priority: Some("urgent".to_string()) })
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .put_as(&u1, &path, &PriorityChange { priority: Some("low".to_string()) })
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.put_as(&w1, &path, &json!({ "priority": null })).await.unwrap();
    let cleared: GrievanceBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(cleared.priority, None);

    // Priority changes leave no history entry
    assert_eq!(history(&server, &u1, &created.id).await.len(), 1);
}

#[tokio::test]
async fn test_stats_follow_scope() {
    let server = TestServer::start().await.unwrap();
    let (u1, w1) = (citizen_u1(), ward_rep_w1());

    let first = file_grievance(&server, &u1).await;
    file_grievance(&server, &u1).await;
    let response = change_status(&server, &w1, &first.id, &StatusChange::to("resolved", "Patched")).await;
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_as(&w1, "/api/v1/grievances/stats").await.unwrap();
    let stats: StatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.open, 1);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.in_progress, 0);
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.created_this_week, 2);
    assert_eq!(stats.avg_resolution_days, Some(0.0));

    let response = server.get_as(&ward_rep_w2(), "/api/v1/grievances/stats").await.unwrap();
    let stats: StatsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.avg_resolution_days, None);
}

// ============================================================================
// Ward Tests
// ============================================================================

#[tokio::test]
async fn test_list_and_get_wards() {
    let server = TestServer::start().await.unwrap();
    let u1 = citizen_u1();

    let response = server.get_as(&u1, "/api/v1/wards").await.unwrap();
    let wards: Vec<WardBody> = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<i32> = wards.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![5, 9, 12]);

    let response = server.get_as(&u1, "/api/v1/wards/9").await.unwrap();
    let ward: WardBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ward.name, "Kothrud");
    assert_eq!(ward.area_name.as_deref(), Some("West"));

    let response = server.get_as(&u1, "/api/v1/wards/77").await.unwrap();
    let body = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_WARD");

    let response = server.get_as(&u1, "/api/v1/wards/seventy").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
