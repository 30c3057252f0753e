//! HTTP-level integration tests for the application lifecycle: submit,
//! owner transitions, withdraw, accept side effects, and ownership masking.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get_auth, post_auth, post_json_auth, put_json_auth, Actor};
use g1000_core::lifecycle::AUTO_REJECT_NOTE;
use g1000_core::types::DbId;
use g1000_db::repositories::ApprovalRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app_uri(project_id: DbId, application_id: DbId, action: &str) -> String {
    format!("/api/v1/business/projects/{project_id}/applications/{application_id}/{action}")
}

async fn invite(app: axum::Router, owner: &Actor, project_id: DbId, application_id: DbId) {
    let response = post_json_auth(
        app,
        &app_uri(project_id, application_id, "invite"),
        &owner.token,
        json!({
            "meeting_date_time": Utc::now() + Duration::days(2),
            "meeting_link": "https://meet.example.com/abc",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn apply_creates_submitted_application_and_notifies_owner(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, notifier) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;

    common::apply(app.clone(), &student, project_id).await;

    let list = get_auth(app, "/api/v1/student/applications", &student.token).await;
    let json = body_json(list).await;
    assert_eq!(json["data"][0]["status"], "submitted");
    assert_eq!(json["data"][0]["project_title"], "Market sizing study");
    assert_eq!(json["data"][0]["company_name"], "Acme Co");

    let sent = notifier.wait_for(1).await;
    assert_eq!(sent[0].to, "owner@acme.com");
    assert!(sent[0].subject.starts_with("New Application"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_application_is_duplicate(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    common::apply(app.clone(), &student, project_id).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/student/opportunities/{project_id}/apply"),
        &student.token,
        json!({ "cover_note": "Again", "proof_of_work_url": "https://example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_APPLICATION");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_applications_yield_one_success(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;

    let uri = format!("/api/v1/student/opportunities/{project_id}/apply");
    let body = json!({ "cover_note": "Hi", "proof_of_work_url": "https://example.com" });
    let (a, b) = futures::join!(
        post_json_auth(app.clone(), &uri, &student.token, body.clone()),
        post_json_auth(app.clone(), &uri, &student.token, body.clone()),
    );

    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn apply_outside_window_is_rejected(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);

    let now = Utc::now();
    let created = post_json_auth(
        app.clone(),
        "/api/v1/business/projects",
        &owner.token,
        json!({
            "title": "Expired",
            "apply_window_start": now - Duration::days(10),
            "apply_window_end": now - Duration::days(1),
        }),
    )
    .await;
    let project_id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/student/opportunities/{project_id}/apply"),
        &student.token,
        json!({ "cover_note": "Hi", "proof_of_work_url": "https://example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "WINDOW_CLOSED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn closed_project_rejects_applications_and_leaves_feed(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;

    let feed = get_auth(app.clone(), "/api/v1/student/opportunities", &student.token).await;
    assert_eq!(body_json(feed).await["data"].as_array().unwrap().len(), 1);

    let closed = put_json_auth(
        app.clone(),
        &format!("/api/v1/business/projects/{project_id}/status"),
        &owner.token,
        json!({ "status": "closed" }),
    )
    .await;
    assert_eq!(closed.status(), StatusCode::OK);

    let feed = get_auth(app.clone(), "/api/v1/student/opportunities", &student.token).await;
    assert!(body_json(feed).await["data"].as_array().unwrap().is_empty());

    let response = post_json_auth(
        app,
        &format!("/api/v1/student/opportunities/{project_id}/apply"),
        &student.token,
        json!({ "cover_note": "Hi", "proof_of_work_url": "https://example.com" }),
    )
    .await;
    assert_eq!(body_json(response).await["code"], "WINDOW_CLOSED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_project_window_is_rejected(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let (app, _) = common::build_test_app(pool);

    let now = Utc::now();
    let response = post_json_auth(
        app,
        "/api/v1/business/projects",
        &owner.token,
        json!({
            "title": "Backwards",
            "apply_window_start": now + Duration::days(5),
            "apply_window_end": now,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
}

// ---------------------------------------------------------------------------
// Owner transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn invite_requires_meeting_time(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let response = post_json_auth(
        app,
        &app_uri(project_id, application_id, "invite"),
        &owner.token,
        json!({ "meeting_link": "https://meet.example.com/abc" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invite_then_reschedule_notifies_student(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, notifier) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    invite(app.clone(), &owner, project_id, application_id).await;

    let response = post_json_auth(
        app.clone(),
        &app_uri(project_id, application_id, "reschedule"),
        &owner.token,
        json!({ "meeting_date_time": Utc::now() + Duration::days(3) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "interviewScheduled");
    assert_eq!(json["data"]["meeting_link"], "https://meet.example.com/abc");

    let sent = notifier.wait_for(3).await;
    let to_student: Vec<_> = sent.iter().filter(|n| n.to == "sam@babson.edu").collect();
    assert_eq!(to_student.len(), 2);
    assert!(to_student.iter().any(|n| n.body.contains("Meeting link")));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reschedule_requires_scheduled_interview(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let response = post_json_auth(
        app.clone(),
        &app_uri(project_id, application_id, "reschedule"),
        &owner.token,
        json!({ "meeting_date_time": Utc::now() + Duration::days(3) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INVALID_STATE");

    let link = put_json_auth(
        app,
        &app_uri(project_id, application_id, "meeting-link"),
        &owner.token,
        json!({ "meeting_link": "https://meet.example.com/x" }),
    )
    .await;
    assert_eq!(link.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(link).await["code"], "INVALID_STATE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reject_and_undo_reject(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, notifier) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let reject = post_json_auth(
        app.clone(),
        &app_uri(project_id, application_id, "reject"),
        &owner.token,
        json!({ "owner_note": "Looking for more SQL experience" }),
    )
    .await;
    assert_eq!(reject.status(), StatusCode::OK);
    let json = body_json(reject).await;
    assert_eq!(json["data"]["status"], "rejected");
    assert!(json["data"]["rejected_at"].is_string());

    let undo = post_auth(
        app.clone(),
        &app_uri(project_id, application_id, "undo-reject"),
        &owner.token,
    )
    .await;
    assert_eq!(undo.status(), StatusCode::OK);
    let json = body_json(undo).await;
    assert_eq!(json["data"]["status"], "underReview");
    assert!(json["data"]["rejected_at"].is_null());
    assert!(json["data"]["owner_note"].is_null());

    let again = post_auth(
        app,
        &app_uri(project_id, application_id, "undo-reject"),
        &owner.token,
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let sent = notifier.wait_for(3).await;
    assert!(sent
        .iter()
        .any(|n| n.to == "sam@babson.edu" && n.body.contains("Looking for more SQL experience")));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reject_without_body_is_allowed(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let reject = post_auth(
        app,
        &app_uri(project_id, application_id, "reject"),
        &owner.token,
    )
    .await;
    assert_eq!(reject.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reject_with_malformed_body_is_invalid_input(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let response = common::post_raw_auth(
        app.clone(),
        &app_uri(project_id, application_id, "reject"),
        &owner.token,
        "{\"owner_note\": ",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
    assert!(json["error"].is_string());

    let list = get_auth(app, "/api/v1/student/applications", &student.token).await;
    assert_eq!(body_json(list).await["data"][0]["status"], "submitted");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn accept_closes_project_and_rejects_other_applicants(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let chosen = common::student(&pool, "sam@babson.edu").await;
    let other = common::student(&pool, "eve@babson.edu").await;
    let (app, notifier) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let chosen_id = common::apply(app.clone(), &chosen, project_id).await;
    common::apply(app.clone(), &other, project_id).await;

    let accept = post_auth(
        app.clone(),
        &app_uri(project_id, chosen_id, "accept"),
        &owner.token,
    )
    .await;
    assert_eq!(accept.status(), StatusCode::OK);
    let json = body_json(accept).await;
    assert_eq!(json["data"]["status"], "accepted");
    assert_eq!(json["data"]["engagement_status"], "active");

    let other_apps = get_auth(app.clone(), "/api/v1/student/applications", &other.token).await;
    let json = body_json(other_apps).await;
    assert_eq!(json["data"][0]["status"], "rejected");
    assert_eq!(json["data"][0]["owner_note"], AUTO_REJECT_NOTE);

    let project = get_auth(
        app,
        &format!("/api/v1/business/projects/{project_id}"),
        &owner.token,
    )
    .await;
    assert_eq!(body_json(project).await["data"]["status"], "closed");

    // two new-application notices, one acceptance, one auto-rejection
    let sent = notifier.wait_for(4).await;
    assert!(sent
        .iter()
        .any(|n| n.to == "sam@babson.edu" && n.subject.contains("Accepted")));
    assert!(sent
        .iter()
        .any(|n| n.to == "eve@babson.edu" && n.body.contains(AUTO_REJECT_NOTE)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mark_under_review_only_from_submitted(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let uri = app_uri(project_id, application_id, "mark-under-review");
    let first = post_auth(app.clone(), &uri, &owner.token).await;
    assert_eq!(body_json(first).await["data"]["status"], "underReview");

    let second = post_auth(app, &uri, &owner.token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "INVALID_STATE");
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn other_owner_sees_not_found(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let rival = common::owner(&pool, "rival@other.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let project = get_auth(
        app.clone(),
        &format!("/api/v1/business/projects/{project_id}"),
        &rival.token,
    )
    .await;
    assert_eq!(project.status(), StatusCode::NOT_FOUND);

    let accept = post_auth(
        app.clone(),
        &app_uri(project_id, application_id, "accept"),
        &rival.token,
    )
    .await;
    assert_eq!(accept.status(), StatusCode::NOT_FOUND);

    let applicants = get_auth(
        app,
        &format!("/api/v1/business/projects/{project_id}/applications"),
        &rival.token,
    )
    .await;
    assert_eq!(applicants.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivated_approval_entry_blocks_owner_actions(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let admin = common::admin(&pool, "admin@g1000.org", "admin-password-1").await;
    let entry_id = ApprovalRepo::find_active_by_email(&pool, "owner@acme.com")
        .await
        .unwrap()
        .unwrap()
        .id;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let deactivate = common::delete_auth(
        app.clone(),
        &format!("/api/v1/admin/approval-entries/{entry_id}"),
        &admin.token,
    )
    .await;
    assert_eq!(deactivate.status(), StatusCode::NO_CONTENT);

    let response = post_json_auth(
        app.clone(),
        &app_uri(project_id, application_id, "invite"),
        &owner.token,
        json!({ "meeting_date_time": Utc::now() + Duration::days(2) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "PENDING_APPROVAL");

    let profile = get_auth(app, "/api/v1/business/profile", &owner.token).await;
    assert_eq!(profile.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn student_cannot_call_owner_routes(pool: PgPool) {
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/business/projects", &student.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// Withdraw
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn withdraw_before_interview(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let uri = format!("/api/v1/student/applications/{application_id}/withdraw");
    let response = post_auth(app.clone(), &uri, &student.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "withdrawn");

    let again = post_auth(app, &uri, &student.token).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["code"], "INVALID_STATE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn withdraw_after_interview_is_too_late(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;
    invite(app.clone(), &owner, project_id, application_id).await;

    let response = post_auth(
        app,
        &format!("/api/v1/student/applications/{application_id}/withdraw"),
        &student.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "TOO_LATE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn withdraw_after_acceptance_is_too_late(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;
    let accept = post_auth(
        app.clone(),
        &app_uri(project_id, application_id, "accept"),
        &owner.token,
    )
    .await;
    assert_eq!(accept.status(), StatusCode::OK);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/student/applications/{application_id}/withdraw"),
        &student.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "TOO_LATE");

    let list = get_auth(app, "/api/v1/student/applications", &student.token).await;
    assert_eq!(body_json(list).await["data"][0]["status"], "accepted");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn withdraw_someone_elses_application_is_forbidden(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", true).await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let other = common::student(&pool, "eve@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    let project_id = common::open_project(app.clone(), &owner).await;
    let application_id = common::apply(app.clone(), &student, project_id).await;

    let response = post_auth(
        app,
        &format!("/api/v1/student/applications/{application_id}/withdraw"),
        &other.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
