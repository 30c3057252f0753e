//! HTTP-level integration tests for the identity layer: code sign-in,
//! password fallback, sessions, and business approval gating.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use common::{body_json, get_auth, get_with_cookie, post_json, post_json_auth, Actor};
use g1000_db::repositories::{BusinessProfileRepo, IdentityRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run request-code + verify-code for a student and return the session body.
async fn student_code_sign_in(
    pool: &PgPool,
    email: &str,
) -> (axum::response::Response, std::sync::Arc<common::RecordingNotifier>) {
    let (app, notifier) = common::build_test_app(pool.clone());
    let response = post_json(
        app.clone(),
        "/api/v1/auth/request-code",
        json!({ "email": email }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let code = notifier.code_for(email).await;
    let response = post_json(
        app,
        "/api/v1/auth/verify-code",
        json!({ "email": email, "code": code }),
    )
    .await;
    (response, notifier)
}

fn set_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .expect("session cookie must be set")
        .to_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Student code sign-in
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn student_code_sign_in_creates_identity_from_roster(pool: PgPool) {
    common::add_roster(&pool, "jane@babson.edu", "Jane Doe").await;

    let (response, _) = student_code_sign_in(&pool, "  Jane@Babson.EDU ").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("g1000_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=604800"));

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "jane@babson.edu");
    assert_eq!(json["data"]["user"]["display_name"], "Jane Doe");
    assert_eq!(json["data"]["user"]["role"], "student");
    assert_eq!(json["data"]["has_password"], false);
    assert_eq!(json["data"]["expires_in"], 604800);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn session_cookie_authenticates_requests(pool: PgPool) {
    common::add_roster(&pool, "jane@babson.edu", "Jane Doe").await;
    let (response, _) = student_code_sign_in(&pool, "jane@babson.edu").await;
    let cookie = set_cookie(&response);
    let pair = cookie.split(';').next().unwrap().to_string();

    let (app, _) = common::build_test_app(pool);
    let response = get_with_cookie(app, "/api/v1/auth/me", &pair).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "jane@babson.edu");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verification_code_cannot_be_replayed(pool: PgPool) {
    common::add_roster(&pool, "jane@babson.edu", "Jane Doe").await;
    let (app, notifier) = common::build_test_app(pool);
    post_json(
        app.clone(),
        "/api/v1/auth/request-code",
        json!({ "email": "jane@babson.edu" }),
    )
    .await;
    let code = notifier.code_for("jane@babson.edu").await;
    let body = json!({ "email": "jane@babson.edu", "code": code });

    let first = post_json(app.clone(), "/api/v1/auth/verify-code", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, "/api/v1/auth/verify-code", body).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["code"], "INVALID_OR_EXPIRED_CODE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_code_is_rejected(pool: PgPool) {
    common::add_roster(&pool, "jane@babson.edu", "Jane Doe").await;
    let (app, notifier) = common::build_test_app(pool);
    post_json(
        app.clone(),
        "/api/v1/auth/request-code",
        json!({ "email": "jane@babson.edu" }),
    )
    .await;
    let code = notifier.code_for("jane@babson.edu").await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let response = post_json(
        app,
        "/api/v1/auth/verify-code",
        json!({ "email": "jane@babson.edu", "code": wrong }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OR_EXPIRED_CODE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn correct_code_still_verifies_after_a_wrong_attempt(pool: PgPool) {
    common::add_roster(&pool, "jane@babson.edu", "Jane Doe").await;
    let (app, notifier) = common::build_test_app(pool);
    post_json(
        app.clone(),
        "/api/v1/auth/request-code",
        json!({ "email": "jane@babson.edu" }),
    )
    .await;
    let code = notifier.code_for("jane@babson.edu").await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let miss = post_json(
        app.clone(),
        "/api/v1/auth/verify-code",
        json!({ "email": "jane@babson.edu", "code": wrong }),
    )
    .await;
    assert_eq!(miss.status(), StatusCode::BAD_REQUEST);

    let hit = post_json(
        app,
        "/api/v1/auth/verify-code",
        json!({ "email": "jane@babson.edu", "code": code }),
    )
    .await;
    assert_eq!(hit.status(), StatusCode::OK);
    assert_eq!(body_json(hit).await["data"]["user"]["email"], "jane@babson.edu");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_institutional_email_is_not_eligible(pool: PgPool) {
    let (app, notifier) = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/request-code",
        json!({ "email": "jane@gmail.com" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "NOT_ELIGIBLE");
    assert!(notifier.sent().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn student_missing_from_roster_is_not_eligible(pool: PgPool) {
    let (app, notifier) = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/request-code",
        json!({ "email": "nobody@babson.edu" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "NOT_ELIGIBLE");
    assert!(notifier.sent().is_empty());
    assert!(IdentityRepo::find_by_email(&pool, "nobody@babson.edu")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn business_code_request_without_approval_creates_nothing(pool: PgPool) {
    let (app, notifier) = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/business/request-code",
        json!({ "email": "stranger@startup.io" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "NOT_ELIGIBLE");
    assert!(notifier.sent().is_empty());
    assert!(IdentityRepo::find_by_email(&pool, "stranger@startup.io")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Password fallback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn set_password_then_login_with_it(pool: PgPool) {
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);

    let weak = post_json_auth(
        app.clone(),
        "/api/v1/auth/set-password",
        &student.token,
        json!({ "email": "sam@babson.edu", "password": "short" }),
    )
    .await;
    assert_eq!(weak.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(weak).await["code"], "WEAK_PASSWORD");

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/set-password",
        &student.token,
        json!({ "email": "sam@babson.edu", "password": "correct-horse-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let login = post_json(
        app.clone(),
        "/api/v1/auth/login-password",
        json!({ "email": "SAM@babson.edu", "password": "correct-horse-1" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    assert_eq!(body_json(login).await["data"]["has_password"], true);

    let check = post_json(
        app,
        "/api/v1/auth/check-user",
        json!({ "email": "sam@babson.edu" }),
    )
    .await;
    let json = body_json(check).await;
    assert_eq!(json["data"]["exists"], true);
    assert_eq!(json["data"]["next_step"], "enterPassword");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn set_password_for_another_email_is_unauthorized(pool: PgPool) {
    let student = common::student(&pool, "sam@babson.edu").await;
    common::student(&pool, "eve@babson.edu").await;
    let (app, _) = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/auth/set-password",
        &student.token,
        json!({ "email": "eve@babson.edu", "password": "correct-horse-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_failures_are_indistinguishable(pool: PgPool) {
    common::student(&pool, "nopass@babson.edu").await;
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool.clone());
    post_json_auth(
        app.clone(),
        "/api/v1/auth/set-password",
        &student.token,
        json!({ "email": "sam@babson.edu", "password": "correct-horse-1" }),
    )
    .await;

    let cases = [
        ("sam@babson.edu", "wrong-password"),
        ("nopass@babson.edu", "whatever-123"),
        ("ghost@babson.edu", "whatever-123"),
    ];
    for (email, password) in cases {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/login-password",
            json!({ "email": email, "password": password }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{email}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_CREDENTIALS");
        assert_eq!(json["error"], "Invalid email or password");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn check_user_reports_pending_code(pool: PgPool) {
    common::add_roster(&pool, "new@babson.edu", "New Student").await;
    let (app, notifier) = common::build_test_app(pool);

    let before = post_json(
        app.clone(),
        "/api/v1/auth/check-user",
        json!({ "email": "new@babson.edu" }),
    )
    .await;
    let json = body_json(before).await;
    assert_eq!(json["data"]["exists"], false);
    assert_eq!(json["data"]["next_step"], "requestCode");

    post_json(
        app.clone(),
        "/api/v1/auth/request-code",
        json!({ "email": "new@babson.edu" }),
    )
    .await;
    notifier.wait_for(1).await;

    let after = post_json(
        app,
        "/api/v1/auth/check-user",
        json!({ "email": "new@babson.edu" }),
    )
    .await;
    let json = body_json(after).await;
    assert_eq!(json["data"]["has_challenge"], true);
    assert_eq!(json["data"]["next_step"], "enterCode");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn change_password_requires_current_password(pool: PgPool) {
    let admin = common::admin(&pool, "admin@g1000.org", "admin-password-1").await;
    let (app, _) = common::build_test_app(pool);

    let wrong = post_json_auth(
        app.clone(),
        "/api/v1/auth/change-password",
        &admin.token,
        json!({ "current_password": "nope-nope-1", "new_password": "new-password-22" }),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let ok = post_json_auth(
        app.clone(),
        "/api/v1/auth/change-password",
        &admin.token,
        json!({ "current_password": "admin-password-1", "new_password": "new-password-22" }),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::OK);

    let login = post_json(
        app,
        "/api/v1/auth/admin/login",
        json!({ "email": "admin@g1000.org", "password": "new-password-22" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    assert_eq!(body_json(login).await["data"]["user"]["role"], "admin");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn student_cannot_use_admin_login(pool: PgPool) {
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);
    post_json_auth(
        app.clone(),
        "/api/v1/auth/set-password",
        &student.token,
        json!({ "email": "sam@babson.edu", "password": "correct-horse-1" }),
    )
    .await;

    let response = post_json(
        app,
        "/api/v1/auth/admin/login",
        json!({ "email": "sam@babson.edu", "password": "correct-horse-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "INVALID_CREDENTIALS");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_clears_cookie(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/logout", json!({})).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(set_cookie(&response).contains("Max-Age=0"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tampered_token_is_rejected(pool: PgPool) {
    let student = common::student(&pool, "sam@babson.edu").await;
    let (app, _) = common::build_test_app(pool);

    let tampered = format!("{}x", student.token);
    let response = get_auth(app, "/api/v1/auth/me", &tampered).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Business sign-in and approval gating
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn business_registration_requires_approval_entry(pool: PgPool) {
    let (app, _) = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/business/register",
        json!({
            "email": "founder@startup.io",
            "password": "founder-password-1",
            "company_name": "Startup",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "NOT_ELIGIBLE");
    assert!(IdentityRepo::find_by_email(&pool, "founder@startup.io")
        .await
        .unwrap()
        .is_none());
    assert!(BusinessProfileRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn registered_business_waits_for_admin_approval(pool: PgPool) {
    common::add_approval(&pool, "founder@startup.io").await;
    let admin = common::admin(&pool, "admin@g1000.org", "admin-password-1").await;
    let (app, _) = common::build_test_app(pool.clone());

    let register = post_json(
        app.clone(),
        "/api/v1/auth/business/register",
        json!({
            "email": "Founder@Startup.io",
            "password": "founder-password-1",
            "company_name": "Startup",
            "contact_name": "Fran Founder",
            "industry": "Fintech",
        }),
    )
    .await;
    assert_eq!(register.status(), StatusCode::CREATED);
    let json = body_json(register).await;
    assert_eq!(json["data"]["profile"]["is_approved"], false);
    assert_eq!(json["data"]["profile"]["industry_tags"], json!(["Fintech"]));
    let user_id = json["data"]["user"]["id"].as_i64().unwrap();

    let again = post_json(
        app.clone(),
        "/api/v1/auth/business/register",
        json!({
            "email": "founder@startup.io",
            "password": "founder-password-1",
            "company_name": "Startup",
        }),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let login_body = json!({ "email": "founder@startup.io", "password": "founder-password-1" });
    let pending = post_json(
        app.clone(),
        "/api/v1/auth/business/login-password",
        login_body.clone(),
    )
    .await;
    assert_eq!(pending.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(pending).await["code"], "PENDING_APPROVAL");

    let approve = common::post_auth(
        app.clone(),
        &format!("/api/v1/admin/business-profiles/{user_id}/approve"),
        &admin.token,
    )
    .await;
    assert_eq!(approve.status(), StatusCode::OK);

    let login = post_json(app, "/api/v1/auth/business/login-password", login_body).await;
    assert_eq!(login.status(), StatusCode::OK);
    assert_eq!(body_json(login).await["data"]["user"]["role"], "owner");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unapproved_owner_cannot_manage_projects(pool: PgPool) {
    let owner = common::owner(&pool, "owner@acme.com", false).await;
    let (app, _) = common::build_test_app(pool);

    let projects = get_auth(app.clone(), "/api/v1/business/projects", &owner.token).await;
    assert_eq!(projects.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(projects).await["code"], "PENDING_APPROVAL");

    let profile = get_auth(app, "/api/v1/business/profile", &owner.token).await;
    assert_eq!(profile.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn business_code_sign_in_without_profile_is_pending(pool: PgPool) {
    common::add_approval(&pool, "new@acme.com").await;
    let (app, notifier) = common::build_test_app(pool.clone());

    post_json(
        app.clone(),
        "/api/v1/auth/business/request-code",
        json!({ "email": "new@acme.com" }),
    )
    .await;
    let code = notifier.code_for("new@acme.com").await;
    let response = post_json(
        app.clone(),
        "/api/v1/auth/business/verify-code",
        json!({ "email": "new@acme.com", "code": code }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["role"], "owner");
    let token = json["data"]["token"].as_str().unwrap().to_string();

    let projects = get_auth(app.clone(), "/api/v1/business/projects", &token).await;
    assert_eq!(projects.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(projects).await["code"], "PENDING_APPROVAL");

    let profile = common::put_json_auth(
        app,
        "/api/v1/business/profile",
        &token,
        json!({ "company_name": "Acme New" }),
    )
    .await;
    assert_eq!(profile.status(), StatusCode::OK);
    let user_id = json["data"]["user"]["id"].as_i64().unwrap();
    let stored = BusinessProfileRepo::find_by_user(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_approved);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn revoked_approval_entry_blocks_business_code(pool: PgPool) {
    let admin = common::admin(&pool, "admin@g1000.org", "admin-password-1").await;
    let entry_id = common::add_approval(&pool, "gone@acme.com").await;
    let (app, _) = common::build_test_app(pool);

    let delete = common::delete_auth(
        app.clone(),
        &format!("/api/v1/admin/approval-entries/{entry_id}"),
        &admin.token,
    )
    .await;
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/business/request-code",
        json!({ "email": "gone@acme.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "NOT_ELIGIBLE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn student_email_on_business_portal_is_rejected(pool: PgPool) {
    let student: Actor = common::student(&pool, "sam@babson.edu").await;
    common::add_approval(&pool, "sam@babson.edu").await;
    let (app, notifier) = common::build_test_app(pool);

    post_json(
        app.clone(),
        "/api/v1/auth/business/request-code",
        json!({ "email": student.email }),
    )
    .await;
    let code = notifier.code_for("sam@babson.edu").await;
    let response = post_json(
        app,
        "/api/v1/auth/business/verify-code",
        json!({ "email": "sam@babson.edu", "code": code }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}
