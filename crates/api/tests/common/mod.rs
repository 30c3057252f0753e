#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use g1000_api::auth::jwt::{generate_session_token, JwtConfig};
use g1000_api::auth::password::hash_password;
use g1000_api::config::ServerConfig;
use g1000_api::router::build_app_router;
use g1000_api::state::AppState;
use g1000_core::roles::Role;
use g1000_core::types::DbId;
use g1000_db::models::approval::CreateApprovalEntry;
use g1000_db::models::business_profile::CreateBusinessProfile;
use g1000_db::models::identity::CreateIdentity;
use g1000_db::models::roster::UpsertRosterParticipant;
use g1000_db::repositories::{ApprovalRepo, BusinessProfileRepo, IdentityRepo, RosterRepo};
use g1000_events::{Notification, Notifier, NotifyError};

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_acquire_timeout_secs: 5,
        db_statement_timeout_ms: 5000,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            session_ttl_days: 7,
        },
        cookie_secure: false,
        institution_domains: vec!["babson.edu".to_string()],
        challenge_purge_interval_secs: 900,
    }
}

/// Notifier that keeps every message in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait for background dispatch to deliver at least `count` messages.
    pub async fn wait_for(&self, count: usize) -> Vec<Notification> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("expected {count} notifications, got {:?}", self.sent());
    }

    /// The six-digit code from the latest verification email to `to`.
    pub async fn code_for(&self, to: &str) -> String {
        for _ in 0..100 {
            let code = self
                .sent()
                .iter()
                .rev()
                .find(|n| n.to == to && n.subject.contains("Verification Code"))
                .and_then(|n| {
                    n.body
                        .split(|c: char| !c.is_ascii_digit())
                        .find(|w| w.len() == 6)
                        .map(str::to_string)
                });
            if let Some(code) = code {
                return code;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("no verification code sent to {to}");
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and an in-memory notifier.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<RecordingNotifier>) {
    let config = test_config();
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier: notifier.clone(),
    };
    (build_app_router(state, &config), notifier)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

/// GET authenticated by the session cookie instead of a Bearer header.
pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// POST a raw, possibly malformed, JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response {
    raw(app, uri, None, body).await
}

pub async fn post_raw_auth(app: Router, uri: &str, token: &str, body: &str) -> Response {
    raw(app, uri, Some(token), body).await
}

async fn raw(app: Router, uri: &str, token: Option<&str>, body: &str) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A signed-in identity created directly through the repositories.
pub struct Actor {
    pub id: DbId,
    pub email: String,
    pub token: String,
}

pub fn token_for(id: DbId, email: &str, role: Role) -> String {
    generate_session_token(id, email, role.as_str(), &test_config().jwt).unwrap()
}

async fn create_identity(
    pool: &PgPool,
    email: &str,
    role: Role,
    password: Option<&str>,
) -> Actor {
    let input = CreateIdentity {
        email: email.to_string(),
        display_name: email.split('@').next().unwrap_or(email).to_string(),
        role,
        password_hash: password.map(|p| hash_password(p).unwrap()),
    };
    let identity = IdentityRepo::create(pool, &input).await.unwrap().unwrap();
    Actor {
        id: identity.id,
        email: email.to_string(),
        token: token_for(identity.id, email, role),
    }
}

pub async fn add_roster(pool: &PgPool, email: &str, name: &str) {
    RosterRepo::upsert(
        pool,
        &UpsertRosterParticipant {
            email: email.to_string(),
            name: name.to_string(),
            program: Some("G1000".to_string()),
            cohort_year: Some(2026),
        },
    )
    .await
    .unwrap();
}

pub async fn add_approval(pool: &PgPool, email: &str) -> DbId {
    ApprovalRepo::upsert(
        pool,
        &CreateApprovalEntry {
            email: email.to_string(),
            company_name: Some("Acme Co".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

/// A rostered student with an identity.
pub async fn student(pool: &PgPool, email: &str) -> Actor {
    add_roster(pool, email, "Test Student").await;
    create_identity(pool, email, Role::Student, None).await
}

/// An allow-listed owner with a business profile, approved or not.
pub async fn owner(pool: &PgPool, email: &str, approved: bool) -> Actor {
    add_approval(pool, email).await;
    let actor = create_identity(pool, email, Role::Owner, Some("owner-password-1")).await;
    BusinessProfileRepo::create(
        pool,
        &CreateBusinessProfile {
            user_id: actor.id,
            company_name: "Acme Co".to_string(),
            contact_name: None,
            website_url: None,
            industry_tags: vec![],
        },
    )
    .await
    .unwrap();
    if approved {
        BusinessProfileRepo::set_approved(pool, actor.id, true)
            .await
            .unwrap();
    }
    actor
}

pub async fn admin(pool: &PgPool, email: &str, password: &str) -> Actor {
    create_identity(pool, email, Role::Admin, Some(password)).await
}

/// Create an open project through the API with a window around now.
pub async fn open_project(app: Router, owner: &Actor) -> DbId {
    let now = Utc::now();
    let body = serde_json::json!({
        "title": "Market sizing study",
        "description": "Estimate the regional market",
        "required_skills": ["excel"],
        "apply_window_start": now - chrono::Duration::days(1),
        "apply_window_end": now + chrono::Duration::days(7),
    });
    let response = post_json_auth(app, "/api/v1/business/projects", &owner.token, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Submit an application through the API and return its id.
pub async fn apply(app: Router, student: &Actor, project_id: DbId) -> DbId {
    let body = serde_json::json!({
        "cover_note": "I would love to help",
        "proof_of_work_url": "https://example.com/portfolio",
    });
    let uri = format!("/api/v1/student/opportunities/{project_id}/apply");
    let response = post_json_auth(app, &uri, &student.token, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
