//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, business_auth};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /request-code              -> request_code (student)
/// POST /verify-code               -> verify_code (student)
/// POST /set-password              -> set_password (session)
/// POST /login-password            -> login_password (student)
/// POST /check-user                -> check_user (student)
/// POST /change-password           -> change_password (session)
/// GET  /me                        -> me (session)
/// POST /logout                    -> logout
///
/// POST /business/register         -> register
/// POST /business/request-code     -> request_code
/// POST /business/verify-code      -> verify_code
/// POST /business/set-password     -> set_password (session)
/// POST /business/login-password   -> login_password
/// POST /business/check-user       -> check_user
///
/// POST /admin/login               -> admin_login
/// ```
pub fn router() -> Router<AppState> {
    let business = Router::new()
        .route("/register", post(business_auth::register))
        .route("/request-code", post(business_auth::request_code))
        .route("/verify-code", post(business_auth::verify_code))
        .route("/set-password", post(business_auth::set_password))
        .route("/login-password", post(business_auth::login_password))
        .route("/check-user", post(business_auth::check_user));

    Router::new()
        .route("/request-code", post(auth::request_code))
        .route("/verify-code", post(auth::verify_code))
        .route("/set-password", post(auth::set_password))
        .route("/login-password", post(auth::login_password))
        .route("/check-user", post(auth::check_user))
        .route("/change-password", post(auth::change_password))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .route("/admin/login", post(auth::admin_login))
        .nest("/business", business)
}
