//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /approval-entries                      -> list_approval_entries
/// POST   /approval-entries                      -> add_approval_entry
/// DELETE /approval-entries/{id}                 -> deactivate_approval_entry
/// GET    /business-profiles                     -> list_business_profiles
/// POST   /business-profiles/{user_id}/approve   -> approve_business
/// POST   /business-profiles/{user_id}/revoke    -> revoke_business
/// POST   /roster                                -> upsert_roster
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/approval-entries",
            get(admin::list_approval_entries).post(admin::add_approval_entry),
        )
        .route(
            "/approval-entries/{id}",
            delete(admin::deactivate_approval_entry),
        )
        .route("/business-profiles", get(admin::list_business_profiles))
        .route(
            "/business-profiles/{user_id}/approve",
            post(admin::approve_business),
        )
        .route(
            "/business-profiles/{user_id}/revoke",
            post(admin::revoke_business),
        )
        .route("/roster", post(admin::upsert_roster))
}
