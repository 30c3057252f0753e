//! Route definitions for the `/business` resource: profile, projects,
//! applicant lifecycle, and the owner side of engagements.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{business_profile, engagement, lifecycle, projects, student_profile};
use crate::state::AppState;

/// Routes mounted at `/business`.
///
/// ```text
/// GET    /profile                                        -> get
/// PUT    /profile                                        -> upsert
///
/// GET    /projects                                       -> list_own
/// POST   /projects                                       -> create
/// GET    /projects/{id}                                  -> get_own
/// PUT    /projects/{id}                                  -> update
/// PUT    /projects/{id}/status                           -> set_status
///
/// GET    /projects/{id}/applications                     -> list_applicants
/// POST   /projects/{id}/applications/{app_id}/mark-under-review
/// POST   /projects/{id}/applications/{app_id}/invite
/// POST   /projects/{id}/applications/{app_id}/reschedule
/// PUT    /projects/{id}/applications/{app_id}/meeting-link
/// POST   /projects/{id}/applications/{app_id}/reject
/// POST   /projects/{id}/applications/{app_id}/undo-reject
/// POST   /projects/{id}/applications/{app_id}/accept
///
/// GET    /students/{id}/profile                          -> get_applicant
///
/// GET    /engagements                                    -> owner_list
/// GET    /engagements/{id}                               -> owner_view
/// PUT    /engagements/{id}/overview                      -> upsert_overview
/// POST   /engagements/{id}/review                        -> submit_review
/// POST   /engagements/{id}/updates/{update_id}/comments  -> owner_comment
/// DELETE /engagements/{id}/comments/{comment_id}         -> owner_delete_comment
/// ```
pub fn router() -> Router<AppState> {
    let application_routes = Router::new()
        .route("/", get(lifecycle::list_applicants))
        .route(
            "/{app_id}/mark-under-review",
            post(lifecycle::mark_under_review),
        )
        .route("/{app_id}/invite", post(lifecycle::invite))
        .route("/{app_id}/reschedule", post(lifecycle::reschedule))
        .route("/{app_id}/meeting-link", put(lifecycle::set_meeting_link))
        .route("/{app_id}/reject", post(lifecycle::reject))
        .route("/{app_id}/undo-reject", post(lifecycle::undo_reject))
        .route("/{app_id}/accept", post(lifecycle::accept));

    let engagement_routes = Router::new()
        .route("/", get(engagement::owner_list))
        .route("/{id}", get(engagement::owner_view))
        .route("/{id}/overview", put(engagement::upsert_overview))
        .route("/{id}/review", post(engagement::submit_review))
        .route(
            "/{id}/updates/{update_id}/comments",
            post(engagement::owner_comment),
        )
        .route(
            "/{id}/comments/{comment_id}",
            delete(engagement::owner_delete_comment),
        );

    Router::new()
        .route(
            "/profile",
            get(business_profile::get).put(business_profile::upsert),
        )
        .route("/projects", get(projects::list_own).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::get_own).put(projects::update),
        )
        .route("/projects/{id}/status", put(projects::set_status))
        .nest("/projects/{id}/applications", application_routes)
        .route(
            "/students/{id}/profile",
            get(student_profile::get_applicant),
        )
        .nest("/engagements", engagement_routes)
}
