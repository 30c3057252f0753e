//! Route definitions for the `/student` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{engagement, projects, student, student_profile};
use crate::state::AppState;

/// Routes mounted at `/student`.
///
/// ```text
/// GET    /profile                                        -> get_own
/// PUT    /profile                                        -> upsert_own
/// GET    /stats                                          -> stats
///
/// GET    /opportunities                                  -> list_opportunities
/// GET    /opportunities/{id}                             -> get_opportunity
/// POST   /opportunities/{id}/apply                       -> apply
/// GET    /applications                                   -> list_applications
/// POST   /applications/{id}/withdraw                     -> withdraw
///
/// GET    /engagements                                    -> student_list
/// GET    /engagements/{id}                               -> student_view
/// POST   /engagements/{id}/updates                       -> post_update
/// POST   /engagements/{id}/updates/{update_id}/comments  -> student_comment
/// DELETE /engagements/{id}/comments/{comment_id}         -> student_delete_comment
/// POST   /engagements/{id}/reflection                    -> submit_reflection
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(student_profile::get_own).put(student_profile::upsert_own),
        )
        .route("/stats", get(student::stats))
        .route("/opportunities", get(projects::list_opportunities))
        .route("/opportunities/{id}", get(projects::get_opportunity))
        .route("/opportunities/{id}/apply", post(student::apply))
        .route("/applications", get(student::list_applications))
        .route("/applications/{id}/withdraw", post(student::withdraw))
        .route("/engagements", get(engagement::student_list))
        .route("/engagements/{id}", get(engagement::student_view))
        .route("/engagements/{id}/updates", post(engagement::post_update))
        .route(
            "/engagements/{id}/updates/{update_id}/comments",
            post(engagement::student_comment),
        )
        .route(
            "/engagements/{id}/comments/{comment_id}",
            delete(engagement::student_delete_comment),
        )
        .route(
            "/engagements/{id}/reflection",
            post(engagement::submit_reflection),
        )
}
