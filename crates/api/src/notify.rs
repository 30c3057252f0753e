//! Fire-and-forget notification helpers for handlers.
//!
//! Lookups needed to address a message happen after the state change has
//! committed; their failure is logged and never fails the request.

use std::sync::Arc;

use g1000_core::types::DbId;
use g1000_db::repositories::IdentityRepo;
use g1000_events::{dispatch, Notification};

use crate::state::AppState;

/// Send to a known address.
pub fn send(state: &AppState, notification: Notification) {
    dispatch(Arc::clone(&state.notifier), notification);
}

/// Resolve an identity's email and send the message built for it.
pub async fn send_to_identity<F>(state: &AppState, identity_id: DbId, build: F)
where
    F: FnOnce(&str) -> Notification,
{
    match IdentityRepo::find_by_id(&state.pool, identity_id).await {
        Ok(Some(identity)) => send(state, build(&identity.email)),
        Ok(None) => {
            tracing::warn!(identity_id, "Notification skipped: identity not found");
        }
        Err(e) => {
            tracing::warn!(identity_id, error = %e, "Notification skipped: lookup failed");
        }
    }
}
