//! G1000 notification infrastructure.
//!
//! - [`Notifier`]: the fire-and-forget delivery seam used by the API.
//! - [`delivery`]: concrete channels (SMTP email, log-only fallback).
//! - [`messages`]: subject/body builders for every lifecycle notification.
//! - [`dispatch`]: spawn a send in the background and swallow failures.

pub mod delivery;
pub mod messages;
pub mod notifier;

pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::log::LogNotifier;
pub use notifier::{dispatch, Notification, Notifier, NotifyError};
