//! Concrete [`Notifier`](crate::Notifier) channels.

pub mod email;
pub mod log;
