//! Application lifecycle state machine.
//!
//! ```text
//! submitted ──► underReview ──► interviewScheduled ──► accepted
//!     │              │                  │
//!     ├──────────────┴──────────────────┴──► rejected ──(undo)──► underReview
//!     └──────────────┴──► withdrawn
//! ```
//!
//! Transitions are expressed as [`LifecycleAction`] values and validated by
//! [`next_status`]. The repository layer applies the result with a
//! compare-and-set on the previous status so two racing transitions cannot
//! both win.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Note attached to applications rejected because another candidate was
/// accepted for the same project.
pub const AUTO_REJECT_NOTE: &str = "Another candidate was selected for this opportunity.";

// ---------------------------------------------------------------------------
// Application status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    InterviewScheduled,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Statuses from which the owner can still decide.
    pub const PENDING: [ApplicationStatus; 3] = [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::InterviewScheduled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "underReview",
            ApplicationStatus::InterviewScheduled => "interviewScheduled",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Accepted, rejected, and withdrawn end the pre-decision phase.
    /// Only `rejected` can be left again, via [`LifecycleAction::UndoReject`].
    pub fn is_terminal(self) -> bool {
        !Self::PENDING.contains(&self)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "underReview" => Ok(ApplicationStatus::UnderReview),
            "interviewScheduled" => Ok(ApplicationStatus::InterviewScheduled),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "withdrawn" => Ok(ApplicationStatus::Withdrawn),
            other => Err(CoreError::Internal(format!(
                "Unknown application status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Engagement status
// ---------------------------------------------------------------------------

/// Logical status of the engagement attached to an accepted application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementStatus {
    Active,
    Completed,
}

impl EngagementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EngagementStatus::Active => "active",
            EngagementStatus::Completed => "completed",
        }
    }
}

impl FromStr for EngagementStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EngagementStatus::Active),
            "completed" => Ok(EngagementStatus::Completed),
            other => Err(CoreError::Internal(format!(
                "Unknown engagement status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A named transition on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Owner: `submitted -> underReview`.
    MarkUnderReview,
    /// Owner: any pending status -> `interviewScheduled`.
    ScheduleInterview,
    /// Owner: move the meeting of an already scheduled interview.
    Reschedule,
    /// Owner: any pending status -> `accepted`.
    Accept,
    /// Owner: any pending status -> `rejected`.
    Reject,
    /// Owner: `rejected -> underReview`.
    UndoReject,
    /// Student: `submitted | underReview -> withdrawn`.
    Withdraw,
}

impl LifecycleAction {
    fn verb(self) -> &'static str {
        match self {
            LifecycleAction::MarkUnderReview => "mark under review",
            LifecycleAction::ScheduleInterview => "schedule an interview for",
            LifecycleAction::Reschedule => "reschedule",
            LifecycleAction::Accept => "accept",
            LifecycleAction::Reject => "reject",
            LifecycleAction::UndoReject => "undo the rejection of",
            LifecycleAction::Withdraw => "withdraw",
        }
    }
}

/// Compute the status that `action` leads to from `from`.
///
/// Returns [`CoreError::TooLate`] when a student tries to withdraw after the
/// owner has engaged, and [`CoreError::InvalidState`] for every other
/// illegal transition.
pub fn next_status(
    from: ApplicationStatus,
    action: LifecycleAction,
) -> Result<ApplicationStatus, CoreError> {
    use ApplicationStatus::*;
    use LifecycleAction::*;

    let to = match (action, from) {
        (MarkUnderReview, Submitted) => UnderReview,
        (ScheduleInterview, Submitted | UnderReview | InterviewScheduled) => InterviewScheduled,
        (Reschedule, InterviewScheduled) => InterviewScheduled,
        (Accept, Submitted | UnderReview | InterviewScheduled) => Accepted,
        (Reject, Submitted | UnderReview | InterviewScheduled) => Rejected,
        (UndoReject, Rejected) => UnderReview,
        (Withdraw, Submitted | UnderReview) => Withdrawn,
        (Withdraw, InterviewScheduled | Accepted) => {
            return Err(CoreError::TooLate(
                "Cannot withdraw after an interview has been scheduled or the application accepted"
                    .into(),
            ));
        }
        (action, from) => {
            return Err(CoreError::InvalidState(format!(
                "Cannot {} an application that is {from}",
                action.verb()
            )));
        }
    };
    Ok(to)
}

/// Check that a submission at `now` falls inside an open project's window.
///
/// Both ends of the window are inclusive.
pub fn check_apply_window(
    project_is_open: bool,
    window_start: Timestamp,
    window_end: Timestamp,
    now: Timestamp,
) -> Result<(), CoreError> {
    if project_is_open && window_start <= now && now <= window_end {
        Ok(())
    } else {
        Err(CoreError::WindowClosed)
    }
}
