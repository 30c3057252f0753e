//! Plain-text notification builders.

use chrono::{DateTime, Utc};
use g1000_core::identity::CHALLENGE_TTL_MINS;

use crate::notifier::Notification;

const SIGNATURE: &str = "\n\n-- \nG1000 Portal";

fn format_meeting_time(at: DateTime<Utc>) -> String {
    at.format("%A, %B %-d %Y at %H:%M UTC").to_string()
}

fn with_link(mut body: String, meeting_link: Option<&str>) -> String {
    if let Some(link) = meeting_link {
        body.push_str(&format!("\nMeeting link: {link}"));
    }
    body
}

pub fn verification_code(to: &str, code: &str) -> Notification {
    Notification {
        to: to.to_string(),
        subject: "Your G1000 Portal Verification Code".to_string(),
        body: format!(
            "Your verification code is {code}.\n\n\
             It expires in {CHALLENGE_TTL_MINS} minutes. If you did not request it, \
             you can ignore this email.{SIGNATURE}"
        ),
    }
}

/// Sent to the project owner when a student applies.
pub fn new_application(to: &str, project_title: &str, student_name: &str) -> Notification {
    Notification {
        to: to.to_string(),
        subject: format!("New Application - {project_title} from {student_name}"),
        body: format!(
            "{student_name} applied to \"{project_title}\". \
             Review the application in your dashboard.{SIGNATURE}"
        ),
    }
}

pub fn interview_invite(
    to: &str,
    project_title: &str,
    meeting_at: DateTime<Utc>,
    meeting_link: Option<&str>,
) -> Notification {
    let body = format!(
        "You have been invited to interview for \"{project_title}\".\n\n\
         When: {}",
        format_meeting_time(meeting_at)
    );
    Notification {
        to: to.to_string(),
        subject: format!("Interview Invitation - {project_title}"),
        body: with_link(body, meeting_link) + SIGNATURE,
    }
}

pub fn interview_rescheduled(
    to: &str,
    project_title: &str,
    meeting_at: DateTime<Utc>,
    meeting_link: Option<&str>,
) -> Notification {
    let body = format!(
        "Your interview for \"{project_title}\" has been rescheduled.\n\n\
         New time: {}",
        format_meeting_time(meeting_at)
    );
    Notification {
        to: to.to_string(),
        subject: format!("Interview Rescheduled - {project_title}"),
        body: with_link(body, meeting_link) + SIGNATURE,
    }
}

pub fn rejection(to: &str, project_title: &str, feedback: Option<&str>) -> Notification {
    let mut body = format!(
        "Thank you for applying to \"{project_title}\". \
         The business has decided not to move forward with your application."
    );
    if let Some(feedback) = feedback {
        body.push_str(&format!("\n\nFeedback: {feedback}"));
    }
    Notification {
        to: to.to_string(),
        subject: format!("Application Update - {project_title}"),
        body: body + SIGNATURE,
    }
}

pub fn rejection_reversed(to: &str, project_title: &str) -> Notification {
    Notification {
        to: to.to_string(),
        subject: format!("Application Update - {project_title}"),
        body: format!(
            "Your application to \"{project_title}\" is back under review.{SIGNATURE}"
        ),
    }
}

pub fn acceptance(to: &str, project_title: &str) -> Notification {
    Notification {
        to: to.to_string(),
        subject: format!("Application Accepted - {project_title}"),
        body: format!(
            "Congratulations! You have been selected for \"{project_title}\". \
             Your project workspace is now open.{SIGNATURE}"
        ),
    }
}
