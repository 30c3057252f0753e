//! Student profile rules: bio length, skills, and the links a student
//! shows to businesses.

use validator::ValidateUrl;

use crate::engagement::MAX_TEXT_LEN;
use crate::error::CoreError;

/// Maximum number of listed skills.
pub const MAX_SKILLS: usize = 30;

/// Maximum number of proof-of-work links.
pub const MAX_PROOF_OF_WORK_URLS: usize = 10;

/// Accept absolute `http` and `https` URLs only.
pub fn validate_web_url(field: &str, url: &str) -> Result<(), CoreError> {
    let lower = url.to_ascii_lowercase();
    let web = lower.starts_with("http://") || lower.starts_with("https://");
    if !web || !url.validate_url() {
        return Err(CoreError::InvalidInput(format!("Invalid {field} URL format")));
    }
    Ok(())
}

/// Trim `value` and drop it when blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim each entry and drop blank ones.
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// The editable parts of a student profile, already trimmed.
#[derive(Debug, Clone, Copy)]
pub struct ProfileFields<'a> {
    pub bio: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
    pub github_url: Option<&'a str>,
    pub personal_website_url: Option<&'a str>,
    pub skills: &'a [String],
    pub proof_of_work_urls: &'a [String],
}

pub fn validate_student_profile(fields: ProfileFields<'_>) -> Result<(), CoreError> {
    if let Some(bio) = fields.bio {
        if bio.chars().count() > MAX_TEXT_LEN {
            return Err(CoreError::InvalidInput(format!(
                "Bio must be at most {MAX_TEXT_LEN} characters"
            )));
        }
    }
    for (field, url) in [
        ("LinkedIn", fields.linkedin_url),
        ("GitHub", fields.github_url),
        ("personal website", fields.personal_website_url),
    ] {
        if let Some(url) = url {
            validate_web_url(field, url)?;
        }
    }
    if fields.skills.len() > MAX_SKILLS {
        return Err(CoreError::InvalidInput(format!(
            "At most {MAX_SKILLS} skills can be listed"
        )));
    }
    if fields.proof_of_work_urls.len() > MAX_PROOF_OF_WORK_URLS {
        return Err(CoreError::InvalidInput(format!(
            "At most {MAX_PROOF_OF_WORK_URLS} proof of work links can be listed"
        )));
    }
    for url in fields.proof_of_work_urls {
        validate_web_url("proof of work", url)?;
    }
    Ok(())
}
